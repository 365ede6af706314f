use anyhow::bail;
use anyhow::Context;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable to override the path to the Lighthouse CLI.
pub const HB_LIGHTHOUSE_PATH_ENV: &str = "HB_LIGHTHOUSE_PATH";

const LIGHTHOUSE_BIN: &str = "lighthouse";

/// Get the path to the Lighthouse CLI.
///
/// An explicit path, from the command line, wins. Otherwise [`HB_LIGHTHOUSE_PATH_ENV`] is used if
/// set, and if neither is set the `lighthouse` binary is looked up on the user's `PATH`.
pub fn lighthouse_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    resolve(explicit, env::var(HB_LIGHTHOUSE_PATH_ENV).ok().as_deref())
}

fn resolve(explicit: Option<&Path>, from_env: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        if !path.exists() {
            bail!(
                "Path to Lighthouse set to '{}' but that path doesn't exist",
                path.display()
            );
        }
        return Ok(path.to_path_buf());
    }

    match from_env {
        Some("") => {
            bail!("'{HB_LIGHTHOUSE_PATH_ENV}' set to empty string");
        }
        Some(LIGHTHOUSE_BIN) | None => {
            log::debug!("Looking for '{LIGHTHOUSE_BIN}' in user's 'PATH'");
            which::which(LIGHTHOUSE_BIN).with_context(|| {
                format!(
                    "Lighthouse not found in PATH. Install it with 'npm install -g lighthouse' or set '{HB_LIGHTHOUSE_PATH_ENV}' to the correct path."
                )
            })
        }
        Some(path) => {
            let lighthouse_path = PathBuf::from(path);
            if !lighthouse_path.exists() {
                bail!(
                    "Path to Lighthouse overwritten with '{HB_LIGHTHOUSE_PATH_ENV}={path}' but that path doesn't exist",
                    path = lighthouse_path.display()
                );
            }
            Ok(lighthouse_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn explicit_path_is_used_when_it_exists() {
        let temp = NamedTempFile::new().unwrap();
        let result = resolve(Some(temp.path()), Some("/somewhere/else")).unwrap();
        assert_eq!(result, temp.path());
    }

    #[test]
    fn explicit_path_must_exist() {
        let result = resolve(Some(Path::new("/non/existent/lighthouse")), None);
        assert!(result.is_err());
    }

    #[test]
    fn env_path_is_used_when_it_exists() {
        let temp = NamedTempFile::new().unwrap();
        let path = temp.path().to_str().unwrap();
        let result = resolve(None, Some(path)).unwrap();
        assert_eq!(result, PathBuf::from(path));
    }

    #[test]
    fn empty_env_path_is_rejected() {
        let err = resolve(None, Some("")).unwrap_err();
        assert!(err.to_string().contains("empty string"));
    }

    #[test]
    fn missing_env_path_is_rejected() {
        assert!(resolve(None, Some("/non/existent/lighthouse")).is_err());
    }
}
