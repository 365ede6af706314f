use crate::bin_path::lighthouse_path;
use crate::error::LighthouseError;
use crate::flags::audit_flags;
use hydration_bench_core::prelude::AuditTimeoutError;
use hydration_bench_instruments::AuditResult;
use hydration_bench_runner::prelude::{AuditEngine, AuditRequest, RunnerContext};
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};

/// An [AuditEngine] that runs the `lighthouse` CLI once per audit.
///
/// Lighthouse attaches to the browser already listening on the evaluation's debugging port rather
/// than starting its own.
#[derive(Debug, Clone)]
pub struct LighthouseCli {
    path: PathBuf,
    headless: bool,
}

impl LighthouseCli {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            headless: true,
        }
    }

    /// Find Lighthouse, see [crate::lighthouse_path].
    pub fn locate(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = lighthouse_path(explicit)?;
        log::info!("Using Lighthouse at {}", path.display());
        Ok(Self::new(path))
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }
}

impl AuditEngine for LighthouseCli {
    fn audit(
        &mut self,
        ctx: &RunnerContext,
        request: &AuditRequest<'_>,
    ) -> anyhow::Result<Option<AuditResult>> {
        let args = audit_flags(
            request.url,
            request.config,
            ctx.debugging_port(),
            self.headless,
        );
        let timeout = request.config.audit_timeout();
        log::trace!(
            "[{}] Running {} {}",
            ctx.run_id(),
            self.path.display(),
            args.join(" ")
        );

        let path = self.path.clone();
        let output = ctx.executor().execute_in_place(async move {
            let child = tokio::process::Command::new(&path)
                .args(&args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn()
                .map_err(|source| LighthouseError::Spawn {
                    path: path.clone(),
                    source,
                })?;

            // Dropping the child on timeout kills the subprocess.
            match tokio::time::timeout(timeout, child.wait_with_output()).await {
                Ok(output) => Ok(output.map_err(LighthouseError::Output)?),
                Err(_) => Err(AuditTimeoutError::new(timeout).into()),
            }
        })?;

        Ok(parse_output(output)?)
    }
}

fn parse_output(output: Output) -> Result<Option<AuditResult>, LighthouseError> {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(LighthouseError::Exited {
            status: output.status,
            stderr: last_line(&stderr).to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stdout = stdout.trim();
    if stdout.is_empty() {
        return Ok(None);
    }

    let lhr = serde_json::from_str(stdout).map_err(LighthouseError::InvalidResult)?;
    Ok(Some(AuditResult::new(lhr)))
}

fn last_line(text: &str) -> &str {
    text.lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("no error output")
}
