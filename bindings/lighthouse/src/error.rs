use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LighthouseError {
    #[error("Failed to start Lighthouse at {path}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to collect Lighthouse output")]
    Output(#[source] std::io::Error),
    #[error("Lighthouse failed ({status}): {stderr}")]
    Exited {
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("Lighthouse printed a result that is not valid JSON")]
    InvalidResult(#[source] serde_json::Error),
}
