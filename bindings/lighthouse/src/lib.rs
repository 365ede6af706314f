//! Lighthouse audits for hydration bench evaluations.
//!
//! Requires the `lighthouse` CLI, installed with `npm install -g lighthouse`.

mod bin_path;
mod error;
mod flags;
mod lighthouse_cli;

pub use bin_path::{lighthouse_path, HB_LIGHTHOUSE_PATH_ENV};
pub use error::LighthouseError;
pub use flags::audit_flags;
pub use lighthouse_cli::LighthouseCli;
