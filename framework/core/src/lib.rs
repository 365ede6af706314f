mod error;
mod metric;

pub mod prelude {
    pub use crate::error::{AuditTimeoutError, EmptyAuditResultError};
    pub use crate::metric::{Metric, RunSample};
}
