use crate::collector::procfs::parser::ParseError;

/// Why a single metric could not be read.
///
/// Never escapes [`MetricsCollector::collect`](crate::collector::MetricsCollector::collect);
/// each one becomes an absent field and a log event.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("not supported on this platform")]
    Unsupported,
    #[error("field {0} missing from source")]
    MissingField(&'static str),
    #[error("no time elapsed between samples")]
    NoElapsedTime,
}

impl CollectError {
    pub fn is_unsupported(&self) -> bool {
        matches!(self, CollectError::Unsupported)
    }
}
