use thiserror::Error;

/// Convenience result type for the data layer.
pub type DashboardResult<T> = Result<T, DashboardError>;

/// Errors raised while turning uploaded bytes into a [`crate::data::model::Table`]
/// or a table back into bytes.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The upload is not valid delimited text.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Underlying CSV reader/writer error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    pub fn parse(message: impl Into<String>) -> Self {
        DashboardError::Parse {
            message: message.into(),
        }
    }
}
