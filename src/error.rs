use thiserror::Error;

/// Errors raised while turning raw course logs into a training dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// A raw table is missing one of its required columns
    #[error("{table} table is missing required column `{column}`")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    /// An action or submission status outside the recognised category set
    #[error("unknown action category `{value}`")]
    UnknownAction { value: String },

    /// An epoch value that cannot be represented as a calendar instant
    #[error("timestamp {timestamp} is out of range")]
    TimestampOutOfRange { timestamp: i64 },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DatasetError>;
