use thiserror::Error;

#[derive(Error, Debug)]
pub enum NumberingError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Container cannot be resolved: {0}")]
    InvalidReference(String),

    #[error("Selection mismatch: {0}")]
    SelectionMismatch(String),

    #[error("Write-back failed: {0}")]
    WriteBack(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NumberingError>;
