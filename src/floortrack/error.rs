use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error("Invalid QR code: {0}")]
    MalformedPayload(String),

    #[error("The QR code has already been scanned")]
    DuplicateScan,

    #[error("Record already exists in storage: {0}")]
    DuplicateRecord(String),

    #[error("Record not found in storage: {0}")]
    RecordNotFound(String),

    #[error("Location not found in the storage list: {0}")]
    LocationNotFound(String),

    #[error("Invalid data category")]
    InvalidCategory,

    #[error("Invalid cage number: {0}")]
    InvalidCageCode(String),

    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TrackError>;
