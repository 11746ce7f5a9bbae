use thiserror::Error;

#[derive(Error, Debug)]
pub enum DaftarError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown customer or person: {0}")]
    UnknownCustomer(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, DaftarError>;
