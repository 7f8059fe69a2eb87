use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown section: {0}")]
    UnknownSection(String),
    #[error("Duplicate section id: {0}")]
    DuplicateSection(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}
