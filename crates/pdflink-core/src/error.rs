use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfLinkError {
    #[error("PDF not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("Page index {index} is out of range (document has {page_count} pages)")]
    PageOutOfRange { index: usize, page_count: usize },

    #[error("Invalid link rectangle: {0}")]
    InvalidRect(String),

    #[error("PDF operation failed: {0}")]
    OperationError(String),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}
