use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum NaryadError {
    #[error("row {row}: annotation row found before any request header row")]
    State { row: usize },

    #[error("row {row}: malformed request header: {reason}")]
    Format { row: usize, reason: String },

    #[error("layout error: {0}")]
    Layout(String),

    #[error("failed to read workbook: {0}")]
    Spreadsheet(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("failed to load layout profile from {path}: {reason}")]
    ProfileLoad { path: PathBuf, reason: String },

    #[error("invalid layout profile: {0}")]
    ProfileInvalid(String),

    #[error("unsupported worksheet document: {0}")]
    UnsupportedDocument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<lopdf::Error> for NaryadError {
    fn from(e: lopdf::Error) -> Self {
        NaryadError::Pdf(e.to_string())
    }
}
