//! Error handling for the resume signals application

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignalScorerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Text processing error: {0}")]
    TextProcessing(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Empty document: {0}")]
    EmptyDocument(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Scoring error: {0}")]
    Scoring(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, SignalScorerError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for SignalScorerError {
    fn from(err: anyhow::Error) -> Self {
        SignalScorerError::Scoring(err.to_string())
    }
}
