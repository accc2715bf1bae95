use thiserror::Error;

/// Fatal failure to turn a document into text.
///
/// Unlike analysis failures this ends the pipeline run and is reported to
/// the caller.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    UnsupportedFormat(#[from] legalmate_core::UnsupportedFormat),

    #[error("document is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },

    #[error("PDF parsing failed: {0}")]
    Pdf(String),

    #[error("DOCX parsing failed: {0}")]
    Docx(String),

    #[error("no extractable text in document")]
    NoText,

    #[error("extraction worker failed: {0}")]
    Worker(String),
}
