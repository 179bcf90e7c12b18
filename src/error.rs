use thiserror::Error;

/// Errors that abort a render. No partial document is ever returned.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Failed to load template: {0}")]
    Template(String),
    #[error("Invalid submission record: {0}")]
    Record(String),
    #[error("Failed to write PDF: {0}")]
    Pdf(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The two failure categories callers need to tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad configuration, a missing or malformed template, or a malformed record.
    Configuration,
    /// Reading or writing bytes failed.
    Io,
}

impl RenderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RenderError::Config(_) | RenderError::Template(_) | RenderError::Record(_) => {
                ErrorKind::Configuration
            }
            RenderError::Pdf(_) | RenderError::Io(_) => ErrorKind::Io,
        }
    }
}
