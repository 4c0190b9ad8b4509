use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed index entry at line {line}: {text:?}")]
    MalformedIndex { line: usize, text: String },
}

pub type Result<T> = std::result::Result<T, LocatorError>;
