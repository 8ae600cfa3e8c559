use thiserror::Error;

/// The buffer is not a capture this reader understands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("capture too short: need at least {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("unrecognized capture magic {magic:02x?}")]
    UnrecognizedMagic { magic: [u8; 4] },
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("capture format error: {0}")]
    Format(#[from] FormatError),
}
