//! Crate-wide error type

/// Errors surfaced by session construction, parsing, and I/O
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input or output stream is not an interactive terminal
    #[error("not a tty")]
    NotATty,

    /// The declared terminal type is missing or too limited to drive
    #[error("unusable terminal")]
    UnusableTerminal,

    /// A `CSI <code> ~` sequence carried a numeric code outside the
    /// function-key table
    #[error("unknown input key sequence {0:?}")]
    UnknownKeySequence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
