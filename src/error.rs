//! Error types for the tagwire format.

/// Errors that can occur while encoding or decoding a tagwire stream.
///
/// Every error is fatal to the value being processed: the format is a single
/// linear pass with no resynchronization point, so nothing is retried
/// internally. Callers may still recover stream position for the *next*
/// top-level value by skip-scanning to the enclosing end marker.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The byte source was exhausted before the expected byte count was read.
    #[error("truncated input: {needed} more byte(s) required")]
    Truncated { needed: usize },

    /// The tag read does not match any tag acceptable for the requested
    /// value kind.
    #[error("type mismatch: expected {expected}, found tag 0x{found:02X}")]
    TypeMismatch { expected: &'static str, found: u8 },

    /// A record's end marker was missing at its close, or an unrecognized
    /// tag was encountered during a skip scan.
    #[error("framing error: {0}")]
    Framing(String),

    /// The caller violated an encoding contract (oversized length, bad
    /// array element kind). A programmer error, not a data error.
    #[error("encoding precondition: {0}")]
    Precondition(String),

    /// I/O error from the underlying byte source or sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A decoded string payload was not valid UTF-8.
    #[error("invalid UTF-8 string: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
