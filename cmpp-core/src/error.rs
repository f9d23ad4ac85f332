//! Domain-specific error types for the CMPP client core.
//!
//! All fallible operations return `Result<T, CmppError>` or, for the
//! frame transport, `Result<T, TransportError>`.
//! No panics on invalid input — every error is typed and recoverable.

use thiserror::Error;

/// The canonical error type for the CMPP client core.
#[derive(Debug, Error)]
pub enum CmppError {
    // ── Argument Errors ──────────────────────────────────────────
    /// Malformed caller input, detected before any I/O.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The login name does not fit the connect request's source field.
    #[error("source address is {length} bytes, at most {max} allowed")]
    CredentialTooLong { length: usize, max: usize },

    /// A numeric value did not map to any known enum variant.
    #[error("unknown {type_name} discriminant: {value:#x}")]
    UnknownVariant { type_name: &'static str, value: u64 },

    // ── Encoding Errors ──────────────────────────────────────────
    /// No conversion is available between the two named encodings.
    #[error("unsupported encoding pair: {from} -> {to}")]
    UnsupportedEncoding { from: String, to: String },

    // ── Transport Errors ─────────────────────────────────────────
    /// The frame transport failed; the connection must be dropped.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The socket connected but its options could not be applied.
    #[error("can't configure socket: {0}")]
    SocketSetup(#[source] std::io::Error),

    /// A buffered frame violated the framing rules.
    #[error("codec error: {0}")]
    Codec(&'static str),

    /// Catch-all for errors that do not fit another variant.
    #[error("{0}")]
    Other(String),
}

// ── TransportError ────────────────────────────────────────────────

/// Failures of the blocking frame transport.
///
/// Every variant means the byte stream can no longer be trusted to be
/// aligned on a frame boundary. Callers drop the connection.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Fewer bytes arrived than the frame requires.
    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },

    /// The socket accepted fewer bytes than the frame holds.
    #[error("short write: expected {expected} bytes, sent {actual}")]
    ShortWrite { expected: usize, actual: usize },

    /// The header declares more bytes than the outgoing buffer holds.
    #[error("frame too long: header declares {declared} bytes, buffer holds {available}")]
    FrameTooLong { declared: usize, available: usize },

    /// The buffer cannot even hold a frame header.
    #[error("buffer too small: need at least {required} bytes, got {actual}")]
    BufferTooSmall { required: usize, actual: usize },

    /// A header declares a length outside `[HEADER_SIZE, max]`.
    #[error("invalid declared frame length {declared} (max {max})")]
    InvalidLength { declared: u32, max: usize },

    /// The socket layer reported an error.
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),
}

// ── Convenient From implementations ──────────────────────────────

impl From<std::io::Error> for CmppError {
    fn from(e: std::io::Error) -> Self {
        CmppError::Transport(TransportError::Io(e))
    }
}

impl From<String> for CmppError {
    fn from(s: String) -> Self {
        CmppError::Other(s)
    }
}

impl From<&str> for CmppError {
    fn from(s: &str) -> Self {
        CmppError::Other(s.to_string())
    }
}
