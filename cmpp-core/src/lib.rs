//! # cmpp-core
//!
//! Transport and framing core for CMPP 2.0 (China Mobile Peer to Peer)
//! short-message clients.
//!
//! This crate contains:
//! - **Framing**: `FrameHeader` (12-byte big-endian header), `Frame`, `is_command`
//! - **Transport**: blocking `send` / `receive` over any `Socket`
//! - **Codec**: `CmppCodec` for framed async I/O via `tokio_util`
//! - **Network**: `Connection` pairing a socket with a `SequenceGenerator`
//! - **Handshake**: MD5 `digest` and the connect `authenticator_source`
//! - **Text**: charset `recode` and the UCS-2 length probe
//! - **Errors**: `CmppError` / `TransportError`, plus the caller-facing `ErrorCode` catalog
//!
//! Per-command body layouts, reconnect and heartbeat policy live with
//! the caller.

pub mod auth;
pub mod catalog;
pub mod codec;
pub mod command;
pub mod error;
pub mod frame;
pub mod header;
pub mod network;
pub mod sequence;
pub mod text;
pub mod transport;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use auth::{DIGEST_SIZE, authenticator_source, digest, timestamp_now};
pub use catalog::{ErrorCode, describe};
pub use codec::CmppCodec;
pub use command::CommandId;
pub use error::{CmppError, TransportError};
pub use frame::{Frame, MAX_FRAME_SIZE, is_command};
pub use header::{FrameHeader, HEADER_SIZE, write_header};
pub use network::{Connection, ConnectionInfo};
pub use sequence::{SEQUENCE_LIMIT, SequenceGenerator};
pub use text::{MAX_MSG_LENGTH, recode, ucs2_length};
pub use transport::{Socket, receive, send};
