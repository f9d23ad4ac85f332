//! Blocking frame transport over a byte-stream socket.
//!
//! A frame is self-describing only through its header, so receiving is
//! two-phase: read exactly [`HEADER_SIZE`] bytes, decode `total_length`,
//! then read exactly the rest. Any [`TransportError`] leaves the stream
//! misaligned and the connection has to be re-established.

use std::io::{ErrorKind, Read, Write};

use tracing::{debug, trace};

use crate::error::TransportError;
use crate::header::{FrameHeader, HEADER_SIZE};

// ── Socket ───────────────────────────────────────────────────────

/// Blocking byte-stream collaborator.
///
/// Both calls may transfer fewer bytes than asked; the transport checks
/// the counts and reports short transfers instead of retrying.
pub trait Socket {
    /// Send bytes from `buf`, returning how many were accepted.
    fn send(&mut self, buf: &[u8]) -> std::io::Result<usize>;

    /// Receive into `buf`, returning how many bytes arrived.
    fn recv(&mut self, buf: &mut [u8]) -> std::io::Result<usize>;
}

/// Any blocking stream is a socket. `send` stops early only when the
/// stream stops accepting bytes; `recv` stops early only at end of
/// stream.
impl<T: Read + Write> Socket for T {
    fn send(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut sent = 0;
        while sent < buf.len() {
            match self.write(&buf[sent..]) {
                Ok(0) => break,
                Ok(n) => sent += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        self.flush()?;
        Ok(sent)
    }

    fn recv(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

// ── Send / Receive ───────────────────────────────────────────────

/// Send the frame at the start of `buf`.
///
/// Exactly `total_length` bytes (as declared by the header) are written.
/// Nothing is written if the header claims fewer bytes than a header or
/// more bytes than `buf` holds.
pub fn send<S: Socket + ?Sized>(sock: &mut S, buf: &[u8]) -> Result<(), TransportError> {
    let header = FrameHeader::decode(buf)?;
    let declared = header.total_length as usize;
    if declared < HEADER_SIZE {
        debug!(declared, "refusing to send frame shorter than its header");
        return Err(TransportError::InvalidLength {
            declared: header.total_length,
            max: buf.len(),
        });
    }
    if declared > buf.len() {
        debug!(declared, available = buf.len(), "refusing to send truncated frame");
        return Err(TransportError::FrameTooLong {
            declared,
            available: buf.len(),
        });
    }

    let sent = sock.send(&buf[..declared])?;
    if sent != declared {
        debug!(expected = declared, sent, "short write");
        return Err(TransportError::ShortWrite {
            expected: declared,
            actual: sent,
        });
    }

    trace!(
        command_id = header.command_id,
        sequence_id = header.sequence_id,
        len = declared,
        "frame sent"
    );
    Ok(())
}

/// Receive one frame into `buf`, returning its total length.
///
/// The declared length must lie within `[HEADER_SIZE, buf.len()]`;
/// anything else is rejected before the body is read.
pub fn receive<S: Socket + ?Sized>(sock: &mut S, buf: &mut [u8]) -> Result<usize, TransportError> {
    if buf.len() < HEADER_SIZE {
        return Err(TransportError::BufferTooSmall {
            required: HEADER_SIZE,
            actual: buf.len(),
        });
    }

    let got = sock.recv(&mut buf[..HEADER_SIZE])?;
    if got != HEADER_SIZE {
        debug!(got, "short read on frame header");
        return Err(TransportError::ShortRead {
            expected: HEADER_SIZE,
            actual: got,
        });
    }

    let header = FrameHeader::decode(buf)?;
    let total = header.total_length as usize;
    if total < HEADER_SIZE || total > buf.len() {
        debug!(declared = total, capacity = buf.len(), "rejecting declared frame length");
        return Err(TransportError::InvalidLength {
            declared: header.total_length,
            max: buf.len(),
        });
    }

    let body = &mut buf[HEADER_SIZE..total];
    if !body.is_empty() {
        let got = sock.recv(body)?;
        if got != body.len() {
            debug!(expected = body.len(), got, "short read on frame body");
            return Err(TransportError::ShortRead {
                expected: body.len(),
                actual: got,
            });
        }
    }

    trace!(
        command_id = header.command_id,
        sequence_id = header.sequence_id,
        len = total,
        "frame received"
    );
    Ok(total)
}
