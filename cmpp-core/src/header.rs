//! The fixed 12-byte CMPP frame header.
//!
//! ```text
//! total_length:  u32 BE  (4)   header + body
//! command_id:    u32 BE  (4)
//! sequence_id:   u32 BE  (4)
//! ```
//!
//! Headers are encoded into and decoded from byte slices; nothing is
//! ever overlaid on a wire buffer.

use bytes::{Buf, BufMut};

use crate::error::TransportError;

/// Size of the encoded header on the wire.
pub const HEADER_SIZE: usize = 12;

pub type HeaderBytes = [u8; HEADER_SIZE];

/// Decoded CMPP frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHeader {
    pub total_length: u32,
    pub command_id: u32,
    pub sequence_id: u32,
}

impl FrameHeader {
    /// Build a header for an outgoing frame. Always succeeds.
    pub fn new(total_length: u32, command_id: u32, sequence_id: u32) -> Self {
        Self {
            total_length,
            command_id,
            sequence_id,
        }
    }

    /// Serialize to network byte order.
    pub fn encode(&self) -> HeaderBytes {
        let mut buf = [0u8; HEADER_SIZE];
        let mut dst = &mut buf[..];
        dst.put_u32(self.total_length);
        dst.put_u32(self.command_id);
        dst.put_u32(self.sequence_id);
        buf
    }

    /// Write the encoded header over the first 12 bytes of `dst`.
    pub fn write_to(&self, dst: &mut [u8]) -> Result<(), TransportError> {
        let actual = dst.len();
        let slot = dst
            .get_mut(..HEADER_SIZE)
            .ok_or(TransportError::BufferTooSmall {
                required: HEADER_SIZE,
                actual,
            })?;
        slot.copy_from_slice(&self.encode());
        Ok(())
    }

    /// Decode the first 12 bytes of `src`. Trailing bytes are ignored.
    pub fn decode(src: &[u8]) -> Result<Self, TransportError> {
        let mut head = src.get(..HEADER_SIZE).ok_or(TransportError::BufferTooSmall {
            required: HEADER_SIZE,
            actual: src.len(),
        })?;
        Ok(Self {
            total_length: head.get_u32(),
            command_id: head.get_u32(),
            sequence_id: head.get_u32(),
        })
    }

    /// Body length implied by `total_length`, or `None` if the declared
    /// length cannot even cover the header.
    pub fn body_length(&self) -> Option<usize> {
        (self.total_length as usize).checked_sub(HEADER_SIZE)
    }
}

/// Build a header from its three fields.
pub fn write_header(total_length: u32, command_id: u32, sequence_id: u32) -> FrameHeader {
    FrameHeader::new(total_length, command_id, sequence_id)
}
