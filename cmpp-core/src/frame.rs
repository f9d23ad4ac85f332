//! Owned CMPP frames.
//!
//! A [`Frame`] pairs a decoded header with its body and keeps
//! `total_length` consistent with the bytes it holds. [`is_command`]
//! classifies a raw received buffer without parsing the body.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{CmppError, TransportError};
use crate::header::{FrameHeader, HEADER_SIZE};

/// Upper bound on a single frame, header included.
///
/// Comfortably above the largest CMPP 2.0 body (a submit carrying 100
/// destination numbers and a full message).
pub const MAX_FRAME_SIZE: usize = 4096;

/// Upper bound on a frame body.
pub const MAX_BODY_SIZE: usize = MAX_FRAME_SIZE - HEADER_SIZE;

/// One complete protocol message: header + body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    header: FrameHeader,
    body: Bytes,
}

impl Frame {
    pub fn new(command_id: u32, sequence_id: u32, body: impl Into<Bytes>) -> Result<Self, CmppError> {
        let body = body.into();
        if body.len() > MAX_BODY_SIZE {
            return Err(CmppError::InvalidArgument("frame body exceeds maximum frame size"));
        }
        let total = (HEADER_SIZE + body.len()) as u32;
        Ok(Self {
            header: FrameHeader::new(total, command_id, sequence_id),
            body,
        })
    }

    /// Header-only frame, e.g. `ACTIVE_TEST` or `TERMINATE`.
    pub fn empty(command_id: u32, sequence_id: u32) -> Self {
        Self {
            header: FrameHeader::new(HEADER_SIZE as u32, command_id, sequence_id),
            body: Bytes::new(),
        }
    }

    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn command_id(&self) -> u32 {
        self.header.command_id
    }

    pub fn sequence_id(&self) -> u32 {
        self.header.sequence_id
    }

    pub fn total_length(&self) -> usize {
        self.header.total_length as usize
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.total_length());
        self.write_to(&mut buf);
        buf.freeze()
    }

    pub fn write_to(&self, dst: &mut BytesMut) {
        dst.reserve(self.total_length());
        dst.put_slice(&self.header.encode());
        dst.put_slice(&self.body);
    }

    /// Parse one frame occupying exactly `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CmppError> {
        let header = FrameHeader::decode(bytes)?;
        let declared = header.total_length as usize;
        if declared < HEADER_SIZE || declared > MAX_FRAME_SIZE {
            return Err(TransportError::InvalidLength {
                declared: header.total_length,
                max: MAX_FRAME_SIZE,
            }
            .into());
        }
        if bytes.len() != declared {
            return Err(CmppError::Codec("frame length does not match its header"));
        }

        Ok(Self {
            header,
            body: Bytes::copy_from_slice(&bytes[HEADER_SIZE..]),
        })
    }
}

/// Whether `buf` holds a frame of the given command. Never fails: a
/// buffer too short for a header is simply not a match.
pub fn is_command(buf: &[u8], expected_command_id: u32) -> bool {
    FrameHeader::decode(buf).is_ok_and(|h| h.command_id == expected_command_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandId;

    #[test]
    fn new_computes_total_length() {
        let frame = Frame::new(CommandId::Submit.into(), 7, b"hello".to_vec()).unwrap();
        assert_eq!(frame.total_length(), 17);
        assert_eq!(frame.to_bytes().len(), 17);
        assert_eq!(&frame.to_bytes()[..4], &[0, 0, 0, 17]);
    }

    #[test]
    fn empty_frame_is_header_only() {
        let frame = Frame::empty(CommandId::ActiveTest.into(), 3);
        assert_eq!(frame.to_bytes().len(), HEADER_SIZE);
        assert!(frame.body().is_empty());
    }

    #[test]
    fn oversized_body_rejected() {
        assert!(Frame::new(4, 1, vec![0u8; MAX_BODY_SIZE]).is_ok());
        assert!(Frame::new(4, 1, vec![0u8; MAX_BODY_SIZE + 1]).is_err());
    }

    #[test]
    fn from_bytes_parses_wire_frame() {
        let wire = Frame::new(0x8000_0004, 42, b"\x00\x01".to_vec())
            .unwrap()
            .to_bytes();
        let frame = Frame::from_bytes(&wire).unwrap();
        assert_eq!(frame.command_id(), 0x8000_0004);
        assert_eq!(frame.sequence_id(), 42);
        assert_eq!(frame.body(), b"\x00\x01");
    }

    #[test]
    fn from_bytes_rejects_mismatched_length() {
        let mut wire = Frame::new(4, 1, b"abc".to_vec()).unwrap().to_bytes().to_vec();
        wire.push(0);
        assert!(matches!(Frame::from_bytes(&wire), Err(CmppError::Codec(_))));
        assert!(Frame::from_bytes(&wire[..10]).is_err());
    }

    #[test]
    fn from_bytes_rejects_declared_length_below_header() {
        let wire = FrameHeader::new(8, 4, 1).encode();
        assert!(matches!(
            Frame::from_bytes(&wire),
            Err(CmppError::Transport(TransportError::InvalidLength { declared: 8, .. }))
        ));
    }

    #[test]
    fn is_command_matches_header() {
        let wire = Frame::empty(CommandId::ActiveTestResp.into(), 9).to_bytes();
        assert!(is_command(&wire, CommandId::ActiveTestResp.into()));
        assert!(!is_command(&wire, CommandId::ActiveTest.into()));
    }

    #[test]
    fn is_command_short_buffer_is_false() {
        let wire = Frame::empty(8, 9).to_bytes();
        for len in 0..HEADER_SIZE {
            assert!(!is_command(&wire[..len], 8));
            assert!(!is_command(&wire[..len], 0));
        }
    }
}
