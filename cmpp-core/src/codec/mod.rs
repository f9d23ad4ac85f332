//! `tokio_util` codec for CMPP frames, for callers driving the protocol
//! on an async runtime instead of the blocking [`transport`](crate::transport).

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{CmppError, TransportError};
use crate::frame::{Frame, MAX_FRAME_SIZE};
use crate::header::{FrameHeader, HEADER_SIZE};

#[derive(Debug, Clone)]
pub struct CmppCodec {
    max_frame_size: usize,
}

impl CmppCodec {
    pub fn new() -> Self {
        Self {
            max_frame_size: MAX_FRAME_SIZE,
        }
    }

    /// Lower the frame size limit. Values above [`MAX_FRAME_SIZE`] are
    /// clamped to it.
    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self {
            max_frame_size: max_frame_size.clamp(HEADER_SIZE, MAX_FRAME_SIZE),
        }
    }

    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }
}

impl Default for CmppCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for CmppCodec {
    type Item = Frame;
    type Error = CmppError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < HEADER_SIZE {
            return Ok(None);
        }

        let header = FrameHeader::decode(src)?;
        let total = header.total_length as usize;
        if total < HEADER_SIZE || total > self.max_frame_size {
            return Err(TransportError::InvalidLength {
                declared: header.total_length,
                max: self.max_frame_size,
            }
            .into());
        }

        if src.len() < total {
            src.reserve(total - src.len());
            return Ok(None);
        }

        let raw = src.split_to(total);
        Frame::from_bytes(&raw).map(Some)
    }
}

impl Encoder<Frame> for CmppCodec {
    type Error = CmppError;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if item.total_length() > self.max_frame_size {
            return Err(CmppError::Codec("frame exceeds codec size limit"));
        }
        item.write_to(dst);
        Ok(())
    }
}
