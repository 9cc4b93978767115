use crate::error::{Error, Malformed};
use crate::v5::frame::{Frame, HEADER_LENGTH, START_MARKER, TRAILER_LENGTH};

use bytes::BytesMut;
use log::trace;
use tokio_util::codec::{Decoder, Encoder};

/// Largest payload the decoder will buffer unless told otherwise.
pub const DEFAULT_MAX_PAYLOAD_LENGTH: usize = 1024;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Decode(#[from] Error),
}

/// Splits a byte stream into whole V5 frames.
///
/// Waits until `payload length` bytes plus header and trailer have arrived
/// before handing the buffer to [`Frame::decode`], so a reply spread over
/// several reads comes out as one frame.
pub struct FrameDecoder {
    max_payload_length: usize,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::with_max_payload_length(DEFAULT_MAX_PAYLOAD_LENGTH)
    }

    pub fn with_max_payload_length(max_payload_length: usize) -> Self {
        Self { max_payload_length }
    }
}

impl Decoder for FrameDecoder {
    type Item = Frame;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, CodecError> {
        if src.is_empty() {
            return Ok(None);
        }

        // reject garbage without waiting for a full header
        if src[0] != START_MARKER {
            return Err(Error::MalformedFrame(Malformed::UnexpectedByte {
                field: "start marker",
                expected: START_MARKER,
                actual: src[0],
            })
            .into());
        }

        if src.len() < HEADER_LENGTH {
            return Ok(None);
        }

        let payload_length = u16::from_le_bytes([src[1], src[2]]) as usize;
        if payload_length > self.max_payload_length {
            return Err(Error::MalformedFrame(Malformed::TooLong {
                field: "payload length",
                length: payload_length,
                max: self.max_payload_length,
            })
            .into());
        }

        let frame_length = HEADER_LENGTH + payload_length + TRAILER_LENGTH;
        if src.len() < frame_length {
            trace!("have {} of {} frame bytes", src.len(), frame_length);
            src.reserve(frame_length - src.len());
            return Ok(None);
        }

        let bytes = src.split_to(frame_length);
        Ok(Some(Frame::decode(&bytes)?))
    }
}

impl Encoder<Frame> for FrameDecoder {
    type Error = CodecError;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<(), CodecError> {
        dst.extend_from_slice(&frame.bytes());
        Ok(())
    }
}
