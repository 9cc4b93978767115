mod common;
use common::*;

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use v5_logger::error::{Error, Malformed};
use v5_logger::v5::frame_decoder::{CodecError, FrameDecoder};

#[test]
fn waits_for_whole_frame() {
    let bytes = Factory::small_response_bytes();
    let mut decoder = FrameDecoder::new();
    let mut buf = BytesMut::new();

    for b in &bytes[..bytes.len() - 1] {
        buf.extend_from_slice(&[*b]);
        assert!(decoder.decode(&mut buf).unwrap().is_none());
    }

    buf.extend_from_slice(&bytes[bytes.len() - 1..]);
    let frame = decoder.decode(&mut buf).unwrap().unwrap();
    assert_eq!(frame, Frame::decode(&bytes).unwrap());
    assert!(buf.is_empty());
}

#[test]
fn splits_back_to_back_frames() {
    let first = Factory::response_frame(&Factory::value_blob(0, 2));
    let second = Factory::response_frame(&Factory::value_blob(0x3f, 20));

    let mut decoder = FrameDecoder::new();
    let mut buf = BytesMut::new();
    decoder.encode(first.clone(), &mut buf).unwrap();
    decoder.encode(second.clone(), &mut buf).unwrap();

    assert_eq!(decoder.decode(&mut buf).unwrap(), Some(first));
    assert_eq!(decoder.decode(&mut buf).unwrap(), Some(second));
    assert_eq!(decoder.decode(&mut buf).unwrap(), None);
}

#[test]
fn rejects_garbage_immediately() {
    let mut decoder = FrameDecoder::new();
    let mut buf = BytesMut::from(&b"HTTP/1.1 400"[..]);

    assert!(matches!(
        decoder.decode(&mut buf),
        Err(CodecError::Decode(Error::MalformedFrame(
            Malformed::UnexpectedByte { actual: b'H', .. }
        )))
    ));
}

#[test]
fn rejects_oversized_payload_before_buffering() {
    let mut decoder = FrameDecoder::with_max_payload_length(64);
    let mut buf = BytesMut::from(&[0xa5, 0xff, 0xff, 0x10, 0x15, 0, 0, 0, 0, 0, 0][..]);

    assert!(matches!(
        decoder.decode(&mut buf),
        Err(CodecError::Decode(Error::MalformedFrame(Malformed::TooLong {
            length: 0xffff,
            max: 64,
            ..
        })))
    ));
}

#[test]
fn bad_end_marker_is_an_error() {
    let mut bytes = Factory::small_response_bytes();
    let last = bytes.len() - 1;
    bytes[last] = 0x00;

    let mut decoder = FrameDecoder::new();
    let mut buf = BytesMut::from(&bytes[..]);
    assert!(decoder.decode(&mut buf).is_err());
}
