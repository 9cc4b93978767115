mod common;
use common::*;

use v5_logger::error::{Error, Malformed};
use v5_logger::v5::{self, packet};

// payload portion of Factory::small_response_bytes()
fn small_response_payload() -> Vec<u8> {
    let bytes = Factory::small_response_bytes();
    bytes[11..bytes.len() - 2].to_vec()
}

#[test]
fn request_payload_layout() {
    let bytes = Request::new(0x3f, 20).bytes();

    assert_eq!(bytes.len(), packet::REQUEST_LENGTH);
    assert_eq!(bytes.len(), 23);
    assert_eq!(bytes[0], 0x02);
    assert!(bytes[1..15].iter().all(|b| *b == 0));
    // address, function, start BE, count BE, crc LE
    assert_eq!(&bytes[15..], &[0x01, 0x03, 0x00, 0x3f, 0x00, 0x14, 0x75, 0xc9]);
}

#[test]
fn request_decode_rejects_garbage() {
    let mut bytes = Request::new(1, 1).bytes();
    bytes.push(0);
    assert_eq!(
        Request::decode(&bytes),
        Err(Error::MalformedPayload(Malformed::TrailingBytes(1)))
    );

    let mut bytes = Request::new(1, 1).bytes();
    bytes[16] = 0x10;
    assert!(matches!(
        Request::decode(&bytes),
        Err(Error::MalformedPayload(Malformed::UnexpectedByte {
            field: "function code",
            ..
        }))
    ));
}

#[test]
fn decodes_response() {
    let response = Response::decode(&small_response_payload()).unwrap();

    assert_eq!(response.frame_type, 0x02);
    assert_eq!(response.status_code, 0x01);
    assert_eq!(response.delivery_time, 0x64);
    assert_eq!(response.power_on_time, 0x1234);
    assert_eq!(response.offset_time, 0);
    assert_eq!(response.device_address, 0x01);
    assert_eq!(response.function_code, 0x03);
    assert_eq!(response.value_length, 4);
    assert_eq!(response.value, vec![0x00, 0x0a, 0x01, 0x2c]);
    assert_eq!(response.crc, 0x7cda);
    assert_eq!(response.reserved, [0, 0]);
    assert!(response.crc_matches());
}

#[test]
fn decode_response_from_frame() {
    let response = v5::decode_response(&Factory::small_response_bytes()).unwrap();
    assert_eq!(response.value, vec![0x00, 0x0a, 0x01, 0x2c]);
}

#[test]
fn response_encode_matches_wire() {
    let mut response = Response::new(&[0x00, 0x0a, 0x01, 0x2c]);
    response.delivery_time = 0x64;
    response.power_on_time = 0x1234;

    assert_eq!(response.bytes(), small_response_payload());
}

#[test]
fn response_holds_up_to_255_value_bytes() {
    let response = Response::new(&[0xab; 255]);
    assert_eq!(response.value_length, 255);
    assert_eq!(Response::decode(&response.bytes()).unwrap(), response);
}

#[test]
#[should_panic(expected = "does not fit a response")]
fn response_value_is_never_cut_short() {
    Response::new(&[0; 256]);
}

#[test]
fn rejects_short_value() {
    let mut bytes = Response::new(&[0; 4]).bytes();
    bytes[16] = 10; // value_length, only 4 value bytes + crc + reserved follow

    let err = Response::decode(&bytes).unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedPayload(Malformed::Truncated {
            field: "value",
            needed: 10,
            available: 8
        })
    ));
}

#[test]
fn rejects_bytes_after_reserved() {
    let mut bytes = small_response_payload();
    bytes.push(0);

    assert_eq!(
        Response::decode(&bytes),
        Err(Error::MalformedPayload(Malformed::TrailingBytes(1)))
    );
}

#[test]
fn rejects_missing_reserved_bytes() {
    let bytes = small_response_payload();

    assert!(matches!(
        Response::decode(&bytes[..bytes.len() - 1]),
        Err(Error::MalformedPayload(Malformed::Truncated {
            field: "reserved",
            ..
        }))
    ));
}

#[test]
fn response_crc_is_not_enforced() {
    let mut bytes = small_response_payload();
    let crc_pos = bytes.len() - 4;
    bytes[crc_pos] ^= 0xff;

    let response = Response::decode(&bytes).unwrap();
    assert!(!response.crc_matches());
}

#[test]
fn truncated_response_never_panics() {
    let bytes = small_response_payload();
    for n in 0..bytes.len() {
        assert!(Response::decode(&bytes[..n]).unwrap_err().is_incomplete());
    }
}
