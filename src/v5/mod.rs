pub mod checksum;
pub mod cursor;
pub mod frame;
pub mod frame_decoder;
pub mod logger;
pub mod packet;
pub mod registers;

use crate::error::Result;
use frame::Frame;
use packet::{Request, Response};

/// Request frame bytes ready to be written to the logger socket.
pub fn encode_request(device_serial: u32, start_register: u16, register_count: u16) -> Vec<u8> {
    let payload = Request::new(start_register, register_count).bytes();
    Frame::new(device_serial, payload).bytes()
}

/// Unwraps a complete reply frame and decodes its payload.
pub fn decode_response(input: &[u8]) -> Result<Response> {
    let frame = Frame::decode(input)?;
    Response::decode(&frame.payload)
}
