use crate::error::{Error, Malformed, Result};
use crate::v5::checksum::additive_checksum8;
use crate::v5::cursor::Cursor;

use num_enum::{IntoPrimitive, TryFromPrimitive};

pub const START_MARKER: u8 = 0xa5;
pub const END_MARKER: u8 = 0x15;

/// Bytes ahead of the payload: marker, length, control, serial, device serial.
pub const HEADER_LENGTH: usize = 11;
/// Bytes after the payload: checksum and end marker.
pub const TRAILER_LENGTH: usize = 2;

/// Largest payload the two-byte length field can declare.
pub const MAX_PAYLOAD_LENGTH: usize = u16::MAX as usize;

/// Serial number field in every frame we send.
pub const REQUEST_SERIAL_NUMBER: u16 = 0x0000;

// {{{ ControlCode
#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, TryFromPrimitive)]
#[repr(u16)]
pub enum ControlCode {
    Handshake = 0x4110,
    Data = 0x4210,
    Info = 0x4310,
    Request = 0x4510,
    Heartbeat = 0x4710,
    Report = 0x4810,
    Response = 0x1510,
}
// }}}

/// The V5 envelope around a request or response payload.
///
/// ```text
/// a5 | len u16 LE | control u16 LE | serial u16 BE | device sn u32 LE | payload | sum8 | 15
/// ```
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Frame {
    /// As read off the wire when decoded. Encoding always writes
    /// `payload.len()` instead.
    pub payload_length: u16,
    pub control_code: u16,
    pub serial_number: u16,
    pub device_serial_number: u32,
    pub payload: Vec<u8>,
    /// As read off the wire when decoded; computed when built locally.
    /// [`Frame::bytes`] does not use it and always writes a fresh checksum,
    /// so re-encoding a decoded frame with a bad checksum corrects it.
    pub checksum: u8,
}

impl Frame {
    /// Builds a request frame addressed to the logger with `device_serial_number`.
    pub fn new(device_serial_number: u32, payload: Vec<u8>) -> Self {
        Self::with_header(
            ControlCode::Request.into(),
            REQUEST_SERIAL_NUMBER,
            device_serial_number,
            payload,
        )
    }

    /// # Panics
    ///
    /// If `payload` is longer than [`MAX_PAYLOAD_LENGTH`].
    pub fn with_header(
        control_code: u16,
        serial_number: u16,
        device_serial_number: u32,
        payload: Vec<u8>,
    ) -> Self {
        let mut frame = Self {
            payload_length: encoded_length(&payload),
            control_code,
            serial_number,
            device_serial_number,
            payload,
            checksum: 0,
        };
        frame.checksum = frame.compute_checksum();
        frame
    }

    /// The control code as a known variant, if it is one.
    pub fn kind(&self) -> Option<ControlCode> {
        ControlCode::try_from(self.control_code).ok()
    }

    pub fn wire_length(&self) -> usize {
        HEADER_LENGTH + self.payload.len() + TRAILER_LENGTH
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut r = Vec::with_capacity(self.wire_length());

        r.push(START_MARKER);
        self.put_checked_fields(&mut r);
        // the start marker is not part of the sum
        r.push(additive_checksum8(&r[1..]));
        r.push(END_MARKER);

        r
    }

    /// Decodes one complete frame. The checksum byte is kept as-is and not
    /// verified here; see [`Frame::checksum_matches`].
    pub fn decode(input: &[u8]) -> Result<Self> {
        Self::decode_fields(input).map_err(Error::MalformedFrame)
    }

    fn decode_fields(input: &[u8]) -> std::result::Result<Self, Malformed> {
        let mut c = Cursor::new(input);

        c.expect_u8("start marker", START_MARKER)?;
        let payload_length = c.le_u16("payload length")?;
        let control_code = c.le_u16("control code")?;
        let serial_number = c.be_u16("serial number")?;
        let device_serial_number = c.le_u32("device serial number")?;
        let payload = c.take("payload", payload_length as usize)?.to_vec();
        let checksum = c.u8("checksum")?;
        c.expect_u8("end marker", END_MARKER)?;
        c.finish()?;

        Ok(Self {
            payload_length,
            control_code,
            serial_number,
            device_serial_number,
            payload,
            checksum,
        })
    }

    pub fn compute_checksum(&self) -> u8 {
        let mut r = Vec::with_capacity(self.wire_length());
        self.put_checked_fields(&mut r);
        additive_checksum8(&r)
    }

    pub fn checksum_matches(&self) -> bool {
        self.checksum == self.compute_checksum()
    }

    fn put_checked_fields(&self, r: &mut Vec<u8>) {
        r.extend_from_slice(&encoded_length(&self.payload).to_le_bytes());
        r.extend_from_slice(&self.control_code.to_le_bytes());
        // the only big-endian header field
        r.extend_from_slice(&self.serial_number.to_be_bytes());
        r.extend_from_slice(&self.device_serial_number.to_le_bytes());
        r.extend_from_slice(&self.payload);
    }
}

fn encoded_length(payload: &[u8]) -> u16 {
    match u16::try_from(payload.len()) {
        Ok(n) => n,
        Err(_) => panic!(
            "payload of {} bytes does not fit a frame (max {})",
            payload.len(),
            MAX_PAYLOAD_LENGTH
        ),
    }
}
