use crate::error::{Error, Malformed, Result};
use crate::v5::checksum::crc16_modbus;
use crate::v5::cursor::Cursor;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Frame type carried in every request header.
pub const REQUEST_FRAME_TYPE: u8 = 0x02;
/// Modbus slave address; the logger only answers to 1.
pub const DEVICE_ADDRESS: u8 = 0x01;

/// frame type, sensor type and three timestamps
pub const REQUEST_HEADER_LENGTH: usize = 15;
/// address, function, start, count, crc
pub const REQUEST_BUSINESS_LENGTH: usize = 8;
pub const REQUEST_LENGTH: usize = REQUEST_HEADER_LENGTH + REQUEST_BUSINESS_LENGTH;

/// frame type, status code and three timestamps
pub const RESPONSE_HEADER_LENGTH: usize = 14;

// {{{ DeviceFunction
#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum DeviceFunction {
    ReadRealtimeData = 3,
}
// }}}

/////////////
//
// REQUEST
//
/////////////

/// Register-read request payload.
///
/// The header is little-endian, the register range big-endian, and the CRC
/// over the business data little-endian again.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Request {
    pub frame_type: u8,
    pub sensor_type: u16,
    pub delivery_time: u32,
    pub power_on_time: u32,
    pub offset_time: u32,

    pub device_address: u8,
    pub device_function: DeviceFunction,
    pub start_register: u16,
    pub register_count: u16,
}

impl Request {
    pub fn new(start_register: u16, register_count: u16) -> Self {
        Self {
            frame_type: REQUEST_FRAME_TYPE,
            sensor_type: 0,
            delivery_time: 0,
            power_on_time: 0,
            offset_time: 0,
            device_address: DEVICE_ADDRESS,
            device_function: DeviceFunction::ReadRealtimeData,
            start_register,
            register_count,
        }
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut r = Vec::with_capacity(REQUEST_LENGTH);

        r.push(self.frame_type);
        r.extend_from_slice(&self.sensor_type.to_le_bytes());
        r.extend_from_slice(&self.delivery_time.to_le_bytes());
        r.extend_from_slice(&self.power_on_time.to_le_bytes());
        r.extend_from_slice(&self.offset_time.to_le_bytes());
        r.extend_from_slice(&self.business_data());

        r
    }

    fn business_data(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(REQUEST_BUSINESS_LENGTH);

        data.push(self.device_address);
        data.push(self.device_function.into());
        data.extend_from_slice(&self.start_register.to_be_bytes());
        data.extend_from_slice(&self.register_count.to_be_bytes());

        // crc covers exactly the six bytes above
        let crc = crc16_modbus(&data);
        data.extend_from_slice(&crc.to_le_bytes());

        data
    }

    /// Parses a request payload. Loggers never send these; this exists for
    /// tools that sit on the other end of the connection.
    pub fn decode(input: &[u8]) -> Result<Self> {
        Self::decode_fields(input).map_err(Error::MalformedPayload)
    }

    fn decode_fields(input: &[u8]) -> std::result::Result<Self, Malformed> {
        let mut c = Cursor::new(input);

        let frame_type = c.u8("frame type")?;
        let sensor_type = c.le_u16("sensor type")?;
        let delivery_time = c.le_u32("delivery time")?;
        let power_on_time = c.le_u32("power on time")?;
        let offset_time = c.le_u32("offset time")?;

        let device_address = c.u8("device address")?;
        let function = c.u8("function code")?;
        let device_function =
            DeviceFunction::try_from(function).map_err(|_| Malformed::UnexpectedByte {
                field: "function code",
                expected: DeviceFunction::ReadRealtimeData.into(),
                actual: function,
            })?;
        let start_register = c.be_u16("start register")?;
        let register_count = c.be_u16("register count")?;
        let _crc = c.le_u16("crc")?;
        c.finish()?;

        Ok(Self {
            frame_type,
            sensor_type,
            delivery_time,
            power_on_time,
            offset_time,
            device_address,
            device_function,
            start_register,
            register_count,
        })
    }
}

/////////////
//
// RESPONSE
//
/////////////

/// Logger reply to a [`Request`].
///
/// Header fields are informational only. `value` holds the raw register
/// words; see [`crate::v5::registers::RegisterMap`] for turning them into
/// numbers.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Response {
    pub frame_type: u8,
    pub status_code: u8,
    pub delivery_time: u32,
    pub power_on_time: u32,
    pub offset_time: u32,

    pub device_address: u8,
    pub function_code: u8,
    pub value_length: u8,
    pub value: Vec<u8>,
    pub crc: u16,
    /// Two bytes after the crc, usually zero. Meaning unknown.
    pub reserved: [u8; 2],
}

impl Response {
    /// Builds a successful reply carrying `value`, with a correct crc.
    ///
    /// # Panics
    ///
    /// If `value` is longer than 255 bytes; the length is a single byte on
    /// the wire.
    pub fn new(value: &[u8]) -> Self {
        let value_length = match u8::try_from(value.len()) {
            Ok(n) => n,
            Err(_) => panic!("value of {} bytes does not fit a response", value.len()),
        };
        let mut r = Self {
            frame_type: REQUEST_FRAME_TYPE,
            status_code: 0x01,
            delivery_time: 0,
            power_on_time: 0,
            offset_time: 0,
            device_address: DEVICE_ADDRESS,
            function_code: DeviceFunction::ReadRealtimeData.into(),
            value_length,
            value: value.to_vec(),
            crc: 0,
            reserved: [0; 2],
        };
        r.crc = r.compute_crc();
        r
    }

    pub fn decode(input: &[u8]) -> Result<Self> {
        Self::decode_fields(input).map_err(Error::MalformedPayload)
    }

    fn decode_fields(input: &[u8]) -> std::result::Result<Self, Malformed> {
        let mut c = Cursor::new(input);

        let frame_type = c.u8("frame type")?;
        let status_code = c.u8("status code")?;
        let delivery_time = c.le_u32("delivery time")?;
        let power_on_time = c.le_u32("power on time")?;
        let offset_time = c.le_u32("offset time")?;

        let device_address = c.u8("device address")?;
        let function_code = c.u8("function code")?;
        let value_length = c.u8("value length")?;
        let value = c.take("value", value_length as usize)?.to_vec();
        // read but not checked; see crc_matches()
        let crc = c.le_u16("crc")?;
        let mut reserved = [0; 2];
        reserved.copy_from_slice(c.take("reserved", 2)?);
        c.finish()?;

        Ok(Self {
            frame_type,
            status_code,
            delivery_time,
            power_on_time,
            offset_time,
            device_address,
            function_code,
            value_length,
            value,
            crc,
            reserved,
        })
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut r = Vec::with_capacity(RESPONSE_HEADER_LENGTH + self.value.len() + 7);

        r.push(self.frame_type);
        r.push(self.status_code);
        r.extend_from_slice(&self.delivery_time.to_le_bytes());
        r.extend_from_slice(&self.power_on_time.to_le_bytes());
        r.extend_from_slice(&self.offset_time.to_le_bytes());

        r.push(self.device_address);
        r.push(self.function_code);
        r.push(self.value_length);
        r.extend_from_slice(&self.value);
        r.extend_from_slice(&self.crc.to_le_bytes());
        r.extend_from_slice(&self.reserved);

        r
    }

    /// CRC-16/Modbus over address, function, length and value.
    pub fn compute_crc(&self) -> u16 {
        let mut data = Vec::with_capacity(3 + self.value.len());
        data.push(self.device_address);
        data.push(self.function_code);
        data.push(self.value_length);
        data.extend_from_slice(&self.value);
        crc16_modbus(&data)
    }

    pub fn crc_matches(&self) -> bool {
        self.crc == self.compute_crc()
    }
}
