/// 8-bit additive checksum: the wrapping sum of every byte.
///
/// Covers everything in a frame after the start marker and before the
/// checksum byte itself.
pub fn additive_checksum8(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |sum, b| sum.wrapping_add(*b))
}

/// CRC-16/Modbus (reflected poly 0xA001, init 0xFFFF, no final xor).
///
/// This is the bitwise NOT of the common "CRC-16/IBM with 0xFFFF pre/post
/// inversion" routine, which is what loggers compute over business data.
pub fn crc16_modbus(data: &[u8]) -> u16 {
    crc16::State::<crc16::MODBUS>::calculate(data)
}
