use crate::error::Malformed;

/// Bounds-checked reader over a byte slice.
///
/// Each read names the field it is reading so failures say what was missing.
/// Nothing is allocated based on lengths read from the input; `take` hands
/// back a sub-slice only once the bytes are known to be present.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn take(&mut self, field: &'static str, n: usize) -> Result<&'a [u8], Malformed> {
        if self.remaining() < n {
            return Err(Malformed::Truncated {
                field,
                needed: n,
                available: self.remaining(),
            });
        }

        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], Malformed> {
        let mut r = [0; N];
        r.copy_from_slice(self.take(field, N)?);
        Ok(r)
    }

    pub fn u8(&mut self, field: &'static str) -> Result<u8, Malformed> {
        Ok(self.array::<1>(field)?[0])
    }

    pub fn le_u16(&mut self, field: &'static str) -> Result<u16, Malformed> {
        Ok(u16::from_le_bytes(self.array(field)?))
    }

    pub fn be_u16(&mut self, field: &'static str) -> Result<u16, Malformed> {
        Ok(u16::from_be_bytes(self.array(field)?))
    }

    pub fn le_u32(&mut self, field: &'static str) -> Result<u32, Malformed> {
        Ok(u32::from_le_bytes(self.array(field)?))
    }

    /// Reads a single byte and checks it against a fixed marker value.
    pub fn expect_u8(&mut self, field: &'static str, expected: u8) -> Result<(), Malformed> {
        let actual = self.u8(field)?;
        if actual != expected {
            return Err(Malformed::UnexpectedByte {
                field,
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Fails if any input is left unread.
    pub fn finish(self) -> Result<(), Malformed> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(Malformed::TrailingBytes(n)),
        }
    }
}
