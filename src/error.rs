use std::fmt;

/// Errors produced while decoding V5 frames, payloads and register data.
///
/// Encoding never fails; every variant here comes from a decode path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("malformed frame: {0}")]
    MalformedFrame(Malformed),

    #[error("malformed payload: {0}")]
    MalformedPayload(Malformed),

    #[error("insufficient register data: expected {expected} bytes, got {actual}")]
    InsufficientRegisterData { expected: usize, actual: usize },
}

impl Error {
    /// True when the input ended early, as opposed to being structurally
    /// invalid. A transport may keep reading when this is set.
    pub fn is_incomplete(&self) -> bool {
        match self {
            Error::MalformedFrame(m) | Error::MalformedPayload(m) => m.is_truncated(),
            Error::InsufficientRegisterData { .. } => false,
        }
    }
}

/// What exactly was wrong with a frame or payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Malformed {
    /// Ran out of input while reading `field`.
    Truncated {
        field: &'static str,
        needed: usize,
        available: usize,
    },
    /// A fixed marker byte did not have its expected value.
    UnexpectedByte {
        field: &'static str,
        expected: u8,
        actual: u8,
    },
    /// A length field exceeds what we are prepared to buffer.
    TooLong {
        field: &'static str,
        length: usize,
        max: usize,
    },
    /// Bytes were left over after the structure was fully read.
    TrailingBytes(usize),
}

impl Malformed {
    pub fn is_truncated(&self) -> bool {
        matches!(self, Malformed::Truncated { .. })
    }
}

impl fmt::Display for Malformed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Malformed::Truncated {
                field,
                needed,
                available,
            } => write!(
                f,
                "can't read {}: need {} bytes, {} available",
                field, needed, available
            ),
            Malformed::UnexpectedByte {
                field,
                expected,
                actual,
            } => write!(
                f,
                "expected {:#04x} as {}, got {:#04x}",
                expected, field, actual
            ),
            Malformed::TooLong { field, length, max } => {
                write!(f, "{} of {} exceeds maximum of {}", field, length, max)
            }
            Malformed::TrailingBytes(n) => write!(f, "{} bytes left in the buffer", n),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
