use crate::error::{Error, Result};

use nom::{multi::count, number::complete::be_u16, IResult};
use serde::Serialize;
use std::collections::BTreeMap;

/// Register index to raw 16-bit value, ordered by index.
#[derive(Default, PartialEq, Eq, Clone, Debug, Serialize)]
#[serde(transparent)]
pub struct RegisterMap(BTreeMap<u16, u16>);

impl RegisterMap {
    /// Reads `register_count` big-endian words from `value`, keyed from
    /// `start_register` upwards.
    ///
    /// Bytes beyond `2 * register_count` are ignored. Too few bytes means
    /// the logger returned fewer registers than asked for, which is an error
    /// rather than a partial map. Indices wrap within the 16-bit address
    /// space.
    pub fn extract(value: &[u8], start_register: u16, register_count: u16) -> Result<Self> {
        let expected = register_count as usize * 2;
        if value.len() < expected {
            return Err(Error::InsufficientRegisterData {
                expected,
                actual: value.len(),
            });
        }

        let (_, words) = Self::words(&value[..expected], register_count as usize).map_err(
            |_| Error::InsufficientRegisterData {
                expected,
                actual: value.len(),
            },
        )?;

        Ok(Self(
            words
                .into_iter()
                .enumerate()
                .map(|(pos, word)| (start_register.wrapping_add(pos as u16), word))
                .collect(),
        ))
    }

    fn words(input: &[u8], n: usize) -> IResult<&[u8], Vec<u16>> {
        count(be_u16, n)(input)
    }

    pub fn get(&self, register: u16) -> Option<u16> {
        self.0.get(&register).copied()
    }

    /// Two consecutive registers as a 32-bit value, low word first.
    pub fn get_u32_low_first(&self, register: u16) -> Option<u32> {
        let low = self.get(register)? as u32;
        let high = self.get(register.wrapping_add(1))? as u32;
        Some(low | (high << 16))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn pairs(&self) -> Vec<(u16, u16)> {
        self.iter().collect()
    }
}

impl From<BTreeMap<u16, u16>> for RegisterMap {
    fn from(map: BTreeMap<u16, u16>) -> Self {
        Self(map)
    }
}
