use crate::prelude::*;

use serde::Serialize;

/// Current output power, 0.1 W units.
pub const POWER_REGISTER: u16 = 0x50;
/// Lifetime energy, two registers low word first, 0.1 kWh units.
pub const TOTAL_ENERGY_REGISTER: u16 = 0x3f;

/// Values interpreted from a register read.
#[derive(PartialEq, Clone, Debug, Serialize)]
pub struct Readings {
    pub power_w: Option<f64>,
    pub total_energy_wh: Option<u64>,
}

impl Readings {
    /// Picks out the registers we know about; any that were not part of the
    /// read are left as `None`.
    pub fn from_registers(registers: &RegisterMap) -> Self {
        let power_w = registers
            .get(POWER_REGISTER)
            .map(|raw| raw as f64 / 10.0);
        let total_energy_wh = registers
            .get_u32_low_first(TOTAL_ENERGY_REGISTER)
            .map(|raw| raw as u64 * 100);

        Self {
            power_w,
            total_energy_wh,
        }
    }
}

impl std::fmt::Display for Readings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.power_w {
            Some(p) => write!(f, "Current power: {:.1} W", p)?,
            None => write!(f, "Current power: n/a")?,
        }
        match self.total_energy_wh {
            Some(e) => write!(f, ", total energy: {} Wh", e),
            None => write!(f, ", total energy: n/a"),
        }
    }
}
