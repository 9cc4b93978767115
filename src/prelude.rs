pub use anyhow::{anyhow, bail, Context, Result};
pub use log::{debug, error, info, trace, warn};
pub use std::time::Duration;

pub use crate::config::{self, Config};
pub use crate::options::Options;
pub use crate::readings::Readings;
pub use crate::v5::{
    self,
    frame::{ControlCode, Frame},
    logger::Logger,
    packet::{Request, Response},
    registers::RegisterMap,
};
