use crate::prelude::*;

use serde::Deserialize;

/// Largest register count a single Modbus read may ask for.
pub const MAX_REGISTER_COUNT: u16 = 125;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub logger: Logger,

    #[serde(default)]
    pub query: Query,

    #[serde(default = "Config::default_loglevel")]
    pub loglevel: String,
}

// Logger {{{
#[derive(Clone, Debug, Deserialize)]
pub struct Logger {
    pub host: String,
    #[serde(default = "Config::default_port")]
    pub port: u16,
    pub serial: u32,

    pub timeout_secs: Option<u64>,
    pub verify_checksum: Option<bool>,
    pub max_payload_length: Option<usize>,
}
impl Logger {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn serial(&self) -> u32 {
        self.serial
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(5))
    }

    pub fn verify_checksum(&self) -> bool {
        self.verify_checksum == Some(true) // Default to false
    }

    pub fn max_payload_length(&self) -> usize {
        self.max_payload_length
            .unwrap_or(v5::frame_decoder::DEFAULT_MAX_PAYLOAD_LENGTH)
    }
} // }}}

// Query {{{
#[derive(Clone, Debug, Deserialize)]
pub struct Query {
    #[serde(default = "Query::default_start_register")]
    pub start_register: u16,
    #[serde(default = "Query::default_register_count")]
    pub register_count: u16,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            start_register: Self::default_start_register(),
            register_count: Self::default_register_count(),
        }
    }
}

impl Query {
    // energy total and current power both live in this block
    fn default_start_register() -> u16 {
        0x3f
    }

    fn default_register_count() -> u16 {
        20
    }
} // }}}

impl Config {
    pub fn new(file: String) -> Result<Self> {
        let content = std::fs::read_to_string(&file)
            .map_err(|err| anyhow!("error reading {}: {}", file, err))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn log(&self) {
        info!("Configuration loaded successfully:");
        info!("  Logger:");
        info!("    Host: {}", self.logger.host);
        info!("    Port: {}", self.logger.port);
        info!("    Serial: {}", self.logger.serial);
        info!("    Timeout: {}s", self.logger.timeout().as_secs());
        info!("    Verify Checksum: {}", self.logger.verify_checksum());
        info!("    Max Payload Length: {}", self.logger.max_payload_length());
        info!(
            "  Query: start register {:#06x}, count {}",
            self.query.start_register, self.query.register_count
        );
        info!("  Log Level: {}", self.loglevel);
    }

    pub fn validate(&self) -> Result<()> {
        if self.logger.host.is_empty() {
            bail!("logger.host cannot be empty");
        }
        if self.logger.port == 0 {
            bail!("logger.port must be between 1 and 65535");
        }
        if self.logger.timeout_secs == Some(0) {
            bail!("logger.timeout_secs must be greater than 0");
        }
        if self.logger.max_payload_length() == 0 {
            bail!("logger.max_payload_length must be greater than 0");
        }

        validate_register_count(self.query.register_count)?;

        Ok(())
    }

    fn default_port() -> u16 {
        8899
    }

    fn default_loglevel() -> String {
        "info".to_string()
    }
}

/// A read must ask for at least one register and no more than a single
/// Modbus reply can carry.
pub fn validate_register_count(count: u16) -> Result<()> {
    if count == 0 || count > MAX_REGISTER_COUNT {
        bail!(
            "register count must be between 1 and {}, got {}",
            MAX_REGISTER_COUNT,
            count
        );
    }
    Ok(())
}
