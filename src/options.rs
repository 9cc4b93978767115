use clap::Parser;

/// Reads telemetry registers from a V5 solar inverter data logger
#[derive(Debug, Parser)]
#[clap(author, version)]
pub struct Options {
    /// Config file to read
    #[clap(short = 'c', long = "config", default_value = "config.yaml")]
    pub config_file: String,

    /// First register to read, overriding the config (decimal or 0x hex)
    #[clap(short = 's', long = "start", value_parser = parse_register)]
    pub start_register: Option<u16>,

    /// Number of registers to read, overriding the config
    #[clap(short = 'n', long = "count", value_parser = parse_register)]
    pub register_count: Option<u16>,

    /// Print the raw register map as JSON
    #[clap(long = "json")]
    pub json: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::parse()
    }
}

fn parse_register(s: &str) -> Result<u16, String> {
    let r = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse::<u16>(),
    };
    r.map_err(|e| format!("invalid register value {}: {}", s, e))
}
