// Module declarations for the application's core components
pub mod config;   // Configuration management
pub mod error;    // Codec error types
pub mod options;  // Command line options parsing
pub mod prelude;  // Common imports and types
pub mod readings; // Interpretation of register values
pub mod v5;       // V5 logger protocol implementation

// Get the package version from Cargo.toml
const CARGO_PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

use crate::prelude::*;
use std::io::Write;

/// Sets up env_logger; `RUST_LOG` wins over the configured level.
pub fn init_logging(default_level: &str) {
    let env = env_logger::Env::default().default_filter_or(default_level);
    if let Err(e) = env_logger::Builder::from_env(env)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.module_path().unwrap_or(""),
                record.args()
            )
        })
        .write_style(env_logger::WriteStyle::Never)
        .try_init()
    {
        eprintln!("Failed to initialise logging: {}", e);
    }
}

/// Main application entry point
///
/// Loads the config, performs a single register read against the configured
/// logger and prints what it got back.
pub async fn app(options: Options) -> Result<()> {
    let config = Config::new(options.config_file.clone())?;

    init_logging(&config.loglevel);
    info!("v5-logger {} starting with config file: {}", CARGO_PKG_VERSION, options.config_file);
    config.log();

    let start_register = options.start_register.unwrap_or(config.query.start_register);
    let register_count = options.register_count.unwrap_or(config.query.register_count);
    config::validate_register_count(register_count)?;

    let logger = Logger::new(config.logger.clone());
    let registers = logger
        .query_registers(start_register, register_count)
        .await
        .with_context(|| {
            format!(
                "querying logger {} at {}:{}",
                config.logger.serial(),
                config.logger.host(),
                config.logger.port()
            )
        })?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&registers)?);
    } else {
        for (register, value) in registers.iter() {
            println!("{:#06x} = {:#06x} ({})", register, value, value);
        }
    }

    println!("{}", Readings::from_registers(&registers));

    Ok(())
}
