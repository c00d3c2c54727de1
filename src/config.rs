use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use pinbridge_remote::SerialSettings;
use serde::Deserialize;
use tracing::{error, info};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub gpio: GpioSettings,
    pub arduino: ArduinoSettings,
    pub blink: BlinkSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GpioSettings {
    pub chip: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArduinoSettings {
    pub port: String,
    pub baud: u32,
    pub read_timeout_ms: u64,
    pub settle_ms: u64,
}

impl ArduinoSettings {
    pub fn serial(&self) -> SerialSettings {
        SerialSettings {
            port: self.port.clone(),
            baud: self.baud,
            read_timeout: Duration::from_millis(self.read_timeout_ms),
            settle: Duration::from_millis(self.settle_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlinkSettings {
    pub rasp_pin: u8,
    pub arduino_pin: u8,
    pub cycles: u32,
    pub interval_ms: u64,
}

impl BlinkSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("gpio.chip", 0)?
        .set_default("arduino.port", "/dev/ttyACM0")?
        .set_default("arduino.baud", 9600)?
        .set_default("arduino.read_timeout_ms", 1000)?
        .set_default("arduino.settle_ms", 2000)?
        .set_default("blink.rasp_pin", 17)?
        .set_default("blink.arduino_pin", 13)?
        .set_default("blink.cycles", 5)?
        .set_default("blink.interval_ms", 1000)
}

/// Loads settings from `path` (optional) with `PINBRIDGE__*` environment overrides.
pub fn load_config(path: &str) -> Result<Settings, ConfigError> {
    info!("Attempting to load configuration from {}", path);

    let settings = builder()?
        .add_source(File::new(path, FileFormat::Toml).required(false))
        .add_source(Environment::with_prefix("PINBRIDGE").separator("__"))
        .build()
        .and_then(|config| config.try_deserialize::<Settings>());

    match settings {
        Ok(settings) => {
            info!("Successfully loaded configuration: {:?}", settings);
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

/// Parses settings from TOML text, filling gaps with the defaults.
pub fn parse_config(toml: &str) -> Result<Settings, ConfigError> {
    builder()?
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?
        .try_deserialize()
}
