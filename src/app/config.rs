use std::{fs, time::Duration};
use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yml::Error),
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    port: Option<String>,
    #[serde(default)]
    baud_rate: Option<u32>,
    #[serde(default)]
    read_interval: Option<Duration>,
    #[serde(default)]
    read_timeout: Option<Duration>,
    #[serde(default)]
    animation_duration: Option<Duration>,
    #[serde(default)]
    frame_rate: Option<Duration>,
    #[serde(default)]
    lcd_pins: Option<[u8; 3]>,
    #[serde(default)]
    log_level: Option<LevelFilter>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: String,
    pub baud_rate: u32,
    pub read_interval: Duration,
    pub read_timeout: Duration,
    pub animation_duration: Duration,
    pub frame_rate: Duration,
    pub lcd_pins: [u8; 3],
    pub log_level: LevelFilter,
}

impl Default for AppConfig {
    fn default() -> Self {
        ConfigFile::default().into()
    }
}

impl From<ConfigFile> for AppConfig {
    fn from(file: ConfigFile) -> Self {
        Self {
            port: file.port.unwrap_or_else(|| AppConfig::PORT.to_string()),
            baud_rate: file.baud_rate.unwrap_or(AppConfig::BAUD_RATE),
            read_interval: file.read_interval.unwrap_or(AppConfig::READ_INTERVAL),
            read_timeout: file.read_timeout.unwrap_or(AppConfig::READ_TIMEOUT),
            animation_duration: file.animation_duration.unwrap_or(AppConfig::ANIMATION_DURATION),
            frame_rate: file.frame_rate.unwrap_or(AppConfig::FRAME_RATE),
            lcd_pins: file.lcd_pins.unwrap_or(AppConfig::LCD_PINS),
            log_level: file.log_level.unwrap_or(AppConfig::LOG_LEVEL),
        }
    }
}

impl AppConfig {
    const PORT: &'static str = "/dev/ttyACM0";
    const BAUD_RATE: u32 = 9600;
    const READ_INTERVAL: Duration = Duration::from_secs(2);
    const READ_TIMEOUT: Duration = Duration::from_secs(2);
    const ANIMATION_DURATION: Duration = Duration::from_secs(1);
    const FRAME_RATE: Duration = Duration::from_millis(50);
    const LCD_PINS: [u8; 3] = [3, 2, 18];
    const LOG_LEVEL: LevelFilter = LevelFilter::Off;

    pub fn load(config_path: &str) -> Result<Self, ConfigError> {
        let config_str = fs::read_to_string(config_path)?;
        Self::parse(&config_str)
    }

    fn parse(config_str: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_yml::from_str(config_str)?;
        Ok(file.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = AppConfig::parse("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.port, "/dev/ttyACM0");
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.read_interval, Duration::from_secs(2));
        assert_eq!(config.animation_duration, Duration::from_secs(1));
        assert_eq!(config.lcd_pins, [3, 2, 18]);
    }

    #[test]
    fn fields_override_defaults() {
        let yaml = "
port: /dev/ttyUSB1
baud_rate: 115200
read_interval:
  secs: 5
  nanos: 0
lcd_pins: [7, 8, 9]
log_level: debug
";
        let config = AppConfig::parse(yaml).unwrap();
        assert_eq!(config.port, "/dev/ttyUSB1");
        assert_eq!(config.baud_rate, 115200);
        assert_eq!(config.read_interval, Duration::from_secs(5));
        assert_eq!(config.read_timeout, Duration::from_secs(2));
        assert_eq!(config.lcd_pins, [7, 8, 9]);
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(matches!(AppConfig::parse("baud_rate: [fast"), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            AppConfig::load("./does-not-exist.yaml"),
            Err(ConfigError::Io(_))
        ));
    }
}
