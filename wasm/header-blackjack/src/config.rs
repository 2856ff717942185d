use log::LevelFilter;
use serde::Deserialize;

use crate::error::ConfigError;

fn default_starting_wallet() -> i64 {
    100
}

fn default_dealer_stands_on() -> u32 {
    17
}

fn default_dealer_delay_ms() -> u32 {
    300
}

fn default_game_over_delay_ms() -> u32 {
    500
}

fn default_message_ms() -> u32 {
    2_000
}

fn default_game_over_message_ms() -> u32 {
    3_000
}

fn default_reset_message_ms() -> u32 {
    1_500
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Table settings. Every field has a default so the page may pass `{}`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    #[serde(default = "default_starting_wallet")]
    pub starting_wallet: i64,
    #[serde(default = "default_dealer_stands_on")]
    pub dealer_stands_on: u32,
    #[serde(default = "default_dealer_delay_ms")]
    pub dealer_delay_ms: u32,
    #[serde(default = "default_game_over_delay_ms")]
    pub game_over_delay_ms: u32,
    #[serde(default = "default_message_ms")]
    pub message_ms: u32,
    #[serde(default = "default_game_over_message_ms")]
    pub game_over_message_ms: u32,
    #[serde(default = "default_reset_message_ms")]
    pub reset_message_ms: u32,
    /// Fixed shoe seed; entropy is used when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Browser console verbosity: off, error, warn, info, debug or trace.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            starting_wallet: default_starting_wallet(),
            dealer_stands_on: default_dealer_stands_on(),
            dealer_delay_ms: default_dealer_delay_ms(),
            game_over_delay_ms: default_game_over_delay_ms(),
            message_ms: default_message_ms(),
            game_over_message_ms: default_game_over_message_ms(),
            reset_message_ms: default_reset_message_ms(),
            seed: None,
            log_level: default_log_level(),
        }
    }
}

impl TableConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: TableConfig = serde_json::from_str(json)?;
        config.validate()
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.starting_wallet <= 0 {
            return Err(ConfigError::Invalid(format!(
                "startingWallet must be positive, got {}",
                self.starting_wallet
            )));
        }
        if !(2..=21).contains(&self.dealer_stands_on) {
            return Err(ConfigError::Invalid(format!(
                "dealerStandsOn must be within 2..=21, got {}",
                self.dealer_stands_on
            )));
        }
        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "unknown logLevel {:?}",
                self.log_level
            )));
        }
        Ok(self)
    }

    pub fn log_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}
