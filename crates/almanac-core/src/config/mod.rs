use anyhow::Result;
use chrono::NaiveDate;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, FileFormat};
use serde::Deserialize;

use crate::constants::{
    DEFAULT_EVENTS_PATH, DEFAULT_LOG_LEVEL, DEFAULT_LOOKAHEAD_YEARS, MAX_LOOKAHEAD_YEARS,
};
use crate::error::{CoreError, CoreResult};


#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub expansion: ExpansionConfig,
    pub logging: LoggingConfig,
    pub agenda: AgendaConfig,
}

/// Policy for expanding recurring events.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpansionConfig {
    /// How far past the reference instant an open-ended recurrence is expanded.
    pub lookahead_years: u32,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            lookahead_years: DEFAULT_LOOKAHEAD_YEARS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgendaConfig {
    pub events_path: String,
    pub day: Option<String>,
}

impl AgendaConfig {
    /// ## Summary
    /// Returns the configured agenda day, if one was set.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidInput` if the day is not formatted as `YYYY-MM-DD`.
    pub fn day(&self) -> CoreResult<Option<NaiveDate>> {
        self.day
            .as_deref()
            .map(|raw| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_e| {
                    CoreError::InvalidInput(format!(
                        "Invalid agenda day '{raw}'. Expected YYYY-MM-DD"
                    ))
                })
            })
            .transpose()
    }
}

impl Settings {
    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default(
                "expansion.lookahead_years",
                i64::from(DEFAULT_LOOKAHEAD_YEARS),
            )?
            .set_default("logging.level", DEFAULT_LOG_LEVEL)?
            .set_default("agenda.events_path", DEFAULT_EVENTS_PATH)?)
    }

    /// ## Summary
    /// Loads configuration from environment variables and an optional `config.toml`.
    /// Environment variables use the `ALMANAC_` prefix and `__` between sections,
    /// e.g. `ALMANAC_EXPANSION__LOOKAHEAD_YEARS=20`.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Self::defaults()?
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            // Env
            .add_source(
                config::Environment::with_prefix("ALMANAC")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?)
    }

    /// ## Summary
    /// Builds settings from TOML text layered over the defaults.
    ///
    /// ## Errors
    /// Returns an error if the text is not valid TOML or does not match `Settings`.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Ok(Self::defaults()?
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize::<Settings>()?)
    }

    /// ## Summary
    /// Checks values the type system cannot.
    ///
    /// ## Errors
    /// Returns `CoreError::ConfigError` if the lookahead is zero or unreasonably large.
    pub fn validate(&self) -> CoreResult<()> {
        let years = self.expansion.lookahead_years;
        if years == 0 || years > MAX_LOOKAHEAD_YEARS {
            return Err(CoreError::ConfigError(format!(
                "expansion.lookahead_years must be between 1 and {MAX_LOOKAHEAD_YEARS}, got {years}"
            )));
        }
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading, deserializing or validating the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    settings.validate()?;
    tracing::debug!(
        lookahead_years = settings.expansion.lookahead_years,
        "Configuration validated"
    );
    Ok(settings)
}
