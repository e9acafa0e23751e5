//! # Dashboard Configuration
//!
//! ## Configuration Sources (later wins)
//! 1. Defaults (this file)
//! 2. Config file (`dashboard.toml`, or the path in `BISTRO_CONFIG`)
//! 3. Environment variables (`BISTRO_*`)
//!
//! The result is validated once; it is read-only afterwards, so no lock.
//!
//! ```toml
//! restaurant_name = "Bistro on Main"
//! database_path = "/var/lib/bistro/bistro.db"
//! tax_rate_bps = 825
//! utc_offset_minutes = -300
//! ```

use std::path::{Path, PathBuf};

use bistro_core::validation::validate_tax_rate_bps;
use bistro_core::{TaxRate, DEFAULT_TAX_RATE_BPS};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// UTC-12:00 through UTC+14:00.
const MIN_UTC_OFFSET_MINUTES: i32 = -12 * 60;
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid setting {key}: {reason}")]
    Invalid { key: String, reason: String },
}

impl ConfigError {
    fn invalid(key: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DashboardConfig {
    /// Shown in the dashboard header.
    pub restaurant_name: String,

    /// SQLite file the session is mirrored to.
    pub database_path: PathBuf,

    /// Applied to orders created from now on.
    pub tax_rate_bps: u32,

    pub currency_symbol: String,

    pub currency_decimals: u8,

    /// The restaurant's offset from UTC; decides where "today" starts.
    pub utc_offset_minutes: i32,

    /// How many best sellers the analytics views show.
    pub top_items_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            restaurant_name: "Bistro".to_string(),
            database_path: default_database_path(),
            tax_rate_bps: DEFAULT_TAX_RATE_BPS,
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            utc_offset_minutes: 0,
            top_items_limit: 5,
        }
    }
}

/// Platform data directory, e.g. `~/.local/share/bistro-dashboard/bistro.db`
/// on Linux. Falls back to the working directory.
fn default_database_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("bistro.db"))
        .unwrap_or_else(|| PathBuf::from("bistro.db"))
}

fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("dashboard.toml"))
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "bistro", "dashboard")
}

impl DashboardConfig {
    /// Loads from the default sources and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("BISTRO_CONFIG")
            .ok()
            .map(PathBuf::from)
            .or_else(default_config_path);
        Self::load_from(path.as_deref(), |key| std::env::var(key).ok())
    }

    /// Loads from an optional file and an environment lookup.
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load_from(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            _ => Self::default(),
        };
        config.apply_env(env)?;
        config.validate()?;

        info!(
            restaurant = %config.restaurant_name,
            database = %config.database_path.display(),
            tax_rate_bps = config.tax_rate_bps,
            "Configuration loaded"
        );
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Reading config file");
        Ok(toml::from_str(&text)?)
    }

    /// Applies `BISTRO_*` overrides.
    ///
    /// ## Environment Variables
    /// - `BISTRO_RESTAURANT_NAME`
    /// - `BISTRO_DB_PATH`
    /// - `BISTRO_TAX_RATE_BPS`: e.g. "825" for 8.25%
    /// - `BISTRO_UTC_OFFSET_MINUTES`: e.g. "-300"
    /// - `BISTRO_TOP_ITEMS_LIMIT`
    pub fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(name) = env("BISTRO_RESTAURANT_NAME") {
            self.restaurant_name = name;
        }
        if let Some(path) = env("BISTRO_DB_PATH") {
            self.database_path = PathBuf::from(path);
        }
        if let Some(raw) = env("BISTRO_TAX_RATE_BPS") {
            self.tax_rate_bps = parse_env("BISTRO_TAX_RATE_BPS", &raw)?;
        }
        if let Some(raw) = env("BISTRO_UTC_OFFSET_MINUTES") {
            self.utc_offset_minutes = parse_env("BISTRO_UTC_OFFSET_MINUTES", &raw)?;
        }
        if let Some(raw) = env("BISTRO_TOP_ITEMS_LIMIT") {
            self.top_items_limit = parse_env("BISTRO_TOP_ITEMS_LIMIT", &raw)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.restaurant_name.trim().is_empty() {
            return Err(ConfigError::invalid("restaurant_name", "must not be empty"));
        }
        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::invalid("database_path", "must not be empty"));
        }
        validate_tax_rate_bps(self.tax_rate_bps)
            .map_err(|e| ConfigError::invalid("tax_rate_bps", e.to_string()))?;
        if !(MIN_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&self.utc_offset_minutes) {
            return Err(ConfigError::invalid(
                "utc_offset_minutes",
                format!(
                    "must be between {} and {}",
                    MIN_UTC_OFFSET_MINUTES, MAX_UTC_OFFSET_MINUTES
                ),
            ));
        }
        if self.currency_decimals > 4 {
            return Err(ConfigError::invalid("currency_decimals", "must be at most 4"));
        }
        if self.top_items_limit == 0 {
            return Err(ConfigError::invalid("top_items_limit", "must be positive"));
        }
        Ok(())
    }

    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    /// `instant` on the restaurant's wall clock.
    pub fn local_time(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.utc_offset())
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = DashboardConfig::default();
    /// assert_eq!(config.format_currency(7341), "$73.41");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = cents / divisor;
        let frac = (cents % divisor).abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole.abs(),
                    frac,
                    width = self.currency_decimals as usize
                )
            } else {
                whole.abs().to_string()
            }
        )
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::invalid(key, format!("'{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_format_currency() {
        let config = DashboardConfig::default();
        assert_eq!(config.format_currency(7341), "$73.41");
        assert_eq!(config.format_currency(5), "$0.05");
        assert_eq!(config.format_currency(-500), "-$5.00");
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = DashboardConfig::default();
        config.validate().unwrap();
        assert_eq!(config.tax_rate(), TaxRate::from_bps(800));
    }

    #[test]
    fn test_file_then_env_layering() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        std::fs::write(
            &path,
            "restaurant_name = \"Chez Test\"\ntax_rate_bps = 825\nutc_offset_minutes = 120\n",
        )
        .unwrap();

        let config = DashboardConfig::load_from(
            Some(&path),
            env_of(&[("BISTRO_TAX_RATE_BPS", "900"), ("BISTRO_DB_PATH", "/tmp/x.db")]),
        )
        .unwrap();

        assert_eq!(config.restaurant_name, "Chez Test");
        assert_eq!(config.tax_rate_bps, 900);
        assert_eq!(config.utc_offset_minutes, 120);
        assert_eq!(config.database_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.top_items_limit, 5);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            DashboardConfig::load_from(Some(&dir.path().join("absent.toml")), env_of(&[])).unwrap();
        assert_eq!(config.restaurant_name, "Bistro");
    }

    #[test]
    fn test_bad_values_are_rejected() {
        let err = DashboardConfig::load_from(None, env_of(&[("BISTRO_TAX_RATE_BPS", "eight")]));
        assert!(matches!(err, Err(ConfigError::Invalid { .. })));

        let err = DashboardConfig::load_from(None, env_of(&[("BISTRO_TAX_RATE_BPS", "20000")]));
        assert!(matches!(err, Err(ConfigError::Invalid { .. })));

        let err =
            DashboardConfig::load_from(None, env_of(&[("BISTRO_UTC_OFFSET_MINUTES", "1000")]));
        assert!(matches!(err, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        std::fs::write(&path, "tax_rate_bps = \"lots\"").unwrap();
        assert!(matches!(
            DashboardConfig::load_from(Some(&path), env_of(&[])),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_local_time_shifts_the_date() {
        let config = DashboardConfig {
            utc_offset_minutes: 6 * 60,
            ..Default::default()
        };
        let instant = Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap();
        let local = config.local_time(instant);
        assert_eq!(local.date_naive().to_string(), "2024-06-02");
    }
}
