//! # Configuration State
//!
//! Storefront configuration loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`LOUNGE_*`)
//! 2. Defaults (this file)
//!
//! ## Environment Variables
//! | Variable                 | Default                              |
//! |--------------------------|--------------------------------------|
//! | `LOUNGE_DB_PATH`         | platform data dir + `lounge.db`      |
//! | `LOUNGE_MENU_PATH`       | `data/menu.json`                     |
//! | `LOUNGE_STORE_NAME`      | `Lounge Bar`                         |
//! | `LOUNGE_CURRENCY_SYMBOL` | `$`                                  |
//! | `LOUNGE_COUPON_DELAY_MS` | `400`                                |
//! | `LOUNGE_COUPONS`         | `WELCOME10:10,HAPPYHOUR:15`          |
//!
//! Read-only after initialization, so no lock.

use directories::ProjectDirs;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use lounge_core::validation::{validate_coupon_code, validate_discount_percent};

const DEFAULT_MENU_PATH: &str = "data/menu.json";
const DEFAULT_COUPONS: &str = "WELCOME10:10,HAPPYHOUR:15";
const DEFAULT_COUPON_DELAY_MS: u64 = 400;
const DATABASE_FILE: &str = "lounge.db";

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Could not determine the application data directory")]
    NoDataDirectory,
}

impl ConfigError {
    fn invalid(key: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Storefront configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    pub database_path: PathBuf,

    pub menu_path: PathBuf,

    /// Shown in the CLI header and on order receipts.
    pub store_name: String,

    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// Simulated round trip of the coupon endpoint.
    #[serde(skip)]
    pub coupon_delay: Duration,

    /// Upper-cased code → discount percent.
    pub coupons: BTreeMap<String, u8>,
}

impl Default for ConfigState {
    /// Development defaults. The database lands in the working directory;
    /// [`ConfigState::from_env`] resolves the platform data directory instead.
    fn default() -> Self {
        ConfigState {
            database_path: PathBuf::from(DATABASE_FILE),
            menu_path: PathBuf::from(DEFAULT_MENU_PATH),
            store_name: "Lounge Bar".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            coupon_delay: Duration::from_millis(DEFAULT_COUPON_DELAY_MS),
            coupons: parse_coupons(DEFAULT_COUPONS).unwrap_or_default(),
        }
    }
}

impl ConfigState {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from any key lookup. `from_env` passes
    /// `std::env::var`; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConfigState::default();

        config.database_path = match lookup("LOUNGE_DB_PATH") {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_database_path()?,
        };

        if let Some(path) = lookup("LOUNGE_MENU_PATH") {
            config.menu_path = PathBuf::from(path);
        }

        if let Some(store_name) = lookup("LOUNGE_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(symbol) = lookup("LOUNGE_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(raw) = lookup("LOUNGE_COUPON_DELAY_MS") {
            let millis: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("LOUNGE_COUPON_DELAY_MS", "expected milliseconds"))?;
            config.coupon_delay = Duration::from_millis(millis);
        }

        if let Some(raw) = lookup("LOUNGE_COUPONS") {
            config.coupons = parse_coupons(&raw)?;
        }

        Ok(config)
    }

    /// Discount percent for a coupon code (case-insensitive).
    pub fn coupon_percent(&self, code: &str) -> Option<u8> {
        self.coupons.get(&code.trim().to_ascii_uppercase()).copied()
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust
    /// use lounge_storefront_lib::state::ConfigState;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let divisor = 10_i64.pow(u32::from(self.currency_decimals));
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
                    width = usize::from(self.currency_decimals)
                )
            } else {
                whole.abs().to_string()
            }
        )
    }
}

/// Platform data directory:
/// - **macOS**: `~/Library/Application Support/com.lounge.storefront/lounge.db`
/// - **Windows**: `%APPDATA%\lounge\storefront\data\lounge.db`
/// - **Linux**: `~/.local/share/storefront/lounge.db`
fn default_database_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("com", "lounge", "storefront").ok_or(ConfigError::NoDataDirectory)?;
    Ok(dirs.data_dir().join(DATABASE_FILE))
}

/// Parses `CODE:PERCENT,CODE:PERCENT`.
fn parse_coupons(raw: &str) -> Result<BTreeMap<String, u8>, ConfigError> {
    let mut coupons = BTreeMap::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (code, percent) = entry
            .split_once(':')
            .ok_or_else(|| ConfigError::invalid("LOUNGE_COUPONS", format!("'{}' is not CODE:PERCENT", entry)))?;

        let code = validate_coupon_code(code)
            .map_err(|e| ConfigError::invalid("LOUNGE_COUPONS", e.to_string()))?;

        let percent: i64 = percent
            .trim()
            .parse()
            .map_err(|_| ConfigError::invalid("LOUNGE_COUPONS", format!("'{}' has no numeric percent", entry)))?;
        validate_discount_percent(percent)
            .map_err(|e| ConfigError::invalid("LOUNGE_COUPONS", e.to_string()))?;

        let percent = u8::try_from(percent)
            .map_err(|_| ConfigError::invalid("LOUNGE_COUPONS", "percent out of range"))?;
        coupons.insert(code, percent);
    }

    Ok(coupons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_format_currency_positive() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(1234), "$12.34");
        assert_eq!(config.format_currency(100), "$1.00");
        assert_eq!(config.format_currency(1), "$0.01");
        assert_eq!(config.format_currency(0), "$0.00");
    }

    #[test]
    fn test_format_currency_negative() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(-1234), "-$12.34");
    }

    #[test]
    fn test_default_coupons() {
        let config = ConfigState::default();
        assert_eq!(config.coupon_percent("welcome10"), Some(10));
        assert_eq!(config.coupon_percent(" HAPPYHOUR "), Some(15));
        assert_eq!(config.coupon_percent("NOPE"), None);
    }

    #[test]
    fn test_overrides() {
        let config = ConfigState::from_lookup(lookup(&[
            ("LOUNGE_DB_PATH", "/tmp/lounge-test.db"),
            ("LOUNGE_MENU_PATH", "/tmp/menu.json"),
            ("LOUNGE_STORE_NAME", "Blue Note"),
            ("LOUNGE_CURRENCY_SYMBOL", "S/ "),
            ("LOUNGE_COUPON_DELAY_MS", "0"),
            ("LOUNGE_COUPONS", "vip:25, late-night:5"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/lounge-test.db"));
        assert_eq!(config.menu_path, PathBuf::from("/tmp/menu.json"));
        assert_eq!(config.store_name, "Blue Note");
        assert_eq!(config.format_currency(500), "S/ 5.00");
        assert_eq!(config.coupon_delay, Duration::ZERO);
        assert_eq!(config.coupon_percent("VIP"), Some(25));
        assert_eq!(config.coupon_percent("LATE-NIGHT"), Some(5));
        assert_eq!(config.coupon_percent("WELCOME10"), None);
    }

    #[test]
    fn test_invalid_values() {
        let bad_delay = ConfigState::from_lookup(lookup(&[
            ("LOUNGE_DB_PATH", "x.db"),
            ("LOUNGE_COUPON_DELAY_MS", "soon"),
        ]));
        assert!(matches!(bad_delay, Err(ConfigError::InvalidValue { .. })));

        let bad_coupon = ConfigState::from_lookup(lookup(&[
            ("LOUNGE_DB_PATH", "x.db"),
            ("LOUNGE_COUPONS", "FREE:150"),
        ]));
        assert!(bad_coupon.is_err());

        let no_separator = ConfigState::from_lookup(lookup(&[
            ("LOUNGE_DB_PATH", "x.db"),
            ("LOUNGE_COUPONS", "FREE"),
        ]));
        assert!(no_separator.is_err());
    }
}
