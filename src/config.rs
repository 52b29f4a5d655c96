use anyhow::Result;
use chrono::Weekday;
use std::env;
use std::str::FromStr;

use crate::models::Granularity;

#[derive(Debug, Clone)]
pub struct Config {
    /// First weekday of a rendered week row. Every grid starts on this day.
    pub week_start: Weekday,
    pub default_view: Granularity,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_env_only()
    }

    /// Load configuration from environment variables only (without loading .env files)
    /// This is useful for testing where you want to control the environment directly
    pub fn from_env_only() -> Result<Self> {
        Ok(Config {
            week_start: env::var("CALENDAR_WEEK_START")
                .ok()
                .and_then(|value| Weekday::from_str(&value).ok())
                .unwrap_or(Weekday::Sun),
            default_view: env::var("CALENDAR_DEFAULT_VIEW")
                .ok()
                .and_then(|value| Granularity::from_str(&value).ok())
                .unwrap_or(Granularity::Month),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            week_start: Weekday::Sun,
            default_view: Granularity::Month,
            environment: "development".to_string(),
        }
    }
}
