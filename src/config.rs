use std::{env, fmt::Display, net::SocketAddr, str::FromStr};

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::excerpt::{
    derive_excerpt, estimate_reading_minutes, DEFAULT_EXCERPT_LENGTH, DEFAULT_READING_SPEED,
};

pub const DEFAULT_PAGE_SIZE: u32 = 9;

/// Presentation tuning for excerpts and reading time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentSettings {
    pub excerpt_length: usize,
    pub reading_speed: usize,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
            reading_speed: DEFAULT_READING_SPEED,
        }
    }
}

impl ContentSettings {
    pub fn excerpt(&self, raw_body: &str) -> String {
        derive_excerpt(raw_body, self.excerpt_length)
    }

    pub fn reading_minutes(&self, raw_body: &str) -> u32 {
        estimate_reading_minutes(raw_body, self.reading_speed)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub address: SocketAddr,
    pub content: ContentSettings,
    pub page_size: u32,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let host: std::net::IpAddr = try_load("HOST", "127.0.0.1")?;
        let port: u16 = try_load("PORT", "3001")?;
        let settings = Self {
            database_url,
            address: SocketAddr::new(host, port),
            content: ContentSettings {
                excerpt_length: try_load("EXCERPT_LENGTH", &DEFAULT_EXCERPT_LENGTH.to_string())?,
                reading_speed: try_load("READING_SPEED", &DEFAULT_READING_SPEED.to_string())?,
            },
            page_size: try_load("PAGE_SIZE", &DEFAULT_PAGE_SIZE.to_string())?,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn new(database_url: impl Into<String>, address: SocketAddr) -> Self {
        Self {
            database_url: database_url.into(),
            address,
            content: ContentSettings::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.content.excerpt_length == 0 {
            bail!("EXCERPT_LENGTH must be positive");
        }
        if self.content.reading_speed == 0 {
            bail!("READING_SPEED must be positive");
        }
        if self.page_size == 0 {
            bail!("PAGE_SIZE must be positive");
        }
        Ok(())
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        anyhow::anyhow!("invalid value for {key}: {raw:?}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_presentation_constants() {
        let content = ContentSettings::default();
        assert_eq!(content.excerpt_length, 150);
        assert_eq!(content.reading_speed, 200);
        assert_eq!(content.reading_minutes(""), 1);
    }

    #[test]
    fn content_settings_are_adjustable() {
        let content = ContentSettings {
            excerpt_length: 4,
            reading_speed: 2,
        };
        assert_eq!(content.excerpt("abcdefgh"), "abcd...");
        assert_eq!(content.reading_minutes("abcde"), 3);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let mut settings = Settings::new("sqlite::memory:", "127.0.0.1:0".parse().unwrap());
        assert!(settings.validate().is_ok());
        settings.page_size = 0;
        assert!(settings.validate().is_err());
    }
}
