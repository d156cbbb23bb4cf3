//! Runtime configuration parsed from environment variables.
//!
//! Every setting has a default, so an empty environment yields a working
//! configuration. A value that is present but unparsable is an error rather
//! than a silent fallback.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_DATA_DIR: &str = ".whiteboard";
pub const DEFAULT_STORAGE_KEY: &str = "whiteboard_data";
pub const DEFAULT_CHANNEL: &str = "whiteboard_sync";
pub const DEFAULT_VIEWPORT: Viewport = Viewport { width: 1280.0, height: 800.0 };
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}={value:?}: {reason}")]
    Invalid { key: &'static str, value: String, reason: String },
}

/// Visible area new cards are placed in, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl FromStr for Viewport {
    type Err = String;

    /// Parse `WIDTHxHEIGHT`, e.g. `1280x800`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (w, h) = raw.trim().split_once(['x', 'X']).ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
        let width: f64 = w.trim().parse().map_err(|e| format!("width: {e}"))?;
        let height: f64 = h.trim().parse().map_err(|e| format!("height: {e}"))?;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err("dimensions must be positive".into());
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhiteboardConfig {
    /// Directory holding the file storage backend's slots.
    pub data_dir: PathBuf,
    /// Name of the durable slot holding the board.
    pub storage_key: String,
    /// Name of the cross-window broadcast channel.
    pub channel: String,
    pub viewport: Viewport,
    /// Messages a receiver may fall behind before it lags.
    pub channel_capacity: usize,
}

impl Default for WhiteboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            channel: DEFAULT_CHANNEL.to_string(),
            viewport: DEFAULT_VIEWPORT,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl WhiteboardConfig {
    /// Build config from the process environment.
    ///
    /// Optional:
    /// - `WHITEBOARD_DATA_DIR`: default `.whiteboard`
    /// - `WHITEBOARD_STORAGE_KEY`: default `whiteboard_data`
    /// - `WHITEBOARD_CHANNEL`: default `whiteboard_sync`
    /// - `WHITEBOARD_VIEWPORT`: `WIDTHxHEIGHT`, default `1280x800`
    /// - `WHITEBOARD_CHANNEL_CAPACITY`: default 64, at least 1
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a present but malformed value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a present but malformed value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let text = |key: &'static str, default: String| -> Result<String, ConfigError> {
            match lookup(key) {
                None => Ok(default),
                Some(v) if v.trim().is_empty() => Err(invalid(key, v, "must not be empty")),
                Some(v) => Ok(v),
            }
        };

        let data_dir = PathBuf::from(text("WHITEBOARD_DATA_DIR", DEFAULT_DATA_DIR.to_string())?);
        let storage_key = text("WHITEBOARD_STORAGE_KEY", defaults.storage_key)?;
        let channel = text("WHITEBOARD_CHANNEL", defaults.channel)?;
        let viewport = parse_or(&lookup, "WHITEBOARD_VIEWPORT", defaults.viewport)?;
        let channel_capacity: usize =
            parse_or(&lookup, "WHITEBOARD_CHANNEL_CAPACITY", defaults.channel_capacity)?;
        if channel_capacity == 0 {
            return Err(invalid("WHITEBOARD_CHANNEL_CAPACITY", "0", "must be at least 1"));
        }

        Ok(Self { data_dir, storage_key, channel, viewport, channel_capacity })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|e| invalid(key, raw.clone(), e.to_string())),
    }
}

fn invalid(key: &'static str, value: impl Into<String>, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { key, value: value.into(), reason: reason.into() }
}
