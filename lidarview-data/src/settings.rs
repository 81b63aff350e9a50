//! `key = value` settings file.

use crate::error::DataError;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Flat string settings with typed, defaulting accessors.
///
/// Lines are `key = value`. A line whose first non-blank character is `#` is a
/// comment; a `#` anywhere else belongs to the value. Keys and values are
/// trimmed, so inner spaces in a value survive.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    values: HashMap<String, String>,
}

impl Settings {
    pub fn parse(text: &str) -> Self {
        let mut values = HashMap::new();
        for (number, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    values.insert(key.trim().to_string(), value.trim().to_string());
                }
                _ => debug!("Ignoring settings line {}: {raw:?}", number + 1),
            }
        }
        Self { values }
    }

    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
        let settings = Self::parse(&text);
        info!("Loaded {} settings", settings.len());
        Ok(settings)
    }

    /// Like [`Settings::load`], but a missing or unreadable file yields empty
    /// settings so every accessor returns its default.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|err| {
            warn!("{err}; using default settings");
            Self::default()
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.typed(key, default, "integer")
    }

    pub fn get_float(&self, key: &str, default: f32) -> f32 {
        self.typed(key, default, "float")
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        let Some(value) = self.get(key) else {
            return default;
        };
        parse_bool(value).unwrap_or_else(|| {
            self.report(key, value, "boolean");
            default
        })
    }

    fn typed<T: FromStr>(&self, key: &str, default: T, expected: &'static str) -> T {
        let Some(value) = self.get(key) else {
            return default;
        };
        value.parse().unwrap_or_else(|_| {
            self.report(key, value, expected);
            default
        })
    }

    fn report(&self, key: &str, value: &str, expected: &'static str) {
        let err = DataError::InvalidSetting {
            key: key.to_string(),
            value: value.to_string(),
            expected,
        };
        warn!("{err}; using default");
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
