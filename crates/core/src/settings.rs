// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job settings map and typed accessors.
//!
//! Settings arrive from the submitting client as a string-keyed map of JSON
//! values. The schema belongs to the job type; accessors here only know how
//! to read a value as a given type and name the key when they can't.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// A required job setting is missing or malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("job setting {setting:?}: {message}")]
pub struct JobSettingError {
    pub setting: String,
    pub message: String,
}

impl JobSettingError {
    pub fn new(setting: &str, message: impl Into<String>) -> Self {
        Self {
            setting: setting.to_string(),
            message: message.into(),
        }
    }

    pub fn missing(setting: &str) -> Self {
        Self::new(setting, "missing required setting")
    }
}

/// Settings of one job, keyed by setting name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobSettings(BTreeMap<String, Value>);

impl JobSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Present, non-null and not an empty string.
    pub fn is_set(&self, key: &str) -> bool {
        match self.0.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        }
    }

    fn require(&self, key: &str) -> Result<&Value, JobSettingError> {
        match self.0.get(key) {
            Some(value) if self.is_set(key) => Ok(value),
            _ => Err(JobSettingError::missing(key)),
        }
    }

    /// Read a string setting. Numbers are accepted and rendered as text.
    pub fn str(&self, key: &str) -> Result<String, JobSettingError> {
        match self.require(key)? {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(JobSettingError::new(
                key,
                format!("expected a string, got {other}"),
            )),
        }
    }

    /// Read an integer setting. Integral strings like `"250"` are accepted.
    pub fn int(&self, key: &str) -> Result<i64, JobSettingError> {
        let value = self.require(key)?;
        let parsed = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| {
            JobSettingError::new(key, format!("expected an integer, got {value}"))
        })
    }

    /// Read an integer setting that must be at least `min`.
    pub fn int_at_least(&self, key: &str, min: i64) -> Result<i64, JobSettingError> {
        let n = self.int(key)?;
        if n < min {
            return Err(JobSettingError::new(
                key,
                format!("must be at least {min}, got {n}"),
            ));
        }
        Ok(n)
    }

    /// Read a frame range spec. A bare integer is a single frame.
    pub fn frames(&self, key: &str) -> Result<String, JobSettingError> {
        self.str(key)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for JobSettings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
