//! Settings for the document view.
//!
//! Defaults match what the editor has always used: a 300 ms settle delay
//! before reconciling a freshly shown widget, and two-space JSON. The host
//! can override either one through the environment (see `from_env`) or hand
//! over a JSON document (`from_json`).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::json::{DEFAULT_INDENT, MAX_INDENT};

pub const RECONCILE_DELAY_ENV: &str = "REQPAD_RECONCILE_DELAY_MS";
pub const JSON_INDENT_ENV: &str = "REQPAD_JSON_INDENT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Wait before a reconciliation touches the widget, in milliseconds.
    pub reconcile_delay_ms: u64,
    /// Spaces per level when beautifying JSON.
    pub json_indent: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            reconcile_delay_ms: 300,
            json_indent: DEFAULT_INDENT,
        }
    }
}

impl ViewConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate("json_indent")?;
        Ok(config)
    }

    /// Defaults with the `REQPAD_*` environment overrides applied. A bad
    /// value is logged and the defaults are used instead.
    pub fn from_env() -> Self {
        Self::load(|key| std::env::var(key).ok())
    }

    /// Like `try_load`, falling back to defaults on error.
    pub fn load(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::try_load(lookup).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "ignoring view settings, using defaults");
            Self::default()
        })
    }

    /// Defaults overridden by whatever `lookup` returns for
    /// `RECONCILE_DELAY_ENV` and `JSON_INDENT_ENV`.
    pub fn try_load(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = lookup(RECONCILE_DELAY_ENV) {
            config.reconcile_delay_ms = parse_value(RECONCILE_DELAY_ENV, &raw)?;
        }
        if let Some(raw) = lookup(JSON_INDENT_ENV) {
            config.json_indent = parse_value(JSON_INDENT_ENV, &raw)?;
            config.validate(JSON_INDENT_ENV)?;
        }
        tracing::debug!(?config, "view settings loaded");
        Ok(config)
    }

    pub fn reconcile_delay(&self) -> Duration {
        Duration::from_millis(self.reconcile_delay_ms)
    }

    fn validate(&self, indent_key: &'static str) -> Result<(), ConfigError> {
        if self.json_indent > MAX_INDENT {
            return Err(ConfigError::InvalidValue {
                key: indent_key,
                value: self.json_indent.to_string(),
            });
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults() {
        let config = ViewConfig::default();
        assert_eq!(config.reconcile_delay(), Duration::from_millis(300));
        assert_eq!(config.json_indent, 2);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = ViewConfig::from_json(r#"{"reconcile_delay_ms":50}"#).unwrap();
        assert_eq!(config.reconcile_delay_ms, 50);
        assert_eq!(config.json_indent, 2);
    }

    #[test]
    fn bad_json_is_a_parse_error() {
        let err = ViewConfig::from_json("{").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn oversized_indent_in_json_is_rejected() {
        let err = ViewConfig::from_json(r#"{"json_indent":1000}"#).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "json_indent",
                value: "1000".into()
            }
        );
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ViewConfig::try_load(vars(&[
            (RECONCILE_DELAY_ENV, " 75 "),
            (JSON_INDENT_ENV, "4"),
        ]))
        .unwrap();
        assert_eq!(config.reconcile_delay(), Duration::from_millis(75));
        assert_eq!(config.json_indent, 4);
    }

    #[test]
    fn unset_environment_keeps_defaults() {
        assert_eq!(ViewConfig::try_load(vars(&[])).unwrap(), ViewConfig::default());
    }

    #[test]
    fn invalid_environment_value_is_reported() {
        let err = ViewConfig::try_load(vars(&[(RECONCILE_DELAY_ENV, "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: RECONCILE_DELAY_ENV,
                value: "soon".into()
            }
        );

        let err = ViewConfig::try_load(vars(&[(JSON_INDENT_ENV, "64")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: JSON_INDENT_ENV, .. }));
    }

    #[test]
    fn load_falls_back_to_defaults_on_invalid_value() {
        let config = ViewConfig::load(vars(&[
            (RECONCILE_DELAY_ENV, "-1"),
            (JSON_INDENT_ENV, "4"),
        ]));
        assert_eq!(config, ViewConfig::default());
    }

    #[test]
    fn wrong_type_is_a_parse_error() {
        let err = ViewConfig::from_json(r#"{"json_indent":"two"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
