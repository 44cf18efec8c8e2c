//! WorkerConfig - queue capacity and logger tag for a background worker.

use serde::Deserialize;

use crate::domain::WorkerError;

pub const DEFAULT_QUEUE_CAPACITY: usize = 100;
pub const DEFAULT_LOGGER_TAG: &str = "BGW";

pub const ENV_QUEUE_CAPACITY: &str = "ERRAND_QUEUE_CAPACITY";
pub const ENV_LOGGER_TAG: &str = "ERRAND_LOGGER_TAG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Maximum queued tasks before `enqueue` waits. Must be > 0.
    pub queue_capacity: usize,
    /// `component` field on the worker's log events.
    pub logger_tag: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            logger_tag: DEFAULT_LOGGER_TAG.to_string(),
        }
    }
}

impl WorkerConfig {
    /// Defaults overridden by `ERRAND_QUEUE_CAPACITY` / `ERRAND_LOGGER_TAG`.
    pub fn from_env() -> Result<Self, WorkerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, WorkerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_QUEUE_CAPACITY) {
            config.queue_capacity = raw.trim().parse().map_err(|_| WorkerError::InvalidConfig {
                key: ENV_QUEUE_CAPACITY.to_string(),
                value: raw.clone(),
            })?;
        }
        if let Some(tag) = lookup(ENV_LOGGER_TAG)
            && !tag.trim().is_empty()
        {
            config.logger_tag = tag;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), WorkerError> {
        if self.queue_capacity == 0 {
            return Err(WorkerError::InvalidCapacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rstest::rstest;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = WorkerConfig::default();
        assert_eq!(config.queue_capacity, 100);
        assert_eq!(config.logger_tag, "BGW");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_overrides_defaults() {
        let config = WorkerConfig::from_lookup(lookup(&[
            (ENV_QUEUE_CAPACITY, " 8 "),
            (ENV_LOGGER_TAG, "mailer"),
        ]))
        .unwrap();

        assert_eq!(config.queue_capacity, 8);
        assert_eq!(config.logger_tag, "mailer");
    }

    #[test]
    fn blank_tag_keeps_default() {
        let config = WorkerConfig::from_lookup(lookup(&[(ENV_LOGGER_TAG, "  ")])).unwrap();
        assert_eq!(config.logger_tag, DEFAULT_LOGGER_TAG);
    }

    #[rstest]
    #[case::zero("0", WorkerError::InvalidCapacity)]
    #[case::negative("-1", WorkerError::InvalidConfig { key: ENV_QUEUE_CAPACITY.into(), value: "-1".into() })]
    #[case::garbage("lots", WorkerError::InvalidConfig { key: ENV_QUEUE_CAPACITY.into(), value: "lots".into() })]
    fn bad_capacity_is_rejected(#[case] raw: &str, #[case] expected: WorkerError) {
        let err = WorkerConfig::from_lookup(lookup(&[(ENV_QUEUE_CAPACITY, raw)])).unwrap_err();
        assert_eq!(err, expected);
    }

    #[test]
    fn deserializes_with_missing_fields_defaulted() {
        let config: WorkerConfig = serde_json::from_str(r#"{ "queue_capacity": 5 }"#).unwrap();
        assert_eq!(config.queue_capacity, 5);
        assert_eq!(config.logger_tag, "BGW");
    }
}
