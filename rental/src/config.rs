//! Runtime configuration read from environment variables.

use crate::payment::SimulatedPayment;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Simulated payment latency
    pub payment_latency: Duration,
    /// Catalog JSON file replacing the built-in fleet
    pub catalog_path: Option<PathBuf>,
    /// Start each session with the demonstration bookings
    pub seed_bookings: bool,
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `DRIVEEASE_PAYMENT_LATENCY_MS` | `2000` |
    /// | `DRIVEEASE_CATALOG_PATH` | unset |
    /// | `DRIVEEASE_SEED_BOOKINGS` | `true` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through a custom variable lookup
    ///
    /// Unparseable values fall back to their defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let payment_latency = lookup("DRIVEEASE_PAYMENT_LATENCY_MS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map_or(SimulatedPayment::DEFAULT_LATENCY, Duration::from_millis)
            .max(SimulatedPayment::MIN_LATENCY);

        let catalog_path = lookup("DRIVEEASE_CATALOG_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let seed_bookings = lookup("DRIVEEASE_SEED_BOOKINGS")
            .and_then(|s| parse_flag(&s))
            .unwrap_or(true);

        Self {
            payment_latency,
            catalog_path,
            seed_bookings,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.payment_latency, Duration::from_millis(2000));
        assert_eq!(config.catalog_path, None);
        assert!(config.seed_bookings);
    }

    #[test]
    fn reads_overrides() {
        let config = load(&[
            ("DRIVEEASE_PAYMENT_LATENCY_MS", "250"),
            ("DRIVEEASE_CATALOG_PATH", "/tmp/fleet.json"),
            ("DRIVEEASE_SEED_BOOKINGS", "off"),
        ]);
        assert_eq!(config.payment_latency, Duration::from_millis(250));
        assert_eq!(config.catalog_path, Some(PathBuf::from("/tmp/fleet.json")));
        assert!(!config.seed_bookings);
    }

    #[test]
    fn zero_latency_is_clamped_and_garbage_ignored() {
        let config = load(&[
            ("DRIVEEASE_PAYMENT_LATENCY_MS", "0"),
            ("DRIVEEASE_SEED_BOOKINGS", "maybe"),
        ]);
        assert_eq!(config.payment_latency, Duration::from_millis(1));
        assert!(config.seed_bookings);

        let config = load(&[("DRIVEEASE_PAYMENT_LATENCY_MS", "soon")]);
        assert_eq!(config.payment_latency, Duration::from_millis(2000));
    }
}
