//! Server configuration read from the environment.

use std::env;

/// Startup settings. Every field has a default so the server runs with no env set.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Rebuild a division's bracket whenever someone registers into it.
    pub regenerate_on_register: bool,
    /// Fixed seed for bracket shuffles (reproducible draws); entropy when unset.
    pub shuffle_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            regenerate_on_register: true,
            shuffle_seed: None,
        }
    }
}

impl Config {
    /// Read `HOST`, `PORT`, `REGENERATE_ON_REGISTER` and `BRACKET_SEED`.
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            regenerate_on_register: lookup("REGENERATE_ON_REGISTER")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.regenerate_on_register),
            shuffle_seed: lookup("BRACKET_SEED").and_then(|s| s.trim().parse().ok()),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        assert_eq!(Config::from_lookup(|_| None), Config::default());
    }

    #[test]
    fn reads_all_variables() {
        let config = Config::from_lookup(lookup_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("REGENERATE_ON_REGISTER", "off"),
            ("BRACKET_SEED", "42"),
        ]));
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert!(!config.regenerate_on_register);
        assert_eq!(config.shuffle_seed, Some(42));
    }

    #[test]
    fn bad_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "not-a-port"),
            ("REGENERATE_ON_REGISTER", "maybe"),
            ("BRACKET_SEED", "-1"),
        ]));
        assert_eq!(config.port, 8080);
        assert!(config.regenerate_on_register);
        assert_eq!(config.shuffle_seed, None);
    }
}
