//! Drawlist configuration section
//!
//! Embedded as `[drawlist]` in the driver's `config.toml`.

use serde::{Deserialize, Serialize};

use crate::drawlist::DEFAULT_CAPACITY;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawlistConfig {
    /// Entry slots allocated up front. Adding past this panics.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl Default for DrawlistConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        assert_eq!(DrawlistConfig::default().capacity, 8192);
    }

    #[test]
    fn test_missing_field_uses_default() {
        let config: DrawlistConfig = toml::from_str("").unwrap();
        assert_eq!(config, DrawlistConfig::default());
    }

    #[test]
    fn test_capacity_override() {
        let config: DrawlistConfig = toml::from_str("capacity = 64").unwrap();
        assert_eq!(config.capacity, 64);
    }

    #[test]
    fn test_serializes_capacity() {
        let toml_str = toml::to_string(&DrawlistConfig { capacity: 16 }).unwrap();
        assert!(toml_str.contains("capacity = 16"));
    }
}
