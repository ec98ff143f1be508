//! Tunables supplied when a session starts.

use arcane_defenders_core::balance::SPAWN_JITTER;
use serde::{Deserialize, Serialize};

use crate::SessionError;

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 0x00c0_ffee;

/// Session configuration, typically loaded from a TOML file.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Seed for spawn jitter and status rolls.
    pub seed: u64,
    /// Initial game speed multiplier.
    pub speed: f32,
    /// Largest per-axis offset applied to spawn positions, in pixels.
    pub spawn_jitter: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            speed: 1.0,
            spawn_jitter: SPAWN_JITTER,
        }
    }
}

impl SessionConfig {
    /// Checks that every field holds a usable value.
    ///
    /// # Errors
    ///
    /// Returns the first field that is out of range.
    pub fn validate(&self) -> Result<(), SessionError> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(SessionError::InvalidSpeed(self.speed));
        }
        if !self.spawn_jitter.is_finite() || self.spawn_jitter < 0.0 {
            return Err(SessionError::InvalidJitter(self.spawn_jitter));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{ "seed": 7 }"#).expect("valid config");
        assert_eq!(config.seed, 7);
        assert_eq!(config.speed, 1.0);
        assert_eq!(config.spawn_jitter, SPAWN_JITTER);
    }

    #[test]
    fn rejects_unusable_speeds() {
        let config = SessionConfig {
            speed: 0.0,
            ..SessionConfig::default()
        };
        assert!(matches!(config.validate(), Err(SessionError::InvalidSpeed(_))));

        let config = SessionConfig {
            spawn_jitter: f32::NAN,
            ..SessionConfig::default()
        };
        assert!(matches!(config.validate(), Err(SessionError::InvalidJitter(_))));
    }
}
