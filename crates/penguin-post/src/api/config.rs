use serde::{Deserialize, Serialize};

use crate::extensions::spring::SpringConfig;

/// Timing and tuning constants for one delivery card.
///
/// All durations are in seconds. Every field has a default, so a JSON
/// override only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// Fixed simulation step (default: 1/60).
    pub fixed_dt: f32,
    /// Length of the jump keyframe sequence.
    pub jump_duration: f32,
    /// Pause between hiding the penguin and opening the letter.
    pub open_delay: f32,
    /// Length of the drop-in sequence and of the `returning` flag.
    pub return_duration: f32,
    /// Interval of the trail particle timer while jumping.
    pub trail_interval: f32,
    /// Particles in the burst at jump start.
    pub burst_count: usize,
    /// Particles per trail tick.
    pub trail_count: usize,
    /// Time until a batch's clear timer empties the particle collection.
    pub particle_lifetime: f32,
    /// Duration of the letter flap folding open.
    pub flap_duration: f32,
    /// Spring for reactive penguin poses.
    pub penguin_spring: SpringConfig,
    /// Spring for the letter card entering and leaving.
    pub letter_spring: SpringConfig,
    /// Seed for the particle RNG.
    pub seed: u64,
    /// Particle capacity of the shared frame buffer.
    pub max_particles: usize,
    /// Event capacity of the shared frame buffer, per frame.
    pub max_events: usize,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            jump_duration: 0.9,
            open_delay: 0.04,
            return_duration: 0.75,
            trail_interval: 0.35,
            burst_count: 6,
            trail_count: 1,
            particle_lifetime: 0.9,
            flap_duration: 0.6,
            penguin_spring: SpringConfig::penguin(),
            letter_spring: SpringConfig::letter(),
            seed: 42,
            max_particles: 64,
            max_events: 16,
        }
    }
}

impl CardConfig {
    /// Parse a config override from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_card_timings() {
        let c = CardConfig::default();
        assert_eq!(c.jump_duration, 0.9);
        assert_eq!(c.open_delay, 0.04);
        assert_eq!(c.return_duration, 0.75);
        assert_eq!(c.trail_interval, 0.35);
        assert_eq!(c.burst_count, 6);
        assert_eq!(c.particle_lifetime, 0.9);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = CardConfig::from_json(r#"{ "jump_duration": 1.2, "seed": 7 }"#).unwrap();
        assert_eq!(c.jump_duration, 1.2);
        assert_eq!(c.seed, 7);
        assert_eq!(c.trail_interval, 0.35);
        assert_eq!(c.penguin_spring, SpringConfig::penguin());
    }

    #[test]
    fn nested_spring_override() {
        let c = CardConfig::from_json(
            r#"{ "letter_spring": { "stiffness": 120.0, "damping": 14.0, "mass": 1.0 } }"#,
        )
        .unwrap();
        assert_eq!(c.letter_spring.stiffness, 120.0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(CardConfig::from_json("{ jump").is_err());
    }
}
