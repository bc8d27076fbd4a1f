/// Shared frame buffer layout.
/// Must stay in sync with the host's `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 12 floats]
/// [Penguin: 8 floats]
/// [Letter: 4 floats]
/// [Particles: max_particles × 8 floats]
/// [Events: max_events × 2 floats]
/// ```
///
/// Capacities are written into the header once at init.

use crate::api::config::CardConfig;
use crate::api::types::EventRecord;
use crate::renderer::instance::{LetterInstance, ParticleInstance, PenguinInstance};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 12;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_PHASE: usize = 2;
/// Bit 0 opened, bit 1 jumping, bit 2 penguin visible, bit 3 returning.
pub const HEADER_FLAGS: usize = 3;
pub const HEADER_PARTICLE_COUNT: usize = 4;
pub const HEADER_EVENT_COUNT: usize = 5;
pub const HEADER_MAX_PARTICLES: usize = 6;
pub const HEADER_MAX_EVENTS: usize = 7;
/// Card clock in seconds.
pub const HEADER_CLOCK: usize = 8;
// 9..12 reserved.

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_particles: usize,
    pub max_events: usize,

    pub penguin_offset: usize,
    pub letter_offset: usize,
    pub particle_offset: usize,
    pub event_offset: usize,

    pub buffer_total_floats: usize,
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    pub fn new(max_particles: usize, max_events: usize) -> Self {
        let penguin_offset = HEADER_FLOATS;
        let letter_offset = penguin_offset + PenguinInstance::FLOATS;
        let particle_offset = letter_offset + LetterInstance::FLOATS;
        let event_offset = particle_offset + max_particles * ParticleInstance::FLOATS;
        let buffer_total_floats = event_offset + max_events * EventRecord::FLOATS;

        Self {
            max_particles,
            max_events,
            penguin_offset,
            letter_offset,
            particle_offset,
            event_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    pub fn from_config(config: &CardConfig) -> Self {
        Self::new(config.max_particles, config.max_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_layout() {
        let layout = ProtocolLayout::from_config(&CardConfig::default());
        assert_eq!(layout.penguin_offset, 12);
        assert_eq!(layout.letter_offset, 20);
        assert_eq!(layout.particle_offset, 24);
        assert_eq!(layout.event_offset, 24 + 64 * 8);
        assert_eq!(layout.buffer_total_floats, 24 + 64 * 8 + 16 * 2);
        assert_eq!(layout.buffer_total_bytes, layout.buffer_total_floats * 4);
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = ProtocolLayout::new(3, 5);
        assert_eq!(layout.letter_offset, layout.penguin_offset + PenguinInstance::FLOATS);
        assert_eq!(layout.particle_offset, layout.letter_offset + LetterInstance::FLOATS);
        assert_eq!(layout.event_offset, layout.particle_offset + 3 * ParticleInstance::FLOATS);
        assert_eq!(layout.buffer_total_floats, layout.event_offset + 5 * EventRecord::FLOATS);
    }
}
