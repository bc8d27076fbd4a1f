use glam::Vec2;

use crate::extensions::pose::Pose;
use crate::sequencer::{DeliverySequencer, Phase, SequenceState};
use crate::systems::audio::AudioSink;
use crate::systems::particles::ParticleColor;
use crate::systems::presence::LetterPose;

/// One particle as it should be drawn this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleView {
    pub id: String,
    /// Displacement from the penguin's emission point.
    pub position: Vec2,
    pub size: f32,
    pub opacity: f32,
    pub scale: f32,
    pub color: ParticleColor,
}

/// Everything the host needs to draw the card for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CardFrame {
    pub phase: Phase,
    pub state: SequenceState,
    /// None while the penguin is unmounted.
    pub penguin: Option<Pose>,
    /// Empty when the particle layer is hidden.
    pub particles: Vec<ParticleView>,
    /// None while the letter panel is unmounted.
    pub letter: Option<LetterPose>,
    /// Seconds on the card clock.
    pub clock: f64,
}

impl CardFrame {
    pub fn capture<A: AudioSink>(seq: &DeliverySequencer<A>) -> Self {
        let particles = if seq.particles_visible() {
            seq.particles()
                .iter()
                .map(|p| ParticleView {
                    id: p.id.clone(),
                    position: p.position(),
                    size: p.size,
                    opacity: p.opacity(),
                    scale: p.scale(),
                    color: p.color,
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            phase: seq.phase(),
            state: seq.state(),
            penguin: seq.penguin_pose(),
            particles,
            letter: seq.letter_pose(),
            clock: seq.clock(),
        }
    }
}
