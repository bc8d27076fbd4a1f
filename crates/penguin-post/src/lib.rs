pub mod api;
pub mod bridge;
pub mod core;
pub mod extensions;
pub mod input;
pub mod renderer;
pub mod sequencer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::CardConfig;
pub use api::types::{CardEvent, EventRecord, TimerId};
pub use bridge::protocol::ProtocolLayout;
pub use crate::core::time::FixedTimestep;
pub use crate::core::timers::TimerQueue;
pub use input::queue::{CardInput, InputQueue};
pub use renderer::{CardFrame, FrameBuffer, ParticleView};
pub use sequencer::{DeliverySequencer, Gesture, PenguinDriver, Phase, SequenceState};
pub use systems::audio::{AudioError, AudioSink, ChimeEnvelope, SilentSink, Waveform, play_chime};
pub use systems::particles::{Particle, ParticleColor, ParticleEmitter};
pub use systems::presence::{LetterPose, LetterPresence, PresenceStatus};

pub use extensions::{
    Easing, CubicBezier, lerp, ease,
    KeyframeSequence, KeyframeTrack,
    Pose, PoseProperty,
    Spring, SpringConfig, PoseSpring,
};
