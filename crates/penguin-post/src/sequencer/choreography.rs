//! Fixed penguin motions and the single-driver wrapper around them.

use crate::extensions::easing::Easing;
use crate::extensions::keyframes::KeyframeSequence;
use crate::extensions::pose::{Pose, PoseProperty};
use crate::extensions::spring::PoseSpring;

/// Happy double hop: big bounce, smaller bounce, with a side wobble and scale pulse.
pub fn jump(duration: f32) -> KeyframeSequence {
    KeyframeSequence::new(duration, Easing::EaseInOut)
        .track(PoseProperty::Y, [0.0, -80.0, 0.0, -44.0, 0.0])
        .track(PoseProperty::X, [0.0, 8.0, 0.0, -6.0, 0.0])
        .track(PoseProperty::Rotate, [0.0, -8.0, 0.0, 6.0, 0.0])
        .track(PoseProperty::Scale, [1.0, 1.12, 1.0, 1.06, 1.0])
        .track(PoseProperty::Opacity, [1.0, 1.0, 1.0, 1.0, 1.0])
}

/// Drop in from above, fading in, with a small overshoot before coming to rest.
pub fn settle(duration: f32) -> KeyframeSequence {
    KeyframeSequence::new(duration, Easing::EaseOut)
        .track(PoseProperty::Y, [-80.0, -10.0, 0.0, -6.0, 0.0])
        .track(PoseProperty::Opacity, [0.0, 1.0, 1.0, 1.0, 1.0])
        .track(PoseProperty::Scale, [0.85, 1.05, 0.98, 1.02, 1.0])
        .track(PoseProperty::Rotate, [-10.0, -6.0, 0.0, -2.0, 0.0])
}

/// The one thing moving the penguin at any moment.
#[derive(Debug, Clone)]
pub enum PenguinDriver {
    /// An imperative keyframe sequence (jump or drop-in).
    Sequence(KeyframeSequence),
    /// A reactive spring toward a target pose.
    Spring(PoseSpring),
}

impl PenguinDriver {
    /// Advance. Returns true on the tick a sequence completes; springs never complete.
    pub fn tick(&mut self, dt: f32) -> bool {
        match self {
            PenguinDriver::Sequence(seq) => seq.tick(dt),
            PenguinDriver::Spring(spring) => {
                spring.step(dt);
                false
            }
        }
    }

    pub fn pose(&self) -> Pose {
        match self {
            PenguinDriver::Sequence(seq) => seq.pose(),
            PenguinDriver::Spring(spring) => spring.pose(),
        }
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, PenguinDriver::Sequence(_))
    }
}

/// Pointer feedback layered on the idle penguin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gesture {
    pub hovered: bool,
    pub pressed: bool,
}

impl Gesture {
    pub const HOVER_SCALE: f32 = 1.05;
    pub const HOVER_LIFT: f32 = -4.0;
    pub const PRESS_SCALE: f32 = 0.95;

    pub fn apply(&self, mut pose: Pose) -> Pose {
        if self.hovered {
            pose.y += Self::HOVER_LIFT;
        }
        pose.scale *= if self.pressed {
            Self::PRESS_SCALE
        } else if self.hovered {
            Self::HOVER_SCALE
        } else {
            1.0
        };
        pose
    }
}
