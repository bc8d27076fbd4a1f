// extensions/mod.rs
//
// Animation primitives: easing curves, poses, keyframe sequences and springs.
// Nothing in here knows about the card's state machine.

pub mod easing;
pub mod keyframes;
pub mod pose;
pub mod spring;

pub use easing::{Easing, CubicBezier, lerp, ease};
pub use keyframes::{KeyframeSequence, KeyframeTrack};
pub use pose::{Pose, PoseProperty};
pub use spring::{Spring, SpringConfig, PoseSpring};
