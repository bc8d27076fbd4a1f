// extensions/pose.rs
//
// The set of animatable properties on the penguin.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use super::easing::lerp;

/// A full visual pose: translation, rotation (degrees), uniform scale and opacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    pub rotate: f32,
    pub scale: f32,
    pub opacity: f32,
}

impl Pose {
    /// Neutral resting pose.
    pub const IDLE: Pose = Pose { x: 0.0, y: 0.0, rotate: 0.0, scale: 1.0, opacity: 1.0 };

    /// Sitting off to the side of the opened letter.
    pub const PERCHED: Pose = Pose { x: 18.0, y: -40.0, rotate: -6.0, scale: 1.0, opacity: 1.0 };

    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn lerp(&self, other: &Pose, t: f32) -> Pose {
        Pose {
            x: lerp(self.x, other.x, t),
            y: lerp(self.y, other.y, t),
            rotate: lerp(self.rotate, other.rotate, t),
            scale: lerp(self.scale, other.scale, t),
            opacity: lerp(self.opacity, other.opacity, t),
        }
    }

    /// Read a single property.
    pub fn get(&self, prop: PoseProperty) -> f32 {
        match prop {
            PoseProperty::X => self.x,
            PoseProperty::Y => self.y,
            PoseProperty::Rotate => self.rotate,
            PoseProperty::Scale => self.scale,
            PoseProperty::Opacity => self.opacity,
        }
    }

    /// Write a single property.
    pub fn set(&mut self, prop: PoseProperty, value: f32) {
        match prop {
            PoseProperty::X => self.x = value,
            PoseProperty::Y => self.y = value,
            PoseProperty::Rotate => self.rotate = value,
            PoseProperty::Scale => self.scale = value,
            PoseProperty::Opacity => self.opacity = value,
        }
    }

    /// Approximate equality, used by tests and settle checks.
    pub fn approx_eq(&self, other: &Pose, eps: f32) -> bool {
        PoseProperty::ALL
            .iter()
            .all(|&p| (self.get(p) - other.get(p)).abs() <= eps)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDLE
    }
}

/// Addressable pose properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoseProperty {
    X,
    Y,
    Rotate,
    Scale,
    Opacity,
}

impl PoseProperty {
    pub const ALL: [PoseProperty; 5] = [
        Self::X, Self::Y, Self::Rotate, Self::Scale, Self::Opacity,
    ];
}
