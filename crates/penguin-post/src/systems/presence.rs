//! Mount/unmount lifecycle of the letter panel.
//!
//! The panel springs in when shown and springs back out when hidden. Only
//! once the exit motion has settled is it "fully removed", which is the
//! signal the sequencer waits on before the penguin returns.

use crate::extensions::easing::{Easing, ease};
use crate::extensions::spring::{Spring, SpringConfig};

/// Vertical offset of the card while off screen.
pub const HIDDEN_OFFSET: f32 = 80.0;
/// Flap rotation once fully open, in degrees.
pub const FLAP_OPEN_DEG: f32 = -180.0;

/// Where the panel is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceStatus {
    /// Not mounted.
    Absent,
    /// Mounted and springing in.
    Entering,
    /// Mounted and at rest.
    Present,
    /// Still mounted, springing out.
    Exiting,
}

/// Visual state of the panel for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterPose {
    pub y: f32,
    pub opacity: f32,
    /// Flap rotation about X, in degrees.
    pub flap: f32,
}

#[derive(Debug, Clone)]
pub struct LetterPresence {
    status: PresenceStatus,
    y: Spring,
    opacity: Spring,
    flap_elapsed: f32,
    flap_duration: f32,
}

impl LetterPresence {
    pub fn new(spring: SpringConfig, flap_duration: f32) -> Self {
        Self {
            status: PresenceStatus::Absent,
            y: Spring::new(spring, HIDDEN_OFFSET),
            opacity: Spring::new(spring, 0.0).with_rest(Spring::UNIT_REST),
            flap_elapsed: 0.0,
            flap_duration,
        }
    }

    pub fn status(&self) -> PresenceStatus {
        self.status
    }

    pub fn is_mounted(&self) -> bool {
        self.status != PresenceStatus::Absent
    }

    /// Mount (or re-mount mid-exit) and spring in. The flap replays from closed.
    pub fn show(&mut self) {
        if matches!(self.status, PresenceStatus::Entering | PresenceStatus::Present) {
            return;
        }
        if self.status == PresenceStatus::Absent {
            self.y.snap(HIDDEN_OFFSET);
            self.opacity.snap(0.0);
        }
        self.flap_elapsed = 0.0;
        self.y.set_target(0.0);
        self.opacity.set_target(1.0);
        self.status = PresenceStatus::Entering;
    }

    /// Start the exit motion. Returns false if there was nothing to hide.
    pub fn hide(&mut self) -> bool {
        match self.status {
            PresenceStatus::Absent | PresenceStatus::Exiting => false,
            PresenceStatus::Entering | PresenceStatus::Present => {
                self.y.set_target(HIDDEN_OFFSET);
                self.opacity.set_target(0.0);
                self.status = PresenceStatus::Exiting;
                true
            }
        }
    }

    /// Drop straight to Absent without reporting removal.
    /// Used when the host reports the removal itself.
    pub fn force_remove(&mut self) {
        self.status = PresenceStatus::Absent;
        self.y.snap(HIDDEN_OFFSET);
        self.opacity.snap(0.0);
    }

    /// Advance the springs and flap. Returns true on the tick the panel
    /// becomes fully removed.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.status == PresenceStatus::Absent {
            return false;
        }

        self.y.step(dt);
        self.opacity.step(dt);
        if self.status != PresenceStatus::Exiting {
            self.flap_elapsed = (self.flap_elapsed + dt).min(self.flap_duration);
        }

        let settled = self.y.is_settled() && self.opacity.is_settled();
        match self.status {
            PresenceStatus::Entering if settled && self.flap_elapsed >= self.flap_duration => {
                self.status = PresenceStatus::Present;
                false
            }
            PresenceStatus::Exiting if settled => {
                self.status = PresenceStatus::Absent;
                true
            }
            _ => false,
        }
    }

    /// Current pose, or None when not mounted.
    pub fn pose(&self) -> Option<LetterPose> {
        if self.status == PresenceStatus::Absent {
            return None;
        }
        let t = if self.flap_duration <= 0.0 {
            1.0
        } else {
            self.flap_elapsed / self.flap_duration
        };
        Some(LetterPose {
            y: self.y.value(),
            opacity: self.opacity.value().clamp(0.0, 1.0),
            flap: ease(0.0, FLAP_OPEN_DEG, t, Easing::EaseOut),
        })
    }
}
