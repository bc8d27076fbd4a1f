// extensions/keyframes.rs
//
// Declarative keyframe playback.
// A track is a list of values spread evenly across the sequence duration;
// each segment between neighbouring keyframes is eased independently.
//
// Usage:
//   let mut seq = KeyframeSequence::new(0.9, Easing::EaseInOut)
//       .track(PoseProperty::Y, [0.0, -80.0, 0.0]);
//   if seq.tick(dt) { /* completed this frame */ }
//   let pose = seq.pose();

use super::easing::{Easing, ease};
use super::pose::{Pose, PoseProperty};

/// Completion tolerance for accumulated frame steps.
const FINISH_EPSILON: f32 = 1e-4;

/// Keyframe values for one property.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeTrack {
    pub property: PoseProperty,
    pub values: Vec<f32>,
}

impl KeyframeTrack {
    pub fn new(property: PoseProperty, values: impl Into<Vec<f32>>) -> Self {
        Self { property, values: values.into() }
    }

    /// Sample the track at normalized progress `t` in [0, 1].
    /// Returns None for an empty track.
    pub fn sample(&self, t: f32, easing: Easing) -> Option<f32> {
        let n = self.values.len();
        match n {
            0 => None,
            1 => Some(self.values[0]),
            _ => {
                let t = t.clamp(0.0, 1.0);
                let segments = (n - 1) as f32;
                let scaled = t * segments;
                let idx = (scaled.floor() as usize).min(n - 2);
                let local = scaled - idx as f32;
                Some(ease(self.values[idx], self.values[idx + 1], local, easing))
            }
        }
    }

    pub fn first(&self) -> Option<f32> {
        self.values.first().copied()
    }

    pub fn last(&self) -> Option<f32> {
        self.values.last().copied()
    }
}

/// A multi-property keyframe animation with a shared duration and easing.
#[derive(Debug, Clone)]
pub struct KeyframeSequence {
    /// Pose used for any property without a track.
    pub base: Pose,
    pub tracks: Vec<KeyframeTrack>,
    /// Duration in seconds.
    pub duration: f32,
    /// Elapsed time in seconds.
    pub elapsed: f32,
    pub easing: Easing,
    finished: bool,
}

impl KeyframeSequence {
    pub fn new(duration: f32, easing: Easing) -> Self {
        Self {
            base: Pose::IDLE,
            tracks: Vec::new(),
            duration,
            elapsed: 0.0,
            easing,
            finished: false,
        }
    }

    // -- Builder methods --

    pub fn with_base(mut self, base: Pose) -> Self {
        self.base = base;
        self
    }

    /// Add (or replace) the track for `property`.
    pub fn track(mut self, property: PoseProperty, values: impl Into<Vec<f32>>) -> Self {
        self.tracks.retain(|t| t.property != property);
        self.tracks.push(KeyframeTrack::new(property, values));
        self
    }

    /// Normalized progress [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.finished
    }

    /// Advance playback. Returns true only on the tick the sequence finishes.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.finished {
            return false;
        }
        if dt.is_finite() {
            self.elapsed += dt.max(0.0);
        }
        if self.elapsed + FINISH_EPSILON >= self.duration {
            self.elapsed = self.duration;
            self.finished = true;
            return true;
        }
        false
    }

    /// Current pose.
    pub fn pose(&self) -> Pose {
        self.sample(self.progress())
    }

    /// Pose at normalized progress `t`.
    pub fn sample(&self, t: f32) -> Pose {
        let mut pose = self.base;
        for track in &self.tracks {
            if let Some(v) = track.sample(t, self.easing) {
                pose.set(track.property, v);
            }
        }
        pose
    }

    /// Pose once the sequence has finished.
    pub fn final_pose(&self) -> Pose {
        let mut pose = self.base;
        for track in &self.tracks {
            if let Some(v) = track.last() {
                pose.set(track.property, v);
            }
        }
        pose
    }

    /// Restart from the beginning.
    pub fn restart(&mut self) {
        self.elapsed = 0.0;
        self.finished = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_hits_each_keyframe_at_its_offset() {
        let track = KeyframeTrack::new(PoseProperty::Y, [0.0, -80.0, 0.0, -44.0, 0.0]);
        let expect = [0.0, -80.0, 0.0, -44.0, 0.0];
        for (i, want) in expect.iter().enumerate() {
            let t = i as f32 / 4.0;
            let got = track.sample(t, Easing::EaseInOut).unwrap();
            assert!((got - want).abs() < 1e-3, "t={} got {} want {}", t, got, want);
        }
    }

    #[test]
    fn track_eases_each_segment() {
        let track = KeyframeTrack::new(PoseProperty::X, [0.0, 10.0, 0.0]);
        // Midway through the first segment of a linear track is exactly half.
        let v = track.sample(0.25, Easing::Linear).unwrap();
        assert!((v - 5.0).abs() < 1e-4);
        // EaseOut front-loads the segment.
        let v = track.sample(0.25, Easing::EaseOut).unwrap();
        assert!(v > 5.0);
    }

    #[test]
    fn single_and_empty_tracks() {
        assert_eq!(KeyframeTrack::new(PoseProperty::Scale, [2.0]).sample(0.7, Easing::Linear), Some(2.0));
        assert_eq!(KeyframeTrack::new(PoseProperty::Scale, Vec::new()).sample(0.7, Easing::Linear), None);
    }

    #[test]
    fn sequence_reports_completion_once() {
        let mut seq = KeyframeSequence::new(1.0, Easing::Linear)
            .track(PoseProperty::X, [0.0, 100.0]);

        assert!(!seq.tick(0.5));
        assert!((seq.pose().x - 50.0).abs() < 0.01);

        assert!(seq.tick(0.5));
        assert!(seq.is_complete());
        assert!((seq.pose().x - 100.0).abs() < 0.01);

        assert!(!seq.tick(0.5), "completion must only be reported once");
    }

    #[test]
    fn untracked_properties_hold_base() {
        let seq = KeyframeSequence::new(1.0, Easing::Linear)
            .with_base(Pose::PERCHED)
            .track(PoseProperty::Opacity, [0.0, 1.0]);
        let p = seq.sample(0.5);
        assert_eq!(p.x, Pose::PERCHED.x);
        assert!((p.opacity - 0.5).abs() < 1e-4);
    }

    #[test]
    fn track_replaced_not_duplicated() {
        let seq = KeyframeSequence::new(1.0, Easing::Linear)
            .track(PoseProperty::Y, [0.0, 1.0])
            .track(PoseProperty::Y, [5.0, 6.0]);
        assert_eq!(seq.tracks.len(), 1);
        assert_eq!(seq.final_pose().y, 6.0);
    }

    #[test]
    fn non_finite_or_negative_steps_do_not_stall() {
        let mut seq = KeyframeSequence::new(0.5, Easing::Linear)
            .track(PoseProperty::X, [0.0, 10.0]);
        assert!(!seq.tick(f32::NAN));
        assert!(!seq.tick(-1.0));
        assert_eq!(seq.elapsed, 0.0);
        assert!(seq.tick(0.5));
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let mut seq = KeyframeSequence::new(0.0, Easing::Linear)
            .track(PoseProperty::X, [0.0, 3.0]);
        assert!(seq.tick(0.0));
        assert_eq!(seq.pose().x, 3.0);
    }
}
