//! Confetti particles thrown off the penguin while it jumps.
//!
//! The emitter only owns particle data. Expiry is driven from outside: the
//! sequencer schedules one clear timer per spawned batch and calls
//! [`ParticleEmitter::clear`] when any of them fires.

mod palette;
mod rng;

pub use palette::ParticleColor;
pub use rng::Rng;

use std::f32::consts::TAU;

use glam::Vec2;

use crate::extensions::easing::{Easing, lerp};

/// Distance band of the final offset from the emission point.
pub const DISTANCE_RANGE: (f32, f32) = (60.0, 180.0);
/// Extra upward lift applied to every offset.
pub const LIFT_RANGE: (f32, f32) = (60.0, 100.0);
/// Size band before rounding.
pub const SIZE_RANGE: (f32, f32) = (6.0, 20.0);
/// Probability that a particle keeps the sign of cos(angle) instead of mirroring.
pub const KEEP_SIDE_CHANCE: f32 = 0.4;
/// Scale a particle shrinks to by the end of its flight.
pub const END_SCALE: f32 = 0.6;

/// A single confetti particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Unique per spawn.
    pub id: String,
    /// Where the particle ends up, relative to the emission point.
    pub offset: Vec2,
    pub color: ParticleColor,
    pub size: f32,
    /// Seconds since spawn.
    pub age: f32,
    /// Flight duration in seconds.
    pub flight: f32,
}

impl Particle {
    fn progress(&self) -> f32 {
        if self.flight <= 0.0 {
            1.0
        } else {
            (self.age / self.flight).clamp(0.0, 1.0)
        }
    }

    /// Current displacement from the emission point.
    pub fn position(&self) -> Vec2 {
        self.offset * Easing::EaseOut.apply(self.progress())
    }

    pub fn opacity(&self) -> f32 {
        lerp(1.0, 0.0, Easing::EaseOut.apply(self.progress()))
    }

    pub fn scale(&self) -> f32 {
        lerp(1.0, END_SCALE, Easing::EaseOut.apply(self.progress()))
    }
}

/// The live particle collection plus its visibility flag.
#[derive(Debug)]
pub struct ParticleEmitter {
    particles: Vec<Particle>,
    visible: bool,
    rng: Rng,
    flight: f32,
    serial: u64,
}

impl ParticleEmitter {
    pub fn new(seed: u64, flight: f32) -> Self {
        Self {
            particles: Vec::with_capacity(32),
            visible: false,
            rng: Rng::new(seed.wrapping_add(7919)),
            flight,
            serial: 0,
        }
    }

    /// Generate `count` particles and append them. Returns how many were added.
    pub fn spawn(&mut self, count: usize) -> usize {
        for i in 0..count {
            let particle = self.make_particle(i);
            self.particles.push(particle);
        }
        if count > 0 {
            self.visible = true;
            log::debug!("particles: spawned {} ({} live)", count, self.particles.len());
        }
        count
    }

    fn make_particle(&mut self, index: usize) -> Particle {
        let angle = self.rng.next_f32() * TAU;
        let dist = self.rng.range(DISTANCE_RANGE.0, DISTANCE_RANGE.1);
        let side = if self.rng.next_f32() > 1.0 - KEEP_SIDE_CHANCE { 1.0 } else { -1.0 };
        let x = angle.cos() * dist * side;
        let y = angle.sin() * dist - self.rng.range(LIFT_RANGE.0, LIFT_RANGE.1);
        let size = self.rng.range(SIZE_RANGE.0, SIZE_RANGE.1).round();

        self.serial += 1;
        Particle {
            id: format!("{}-{:08x}", self.serial, self.rng.next_u32()),
            offset: Vec2::new(x.round(), y.round()),
            color: ParticleColor::cycle(index),
            size,
            age: 0.0,
            flight: self.flight,
        }
    }

    /// Advance every particle's flight.
    pub fn tick(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.age = (p.age + dt).min(p.flight);
        }
    }

    /// Hide and drop every particle at once.
    pub fn clear(&mut self) {
        self.visible = false;
        self.particles.clear();
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_appends_and_shows() {
        let mut e = ParticleEmitter::new(42, 0.9);
        assert!(!e.is_visible());
        assert_eq!(e.spawn(6), 6);
        assert!(e.is_visible());
        e.spawn(1);
        assert_eq!(e.len(), 7);
    }

    #[test]
    fn spawn_zero_changes_nothing() {
        let mut e = ParticleEmitter::new(42, 0.9);
        e.spawn(0);
        assert!(!e.is_visible());
        assert!(e.is_empty());
    }

    #[test]
    fn colors_cycle_within_a_batch() {
        let mut e = ParticleEmitter::new(1, 0.9);
        e.spawn(6);
        let colors: Vec<_> = e.particles().iter().map(|p| p.color).collect();
        assert_eq!(colors[0], ParticleColor::Sunflower);
        assert_eq!(colors[4], ParticleColor::Sunflower);
        assert_eq!(colors[5], ParticleColor::Mint);
        // A single trail particle always starts the palette over.
        e.spawn(1);
        assert_eq!(e.particles()[6].color, ParticleColor::Sunflower);
    }

    #[test]
    fn offsets_and_sizes_stay_in_band() {
        let mut e = ParticleEmitter::new(5, 0.9);
        e.spawn(500);
        for p in e.particles() {
            assert!((6.0..=20.0).contains(&p.size), "size {}", p.size);
            assert_eq!(p.size, p.size.round());
            assert!(p.offset.x.abs() <= 180.0, "x {}", p.offset.x);
            // sin * dist in [-180, 180], minus a lift in [60, 100).
            assert!(p.offset.y <= 120.0 && p.offset.y >= -280.0, "y {}", p.offset.y);
        }
    }

    #[test]
    fn mirroring_populates_both_sides() {
        // cos is symmetric, so mirroring keeps both sides populated.
        let mut e = ParticleEmitter::new(11, 0.9);
        e.spawn(2000);
        let right = e.particles().iter().filter(|p| p.offset.x > 0.0).count();
        assert!(right > 600 && right < 1400, "right-side count {}", right);
    }

    #[test]
    fn ids_are_unique() {
        let mut e = ParticleEmitter::new(3, 0.9);
        e.spawn(50);
        let mut ids: Vec<_> = e.particles().iter().map(|p| p.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn clear_drops_everything_together() {
        let mut e = ParticleEmitter::new(3, 0.9);
        e.spawn(6);
        e.spawn(1);
        e.clear();
        assert!(e.is_empty());
        assert!(!e.is_visible());
    }

    #[test]
    fn flight_moves_out_and_fades() {
        let mut e = ParticleEmitter::new(3, 0.9);
        e.spawn(1);
        let start = e.particles()[0].clone();
        assert_eq!(start.position(), Vec2::ZERO);
        assert_eq!(start.opacity(), 1.0);

        e.tick(0.9);
        let end = &e.particles()[0];
        assert!((end.position() - end.offset).length() < 1e-3);
        assert!(end.opacity().abs() < 1e-5);
        assert!((end.scale() - END_SCALE).abs() < 1e-5);

        // Age never runs past the flight.
        e.tick(5.0);
        assert_eq!(e.particles()[0].age, 0.9);
    }
}
