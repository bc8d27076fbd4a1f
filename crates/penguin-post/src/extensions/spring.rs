// extensions/spring.rs
//
// RK4-integrated springs for reactive "animate to target" motion.

use super::pose::{Pose, PoseProperty};

/// Physical parameters of a spring.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self { stiffness, damping, mass }
    }

    /// Default pose transition of the penguin.
    pub fn penguin() -> Self {
        Self::new(380.0, 28.0, 1.0)
    }

    /// Slow, soft spring used for the letter card entering and leaving.
    pub fn letter() -> Self {
        Self::new(90.0, 18.0, 1.0)
    }

    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::penguin()
    }
}

/// A single spring-driven value.
#[derive(Debug, Clone, Copy)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
    rest_delta: f32,
    rest_speed: f32,
}

impl Spring {
    /// Thresholds suited to pixel-scale values.
    pub const PIXEL_REST: (f32, f32) = (0.5, 5.0);
    /// Thresholds suited to unit-scale values (opacity, scale).
    pub const UNIT_REST: (f32, f32) = (0.01, 0.05);

    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
            rest_delta: Self::PIXEL_REST.0,
            rest_speed: Self::PIXEL_REST.1,
        }
    }

    pub fn with_rest(mut self, (delta, speed): (f32, f32)) -> Self {
        self.rest_delta = delta;
        self.rest_speed = speed;
        self
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump straight to `value` with no motion.
    pub fn snap(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < self.rest_delta && self.velocity.abs() < self.rest_speed
    }

    /// Step the simulation. Settled springs snap exactly onto their target.
    pub fn step(&mut self, dt: f32) {
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return;
        }

        let k1_v = self.acceleration(self.value, self.velocity);
        let k1_x = self.velocity;

        let k2_v = self.acceleration(self.value + k1_x * dt * 0.5, self.velocity + k1_v * dt * 0.5);
        let k2_x = self.velocity + k1_v * dt * 0.5;

        let k3_v = self.acceleration(self.value + k2_x * dt * 0.5, self.velocity + k2_v * dt * 0.5);
        let k3_x = self.velocity + k2_v * dt * 0.5;

        let k4_v = self.acceleration(self.value + k3_x * dt, self.velocity + k3_v * dt);
        let k4_x = self.velocity + k3_v * dt;

        self.velocity += (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) * dt / 6.0;
        self.value += (k1_x + 2.0 * k2_x + 2.0 * k3_x + k4_x) * dt / 6.0;

        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
        }
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let spring_force = -self.config.stiffness * (x - self.target);
        let damping_force = -self.config.damping * v;
        (spring_force + damping_force) / self.config.mass
    }
}

/// One spring per pose property, all sharing a config.
#[derive(Debug, Clone)]
pub struct PoseSpring {
    springs: [Spring; 5],
}

impl PoseSpring {
    /// Start at rest on `from`, heading for `target`.
    pub fn new(config: SpringConfig, from: Pose, target: Pose) -> Self {
        let springs = PoseProperty::ALL.map(|prop| {
            let rest = match prop {
                PoseProperty::Scale | PoseProperty::Opacity => Spring::UNIT_REST,
                PoseProperty::X | PoseProperty::Y | PoseProperty::Rotate => Spring::PIXEL_REST,
            };
            let mut s = Spring::new(config, from.get(prop)).with_rest(rest);
            s.set_target(target.get(prop));
            s
        });
        Self { springs }
    }

    /// Already at rest on `pose`.
    pub fn resting(config: SpringConfig, pose: Pose) -> Self {
        Self::new(config, pose, pose)
    }

    pub fn retarget(&mut self, target: Pose) {
        for (spring, prop) in self.springs.iter_mut().zip(PoseProperty::ALL) {
            spring.set_target(target.get(prop));
        }
    }

    pub fn step(&mut self, dt: f32) {
        for spring in &mut self.springs {
            spring.step(dt);
        }
    }

    pub fn pose(&self) -> Pose {
        let mut pose = Pose::IDLE;
        for (spring, prop) in self.springs.iter().zip(PoseProperty::ALL) {
            pose.set(prop, spring.value());
        }
        pose
    }

    pub fn target(&self) -> Pose {
        let mut pose = Pose::IDLE;
        for (spring, prop) in self.springs.iter().zip(PoseProperty::ALL) {
            pose.set(prop, spring.target());
        }
        pose
    }

    pub fn is_settled(&self) -> bool {
        self.springs.iter().all(Spring::is_settled)
    }
}
