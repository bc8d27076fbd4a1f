// extensions/easing.rs
//
// Easing curves for keyframe segments.
// The CSS-style curves (EaseIn/EaseOut/EaseInOut) are cubic beziers solved
// numerically; the rest are closed-form.

use std::f32::consts::PI;

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant velocity (no easing).
    #[default]
    Linear,
    /// CSS `ease-in`: cubic-bezier(0.42, 0, 1, 1).
    EaseIn,
    /// CSS `ease-out`: cubic-bezier(0, 0, 0.58, 1).
    EaseOut,
    /// CSS `ease-in-out`: cubic-bezier(0.42, 0, 0.58, 1).
    EaseInOut,
    QuadOut,
    CubicOut,
    SineInOut,
    /// Overshoot then settle.
    BackOut,
    /// Arbitrary cubic bezier with control points (x1, y1, x2, y2).
    Bezier(f32, f32, f32, f32),
}

impl Easing {
    /// Apply the easing function to a normalized time value `t` in [0, 1].
    /// Returns the eased value, also typically in [0, 1] (BackOut overshoots).
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => CubicBezier::new(0.42, 0.0, 1.0, 1.0).solve(t),
            Easing::EaseOut => CubicBezier::new(0.0, 0.0, 0.58, 1.0).solve(t),
            Easing::EaseInOut => CubicBezier::new(0.42, 0.0, 0.58, 1.0).solve(t),
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Easing::BackOut => {
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
            Easing::Bezier(x1, y1, x2, y2) => CubicBezier::new(x1, y1, x2, y2).solve(t),
        }
    }
}

/// Unit cubic bezier with fixed endpoints (0,0) and (1,1).
#[derive(Debug, Clone, Copy)]
pub struct CubicBezier {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl CubicBezier {
    const NEWTON_ITERATIONS: usize = 8;
    const BISECT_ITERATIONS: usize = 24;
    const PRECISION: f32 = 1e-6;

    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x1: x1.clamp(0.0, 1.0),
            y1,
            x2: x2.clamp(0.0, 1.0),
            y2,
        }
    }

    #[inline]
    fn component(a1: f32, a2: f32, s: f32) -> f32 {
        // B(s) = 3(1-s)^2 s a1 + 3(1-s) s^2 a2 + s^3
        let inv = 1.0 - s;
        3.0 * inv * inv * s * a1 + 3.0 * inv * s * s * a2 + s * s * s
    }

    #[inline]
    fn slope(a1: f32, a2: f32, s: f32) -> f32 {
        let inv = 1.0 - s;
        3.0 * inv * inv * a1 + 6.0 * inv * s * (a2 - a1) + 3.0 * s * s * (1.0 - a2)
    }

    /// Find the curve parameter whose x equals `x`.
    fn param_for_x(&self, x: f32) -> f32 {
        let mut s = x;
        for _ in 0..Self::NEWTON_ITERATIONS {
            let err = Self::component(self.x1, self.x2, s) - x;
            if err.abs() < Self::PRECISION {
                return s;
            }
            let d = Self::slope(self.x1, self.x2, s);
            if d.abs() < 1e-6 {
                break;
            }
            s -= err / d;
        }

        // Newton stalled; fall back to bisection on [0, 1].
        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        s = x;
        for _ in 0..Self::BISECT_ITERATIONS {
            let cur = Self::component(self.x1, self.x2, s);
            if (cur - x).abs() < Self::PRECISION {
                break;
            }
            if cur < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) * 0.5;
        }
        s
    }

    /// Eased progress for normalized time `x`.
    pub fn solve(&self, x: f32) -> f32 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        Self::component(self.y1, self.y2, self.param_for_x(x))
    }
}

// ── Interpolation helpers ────────────────────────────────────────────────

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_endpoints() {
        assert_eq!(Easing::Linear.apply(0.0), 0.0);
        assert_eq!(Easing::Linear.apply(1.0), 1.0);
        assert_eq!(Easing::Linear.apply(0.5), 0.5);
    }

    #[test]
    fn bezier_curves_hit_endpoints() {
        for e in [Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            assert_eq!(e.apply(0.0), 0.0);
            assert_eq!(e.apply(1.0), 1.0);
        }
    }

    #[test]
    fn ease_in_out_is_symmetric() {
        let a = Easing::EaseInOut.apply(0.25);
        let b = Easing::EaseInOut.apply(0.75);
        assert!((a + b - 1.0).abs() < 1e-3, "got {} and {}", a, b);
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-3);
    }

    #[test]
    fn ease_out_front_loads_progress() {
        let mid = Easing::EaseOut.apply(0.5);
        assert!(mid > 0.5, "EaseOut at 0.5 should be > 0.5, got {}", mid);
    }

    #[test]
    fn bezier_is_monotonic_for_css_curves() {
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = Easing::EaseInOut.apply(i as f32 / 100.0);
            assert!(v + 1e-4 >= prev, "dropped at step {}", i);
            prev = v;
        }
    }

    #[test]
    fn back_overshoots() {
        let early = Easing::BackOut.apply(0.3);
        assert!(early > 0.3, "BackOut should overshoot");
    }

    #[test]
    fn ease_interpolates() {
        let result = ease(100.0, 200.0, 0.5, Easing::Linear);
        assert!((result - 150.0).abs() < 0.001);
    }
}
