//! Easing curves for floating window animations

use std::f32::consts::PI;

/// Exit animation curve
pub const EXIT_CURVE: CubicBezier = CubicBezier::new(0.17, 0.0, 0.83, 1.0);

/// Dim backdrop fade-in curve
pub const DIM_FADE_CURVE: CubicBezier = CubicBezier::new(0.2, 0.0, 0.0, 1.0);

/// Accelerate then decelerate (cosine ramp)
#[inline]
pub fn accelerate_decelerate(t: f32) -> f32 {
    ((t + 1.0) * PI).cos() / 2.0 + 0.5
}

/// Overshoot past the target then settle back
///
/// `tension` controls how far the curve overshoots; 0.0 degenerates to
/// a plain ease-out.
#[inline]
pub fn overshoot(t: f32, tension: f32) -> f32 {
    let t = t - 1.0;
    t * t * ((tension + 1.0) * t + tension) + 1.0
}

/// Cubic bezier timing curve through (0,0), (x1,y1), (x2,y2), (1,1)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl CubicBezier {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Map linear progress to eased progress
    pub fn ease(&self, x: f32) -> f32 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        let t = self.solve_t(x);
        Self::sample(self.y1, self.y2, t)
    }

    /// Find the curve parameter whose x equals `x`
    fn solve_t(&self, x: f32) -> f32 {
        // Newton-Raphson first, bisection if the slope flattens out
        let mut t = x;
        for _ in 0..8 {
            let err = Self::sample(self.x1, self.x2, t) - x;
            if err.abs() < 1e-6 {
                return t;
            }
            let slope = Self::slope(self.x1, self.x2, t);
            if slope.abs() < 1e-6 {
                break;
            }
            t -= err / slope;
        }

        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        t = x;
        for _ in 0..32 {
            let value = Self::sample(self.x1, self.x2, t);
            if (value - x).abs() < 1e-6 {
                break;
            }
            if value < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        t
    }

    #[inline]
    fn sample(p1: f32, p2: f32, t: f32) -> f32 {
        let u = 1.0 - t;
        3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
    }

    #[inline]
    fn slope(p1: f32, p2: f32, t: f32) -> f32 {
        let u = 1.0 - t;
        3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
    }
}
