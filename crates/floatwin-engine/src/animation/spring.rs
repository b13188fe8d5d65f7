//! Damped spring simulation for fling settling
//!
//! Each axis is a damped harmonic oscillator pulled toward its target.
//! The state is advanced with the closed-form solution from the current
//! displacement and velocity, so any frame interval is stable.

use crate::math::{Size, Vec2};
use super::session::SurfaceFrame;
use super::{SPRING_DAMPING_RATIO, SPRING_STIFFNESS};

/// Displacement below which an axis counts as settled, in pixels
const DISPLACEMENT_THRESHOLD: f32 = 0.75;
/// Speed below which an axis counts as settled, in pixels per second
const VELOCITY_THRESHOLD: f32 = 46.875;

/// One axis of a spring
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringAxis {
    pub position: f32,
    /// Pixels per second
    pub velocity: f32,
    pub target: f32,
    stiffness: f32,
    damping_ratio: f32,
}

impl SpringAxis {
    /// Create an axis with the fling stiffness and damping
    pub fn new(position: f32, velocity: f32, target: f32) -> Self {
        Self::with_params(position, velocity, target, SPRING_STIFFNESS, SPRING_DAMPING_RATIO)
    }

    pub fn with_params(
        position: f32,
        velocity: f32,
        target: f32,
        stiffness: f32,
        damping_ratio: f32,
    ) -> Self {
        Self {
            position,
            velocity,
            target,
            stiffness,
            damping_ratio,
        }
    }

    /// Check if the axis has come to rest on its target
    #[inline]
    pub fn is_settled(&self) -> bool {
        (self.position - self.target).abs() < DISPLACEMENT_THRESHOLD
            && self.velocity.abs() < VELOCITY_THRESHOLD
    }

    /// Advance the axis by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let omega = self.stiffness.sqrt();
        let zeta = self.damping_ratio;
        let x0 = self.position - self.target;
        let v0 = self.velocity;

        let (x, v) = if zeta < 1.0 {
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let decay = (-zeta * omega * dt).exp();
            let a = x0;
            let b = (zeta * omega * x0 + v0) / omega_d;
            let (sin, cos) = (omega_d * dt).sin_cos();
            let x = decay * (a * cos + b * sin);
            let v = decay
                * ((b * omega_d - zeta * omega * a) * cos - (a * omega_d + zeta * omega * b) * sin);
            (x, v)
        } else if (zeta - 1.0).abs() < f32::EPSILON {
            let decay = (-omega * dt).exp();
            let b = v0 + omega * x0;
            let x = decay * (x0 + b * dt);
            let v = decay * (b - omega * (x0 + b * dt));
            (x, v)
        } else {
            let root = omega * (zeta * zeta - 1.0).sqrt();
            let r1 = -zeta * omega + root;
            let r2 = -zeta * omega - root;
            let c2 = (r1 * x0 - v0) / (r1 - r2);
            let c1 = x0 - c2;
            let (e1, e2) = ((r1 * dt).exp(), (r2 * dt).exp());
            (c1 * e1 + c2 * e2, c1 * r1 * e1 + c2 * r2 * e2)
        };

        self.position = self.target + x;
        self.velocity = v;
        if self.is_settled() {
            self.position = self.target;
            self.velocity = 0.0;
        }
    }
}

/// Two-axis spring carrying a surface from its release point to its snap position
///
/// Scale, crop and corner radius are held fixed; only the position moves.
#[derive(Clone, Debug, PartialEq)]
pub struct SpringFling {
    pub x: SpringAxis,
    pub y: SpringAxis,
    base: SurfaceFrame,
    last_ms: Option<f64>,
}

impl SpringFling {
    /// Create a fling from `from` to `to`, seeded with the release velocity
    pub fn new(base: SurfaceFrame, from: Vec2, to: Vec2, velocity: Vec2) -> Self {
        Self {
            x: SpringAxis::new(from.x, velocity.x, to.x),
            y: SpringAxis::new(from.y, velocity.y, to.y),
            base,
            last_ms: None,
        }
    }

    /// Crop held during the fling
    pub fn crop(&self) -> Size {
        self.base.crop
    }

    /// Advance to `now_ms`, returning the frame and whether both axes settled
    pub fn advance(&mut self, now_ms: f64) -> (SurfaceFrame, bool) {
        if let Some(last) = self.last_ms {
            let dt = ((now_ms - last) / 1000.0) as f32;
            self.x.step(dt);
            self.y.step(dt);
        }
        self.last_ms = Some(now_ms);
        let frame = SurfaceFrame {
            position: Vec2::new(self.x.position, self.y.position),
            ..self.base
        };
        (frame, self.x.is_settled() && self.y.is_settled())
    }
}
