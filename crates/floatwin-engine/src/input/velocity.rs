//! Pointer velocity estimation

use std::collections::VecDeque;

use crate::math::Vec2;

/// Samples older than this (relative to the newest) are ignored
pub const VELOCITY_HORIZON_MS: f64 = 100.0;

const MAX_SAMPLES: usize = 20;

/// Least-squares velocity tracker over recent pointer samples
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    samples: VecDeque<(f64, Vec2)>,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all samples
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Add a sample; samples must arrive in time order
    pub fn add(&mut self, time_ms: f64, position: Vec2) {
        if let Some(&(last, _)) = self.samples.back() {
            if time_ms < last {
                self.samples.clear();
            }
        }
        if self.samples.len() == MAX_SAMPLES {
            self.samples.pop_front();
        }
        self.samples.push_back((time_ms, position));
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Current velocity in pixels per second, each axis capped to `±max`
    ///
    /// Fits a line through the samples inside the horizon; fewer than two
    /// samples, or samples sharing one timestamp, give zero.
    pub fn velocity(&self, max: f32) -> Vec2 {
        let Some(&(newest, _)) = self.samples.back() else {
            return Vec2::ZERO;
        };
        let window: Vec<(f64, Vec2)> = self
            .samples
            .iter()
            .filter(|(t, _)| newest - *t <= VELOCITY_HORIZON_MS)
            .copied()
            .collect();
        if window.len() < 2 {
            return Vec2::ZERO;
        }

        let n = window.len() as f64;
        let mean_t = window.iter().map(|(t, _)| *t).sum::<f64>() / n;
        let mean_x = window.iter().map(|(_, p)| p.x as f64).sum::<f64>() / n;
        let mean_y = window.iter().map(|(_, p)| p.y as f64).sum::<f64>() / n;

        let mut var_t = 0.0;
        let mut cov_x = 0.0;
        let mut cov_y = 0.0;
        for (t, p) in &window {
            let dt = t - mean_t;
            var_t += dt * dt;
            cov_x += dt * (p.x as f64 - mean_x);
            cov_y += dt * (p.y as f64 - mean_y);
        }
        if var_t <= f64::EPSILON {
            return Vec2::ZERO;
        }

        // Slopes are in px/ms
        let max = max.abs();
        Vec2::new(
            ((cov_x / var_t * 1000.0) as f32).clamp(-max, max),
            ((cov_y / var_t * 1000.0) as f32).clamp(-max, max),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_velocity() {
        let mut tracker = VelocityTracker::new();
        for i in 0..6 {
            let t = i as f64 * 10.0;
            tracker.add(t, Vec2::new(i as f32 * 10.0, i as f32 * -5.0));
        }
        let v = tracker.velocity(8000.0);
        assert!((v.x - 1000.0).abs() < 0.5);
        assert!((v.y + 500.0).abs() < 0.5);
    }

    #[test]
    fn test_old_samples_ignored() {
        let mut tracker = VelocityTracker::new();
        tracker.add(0.0, Vec2::new(0.0, 0.0));
        tracker.add(10.0, Vec2::new(500.0, 0.0));
        // Long pause, then slow movement
        tracker.add(500.0, Vec2::new(500.0, 0.0));
        tracker.add(550.0, Vec2::new(505.0, 0.0));
        let v = tracker.velocity(8000.0);
        assert!((v.x - 100.0).abs() < 0.5);
    }

    #[test]
    fn test_velocity_capped() {
        let mut tracker = VelocityTracker::new();
        tracker.add(0.0, Vec2::new(0.0, 0.0));
        tracker.add(10.0, Vec2::new(0.0, 1000.0));
        let v = tracker.velocity(8000.0);
        assert!((v.y - 8000.0).abs() < 0.001);
    }

    #[test]
    fn test_single_sample_is_zero() {
        let mut tracker = VelocityTracker::new();
        assert_eq!(tracker.velocity(8000.0), Vec2::ZERO);
        tracker.add(0.0, Vec2::new(3.0, 4.0));
        assert_eq!(tracker.velocity(8000.0), Vec2::ZERO);
    }

    #[test]
    fn test_sample_limit() {
        let mut tracker = VelocityTracker::new();
        for i in 0..50 {
            tracker.add(i as f64, Vec2::new(i as f32, 0.0));
        }
        assert_eq!(tracker.sample_count(), MAX_SAMPLES);
    }
}
