//! Static engine configuration
//!
//! Dimensions and timings that depend on the device rather than on user
//! choice. Loaded once at startup; user-facing options live in
//! [`crate::settings`].

use serde::{Deserialize, Serialize};

use crate::error::FloatResult;

/// Edge drag-handle dimensions, in pixels at scale 1.0
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeBarMetrics {
    pub width: f32,
    pub height: f32,
    pub radius: f32,
    /// Gap between the window and the handle
    pub margin: f32,
}

impl Default for EdgeBarMetrics {
    fn default() -> Self {
        Self {
            width: 120.0,
            height: 12.0,
            radius: 6.0,
            margin: 16.0,
        }
    }
}

/// Dismiss target dimensions, in pixels
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DismissMetrics {
    pub button_width: f32,
    pub button_height: f32,
    /// Distance from the top of the stable area to the button
    pub top_margin: f32,
    /// Extra hit area left and right of the button
    pub padding_width: f32,
    /// Extra hit area below the button
    pub padding_height: f32,
}

impl Default for DismissMetrics {
    fn default() -> Self {
        Self {
            button_width: 360.0,
            button_height: 120.0,
            top_margin: 96.0,
            padding_width: 48.0,
            padding_height: 64.0,
        }
    }
}

/// Engine configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub mini_corner_radius: f32,
    pub pinned_corner_radius: f32,
    pub edge_bar: EdgeBarMetrics,
    pub dismiss: DismissMetrics,
    /// Pointer travel before a press becomes a drag
    pub touch_slop: f32,
    /// Delay between the exit animation and leaving the floating mode
    pub exit_delay_ms: u32,
    /// Animation frame interval
    pub frame_interval_ms: u32,
    /// Dim backdrop opacity behind mini windows
    pub dim_amount: f32,
    pub double_tap_timeout_ms: u32,
    pub long_press_timeout_ms: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mini_corner_radius: 24.0,
            pinned_corner_radius: 16.0,
            edge_bar: EdgeBarMetrics::default(),
            dismiss: DismissMetrics::default(),
            touch_slop: 24.0,
            exit_delay_ms: 200,
            frame_interval_ms: 16,
            dim_amount: 0.4,
            double_tap_timeout_ms: 300,
            long_press_timeout_ms: 500,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> FloatResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the configuration to JSON
    pub fn to_json(&self) -> FloatResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_partial_json() {
        let config = EngineConfig::from_json(r#"{"touch_slop": 8.0, "edge_bar": {"width": 90.0}}"#)
            .unwrap();
        assert!((config.touch_slop - 8.0).abs() < 0.001);
        assert!((config.edge_bar.width - 90.0).abs() < 0.001);
        assert!((config.edge_bar.height - 12.0).abs() < 0.001);
        assert_eq!(config.exit_delay_ms, 200);
    }

    #[test]
    fn test_config_invalid_json() {
        assert!(EngineConfig::from_json("{touch_slop").is_err());
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = EngineConfig::default();
        let parsed = EngineConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
