//! Simulation settings
//!
//! Static configuration read once before the world is built. Partial JSON
//! documents are accepted; missing fields fall back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors raised while loading or validating settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("initial side count must be at least 3, got {0}")]
    TooFewSides(u32),
    #[error("{field} must be {requirement}, got {value}")]
    OutOfRange {
        field: &'static str,
        requirement: &'static str,
        value: f32,
    },
    #[error("max speed {max_speed} must exceed initial speed {initial_speed}")]
    MaxSpeedTooLow { max_speed: f32, initial_speed: f32 },
    #[error("viewport must have a positive size, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Side count of the polygon at startup
    pub initial_sides: u32,
    /// Ball radius in length units
    pub ball_radius: f32,
    /// Ball speed at startup (units/s)
    pub initial_speed: f32,
    /// Speed multiplier applied on every bounce
    pub speed_gain: f32,
    /// Ceiling on ball speed after a bounce
    pub max_speed: f32,
    /// Polygon circumradius as a fraction of the smaller viewport side
    pub radius_ratio: f32,
    /// Largest distance per sub-step, as a fraction of the ball radius
    pub step_fraction: f32,
    /// Frame deltas above this many seconds are clamped
    pub max_frame_dt: f32,
    /// Number of positions kept in the trail
    pub trail_length: usize,
    /// Slack allowed between the ball and a segment when confirming a hit
    pub contact_tolerance: f32,
    /// Seed for the initial launch direction
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_sides: 3,
            ball_radius: BALL_RADIUS,
            initial_speed: BALL_START_SPEED,
            speed_gain: SPEED_GAIN,
            max_speed: BALL_MAX_SPEED,
            radius_ratio: POLYGON_RADIUS_RATIO,
            step_fraction: STEP_FRACTION,
            max_frame_dt: MAX_FRAME_DT,
            trail_length: TRAIL_LENGTH,
            contact_tolerance: CONTACT_TOLERANCE,
            seed: 0,
        }
    }
}

fn check(
    field: &'static str,
    requirement: &'static str,
    value: f32,
    ok: impl Fn(f32) -> bool,
) -> Result<(), SettingsError> {
    if value.is_finite() && ok(value) {
        Ok(())
    } else {
        Err(SettingsError::OutOfRange {
            field,
            requirement,
            value,
        })
    }
}

impl Settings {
    /// Parse settings from a JSON document and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.initial_sides < 3 {
            return Err(SettingsError::TooFewSides(self.initial_sides));
        }
        check("ball_radius", "positive", self.ball_radius, |v| v > 0.0)?;
        check("initial_speed", "positive", self.initial_speed, |v| v > 0.0)?;
        check("speed_gain", "positive", self.speed_gain, |v| v > 0.0)?;
        check("max_speed", "positive", self.max_speed, |v| v > 0.0)?;
        if self.max_speed <= self.initial_speed {
            return Err(SettingsError::MaxSpeedTooLow {
                max_speed: self.max_speed,
                initial_speed: self.initial_speed,
            });
        }
        check("radius_ratio", "in (0, 1]", self.radius_ratio, |v| {
            v > 0.0 && v <= 1.0
        })?;
        check("step_fraction", "positive", self.step_fraction, |v| v > 0.0)?;
        check("max_frame_dt", "positive", self.max_frame_dt, |v| v > 0.0)?;
        check(
            "contact_tolerance",
            "non-negative",
            self.contact_tolerance,
            |v| v >= 0.0,
        )?;
        if self.speed_gain < 1.0 {
            log::warn!(
                "speed_gain {} is below 1, the ball will slow down on every bounce",
                self.speed_gain
            );
        }
        Ok(())
    }

    /// Largest distance the ball may travel in one sub-step
    pub fn max_step_distance(&self) -> f32 {
        (self.step_fraction * self.ball_radius).max(MIN_STEP_DISTANCE)
    }
}
