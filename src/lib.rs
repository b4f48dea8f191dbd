//! Polybounce - a ball bouncing inside a polygon that grows a side per bounce
//!
//! Core modules:
//! - `sim`: Simulation (geometry, collisions, sub-stepping, world state)
//! - `platform`: Frame timing helpers for the host loop
//! - `settings`: Static configuration and validation

pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Simulation defaults
pub mod consts {
    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BALL_START_SPEED: f32 = 220.0;
    /// Maximum ball speed
    pub const BALL_MAX_SPEED: f32 = 1600.0;
    /// Speed boost when ball hits a wall (multiplicative)
    pub const SPEED_GAIN: f32 = 1.05;

    /// Polygon circumradius relative to the smaller viewport side
    pub const POLYGON_RADIUS_RATIO: f32 = 0.4;

    /// Sub-step length as a fraction of the ball radius
    pub const STEP_FRACTION: f32 = 0.6;
    /// Floor on the sub-step length
    pub const MIN_STEP_DISTANCE: f32 = 0.5;
    /// Longest frame delta fed to the stepper (seconds)
    pub const MAX_FRAME_DT: f32 = 0.033;

    /// Slack between ball and segment when confirming a hit
    pub const CONTACT_TOLERANCE: f32 = 0.5;

    /// Number of trail points kept for rendering
    pub const TRAIL_LENGTH: usize = 40;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
