//! World state and core simulation types
//!
//! The world is the single owner of everything that moves or changes shape.
//! Renderers and HUDs only read from it.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{BounceResponse, Resolution, contain_ball, resolve_collision};
use super::polygon::{DEFAULT_START_ANGLE, Polygon, build_polygon};
use super::tick::{StepReport, advance};
use crate::settings::{Settings, SettingsError};

/// Drawable area the polygon is fitted into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(SettingsError::InvalidViewport {
                width: self.width,
                height: self.height,
            })
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }

    /// Circumradius of a polygon filling `ratio` of the smaller side
    #[inline]
    pub fn fit_radius(&self, ratio: f32) -> f32 {
        self.width.min(self.height) * ratio
    }
}

/// Something that happened during an advance
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    /// The ball bounced off a wall and the polygon grew
    Bounce {
        /// Edge index in the polygon before it grew
        edge: usize,
        /// Side count after growth
        sides: u32,
        /// Speed after gain and clamping
        speed: f32,
    },
}

/// Bounded history of recent ball positions (newest first)
///
/// Snapshots keep the capacity but not the points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trail {
    #[serde(skip)]
    points: VecDeque<Vec2>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a position, dropping the oldest once full
    pub fn record(&mut self, pos: Vec2) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() == self.capacity {
            self.points.pop_back();
        }
        self.points.push_front(pos);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Positions with opacity, newest first; opacity fades linearly with age
    pub fn points(&self) -> impl Iterator<Item = (Vec2, f32)> + '_ {
        let capacity = self.capacity as f32;
        self.points
            .iter()
            .enumerate()
            .map(move |(i, &pos)| (pos, 1.0 - i as f32 / capacity))
    }

    fn translate_scaled(&mut self, old_center: Vec2, new_center: Vec2, scale: f32) {
        for pos in self.points.iter_mut() {
            *pos = new_center + (*pos - old_center) * scale;
        }
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Trail history for rendering
    pub trail: Trail,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, trail_length: usize) -> Self {
        Self {
            pos,
            vel,
            radius,
            trail: Trail::new(trail_length),
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Record current position to trail (call once per frame)
    pub fn record_trail(&mut self) {
        self.trail.record(self.pos);
    }
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    settings: Settings,
    center: Vec2,
    radius: f32,
    sides: u32,
    start_angle: f32,
    polygon: Polygon,
    /// The ball (mutated in place, never recreated)
    pub ball: Ball,
    /// Confirmed bounces since creation
    bounces: u64,
}

impl World {
    /// Build a world fitted to `viewport`, launching the ball from the center
    /// in a direction drawn from `settings.seed`
    pub fn new(settings: Settings, viewport: Viewport) -> Result<Self, SettingsError> {
        settings.validate()?;
        viewport.validate()?;

        let mut rng = Pcg32::seed_from_u64(settings.seed);
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let vel = Vec2::from_angle(angle) * settings.initial_speed;

        let center = viewport.center();
        let radius = viewport.fit_radius(settings.radius_ratio);
        let sides = settings.initial_sides;
        let polygon = build_polygon(center, radius, sides, DEFAULT_START_ANGLE);
        let ball = Ball::new(center, vel, settings.ball_radius, settings.trail_length);

        log::info!(
            "World created: {}x{} viewport, {} sides, radius {:.1}, launch angle {:.3}",
            viewport.width,
            viewport.height,
            sides,
            radius,
            angle
        );

        Ok(Self {
            settings,
            center,
            radius,
            sides,
            start_angle: DEFAULT_START_ANGLE,
            polygon,
            ball,
            bounces: 0,
        })
    }

    /// Advance the simulation by a frame delta (seconds)
    pub fn advance(&mut self, dt: f32) -> StepReport {
        advance(self, dt)
    }

    /// Rebuild vertices and edges from the current center, radius and sides
    ///
    /// The ball is moved back inside if the new walls cut across it. After a
    /// bounce near a corner this can move it off the radius offset of the
    /// edge it was just pushed out of.
    pub fn regenerate_geometry(&mut self) {
        self.polygon = build_polygon(self.center, self.radius, self.sides, self.start_angle);
        log::debug!("Regenerated polygon with {} sides", self.sides);

        if contain_ball(&mut self.ball.pos, self.ball.radius, &self.polygon.edges) {
            log::debug!("Ball re-seated inside the {}-gon", self.sides);
        }
    }

    /// Refit the polygon to a new viewport
    ///
    /// The ball keeps its position relative to the polygon, scaled with it.
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), SettingsError> {
        viewport.validate()?;

        let old_center = self.center;
        let new_center = viewport.center();
        let new_radius = viewport.fit_radius(self.settings.radius_ratio);
        let scale = new_radius / self.radius;

        self.ball.pos = new_center + (self.ball.pos - old_center) * scale;
        self.ball.trail.translate_scaled(old_center, new_center, scale);
        self.center = new_center;
        self.radius = new_radius;
        self.regenerate_geometry();

        log::info!(
            "Resized to {}x{}: radius {:.1}",
            viewport.width,
            viewport.height,
            new_radius
        );
        Ok(())
    }

    /// Change the angle of the first vertex and rebuild the polygon
    pub fn set_start_angle(&mut self, angle: f32) {
        self.start_angle = angle;
        self.regenerate_geometry();
    }

    /// Move the ball forward by one sub-step and resolve wall contact
    ///
    /// A confirmed bounce grows the polygon by one side. The regenerated walls
    /// may re-seat the ball, so after a bounce it does not always rest exactly
    /// one radius from the wall it hit.
    pub fn step_ball(&mut self, step_dt: f32) -> Resolution {
        let response = BounceResponse {
            gain: self.settings.speed_gain,
            max_speed: self.settings.max_speed,
        };

        let ball = &mut self.ball;
        ball.pos += ball.vel * step_dt;
        let resolution = resolve_collision(
            &mut ball.pos,
            &mut ball.vel,
            ball.radius,
            &self.polygon.edges,
            self.settings.contact_tolerance,
            response,
        );

        if resolution.is_bounce() {
            self.bounces += 1;
            self.sides += 1;
            self.regenerate_geometry();
        }
        resolution
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Circumscribed radius of the polygon
    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn sides(&self) -> u32 {
        self.sides
    }

    #[inline]
    pub fn start_angle(&self) -> f32 {
        self.start_angle
    }

    #[inline]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.polygon.vertices
    }

    #[inline]
    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.ball.speed()
    }

    #[inline]
    pub fn bounces(&self) -> u64 {
        self.bounces
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::polygon::signed_distance_to_edge_plane;

    fn world() -> World {
        World::new(Settings::default(), Viewport::new(800.0, 600.0)).unwrap()
    }

    #[test]
    fn test_new_world() {
        let world = world();
        assert_eq!(world.sides(), 3);
        assert_eq!(world.vertices().len(), 3);
        assert_eq!(world.center(), Vec2::new(400.0, 300.0));
        assert!((world.radius() - 240.0).abs() < 1e-4);
        assert_eq!(world.ball().pos, world.center());
        assert!((world.speed() - Settings::default().initial_speed).abs() < 1e-3);
        assert_eq!(world.bounces(), 0);
    }

    #[test]
    fn test_same_seed_same_launch() {
        let a = world();
        let b = world();
        assert_eq!(a.ball().vel, b.ball().vel);

        let other = Settings {
            seed: 7,
            ..Default::default()
        };
        let c = World::new(other, Viewport::new(800.0, 600.0)).unwrap();
        assert_ne!(a.ball().vel, c.ball().vel);
    }

    #[test]
    fn test_rejects_invalid_settings() {
        let settings = Settings {
            initial_sides: 1,
            ..Default::default()
        };
        assert!(World::new(settings, Viewport::new(800.0, 600.0)).is_err());
        assert!(World::new(Settings::default(), Viewport::new(0.0, 600.0)).is_err());
    }

    #[test]
    fn test_regenerate_is_idempotent() {
        let mut world = world();
        world.regenerate_geometry();
        let first = world.polygon().clone();
        world.regenerate_geometry();
        assert_eq!(&first, world.polygon());
    }

    #[test]
    fn test_resize_refits_polygon() {
        let mut world = world();
        world.ball.pos = world.center() + Vec2::new(20.0, -10.0);

        world.resize(Viewport::new(400.0, 400.0)).unwrap();
        assert_eq!(world.center(), Vec2::new(200.0, 200.0));
        assert!((world.radius() - 160.0).abs() < 1e-4);
        assert_eq!(world.sides(), 3);
        // Offset scaled by 160 / 240
        let offset = world.ball().pos - world.center();
        assert!((offset - Vec2::new(20.0, -10.0) * (2.0 / 3.0)).length() < 1e-3);
        assert!(world.polygon().contains_point(world.ball().pos));
    }

    #[test]
    fn test_resize_rejects_empty_viewport() {
        let mut world = world();
        let before = world.polygon().clone();
        assert!(matches!(
            world.resize(Viewport::new(800.0, -1.0)),
            Err(SettingsError::InvalidViewport { .. })
        ));
        assert_eq!(&before, world.polygon());
    }

    #[test]
    fn test_step_ball_bounce_grows_polygon() {
        let mut world = world();
        world.set_start_angle(-std::f32::consts::FRAC_PI_3);
        // Right wall sits at inradius 120 from the center
        world.ball.pos = world.center() + Vec2::new(110.0, 0.0);
        world.ball.vel = Vec2::new(200.0, 0.0);

        let res = world.step_ball(0.03);
        assert!(res.is_bounce());
        assert_eq!(world.sides(), 4);
        assert_eq!(world.vertices().len(), 4);
        assert_eq!(world.bounces(), 1);
        assert!(world.ball().vel.x < 0.0);
    }

    #[test]
    fn test_step_ball_without_contact() {
        let mut world = world();
        world.ball.vel = Vec2::new(100.0, 0.0);
        let start = world.ball().pos;

        let res = world.step_ball(0.1);
        assert_eq!(res, Resolution::Clear);
        assert_eq!(world.sides(), 3);
        assert!((world.ball().pos - (start + Vec2::new(10.0, 0.0))).length() < 1e-4);
    }

    #[test]
    fn test_pushed_does_not_grow() {
        let mut world = world();
        world.set_start_angle(-std::f32::consts::FRAC_PI_3);
        // Overlapping the right wall while drifting back toward the center
        world.ball.pos = world.center() + Vec2::new(113.5, 0.0);
        world.ball.vel = Vec2::new(-1.0, 50.0);

        let res = world.step_ball(0.001);
        assert!(!res.is_bounce());
        assert_eq!(world.sides(), 3);
        let edge = world.polygon().edges[0];
        assert!(signed_distance_to_edge_plane(world.ball().pos, &edge) >= 8.0 - 1e-3);
    }

    #[test]
    fn test_trail_is_bounded() {
        let mut trail = Trail::new(3);
        for i in 0..5 {
            trail.record(Vec2::new(i as f32, 0.0));
        }
        assert_eq!(trail.len(), trail.capacity());
        let points: Vec<_> = trail.points().collect();
        assert_eq!(points[0].0, Vec2::new(4.0, 0.0));
        assert_eq!(points[2].0, Vec2::new(2.0, 0.0));
        assert_eq!(points[0].1, 1.0);
        assert!(points[1].1 < points[0].1 && points[2].1 < points[1].1);
        assert!(points[2].1 > 0.0);
    }

    #[test]
    fn test_empty_trail_capacity() {
        let mut trail = Trail::new(0);
        trail.record(Vec2::ONE);
        assert!(trail.is_empty());
    }

    #[test]
    fn test_snapshot_round_trip_keeps_geometry() {
        let world = world();
        let json = serde_json::to_string(&world).unwrap();
        let restored: World = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.sides(), world.sides());
        assert_eq!(restored.polygon(), world.polygon());
        assert!(restored.ball().trail.is_empty());
    }

    #[test]
    fn test_snapshot_keeps_trail_length() {
        let settings = Settings {
            trail_length: 7,
            ..Default::default()
        };
        let mut world = World::new(settings, Viewport::new(800.0, 600.0)).unwrap();
        for _ in 0..3 {
            world.advance(1.0 / 60.0);
        }
        assert_eq!(world.ball().trail.len(), 3);

        let json = serde_json::to_string(&world).unwrap();
        let mut restored: World = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.ball().trail.capacity(), 7);
        assert!(restored.ball().trail.is_empty());

        for _ in 0..10 {
            restored.advance(1.0 / 60.0);
        }
        assert_eq!(restored.ball().trail.len(), 7);
    }
}
