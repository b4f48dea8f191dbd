//! Simulation module
//!
//! All physics lives here. This module must stay free of rendering and
//! platform code:
//! - The host owns the frame loop and calls `World::advance`
//! - Seeded RNG only
//! - One collision resolved per sub-step

pub mod collision;
pub mod polygon;
pub mod state;
pub mod tick;

pub use collision::{
    BounceResponse, Contact, Resolution, clamp_speed, contain_ball, find_deepest_contact,
    reflect_velocity, resolve_collision,
};
pub use polygon::{
    DEFAULT_START_ANGLE, Edge, Polygon, SegmentProjection, build_edges, build_polygon,
    project_onto_segment, signed_distance_to_edge_plane,
};
pub use state::{Ball, SimEvent, Trail, Viewport, World};
pub use tick::{StepReport, SubstepPlan, advance, clamp_frame_dt, plan_substeps};
