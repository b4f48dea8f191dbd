//! Collision detection and response against polygon walls
//!
//! Each call tests one candidate ball position against every edge, picks the
//! deepest penetration and resolves only that one. Corner hits that overlap
//! two edges are resolved against whichever edge is penetrated more.

use glam::Vec2;

use super::polygon::{Edge, project_onto_segment, signed_distance_to_edge_plane};

/// Below this speed a velocity has no usable direction
const SPEED_EPSILON: f32 = 1e-6;

/// Upper bound on half-plane projection sweeps in `contain_ball`
const MAX_CONTAIN_PASSES: usize = 8;
/// Overlap below this is left for the resolver
const CONTAIN_SLACK: f32 = 1e-4;

/// A confirmed overlap between the ball and one edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Index of the edge in the polygon's edge list
    pub edge: usize,
    /// Inward normal of that edge
    pub normal: Vec2,
    /// Signed distance minus radius (always negative for a contact)
    pub depth: f32,
}

/// Speed response applied on every confirmed bounce
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BounceResponse {
    /// Multiplier applied to the reflected speed
    pub gain: f32,
    /// Upper bound on the speed after the gain
    pub max_speed: f32,
}

/// Outcome of resolving one candidate position
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// No wall overlapped; the candidate was committed as is
    Clear,
    /// The ball was pushed out but was already moving away from the wall
    Pushed(Contact),
    /// The ball was pushed out and its velocity reflected
    Bounced {
        contact: Contact,
        speed_before: f32,
        speed_after: f32,
    },
}

impl Resolution {
    #[inline]
    pub fn is_bounce(&self) -> bool {
        matches!(self, Resolution::Bounced { .. })
    }

    pub fn contact(&self) -> Option<Contact> {
        match *self {
            Resolution::Clear => None,
            Resolution::Pushed(contact) | Resolution::Bounced { contact, .. } => Some(contact),
        }
    }
}

/// Find the edge the ball penetrates most deeply at `candidate`
///
/// An edge whose infinite line is penetrated only counts when the closest
/// point on the finite segment is within `radius + tolerance` of the ball.
/// The projection is clamped, so hits past a segment's ends are measured
/// against its endpoints.
pub fn find_deepest_contact(
    candidate: Vec2,
    radius: f32,
    edges: &[Edge],
    tolerance: f32,
) -> Option<Contact> {
    let mut deepest: Option<Contact> = None;

    for (i, edge) in edges.iter().enumerate() {
        let depth = signed_distance_to_edge_plane(candidate, edge) - radius;
        if depth >= 0.0 {
            continue;
        }

        let proj = project_onto_segment(candidate, edge.a, edge.b);
        let dist = candidate.distance(proj.point);
        if !(0.0..=1.0).contains(&proj.t) || dist - radius > tolerance {
            continue;
        }

        if deepest.is_none_or(|best| depth < best.depth) {
            deepest = Some(Contact {
                edge: i,
                normal: edge.normal,
                depth,
            });
        }
    }

    deepest
}

/// Resolve the ball against the edges at its candidate position
///
/// `pos` holds the candidate on entry and the committed position on exit.
/// Velocity is only reflected when the ball is moving into the wall.
pub fn resolve_collision(
    pos: &mut Vec2,
    vel: &mut Vec2,
    radius: f32,
    edges: &[Edge],
    tolerance: f32,
    response: BounceResponse,
) -> Resolution {
    let Some(contact) = find_deepest_contact(*pos, radius, edges, tolerance) else {
        return Resolution::Clear;
    };

    // Lands exactly on the radius offset of the edge's line
    *pos += contact.normal * -contact.depth;

    if vel.dot(contact.normal) >= 0.0 {
        return Resolution::Pushed(contact);
    }

    let speed_before = vel.length();
    *vel = clamp_speed(
        reflect_velocity(*vel, contact.normal) * response.gain,
        response.max_speed,
    );

    Resolution::Bounced {
        contact,
        speed_before,
        speed_after: vel.length(),
    }
}

/// Pull the ball back inside after the walls moved under it
///
/// A polygon with one more side is inscribed in the same circle, so regions
/// near the old corners fall outside it. Those are too far from the new
/// segments for `find_deepest_contact` to catch, so the ball is projected
/// onto each edge's half-plane in turn until it clears every wall.
/// Returns true if the ball moved.
pub fn contain_ball(pos: &mut Vec2, radius: f32, edges: &[Edge]) -> bool {
    let mut moved = false;
    for _ in 0..MAX_CONTAIN_PASSES {
        let mut corrected = false;
        for edge in edges {
            let gap = signed_distance_to_edge_plane(*pos, edge) - radius;
            if gap < -CONTAIN_SLACK {
                *pos += edge.normal * -gap;
                corrected = true;
            }
        }
        if !corrected {
            break;
        }
        moved = true;
    }
    moved
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Scale `velocity` down to `max_speed` if it is faster, keeping direction
pub fn clamp_speed(velocity: Vec2, max_speed: f32) -> Vec2 {
    let speed = velocity.length();
    if speed <= max_speed {
        return velocity;
    }
    let magnitude = if speed < SPEED_EPSILON { 1.0 } else { speed };
    velocity / magnitude * max_speed
}
