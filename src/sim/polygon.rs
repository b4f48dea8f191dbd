//! Regular polygon geometry for the bounce enclosure
//!
//! A polygon is described by:
//! - center: midpoint of the enclosure
//! - radius: circumscribed radius (center to each vertex)
//! - sides: vertex count, at least 3
//! - start_angle: angle of the first vertex (radians)
//!
//! Vertices are generated with a positive angular sweep, so the interior
//! always lies to the left of each edge tangent.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::polar_to_cartesian;

/// Default angle of the first vertex (straight up in screen coordinates)
pub const DEFAULT_START_ANGLE: f32 = -std::f32::consts::FRAC_PI_2;

/// One wall of the polygon, from `a` to `b`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub a: Vec2,
    pub b: Vec2,
    /// Unit direction from `a` to `b`
    pub tangent: Vec2,
    /// Unit normal pointing into the polygon
    pub normal: Vec2,
    pub length: f32,
}

impl Edge {
    /// Build an edge between two vertices
    ///
    /// A zero-length edge is normalized against length 1, which leaves its
    /// tangent and normal at zero instead of dividing by zero.
    pub fn new(a: Vec2, b: Vec2) -> Self {
        let delta = b - a;
        let mut length = delta.length();
        if length == 0.0 {
            length = 1.0;
        }
        let tangent = delta / length;
        let normal = Vec2::new(-tangent.y, tangent.x);

        Self {
            a,
            b,
            tangent,
            normal,
            length,
        }
    }

    /// Midpoint of the segment
    #[inline]
    pub fn midpoint(&self) -> Vec2 {
        (self.a + self.b) * 0.5
    }
}

/// A regular polygon with its derived edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Vec2>,
    pub edges: Vec<Edge>,
}

impl Polygon {
    #[inline]
    pub fn sides(&self) -> usize {
        self.vertices.len()
    }

    /// Average of the vertices (equals the center for a regular polygon)
    pub fn centroid(&self) -> Vec2 {
        if self.vertices.is_empty() {
            return Vec2::ZERO;
        }
        self.vertices.iter().copied().sum::<Vec2>() / self.vertices.len() as f32
    }

    /// True if `point` is on the interior side of every edge
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.edges
            .iter()
            .all(|edge| signed_distance_to_edge_plane(point, edge) >= 0.0)
    }
}

/// Place `sides` vertices evenly around `center` and derive the edges
pub fn build_polygon(center: Vec2, radius: f32, sides: u32, start_angle: f32) -> Polygon {
    let step = std::f32::consts::TAU / sides as f32;
    let vertices: Vec<Vec2> = (0..sides)
        .map(|i| center + polar_to_cartesian(radius, start_angle + step * i as f32))
        .collect();
    let edges = build_edges(&vertices);

    Polygon { vertices, edges }
}

/// Derive edges from consecutive vertex pairs, wrapping the last to the first
pub fn build_edges(vertices: &[Vec2]) -> Vec<Edge> {
    let n = vertices.len();
    (0..n)
        .map(|i| Edge::new(vertices[i], vertices[(i + 1) % n]))
        .collect()
}

/// Distance from `point` to the edge's infinite line, positive on the inside
#[inline]
pub fn signed_distance_to_edge_plane(point: Vec2, edge: &Edge) -> f32 {
    (point - edge.a).dot(edge.normal)
}

/// Closest point on a finite segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    pub point: Vec2,
    /// Position along the segment, 0 at `a` and 1 at `b`
    pub t: f32,
}

/// Project `point` onto the segment [a, b]
pub fn project_onto_segment(point: Vec2, a: Vec2, b: Vec2) -> SegmentProjection {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return SegmentProjection { point: a, t: 0.0 };
    }

    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    SegmentProjection {
        point: a + ab * t,
        t,
    }
}
