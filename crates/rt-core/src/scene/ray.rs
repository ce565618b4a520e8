//! Ray queries and ray intersection helpers

use glam::Vec3;

use crate::ids::{ActorId, ComponentId, GizmoId, HandleId};

/// Rays closer to parallel than this are rejected
const PARALLEL_EPSILON: f32 = 1e-6;

/// What a ray hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitObject {
    /// A part of a gizmo
    Gizmo { gizmo: GizmoId, handle: HandleId },
    /// A component of a scene actor
    Component {
        actor: ActorId,
        component: ComponentId,
    },
}

/// One entry of a ray query result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    pub object: HitObject,
    /// World position of the hit
    pub point: Vec3,
    /// Distance along the ray
    pub distance: f32,
}

/// Options for a ray query
#[derive(Debug, Clone, PartialEq)]
pub struct RayFilter {
    /// Actors never reported as hits
    pub ignored_actors: Vec<ActorId>,
    /// Hits further away than this are dropped
    pub max_distance: f32,
}

impl Default for RayFilter {
    fn default() -> Self {
        Self {
            ignored_actors: Vec::new(),
            max_distance: 100_000.0,
        }
    }
}

impl RayFilter {
    pub fn with_max_distance(max_distance: f32) -> Self {
        Self {
            max_distance,
            ..Self::default()
        }
    }

    pub fn ignoring(mut self, actor: ActorId) -> Self {
        self.ignored_actors.push(actor);
        self
    }

    pub fn accepts(&self, actor: ActorId, distance: f32) -> bool {
        distance <= self.max_distance && !self.ignored_actors.contains(&actor)
    }
}

/// Collision subsystem that answers ray casts.
///
/// Hit ordering is not relied upon by the transformer.
pub trait RayQuery {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, filter: &RayFilter) -> Vec<HitRecord>;
}

/// Ray-plane intersection, `None` when parallel or behind the ray origin
pub fn ray_plane_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    plane_point: Vec3,
    plane_normal: Vec3,
) -> Option<Vec3> {
    let denom = ray_dir.dot(plane_normal);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = (plane_point - ray_origin).dot(plane_normal) / denom;
    if t < 0.0 {
        return None;
    }

    Some(ray_origin + ray_dir * t)
}

/// Ray-sphere intersection, returns the ray parameter of the nearest hit
pub fn ray_sphere_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    sphere_center: Vec3,
    radius: f32,
) -> Option<f32> {
    let oc = ray_origin - sphere_center;
    let a = ray_dir.dot(ray_dir);
    let b = 2.0 * oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()) / (2.0 * a);
    if t > 0.0 { Some(t) } else { None }
}

/// Point on the infinite line (`line_point`, `line_dir`) closest to the ray.
///
/// Both directions are normalized internally. Returns `None` when the ray
/// runs parallel to the line.
pub fn closest_point_on_line(
    ray_origin: Vec3,
    ray_dir: Vec3,
    line_point: Vec3,
    line_dir: Vec3,
) -> Option<Vec3> {
    let d = ray_dir.normalize_or_zero();
    let a = line_dir.normalize_or_zero();
    if d == Vec3::ZERO || a == Vec3::ZERO {
        return None;
    }

    // Closest points between P(s) = line_point + s*a and Q(t) = ray_origin + t*d
    let w0 = line_point - ray_origin;
    let b = a.dot(d);
    let denom = 1.0 - b * b;
    if denom < PARALLEL_EPSILON {
        return None;
    }

    let s = (b * d.dot(w0) - a.dot(w0)) / denom;
    Some(line_point + a * s)
}
