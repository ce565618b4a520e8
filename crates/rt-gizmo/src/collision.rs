//! Gizmo collision detection utilities
//!
//! Ray tests against the primitive shapes gizmo handles are made of. All
//! functions return the ray parameter `t` of the hit, so the hit point is
//! `ray_origin + ray_dir * t`.

use glam::Vec3;

const PARALLEL_EPSILON: f32 = 1e-6;

/// Ray-cylinder intersection test.
///
/// Tests if a ray intersects with a finite cylinder defined by its axis
/// endpoints and radius.
///
/// # Algorithm
///
/// 1. **Infinite cylinder intersection**: project the ray and cylinder axis
///    into the plane perpendicular to the cylinder axis, then solve the
///    resulting 2D quadratic equation.
///
/// 2. **Finite bounds check**: verify that the intersection point lies
///    between `cylinder_start` and `cylinder_end`.
///
/// # Arguments
///
/// * `ray_origin` - Ray start, in gizmo space.
/// * `ray_dir` - Ray direction (normalized).
/// * `cylinder_start` - Start of the cylinder axis.
/// * `cylinder_end` - End of the cylinder axis.
/// * `radius` - Cylinder radius.
///
/// # Returns
///
/// * `Some(t)` - The ray parameter at the closest intersection point.
/// * `None` - If the ray does not intersect the cylinder.
pub fn ray_cylinder_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    cylinder_start: Vec3,
    cylinder_end: Vec3,
    radius: f32,
) -> Option<f32> {
    let cylinder_axis = (cylinder_end - cylinder_start).normalize_or_zero();
    let cylinder_length = (cylinder_end - cylinder_start).length();
    if cylinder_axis == Vec3::ZERO {
        return None;
    }

    // Project ray direction and origin offset onto the plane perpendicular to the axis
    let d = ray_dir - cylinder_axis * ray_dir.dot(cylinder_axis);
    let o = (ray_origin - cylinder_start)
        - cylinder_axis * (ray_origin - cylinder_start).dot(cylinder_axis);

    // Quadratic coefficients: at² + bt + c = 0
    let a = d.dot(d);
    if a < PARALLEL_EPSILON {
        return None;
    }
    let b = 2.0 * d.dot(o);
    let c = o.dot(o) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()) / (2.0 * a);
    if t < 0.0 {
        return None;
    }

    // Check if hit point is within cylinder length bounds
    let hit_point = ray_origin + ray_dir * t;
    let projection = (hit_point - cylinder_start).dot(cylinder_axis);
    if projection < 0.0 || projection > cylinder_length {
        return None;
    }

    Some(t)
}

/// Ray-ring intersection test.
///
/// The ring is a circle of `ring_radius` around `ring_center` in the plane
/// with normal `ring_normal`; hits within `thickness` of the circle count.
///
/// # Arguments
///
/// * `ray_origin` - Ray start, in gizmo space.
/// * `ray_dir` - Ray direction (normalized).
/// * `ring_center` - Center of the ring.
/// * `ring_normal` - Normal of the ring's plane, i.e. the rotation axis.
/// * `ring_radius` - Distance from the center to the ring's center line.
/// * `thickness` - Hit tolerance around the center line.
///
/// # Returns
///
/// * `Some(t)` - The ray parameter where the ray crosses the ring.
/// * `None` - If the ray misses the ring or runs parallel to its plane.
pub fn ray_ring_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    ring_center: Vec3,
    ring_normal: Vec3,
    ring_radius: f32,
    thickness: f32,
) -> Option<f32> {
    let t = ray_plane_parameter(ray_origin, ray_dir, ring_center, ring_normal)?;

    let hit_point = ray_origin + ray_dir * t;
    let distance_from_center = (hit_point - ring_center).length();
    let distance_from_ring = (distance_from_center - ring_radius).abs();

    if distance_from_ring <= thickness {
        Some(t)
    } else {
        None
    }
}

/// Ray-quad intersection test.
///
/// The quad is an axis-aligned square centered at `quad_center`, lying in the
/// plane with normal `quad_normal` (one of the unit axes), with the given
/// half extent along both in-plane axes.
///
/// # Arguments
///
/// * `ray_origin` - Ray start, in gizmo space.
/// * `ray_dir` - Ray direction (normalized).
/// * `quad_center` - Center of the quad.
/// * `quad_normal` - Normal of the quad's plane.
/// * `half_extent` - Half the side length.
///
/// # Returns
///
/// * `Some(t)` - The ray parameter of the hit.
/// * `None` - If the ray misses the quad or runs parallel to it.
pub fn ray_quad_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    quad_center: Vec3,
    quad_normal: Vec3,
    half_extent: f32,
) -> Option<f32> {
    let t = ray_plane_parameter(ray_origin, ray_dir, quad_center, quad_normal)?;

    let offset = ray_origin + ray_dir * t - quad_center;
    let in_plane = offset - quad_normal * offset.dot(quad_normal);
    if in_plane.abs().max_element() <= half_extent {
        Some(t)
    } else {
        None
    }
}

fn ray_plane_parameter(
    ray_origin: Vec3,
    ray_dir: Vec3,
    plane_point: Vec3,
    plane_normal: Vec3,
) -> Option<f32> {
    let denom = ray_dir.dot(plane_normal);

    // Ray is nearly parallel to the plane
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = (plane_point - ray_origin).dot(plane_normal) / denom;

    // Intersection is behind the ray origin
    if t < 0.0 { None } else { Some(t) }
}
