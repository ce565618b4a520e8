//! Delta transform calculation
//!
//! Turns successive pointer rays into per-tick transform deltas constrained
//! to the active domain. Every kind samples a world point per tick (on the
//! axis line or on a drag plane) and derives the delta from the previous
//! sample. The first sample of a session only primes the session.

use glam::{Quat, Vec3};
use rt_core::scene::{closest_point_on_line, ray_plane_intersection};
use rt_core::{TransformDelta, TransformationDomain, TransformationKind};

use crate::gizmo::Gizmo;

/// Vectors shorter than this are treated as degenerate
const DEGENERATE_EPSILON: f32 = 1e-6;

/// State of one click-drag-release manipulation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragSession {
    domain: TransformationDomain,
    last_sample: Option<Vec3>,
}

impl DragSession {
    /// Create an idle session
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous sample so the next tick starts a new drag
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Domain the session samples for
    pub fn domain(&self) -> TransformationDomain {
        self.domain
    }

    /// Whether a previous sample exists
    pub fn is_started(&self) -> bool {
        self.last_sample.is_some()
    }
}

impl Gizmo {
    /// Compute the raw (unsnapped) delta for this tick.
    ///
    /// `looking` is the camera forward vector. A `None` domain always yields
    /// the zero delta, as does the first sample of a session and any tick
    /// where the ray cannot be projected (for example parallel to the drag
    /// plane).
    pub fn delta_transform(
        &self,
        session: &mut DragSession,
        looking: Vec3,
        ray_origin: Vec3,
        ray_dir: Vec3,
        domain: TransformationDomain,
    ) -> TransformDelta {
        if domain.is_none() {
            session.reset();
            return TransformDelta::ZERO;
        }
        if session.domain != domain {
            session.reset();
            session.domain = domain;
        }

        let Some(sample) = self.drag_sample(looking, ray_origin, ray_dir, domain) else {
            return TransformDelta::ZERO;
        };

        match session.last_sample.replace(sample) {
            Some(previous) => self.delta_between(previous, sample, looking, domain),
            None => TransformDelta::ZERO,
        }
    }

    /// World point the ray selects for the given domain
    fn drag_sample(
        &self,
        looking: Vec3,
        ray_origin: Vec3,
        ray_dir: Vec3,
        domain: TransformationDomain,
    ) -> Option<Vec3> {
        let rotation = self.rotation();
        let location = self.location();

        match self.kind() {
            TransformationKind::Translation | TransformationKind::Scale => {
                if let Some(axis) = domain.axis() {
                    closest_point_on_line(ray_origin, ray_dir, location, rotation * axis)
                } else {
                    let normal = self.drag_plane_normal(looking, domain)?;
                    ray_plane_intersection(ray_origin, ray_dir, location, normal)
                }
            }
            TransformationKind::Rotation => {
                let normal = self.drag_plane_normal(looking, domain)?;
                ray_plane_intersection(ray_origin, ray_dir, location, normal)
            }
            TransformationKind::NoTransform => None,
        }
    }

    /// Normal of the plane the pointer is dragged across.
    ///
    /// Rotation about an axis drags in the plane perpendicular to that axis;
    /// plane domains use their own plane; uniform domains drag across the
    /// view plane.
    fn drag_plane_normal(&self, looking: Vec3, domain: TransformationDomain) -> Option<Vec3> {
        let local = match domain {
            TransformationDomain::Uniform => {
                let looking = looking.normalize_or_zero();
                return (looking != Vec3::ZERO).then_some(looking);
            }
            _ if self.kind() == TransformationKind::Rotation => {
                domain.axis().or_else(|| domain.plane_normal())?
            }
            _ => domain.plane_normal()?,
        };
        Some(self.rotation() * local)
    }

    fn delta_between(
        &self,
        previous: Vec3,
        current: Vec3,
        looking: Vec3,
        domain: TransformationDomain,
    ) -> TransformDelta {
        match self.kind() {
            TransformationKind::Translation => {
                TransformDelta::from_translation(self.constrain(current - previous, looking, domain))
            }
            TransformationKind::Rotation => self.rotation_delta(previous, current, looking, domain),
            TransformationKind::Scale => self.scale_delta(current - previous, looking, domain),
            TransformationKind::NoTransform => TransformDelta::ZERO,
        }
    }

    /// Restrict a world displacement to the domain's axis or plane
    fn constrain(&self, displacement: Vec3, looking: Vec3, domain: TransformationDomain) -> Vec3 {
        if let Some(axis) = domain.axis() {
            let axis = self.rotation() * axis;
            return axis * displacement.dot(axis);
        }
        match self.drag_plane_normal(looking, domain) {
            Some(normal) => displacement - normal * displacement.dot(normal),
            None => Vec3::ZERO,
        }
    }

    fn rotation_delta(
        &self,
        previous: Vec3,
        current: Vec3,
        looking: Vec3,
        domain: TransformationDomain,
    ) -> TransformDelta {
        let Some(axis) = self.drag_plane_normal(looking, domain) else {
            return TransformDelta::ZERO;
        };

        let u = previous - self.location();
        let v = current - self.location();
        let u = u - axis * u.dot(axis);
        let v = v - axis * v.dot(axis);
        if u.length_squared() < DEGENERATE_EPSILON || v.length_squared() < DEGENERATE_EPSILON {
            return TransformDelta::ZERO;
        }

        // Signed angle swept about the axis
        let angle = u.cross(v).dot(axis).atan2(u.dot(v));
        TransformDelta::from_rotation(Quat::from_axis_angle(axis, angle))
    }

    /// Scale change along the domain's local axes.
    ///
    /// The returned delta is expressed in world space (gizmo axes rotated into
    /// the world); the compositor re-expresses it per object.
    fn scale_delta(&self, displacement: Vec3, looking: Vec3, domain: TransformationDomain) -> TransformDelta {
        let rotation = self.rotation();
        let sensitivity = self.scale_sensitivity() / self.view_scale();

        let (local_mask, drag_dir) = if let Some(axis) = domain.axis() {
            (axis, rotation * axis)
        } else if let Some((u, v)) = domain.plane_axes() {
            (u + v, (rotation * (u + v)).normalize())
        } else {
            (Vec3::ONE, screen_diagonal(looking))
        };

        let amount = displacement.dot(drag_dir) * sensitivity;
        TransformDelta::from_scale(rotation * (local_mask * amount))
    }
}

/// Up-right diagonal of the view plane; dragging along it grows the object
fn screen_diagonal(looking: Vec3) -> Vec3 {
    let looking = looking.normalize_or_zero();
    let mut right = looking.cross(Vec3::Z);
    if right.length_squared() < DEGENERATE_EPSILON {
        right = Vec3::X;
    }
    let right = right.normalize();
    let up = right.cross(looking).normalize_or_zero();
    (right + up).normalize_or_zero()
}
