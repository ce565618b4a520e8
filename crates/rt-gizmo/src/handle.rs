//! Hit-testable gizmo parts
//!
//! Each gizmo is made of handles. A handle has a shape, expressed in gizmo
//! space, and an optional domain tag. Handles without a tag can be hit but
//! never start a manipulation.

use glam::Vec3;
use rt_core::scene::ray_sphere_intersection;
use rt_core::{HandleId, TransformationDomain, TransformationKind};

use crate::collision::{ray_cylinder_intersection, ray_quad_intersection, ray_ring_intersection};
use crate::config::GizmoConfig;

/// Shape of a handle in gizmo space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandleShape {
    /// Finite cylinder between two points
    Cylinder {
        /// Axis start
        start: Vec3,
        /// Axis end
        end: Vec3,
        /// Pick radius
        radius: f32,
    },
    /// Circle around the gizmo origin
    Ring {
        /// Normal of the ring plane
        normal: Vec3,
        /// Circle radius
        radius: f32,
        /// Pick tolerance around the circle
        thickness: f32,
    },
    /// Axis-aligned square
    Quad {
        /// Square center
        center: Vec3,
        /// Normal of the square plane
        normal: Vec3,
        /// Half side length
        half_extent: f32,
    },
    /// Sphere
    Sphere {
        /// Sphere center
        center: Vec3,
        /// Sphere radius
        radius: f32,
    },
}

impl HandleShape {
    /// Ray parameter of the nearest hit, ray given in gizmo space
    pub fn intersect(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<f32> {
        match *self {
            HandleShape::Cylinder { start, end, radius } => {
                ray_cylinder_intersection(ray_origin, ray_dir, start, end, radius)
            }
            HandleShape::Ring {
                normal,
                radius,
                thickness,
            } => ray_ring_intersection(ray_origin, ray_dir, Vec3::ZERO, normal, radius, thickness),
            HandleShape::Quad {
                center,
                normal,
                half_extent,
            } => ray_quad_intersection(ray_origin, ray_dir, center, normal, half_extent),
            HandleShape::Sphere { center, radius } => {
                ray_sphere_intersection(ray_origin, ray_dir, center, radius)
            }
        }
    }
}

/// One hit-testable part of a gizmo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GizmoHandle {
    /// Index of the handle inside its gizmo
    pub id: HandleId,
    /// Domain this handle starts, `None` for untagged parts
    pub domain: TransformationDomain,
    /// Hit geometry
    pub shape: HandleShape,
}

const AXES: [(TransformationDomain, Vec3); 3] = [
    (TransformationDomain::AxisX, Vec3::X),
    (TransformationDomain::AxisY, Vec3::Y),
    (TransformationDomain::AxisZ, Vec3::Z),
];

const PLANES: [TransformationDomain; 3] = [
    TransformationDomain::PlaneXY,
    TransformationDomain::PlaneYZ,
    TransformationDomain::PlaneZX,
];

/// Build the handle set of a gizmo kind.
///
/// Translation and scale gizmos have three axis arrows, three plane squares
/// and a uniform center. The rotation gizmo has three rings and an untagged
/// center sphere. `NoTransform` has no handles.
pub fn build_handles(kind: TransformationKind, config: &GizmoConfig) -> Vec<GizmoHandle> {
    let mut shapes: Vec<(TransformationDomain, HandleShape)> = Vec::new();

    match kind {
        TransformationKind::Translation | TransformationKind::Scale => {
            for (domain, axis) in AXES {
                shapes.push((
                    domain,
                    HandleShape::Cylinder {
                        start: Vec3::ZERO,
                        end: axis * config.axis_length,
                        radius: config.axis_radius,
                    },
                ));
            }
            for domain in PLANES {
                let (Some(normal), Some((u, v))) = (domain.plane_normal(), domain.plane_axes())
                else {
                    continue;
                };
                shapes.push((
                    domain,
                    HandleShape::Quad {
                        center: (u + v) * config.plane_offset,
                        normal,
                        half_extent: config.plane_size,
                    },
                ));
            }
            shapes.push((
                TransformationDomain::Uniform,
                HandleShape::Sphere {
                    center: Vec3::ZERO,
                    radius: config.center_radius,
                },
            ));
        }
        TransformationKind::Rotation => {
            for (domain, axis) in AXES {
                shapes.push((
                    domain,
                    HandleShape::Ring {
                        normal: axis,
                        radius: config.ring_radius,
                        thickness: config.ring_thickness,
                    },
                ));
            }
            shapes.push((
                TransformationDomain::None,
                HandleShape::Sphere {
                    center: Vec3::ZERO,
                    radius: config.center_radius,
                },
            ));
        }
        TransformationKind::NoTransform => {}
    }

    shapes
        .into_iter()
        .enumerate()
        .map(|(i, (domain, shape))| GizmoHandle {
            id: HandleId(i as u32),
            domain,
            shape,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_handles_cover_all_domains() {
        let handles = build_handles(TransformationKind::Translation, &GizmoConfig::default());
        assert_eq!(handles.len(), 7);
        for domain in [
            TransformationDomain::AxisX,
            TransformationDomain::AxisY,
            TransformationDomain::AxisZ,
            TransformationDomain::PlaneXY,
            TransformationDomain::PlaneYZ,
            TransformationDomain::PlaneZX,
            TransformationDomain::Uniform,
        ] {
            assert!(handles.iter().any(|h| h.domain == domain));
        }
    }

    #[test]
    fn test_rotation_center_is_untagged() {
        let handles = build_handles(TransformationKind::Rotation, &GizmoConfig::default());
        assert_eq!(handles.len(), 4);
        assert!(handles.iter().any(|h| h.domain.is_none()));
        assert!(!handles.iter().any(|h| h.domain.is_plane()));
    }

    #[test]
    fn test_handle_ids_are_indices() {
        let handles = build_handles(TransformationKind::Scale, &GizmoConfig::default());
        for (i, handle) in handles.iter().enumerate() {
            assert_eq!(handle.id, HandleId(i as u32));
        }
        assert!(build_handles(TransformationKind::NoTransform, &GizmoConfig::default()).is_empty());
    }

    #[test]
    fn test_plane_quad_is_hit_between_axes() {
        let config = GizmoConfig::default();
        let handles = build_handles(TransformationKind::Translation, &config);
        let xy = handles
            .iter()
            .find(|h| h.domain == TransformationDomain::PlaneXY)
            .unwrap();
        let origin = Vec3::new(config.plane_offset, config.plane_offset, 5.0);
        assert!(xy.shape.intersect(origin, -Vec3::Z).is_some());
    }
}
