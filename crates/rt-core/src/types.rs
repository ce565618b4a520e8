//! Transformation kinds, domains and related mode enums

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Which transformation the gizmo performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransformationKind {
    #[default]
    Translation,
    Rotation,
    Scale,
    /// Explicit "no transform" sentinel; has no gizmo
    NoTransform,
}

impl TransformationKind {
    /// Kinds that own a gizmo, in pool slot order
    pub const GIZMO_KINDS: [TransformationKind; 3] = [
        TransformationKind::Translation,
        TransformationKind::Rotation,
        TransformationKind::Scale,
    ];

    /// Pool slot for this kind, `None` for [`TransformationKind::NoTransform`]
    pub fn gizmo_index(&self) -> Option<usize> {
        match self {
            TransformationKind::Translation => Some(0),
            TransformationKind::Rotation => Some(1),
            TransformationKind::Scale => Some(2),
            TransformationKind::NoTransform => None,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            TransformationKind::Translation => "Translation",
            TransformationKind::Rotation => "Rotation",
            TransformationKind::Scale => "Scale",
            TransformationKind::NoTransform => "No Transform",
        }
    }
}

/// The constrained axis/plane currently manipulated.
///
/// `None` means no manipulation is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransformationDomain {
    #[default]
    None,
    AxisX,
    AxisY,
    AxisZ,
    PlaneXY,
    PlaneYZ,
    PlaneZX,
    /// Screen-aligned / all axes at once
    Uniform,
}

impl TransformationDomain {
    pub fn is_none(&self) -> bool {
        matches!(self, TransformationDomain::None)
    }

    pub fn is_axis(&self) -> bool {
        matches!(
            self,
            TransformationDomain::AxisX | TransformationDomain::AxisY | TransformationDomain::AxisZ
        )
    }

    pub fn is_plane(&self) -> bool {
        matches!(
            self,
            TransformationDomain::PlaneXY
                | TransformationDomain::PlaneYZ
                | TransformationDomain::PlaneZX
        )
    }

    /// Unit axis (gizmo space) for single-axis domains
    pub fn axis(&self) -> Option<Vec3> {
        match self {
            TransformationDomain::AxisX => Some(Vec3::X),
            TransformationDomain::AxisY => Some(Vec3::Y),
            TransformationDomain::AxisZ => Some(Vec3::Z),
            _ => None,
        }
    }

    /// Plane normal (gizmo space) for plane domains
    pub fn plane_normal(&self) -> Option<Vec3> {
        match self {
            TransformationDomain::PlaneXY => Some(Vec3::Z),
            TransformationDomain::PlaneYZ => Some(Vec3::X),
            TransformationDomain::PlaneZX => Some(Vec3::Y),
            _ => None,
        }
    }

    /// The two in-plane axes (gizmo space) for plane domains
    pub fn plane_axes(&self) -> Option<(Vec3, Vec3)> {
        match self {
            TransformationDomain::PlaneXY => Some((Vec3::X, Vec3::Y)),
            TransformationDomain::PlaneYZ => Some((Vec3::Y, Vec3::Z)),
            TransformationDomain::PlaneZX => Some((Vec3::Z, Vec3::X)),
            _ => None,
        }
    }

    /// Per-component mask of the axes this domain moves along (1.0 = affected)
    pub fn mask(&self) -> Vec3 {
        match self {
            TransformationDomain::None => Vec3::ZERO,
            TransformationDomain::AxisX => Vec3::X,
            TransformationDomain::AxisY => Vec3::Y,
            TransformationDomain::AxisZ => Vec3::Z,
            TransformationDomain::PlaneXY => Vec3::new(1.0, 1.0, 0.0),
            TransformationDomain::PlaneYZ => Vec3::new(0.0, 1.0, 1.0),
            TransformationDomain::PlaneZX => Vec3::new(1.0, 0.0, 1.0),
            TransformationDomain::Uniform => Vec3::ONE,
        }
    }
}

/// Coordinate space the gizmo axes are expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpaceType {
    #[default]
    World,
    Local,
}

/// Whether a scene component may be moved at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mobility {
    #[default]
    Movable,
    Fixed,
}
