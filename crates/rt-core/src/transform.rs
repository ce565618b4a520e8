//! Placements and per-tick transform deltas

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

const ROTATION_EPSILON: f32 = 1e-6;

/// Translation, rotation and non-uniform scale of a scene node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// Identity placement (unit scale)
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn from_rotation_translation(rotation: Quat, translation: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale: Vec3::ONE,
        }
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    pub fn from_mat4(matrix: Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Resolve a transform expressed relative to `parent` into world space
    pub fn relative_to_world(&self, parent: &Transform) -> Transform {
        Self::from_mat4(parent.to_mat4() * self.to_mat4())
    }

    /// Express a world transform relative to `parent`
    pub fn world_to_relative(&self, parent: &Transform) -> Transform {
        Self::from_mat4(parent.to_mat4().inverse() * self.to_mat4())
    }

    /// Transform a point from local into the space of this transform
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.translation + self.rotation * (self.scale * point)
    }
}

/// Change in translation, rotation and scale for one tick or one session.
///
/// The zero delta has a **zero** scale: scale deltas are added onto a base
/// scale, never multiplied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformDelta {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for TransformDelta {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TransformDelta {
    /// No change: zero translation, identity rotation, zero scale
    pub const ZERO: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ZERO,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::ZERO
        }
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::ZERO
        }
    }

    pub fn from_scale(scale: Vec3) -> Self {
        Self {
            scale,
            ..Self::ZERO
        }
    }

    /// Whether this delta changes nothing
    pub fn is_zero(&self) -> bool {
        self.translation == Vec3::ZERO
            && self.scale == Vec3::ZERO
            && (self.rotation.w.abs() - 1.0).abs() < ROTATION_EPSILON
    }

    /// Fold `other` into this delta (rotation is applied after the current one)
    pub fn accumulate(&mut self, other: &TransformDelta) {
        self.translation += other.translation;
        self.rotation = (other.rotation * self.rotation).normalize();
        self.scale += other.scale;
    }

    /// Reset to the zero sentinel
    pub fn reset(&mut self) {
        *self = Self::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_delta_has_zero_scale() {
        let delta = TransformDelta::default();
        assert_eq!(delta.scale, Vec3::ZERO);
        assert_eq!(delta.rotation, Quat::IDENTITY);
        assert!(delta.is_zero());
    }

    #[test]
    fn test_accumulate_adds_translation_and_scale() {
        let mut delta = TransformDelta::from_translation(Vec3::X);
        delta.accumulate(&TransformDelta::from_scale(Vec3::splat(0.5)));
        delta.accumulate(&TransformDelta::from_translation(Vec3::Y));
        assert_eq!(delta.translation, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(delta.scale, Vec3::splat(0.5));
        assert!(!delta.is_zero());
    }

    #[test]
    fn test_relative_world_roundtrip() {
        let parent = Transform::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
            Vec3::ONE,
        );
        let child = Transform::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let world = child.relative_to_world(&parent);
        assert!(world.translation.abs_diff_eq(Vec3::new(1.0, 3.0, 3.0), 1e-5));

        let back = world.world_to_relative(&parent);
        assert!(back.translation.abs_diff_eq(child.translation, 1e-5));
    }
}
