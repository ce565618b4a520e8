//! Snapping engine
//!
//! Two operations:
//!
//! - [`snap_accumulated`] quantizes the per-tick delta of the whole gizmo. The
//!   unconsumed remainder is kept in a residue delta so slow pointer motion
//!   still adds up to whole steps and nothing drifts across ticks.
//! - [`snap_per_component`] snaps the absolute transform of one selected
//!   object after the delta was composed onto it.
//!
//! Rotation steps are in degrees; translation and scale steps in world units.

use glam::{Quat, Vec3};
use rt_core::{Transform, TransformDelta, TransformationDomain, TransformationKind};

/// Components changing by less than this are considered unchanged
const CHANGE_EPSILON: f32 = 1e-6;

/// Round to the nearest multiple of `step`
pub fn snap_to_step(value: f32, step: f32) -> f32 {
    (value / step + 0.5).floor() * step
}

/// Whether snapping should run for a step value
pub fn is_active_step(step: f32) -> bool {
    step != 0.0 && step.is_finite()
}

/// Add `raw` to `residue` and emit the part of it that fills whole steps.
///
/// `frame` is the gizmo orientation: translation and scale are snapped along
/// the gizmo axes selected by `domain`. The emitted amount is removed from the
/// residue. A zero step or a `None` domain passes `raw` through untouched.
pub fn snap_accumulated(
    kind: TransformationKind,
    frame: Quat,
    residue: &mut TransformDelta,
    raw: &TransformDelta,
    domain: TransformationDomain,
    step: f32,
) -> TransformDelta {
    if !is_active_step(step) || domain.is_none() {
        return *raw;
    }

    match kind {
        TransformationKind::Translation => {
            residue.translation += raw.translation;
            let snapped = snap_in_frame(residue.translation, frame, domain.mask(), step);
            residue.translation -= snapped;
            TransformDelta::from_translation(snapped)
        }
        TransformationKind::Scale => {
            residue.scale += raw.scale;
            let snapped = snap_in_frame(residue.scale, frame, domain.mask(), step);
            residue.scale -= snapped;
            TransformDelta::from_scale(snapped)
        }
        TransformationKind::Rotation => {
            residue.rotation = (raw.rotation * residue.rotation).normalize();
            let (axis, angle) = signed_axis_angle(residue.rotation);

            let snapped_degrees = snap_to_step(angle.to_degrees(), step);
            if snapped_degrees == 0.0 {
                return TransformDelta::ZERO;
            }

            let snapped = Quat::from_axis_angle(axis, snapped_degrees.to_radians());
            residue.rotation = (snapped.inverse() * residue.rotation).normalize();
            TransformDelta::from_rotation(snapped)
        }
        TransformationKind::NoTransform => *raw,
    }
}

/// Snap an object's new absolute transform to the world grid.
///
/// Only components that changed relative to `current` are snapped, so an
/// object dragged along one axis keeps its other coordinates. Scale is
/// snapped in the object's local frame only, world space non-uniform scale is
/// not supported.
///
/// Rotation passes through for every kind, including `Rotation`: rotation
/// deltas are already quantized to whole steps by [`snap_accumulated`], and
/// snapping absolute orientations would fight that.
pub fn snap_per_component(
    kind: TransformationKind,
    current: &Transform,
    candidate: &Transform,
    domain: TransformationDomain,
    step: f32,
) -> Transform {
    if !is_active_step(step) || domain.is_none() {
        return *candidate;
    }

    let mut result = *candidate;
    match kind {
        TransformationKind::Translation => {
            result.translation = snap_changed(current.translation, candidate.translation, step);
        }
        TransformationKind::Scale => {
            result.scale = snap_changed(current.scale, candidate.scale, step);
        }
        TransformationKind::Rotation | TransformationKind::NoTransform => {}
    }
    result
}

fn snap_in_frame(world: Vec3, frame: Quat, mask: Vec3, step: f32) -> Vec3 {
    let local = frame.inverse() * world;
    let snapped = Vec3::new(
        snap_to_step(local.x, step),
        snap_to_step(local.y, step),
        snap_to_step(local.z, step),
    ) * mask;
    frame * snapped
}

fn snap_changed(current: Vec3, candidate: Vec3, step: f32) -> Vec3 {
    let mut out = candidate;
    for i in 0..3 {
        if (candidate[i] - current[i]).abs() > CHANGE_EPSILON {
            out[i] = snap_to_step(candidate[i], step);
        }
    }
    out
}

/// Axis and angle in (-π, π]
fn signed_axis_angle(rotation: Quat) -> (Vec3, f32) {
    let (axis, mut angle) = rotation.to_axis_angle();
    if angle > std::f32::consts::PI {
        angle -= std::f32::consts::TAU;
    }
    (axis, angle)
}
