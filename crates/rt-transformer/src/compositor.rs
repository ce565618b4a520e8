//! Applying one delta to the whole selection
//!
//! The delta is shared, the resulting transforms are not: each object keeps
//! its own offset from the gizmo and its own rotation.

use glam::Vec3;
use rt_core::{
    ComponentId, Mobility, SceneGraph, Transform, TransformDelta, TransformationDomain,
    TransformationKind, focus_hook,
};
use rt_gizmo::snap_per_component;

/// Mode flags for [`apply_delta`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeOptions {
    pub kind: TransformationKind,
    pub domain: TransformationDomain,
    /// Pivot of rotations
    pub gizmo_location: Vec3,
    pub rotate_on_local_axis: bool,
    pub force_mobility: bool,
    pub component_based: bool,
    pub transform_focusable_objects: bool,
    /// Per-object snap step, `None` when snapping is off
    pub snap_step: Option<f32>,
}

/// Outcome of applying a delta
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositeReport {
    pub applied: Vec<ComponentId>,
    /// Fixed objects that were left untouched
    pub skipped: Vec<ComponentId>,
}

/// Compose a delta onto an object's world transform.
///
/// The object's offset from the pivot is rotated by the delta rotation so the
/// object orbits the pivot, unless `rotate_on_local_axis` is set, in which
/// case it spins in place. The delta scale is taken into the object's local
/// frame and added to its scale.
pub fn compose(
    current: &Transform,
    delta: &TransformDelta,
    pivot: Vec3,
    rotate_on_local_axis: bool,
) -> Transform {
    let mut offset = current.translation - pivot;
    if !rotate_on_local_axis {
        offset = delta.rotation * offset;
    }

    Transform {
        translation: offset + pivot + delta.translation,
        rotation: (delta.rotation * current.rotation).normalize(),
        scale: current.scale + current.rotation.inverse() * delta.scale,
    }
}

/// Apply `delta` to every selected object.
///
/// Missing objects are ignored. Fixed objects are skipped with a warning
/// unless `force_mobility` is set, which permanently makes them movable.
/// Objects with a focus hook are told about their new transform first and
/// only moved when `transform_focusable_objects` is set.
pub fn apply_delta(
    scene: &mut dyn SceneGraph,
    selection: &[ComponentId],
    delta: &TransformDelta,
    options: &CompositeOptions,
) -> CompositeReport {
    let mut report = CompositeReport::default();

    for &component in selection {
        let (Some(current), Some(mobility)) =
            (scene.world_transform(component), scene.mobility(component))
        else {
            continue;
        };

        if mobility == Mobility::Fixed && !options.force_mobility {
            tracing::warn!(
                "Transform will not affect {} as it is not movable",
                component
            );
            report.skipped.push(component);
            continue;
        }

        let mut new_transform = compose(
            &current,
            delta,
            options.gizmo_location,
            options.rotate_on_local_axis,
        );
        if let Some(step) = options.snap_step {
            new_transform =
                snap_per_component(options.kind, &current, &new_transform, options.domain, step);
        }

        scene.set_mobility(component, Mobility::Movable);
        commit(scene, component, new_transform, options);
        report.applied.push(component);
    }

    report
}

fn commit(
    scene: &mut dyn SceneGraph,
    component: ComponentId,
    transform: Transform,
    options: &CompositeOptions,
) {
    match focus_hook(&*scene, component, options.component_based) {
        Some(hook) => {
            hook.on_new_transform(component, &transform, options.component_based);
            if options.transform_focusable_objects {
                scene.set_world_transform(component, transform);
            }
        }
        None => scene.set_world_transform(component, transform),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glam::Quat;
    use parking_lot::Mutex;
    use rt_core::{Focusable, Scene};

    use super::*;

    #[derive(Default)]
    struct TransformLog {
        transforms: Mutex<Vec<Transform>>,
    }

    impl Focusable for TransformLog {
        fn on_new_transform(&self, _component: ComponentId, transform: &Transform, _component_based: bool) {
            self.transforms.lock().push(*transform);
        }
    }

    fn options() -> CompositeOptions {
        CompositeOptions {
            kind: TransformationKind::Translation,
            domain: TransformationDomain::AxisX,
            gizmo_location: Vec3::ZERO,
            rotate_on_local_axis: false,
            force_mobility: false,
            component_based: false,
            transform_focusable_objects: true,
            snap_step: None,
        }
    }

    fn spawn(scene: &mut Scene, at: Vec3) -> ComponentId {
        let actor = scene.spawn_actor("obj", Transform::from_translation(at));
        scene.root_component(actor).unwrap()
    }

    #[test]
    fn test_fixed_object_is_skipped() {
        let mut scene = Scene::new();
        let a = spawn(&mut scene, Vec3::new(0.0, 1.0, 0.0));
        let b = spawn(&mut scene, Vec3::new(0.0, 2.0, 0.0));
        scene.set_mobility(b, Mobility::Fixed);

        let delta = TransformDelta::from_translation(Vec3::X);
        let report = apply_delta(&mut scene, &[a, b], &delta, &options());

        assert_eq!(report.applied, vec![a]);
        assert_eq!(report.skipped, vec![b]);
        let moved = scene.world_transform(a).unwrap();
        assert!(moved.translation.abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-5));
        assert_eq!(
            scene.world_transform(b).unwrap().translation,
            Vec3::new(0.0, 2.0, 0.0)
        );
        assert_eq!(scene.mobility(b), Some(Mobility::Fixed));
    }

    #[test]
    fn test_force_mobility_overrides_permanently() {
        let mut scene = Scene::new();
        let b = spawn(&mut scene, Vec3::ZERO);
        scene.set_mobility(b, Mobility::Fixed);

        let opts = CompositeOptions {
            force_mobility: true,
            ..options()
        };
        let report = apply_delta(&mut scene, &[b], &TransformDelta::from_translation(Vec3::X), &opts);
        assert_eq!(report.applied, vec![b]);
        assert_eq!(scene.mobility(b), Some(Mobility::Movable));
    }

    #[test]
    fn test_colocated_rotation_keeps_translation() {
        let current = Transform::from_translation(Vec3::new(2.0, 3.0, 4.0));
        let delta = TransformDelta::from_rotation(Quat::from_rotation_z(0.7));
        let out = compose(&current, &delta, current.translation, false);

        assert!(out.translation.abs_diff_eq(current.translation, 1e-5));
        assert!(out.rotation.abs_diff_eq(Quat::from_rotation_z(0.7), 1e-5));
        assert_eq!(out.scale, Vec3::ONE);
    }

    #[test]
    fn test_rotation_orbits_pivot() {
        let current = Transform::from_translation(Vec3::X);
        let delta = TransformDelta::from_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));

        let orbit = compose(&current, &delta, Vec3::ZERO, false);
        assert!(orbit.translation.abs_diff_eq(Vec3::Y, 1e-5));

        let spin = compose(&current, &delta, Vec3::ZERO, true);
        assert!(spin.translation.abs_diff_eq(Vec3::X, 1e-5));
        assert!(spin.rotation.abs_diff_eq(orbit.rotation, 1e-5));
    }

    #[test]
    fn test_scale_delta_goes_to_local_frame() {
        let rotation = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let current = Transform::from_rotation_translation(rotation, Vec3::ZERO);
        // World Y is the object's local X
        let delta = TransformDelta::from_scale(Vec3::new(0.0, 0.5, 0.0));
        let out = compose(&current, &delta, Vec3::ZERO, false);
        assert!(out.scale.abs_diff_eq(Vec3::new(1.5, 1.0, 1.0), 1e-5));
    }

    #[test]
    fn test_per_object_snap_applied() {
        let mut scene = Scene::new();
        let a = spawn(&mut scene, Vec3::new(0.3, 0.0, 0.0));
        let opts = CompositeOptions {
            snap_step: Some(1.0),
            ..options()
        };
        apply_delta(&mut scene, &[a], &TransformDelta::from_translation(Vec3::X), &opts);
        let moved = scene.world_transform(a).unwrap();
        assert!(moved.translation.abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn test_focusable_notified_but_not_moved_when_disabled() {
        let mut scene = Scene::new();
        let a = spawn(&mut scene, Vec3::ZERO);
        let log = Arc::new(TransformLog::default());
        let actor = scene.owner(a).unwrap();
        scene.set_actor_focusable(actor, log.clone()).unwrap();

        let opts = CompositeOptions {
            transform_focusable_objects: false,
            ..options()
        };
        apply_delta(&mut scene, &[a], &TransformDelta::from_translation(Vec3::X), &opts);

        assert_eq!(scene.world_transform(a).unwrap().translation, Vec3::ZERO);
        let seen = log.transforms.lock();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].translation.abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn test_missing_objects_are_ignored() {
        let mut scene = Scene::new();
        let a = spawn(&mut scene, Vec3::ZERO);
        let report = apply_delta(
            &mut scene,
            &[ComponentId::generate(), a],
            &TransformDelta::from_translation(Vec3::Z),
            &options(),
        );
        assert_eq!(report.applied, vec![a]);
        assert!(report.skipped.is_empty());
    }
}
