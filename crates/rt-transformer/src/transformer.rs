//! The transformer: selection, gizmo lifecycle and per-tick manipulation
//!
//! One `Transformer` drives one manipulation context. Several can coexist
//! (for example one per local player); none of their state is global.

use std::sync::Arc;

use glam::Vec3;
use parking_lot::Mutex;
use rt_core::{
    ActorId, ComponentId, HitObject, HitRecord, RayFilter, RayQuery, SceneGraph, SelectionFilter,
    SelectionManager, SpaceType, TransformDelta, TransformationDomain, TransformationKind,
    clone_selection,
};
use rt_gizmo::{DragSession, Gizmo, GizmoPool, snap_accumulated};

use crate::compositor::{CompositeOptions, CompositeReport, apply_delta};
use crate::config::{GizmoPlacement, TransformerConfig};
use crate::events::TransformerEvent;

/// Camera and pointer state for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub camera_location: Vec3,
    pub camera_forward: Vec3,
    pub fov_degrees: f32,
    /// World-space pointer ray as `(origin, direction)`, if the pointer is over the view
    pub pointer_ray: Option<(Vec3, Vec3)>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            camera_location: Vec3::new(0.0, -10.0, 5.0),
            camera_forward: Vec3::Y,
            fov_degrees: 60.0,
            pointer_ray: None,
        }
    }
}

/// Shared transformer handle
pub type SharedTransformer = Arc<Mutex<Transformer>>;

/// Create a new shared transformer
pub fn create_shared_transformer(config: TransformerConfig) -> SharedTransformer {
    Arc::new(Mutex::new(Transformer::new(config)))
}

/// Selection and manipulation state of one user
#[derive(Debug)]
pub struct Transformer {
    config: TransformerConfig,
    selection: SelectionManager,
    gizmos: GizmoPool,
    domain: TransformationDomain,
    session: DragSession,
    /// Unconsumed snap remainder of the current session
    residue: TransformDelta,
    events: Vec<TransformerEvent>,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new(TransformerConfig::default())
    }
}

impl Transformer {
    pub fn new(config: TransformerConfig) -> Self {
        if config.kind == TransformationKind::NoTransform {
            tracing::warn!("Transformation kind is set to NoTransform");
        }
        Self {
            selection: SelectionManager::new(
                config.component_based,
                config.toggle_selected_in_multi_selection,
            ),
            gizmos: GizmoPool::new(config.gizmo.clone()),
            domain: TransformationDomain::None,
            session: DragSession::new(),
            residue: TransformDelta::ZERO,
            events: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &TransformerConfig {
        &self.config
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn gizmos(&self) -> &GizmoPool {
        &self.gizmos
    }

    /// The visible gizmo, if anything is selected
    pub fn active_gizmo(&self) -> Option<&Gizmo> {
        self.gizmos.active()
    }

    /// Snap remainder carried by the current session
    pub fn snap_residue(&self) -> &TransformDelta {
        &self.residue
    }

    /// Create all gizmos up front, hidden
    pub fn prewarm_gizmos(&mut self) {
        self.gizmos.prewarm();
    }

    /// Drop all pooled gizmos
    pub fn clear_gizmos(&mut self) {
        self.gizmos.clear();
    }

    // ========== Domain ==========

    /// Active domain and whether a manipulation is in progress
    pub fn current_domain(&self) -> (TransformationDomain, bool) {
        (self.domain, !self.domain.is_none())
    }

    /// End the current manipulation without applying anything further
    pub fn clear_domain(&mut self) {
        self.residue.reset();
        self.set_domain(TransformationDomain::None);
    }

    /// Set the active domain.
    ///
    /// Entering a new non-`None` domain starts a fresh session: the previous
    /// ray sample and the snap residue are dropped.
    pub fn set_domain(&mut self, domain: TransformationDomain) {
        let previous = self.domain;
        self.domain = domain;

        if domain.is_none() {
            self.session.reset();
        } else if domain != previous {
            self.session.reset();
            self.residue.reset();
            tracing::debug!("Started {:?} session", domain);
        }

        self.sync_progress_state();
    }

    fn sync_progress_state(&mut self) {
        let domain = self.domain;
        if let Some(gizmo) = self.gizmos.active_mut()
            && gizmo.set_transform_progress_state(!domain.is_none(), domain)
        {
            let (in_progress, domain) = gizmo.progress_state();
            self.events.push(TransformerEvent::GizmoStateChanged {
                kind: gizmo.kind(),
                in_progress,
                domain,
            });
        }
    }

    // ========== Tracing ==========

    /// Cast a ray through the scene and the active gizmo, then handle the hits
    pub fn trace<S>(
        &mut self,
        scene: &S,
        ray_origin: Vec3,
        ray_dir: Vec3,
        filter: &RayFilter,
        append: bool,
    ) -> bool
    where
        S: SceneGraph + RayQuery,
    {
        let mut hits = scene.cast_ray(ray_origin, ray_dir, filter);
        if let Some(gizmo) = self.gizmos.active()
            && let Some(hit) = gizmo.pick(ray_origin, ray_dir)
            && hit.distance <= filter.max_distance
        {
            hits.push(gizmo.hit_record(&hit));
        }
        self.handle_traced_hits(scene, &hits, append)
    }

    /// React to the hits of a pointer ray.
    ///
    /// The active gizmo is looked for first: a tagged handle starts a
    /// manipulation. Otherwise the first hit that is not a gizmo is selected,
    /// as a component or as an actor depending on the mode. Returns true if a
    /// manipulation started or a selection was attempted.
    pub fn handle_traced_hits(
        &mut self,
        scene: &dyn SceneGraph,
        hits: &[HitRecord],
        append: bool,
    ) -> bool {
        self.clear_domain();

        if let Some(gizmo) = self.gizmos.active() {
            let gizmo_id = gizmo.id();
            let domain = hits
                .iter()
                .filter_map(|hit| match hit.object {
                    HitObject::Gizmo { gizmo: id, handle } if id == gizmo_id => Some(handle),
                    _ => None,
                })
                .map(|handle| gizmo.transformation_domain(handle))
                .find(|domain| !domain.is_none());

            if let Some(domain) = domain {
                self.set_domain(domain);
                return true;
            }
        }

        for hit in hits {
            match hit.object {
                HitObject::Gizmo { .. } => continue,
                HitObject::Component { actor, component } => {
                    if self.selection.component_based() {
                        self.select_component(scene, component, append);
                    } else {
                        self.select_actor(scene, actor, append);
                    }
                    return true;
                }
            }
        }
        false
    }

    // ========== Selection ==========

    pub fn select_component(
        &mut self,
        scene: &dyn SceneGraph,
        component: ComponentId,
        append: bool,
    ) {
        self.selection.select_component(scene, component, append);
        self.update_gizmo_placement(scene);
    }

    pub fn select_actor(&mut self, scene: &dyn SceneGraph, actor: ActorId, append: bool) {
        self.selection.select_actor(scene, actor, append);
        self.update_gizmo_placement(scene);
    }

    pub fn select_multiple_components(
        &mut self,
        scene: &dyn SceneGraph,
        components: &[ComponentId],
        append: bool,
    ) {
        if self
            .selection
            .select_multiple_components(scene, components, append)
        {
            self.update_gizmo_placement(scene);
        }
    }

    pub fn select_multiple_actors(
        &mut self,
        scene: &dyn SceneGraph,
        actors: &[ActorId],
        append: bool,
    ) {
        if self.selection.select_multiple_actors(scene, actors, append) {
            self.update_gizmo_placement(scene);
        }
    }

    pub fn deselect_component(&mut self, scene: &dyn SceneGraph, component: ComponentId) {
        self.selection.deselect_component(scene, component);
        self.update_gizmo_placement(scene);
    }

    pub fn deselect_actor(&mut self, scene: &dyn SceneGraph, actor: ActorId) {
        self.selection.deselect_actor(scene, actor);
        self.update_gizmo_placement(scene);
    }

    /// Clear the selection, optionally destroying what was selected
    pub fn deselect_all(&mut self, scene: &mut dyn SceneGraph, destroy: bool) -> Vec<ComponentId> {
        let previous = self.selection.deselect_all(scene, destroy);
        self.update_gizmo_placement(&*scene);
        previous
    }

    /// Selected components and the component the gizmo is placed on
    pub fn selected_components(&self) -> (Vec<ComponentId>, Option<ComponentId>) {
        let target = self.gizmos.active().and_then(|g| g.attached_to());
        (self.selection.selected(), target)
    }

    pub fn set_selection_filter(&mut self, filter: Option<SelectionFilter>) {
        self.selection.set_filter(filter);
    }

    pub fn set_component_based(&mut self, scene: &dyn SceneGraph, component_based: bool) {
        self.config.component_based = component_based;
        self.selection.set_component_based(scene, component_based);
        self.update_gizmo_placement(scene);
    }

    pub fn set_toggle_selected_in_multi_selection(&mut self, toggle: bool) {
        self.config.toggle_selected_in_multi_selection = toggle;
        self.selection.set_toggle_on_reselect(toggle);
    }

    /// Duplicate the selection, optionally selecting the clones
    pub fn clone_selected(
        &mut self,
        scene: &mut dyn SceneGraph,
        select_new_clones: bool,
        append: bool,
    ) -> Vec<ComponentId> {
        let selected = self.selection.selected();
        let clones = clone_selection(scene, &selected, self.selection.component_based());
        tracing::debug!("Cloned {} selected objects", clones.len());

        if select_new_clones {
            self.select_multiple_components(&*scene, &clones, append);
        }
        self.sync_progress_state();
        clones
    }

    // ========== Modes ==========

    /// Switch the transformation kind, dropping the snap residue
    pub fn set_transformation_kind(&mut self, scene: &dyn SceneGraph, kind: TransformationKind) {
        if self.config.kind == kind {
            return;
        }
        if kind == TransformationKind::NoTransform {
            tracing::warn!("Transformation kind is set to NoTransform");
        }

        self.config.kind = kind;
        self.residue.reset();
        self.session.reset();
        self.update_gizmo_placement(scene);
    }

    pub fn set_space_type(&mut self, space: SpaceType) {
        self.config.space = space;
        if let Some(gizmo) = self.gizmos.active_mut() {
            gizmo.update_space(space);
        }
    }

    pub fn set_gizmo_placement(&mut self, scene: &dyn SceneGraph, placement: GizmoPlacement) {
        self.config.placement = placement;
        self.update_gizmo_placement(scene);
    }

    pub fn set_attach_socket(&mut self, scene: &dyn SceneGraph, socket: Option<String>) {
        self.config.attach_socket = socket;
        self.update_gizmo_placement(scene);
    }

    pub fn set_rotate_on_local_axis(&mut self, rotate_on_local_axis: bool) {
        self.config.rotate_on_local_axis = rotate_on_local_axis;
    }

    pub fn set_force_mobility(&mut self, force_mobility: bool) {
        self.config.force_mobility = force_mobility;
    }

    pub fn set_transform_focusable_objects(&mut self, transform: bool) {
        self.config.transform_focusable_objects = transform;
    }

    pub fn set_snapping_enabled(&mut self, kind: TransformationKind, enabled: bool) {
        self.config.snap.set_enabled(kind, enabled);
    }

    pub fn set_snapping_value(&mut self, kind: TransformationKind, value: f32) {
        self.config.snap.set_value(kind, value);
    }

    // ========== Manipulation ==========

    /// Compute, snap and apply this tick's delta.
    ///
    /// Returns the delta that was applied; the zero delta when no
    /// manipulation is in progress or no gizmo is active.
    pub fn update_transform(
        &mut self,
        scene: &mut dyn SceneGraph,
        looking: Vec3,
        ray_origin: Vec3,
        ray_dir: Vec3,
    ) -> TransformDelta {
        let domain = self.domain;
        if domain.is_none() {
            return TransformDelta::ZERO;
        }
        let Some(gizmo) = self.gizmos.active() else {
            return TransformDelta::ZERO;
        };

        let raw = gizmo.delta_transform(&mut self.session, looking, ray_origin, ray_dir, domain);
        let delta = match self.config.snap.step(self.config.kind) {
            Some(step) => snap_accumulated(
                self.config.kind,
                gizmo.rotation(),
                &mut self.residue,
                &raw,
                domain,
                step,
            ),
            None => raw,
        };

        if !delta.is_zero() {
            self.apply_delta_transform(scene, &delta);
        }
        delta
    }

    /// Apply a delta to the whole selection around the active gizmo
    pub fn apply_delta_transform(
        &mut self,
        scene: &mut dyn SceneGraph,
        delta: &TransformDelta,
    ) -> CompositeReport {
        let Some(gizmo_location) = self.gizmos.active().map(|g| g.location()) else {
            return CompositeReport::default();
        };

        let options = CompositeOptions {
            kind: self.config.kind,
            domain: self.domain,
            gizmo_location,
            rotate_on_local_axis: self.config.rotate_on_local_axis,
            force_mobility: self.config.force_mobility,
            component_based: self.selection.component_based(),
            transform_focusable_objects: self.config.transform_focusable_objects,
            snap_step: self.config.snap.step(self.config.kind),
        };
        let selected = self.selection.selected();
        let report = apply_delta(scene, &selected, delta, &options);

        self.events.extend(
            report
                .skipped
                .iter()
                .map(|&component| TransformerEvent::ImmovableSkipped { component }),
        );
        if let Some(gizmo) = self.gizmos.active_mut() {
            gizmo.follow_target(&*scene);
        }
        report
    }

    /// Per-frame driver: manipulate with the pointer ray, then keep the gizmo
    /// on its target, sized to the view and in the configured space.
    pub fn tick(&mut self, scene: &mut dyn SceneGraph, view: &ViewState) -> TransformDelta {
        if self.selection.prune_missing(&*scene) {
            self.update_gizmo_placement(&*scene);
        }
        if self.gizmos.active().is_none() {
            return TransformDelta::ZERO;
        }

        let delta = match view.pointer_ray {
            Some((origin, dir)) => self.update_transform(scene, view.camera_forward, origin, dir),
            None => TransformDelta::ZERO,
        };

        let space = self.config.space;
        if let Some(gizmo) = self.gizmos.active_mut() {
            gizmo.follow_target(&*scene);
            gizmo.scale_to_view(view.camera_location, view.camera_forward, view.fov_degrees);
            gizmo.update_space(space);
        }
        delta
    }

    // ========== Gizmo placement ==========

    /// Show the gizmo of the current kind on the configured selection entry,
    /// or hide it when nothing is selected.
    fn update_gizmo_placement(&mut self, scene: &dyn SceneGraph) {
        let target = match self.config.placement {
            GizmoPlacement::First => self.selection.first(),
            GizmoPlacement::Last => self.selection.last(),
            GizmoPlacement::None => {
                if !self.selection.is_empty() {
                    tracing::warn!("Gizmo placement is None, using the last selection");
                }
                self.selection.last()
            }
        };

        let has_selection = !self.selection.is_empty();
        if let Some(gizmo) = self.gizmos.sync(has_selection, self.config.kind) {
            if let Some(target) = target {
                gizmo.attach_to(scene, target, self.config.attach_socket.as_deref());
            }
            gizmo.update_space(self.config.space);
        }

        self.flush_selection_changes();
        if !self.domain.is_none() {
            self.sync_progress_state();
        }
    }

    fn flush_selection_changes(&mut self) {
        self.events.extend(
            self.selection
                .drain_changes()
                .into_iter()
                .map(TransformerEvent::from),
        );
    }

    /// Take all queued notifications
    pub fn drain_events(&mut self) -> Vec<TransformerEvent> {
        self.flush_selection_changes();
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use rt_core::{Mobility, Scene, Transform};

    use super::*;

    fn spawn(scene: &mut Scene, name: &str, at: Vec3) -> (ActorId, ComponentId) {
        let actor = scene.spawn_actor(name, Transform::from_translation(at));
        let root = scene.root_component(actor).unwrap();
        (actor, root)
    }

    fn down_at(x: f32, y: f32) -> (Vec3, Vec3) {
        (Vec3::new(x, y, 10.0), Vec3::NEG_Z)
    }

    #[test]
    fn test_axis_x_drag_with_snapping() {
        let mut scene = Scene::new();
        let (actor, root) = spawn(&mut scene, "box", Vec3::ZERO);

        let mut transformer = Transformer::default();
        transformer.set_snapping_enabled(TransformationKind::Translation, true);
        transformer.set_snapping_value(TransformationKind::Translation, 1.0);
        transformer.select_actor(&scene, actor, false);

        let (origin, dir) = down_at(0.5, 0.0);
        assert!(transformer.trace(&scene, origin, dir, &RayFilter::default(), false));
        assert_eq!(
            transformer.current_domain(),
            (TransformationDomain::AxisX, true)
        );

        let (origin, dir) = down_at(2.0, 0.0);
        let first = transformer.update_transform(&mut scene, Vec3::NEG_Z, origin, dir);
        assert!(first.is_zero());

        let (origin, dir) = down_at(5.0, 0.0);
        let delta = transformer.update_transform(&mut scene, Vec3::NEG_Z, origin, dir);
        assert!(delta.translation.abs_diff_eq(Vec3::new(3.0, 0.0, 0.0), 1e-4));
        assert!(
            transformer
                .snap_residue()
                .translation
                .abs_diff_eq(Vec3::ZERO, 1e-4)
        );

        let moved = scene.world_transform(root).unwrap();
        assert!(moved.translation.abs_diff_eq(Vec3::new(3.0, 0.0, 0.0), 1e-4));
        let gizmo = transformer.active_gizmo().unwrap();
        assert!(gizmo.location().abs_diff_eq(moved.translation, 1e-4));
    }

    #[test]
    fn test_fixed_object_reports_skip() {
        let mut scene = Scene::new();
        let (a_actor, a) = spawn(&mut scene, "a", Vec3::new(0.0, 1.0, 0.0));
        let (b_actor, b) = spawn(&mut scene, "b", Vec3::new(0.0, 2.0, 0.0));
        scene.set_mobility(b, Mobility::Fixed);

        let mut transformer = Transformer::default();
        transformer.select_actor(&scene, a_actor, false);
        transformer.select_actor(&scene, b_actor, true);
        assert_eq!(transformer.selected_components(), (vec![a, b], Some(b)));

        transformer.set_domain(TransformationDomain::AxisX);
        let (origin, dir) = down_at(0.0, 2.0);
        transformer.update_transform(&mut scene, Vec3::NEG_Z, origin, dir);
        let (origin, dir) = down_at(1.0, 2.0);
        transformer.update_transform(&mut scene, Vec3::NEG_Z, origin, dir);

        let a_now = scene.world_transform(a).unwrap().translation;
        assert!(a_now.abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-4));
        assert_eq!(
            scene.world_transform(b).unwrap().translation,
            Vec3::new(0.0, 2.0, 0.0)
        );

        let events = transformer.drain_events();
        assert!(events.contains(&TransformerEvent::ImmovableSkipped { component: b }));
    }

    #[test]
    fn test_reselect_toggles_and_hides_gizmo() {
        let mut scene = Scene::new();
        let (actor, root) = spawn(&mut scene, "a", Vec3::ZERO);

        let mut transformer = Transformer::default();
        transformer.select_actor(&scene, actor, false);
        assert!(transformer.active_gizmo().is_some());

        transformer.select_actor(&scene, actor, false);
        assert!(transformer.selection().is_empty());
        assert!(transformer.active_gizmo().is_none());

        let events = transformer.drain_events();
        assert_eq!(
            events,
            vec![
                TransformerEvent::SelectionChanged {
                    component: root,
                    selected: true,
                    implements_focusable: false,
                },
                TransformerEvent::SelectionChanged {
                    component: root,
                    selected: false,
                    implements_focusable: false,
                },
            ]
        );
    }

    #[test]
    fn test_trace_prefers_gizmo_over_nearer_object() {
        let mut scene = Scene::new();
        let (actor, root) = spawn(&mut scene, "ball", Vec3::ZERO);
        scene.set_bounds(root, 0.6).unwrap();

        let mut transformer = Transformer::default();
        transformer.select_actor(&scene, actor, false);

        let (origin, dir) = down_at(0.5, 0.0);
        assert!(transformer.trace(&scene, origin, dir, &RayFilter::default(), false));
        assert_eq!(transformer.current_domain().0, TransformationDomain::AxisX);
        assert_eq!(transformer.selection().selected(), &[root]);

        // Empty space clears the manipulation but keeps the selection
        let (origin, dir) = down_at(20.0, 20.0);
        assert!(!transformer.trace(&scene, origin, dir, &RayFilter::default(), false));
        assert_eq!(
            transformer.current_domain(),
            (TransformationDomain::None, false)
        );
        assert_eq!(transformer.selection().selected(), &[root]);
    }

    #[test]
    fn test_trace_selects_first_object_hit() {
        let mut scene = Scene::new();
        let (near_actor, near) = spawn(&mut scene, "near", Vec3::new(0.0, 0.0, 2.0));
        let (_, far) = spawn(&mut scene, "far", Vec3::ZERO);
        scene.set_bounds(near, 0.5).unwrap();
        scene.set_bounds(far, 0.5).unwrap();

        let mut transformer = Transformer::default();
        let (origin, dir) = down_at(0.0, 0.0);
        assert!(transformer.trace(&scene, origin, dir, &RayFilter::default(), false));
        assert_eq!(transformer.selection().selected(), &[near]);

        // Ignoring the near actor lets the ray reach the far one
        let mut other = Transformer::default();
        let filter = RayFilter::default().ignoring(near_actor);
        assert!(other.trace(&scene, origin, dir, &filter, false));
        assert_eq!(other.selection().selected(), &[far]);
    }

    #[test]
    fn test_kind_switch_swaps_gizmo() {
        let mut scene = Scene::new();
        let (actor, _) = spawn(&mut scene, "a", Vec3::ZERO);

        let mut transformer = Transformer::default();
        transformer.select_actor(&scene, actor, false);
        assert_eq!(
            transformer.gizmos().active_kind(),
            Some(TransformationKind::Translation)
        );

        transformer.set_transformation_kind(&scene, TransformationKind::Rotation);
        assert_eq!(
            transformer.gizmos().active_kind(),
            Some(TransformationKind::Rotation)
        );
        assert_eq!(transformer.gizmos().visible_count(), 1);

        transformer.set_transformation_kind(&scene, TransformationKind::NoTransform);
        assert!(transformer.active_gizmo().is_none());
        assert_eq!(transformer.gizmos().visible_count(), 0);
    }

    #[test]
    fn test_progress_state_events() {
        let mut scene = Scene::new();
        let (actor, _) = spawn(&mut scene, "a", Vec3::ZERO);

        let mut transformer = Transformer::default();
        transformer.select_actor(&scene, actor, false);
        transformer.drain_events();

        transformer.set_domain(TransformationDomain::PlaneXY);
        transformer.clear_domain();

        assert_eq!(
            transformer.drain_events(),
            vec![
                TransformerEvent::GizmoStateChanged {
                    kind: TransformationKind::Translation,
                    in_progress: true,
                    domain: TransformationDomain::PlaneXY,
                },
                TransformerEvent::GizmoStateChanged {
                    kind: TransformationKind::Translation,
                    in_progress: false,
                    domain: TransformationDomain::None,
                },
            ]
        );
    }

    #[test]
    fn test_clone_selected_selects_clones() {
        let mut scene = Scene::new();
        let (actor, root) = spawn(&mut scene, "a", Vec3::new(1.0, 2.0, 3.0));

        let mut transformer = Transformer::default();
        transformer.select_actor(&scene, actor, false);

        let clones = transformer.clone_selected(&mut scene, true, false);
        assert_eq!(clones.len(), 1);
        assert_ne!(clones[0], root);
        assert_eq!(scene.actor_count(), 2);
        assert_eq!(transformer.selection().selected(), clones.as_slice());
        let cloned = scene.world_transform(clones[0]).unwrap();
        assert!(cloned.translation.abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-5));
    }

    #[test]
    fn test_deselect_all_with_destroy() {
        let mut scene = Scene::new();
        let (actor, root) = spawn(&mut scene, "a", Vec3::ZERO);

        let mut transformer = Transformer::default();
        transformer.select_actor(&scene, actor, false);
        let previous = transformer.deselect_all(&mut scene, true);

        assert_eq!(previous, vec![root]);
        assert_eq!(scene.actor_count(), 0);
        assert!(transformer.active_gizmo().is_none());
    }

    #[test]
    fn test_tick_scales_gizmo_to_view() {
        let mut scene = Scene::new();
        let (actor, _) = spawn(&mut scene, "a", Vec3::ZERO);

        let mut transformer = Transformer::default();
        transformer.select_actor(&scene, actor, false);

        let view = ViewState {
            camera_location: Vec3::new(0.0, -10.0, 0.0),
            camera_forward: Vec3::Y,
            fov_degrees: 90.0,
            pointer_ray: None,
        };
        let delta = transformer.tick(&mut scene, &view);
        assert!(delta.is_zero());

        let scale = transformer.active_gizmo().unwrap().view_scale();
        approx::assert_relative_eq!(scale, 1.5, epsilon = 1e-4);
    }

    #[test]
    fn test_tick_drops_destroyed_selection() {
        let mut scene = Scene::new();
        let (actor, root) = spawn(&mut scene, "a", Vec3::ZERO);

        let mut transformer = Transformer::default();
        transformer.select_actor(&scene, actor, false);
        transformer.drain_events();
        scene.destroy_actor(actor);

        transformer.tick(&mut scene, &ViewState::default());
        assert!(transformer.selection().is_empty());
        assert!(transformer.active_gizmo().is_none());
        assert_eq!(
            transformer.drain_events(),
            vec![TransformerEvent::SelectionChanged {
                component: root,
                selected: false,
                implements_focusable: false,
            }]
        );
    }

    /// Select one object, grab the X arrow and drag 0.4 with a 1.0 step, so
    /// nothing moves and 0.4 stays in the residue.
    fn transformer_with_pending_residue(scene: &mut Scene) -> Transformer {
        let (actor, _) = spawn(scene, "box", Vec3::ZERO);
        let mut transformer = Transformer::default();
        transformer.set_snapping_enabled(TransformationKind::Translation, true);
        transformer.set_snapping_value(TransformationKind::Translation, 1.0);
        transformer.select_actor(&*scene, actor, false);

        let (origin, dir) = down_at(0.5, 0.0);
        assert!(transformer.trace(&*scene, origin, dir, &RayFilter::default(), false));
        let (origin, dir) = down_at(2.0, 0.0);
        transformer.update_transform(scene, Vec3::NEG_Z, origin, dir);
        let (origin, dir) = down_at(2.4, 0.0);
        let delta = transformer.update_transform(scene, Vec3::NEG_Z, origin, dir);

        assert!(delta.is_zero());
        assert!(
            transformer
                .snap_residue()
                .translation
                .abs_diff_eq(Vec3::new(0.4, 0.0, 0.0), 1e-4)
        );
        transformer
    }

    #[test]
    fn test_kind_change_drops_residue_and_restarts_session() {
        let mut scene = Scene::new();
        let mut transformer = transformer_with_pending_residue(&mut scene);

        transformer.set_transformation_kind(&scene, TransformationKind::Scale);
        assert!(transformer.snap_residue().is_zero());

        let (origin, dir) = down_at(5.0, 0.0);
        let delta = transformer.update_transform(&mut scene, Vec3::NEG_Z, origin, dir);
        assert!(delta.is_zero());
    }

    #[test]
    fn test_reentering_domain_drops_residue_and_restarts_session() {
        let mut scene = Scene::new();
        let mut transformer = transformer_with_pending_residue(&mut scene);

        let (origin, dir) = down_at(0.5, 0.0);
        assert!(transformer.trace(&scene, origin, dir, &RayFilter::default(), false));
        assert_eq!(
            transformer.current_domain(),
            (TransformationDomain::AxisX, true)
        );
        assert!(transformer.snap_residue().is_zero());

        // The first sample of the new session only primes it
        let (origin, dir) = down_at(5.0, 0.0);
        let delta = transformer.update_transform(&mut scene, Vec3::NEG_Z, origin, dir);
        assert!(delta.is_zero());

        let (origin, dir) = down_at(6.0, 0.0);
        let delta = transformer.update_transform(&mut scene, Vec3::NEG_Z, origin, dir);
        assert!(delta.translation.abs_diff_eq(Vec3::X, 1e-4));
    }

    #[test]
    fn test_shared_transformer() {
        let mut scene = Scene::new();
        let (actor, root) = spawn(&mut scene, "a", Vec3::ZERO);

        let shared = create_shared_transformer(TransformerConfig::default());
        shared.lock().select_actor(&scene, actor, false);
        assert_eq!(shared.lock().selection().selected(), &[root]);
    }
}
