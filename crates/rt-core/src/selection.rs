//! Ordered multi-selection with toggle-on-reselect
//!
//! The selection is an ordered set of unique components. Order matters: the
//! gizmo is placed on the first or last entry. Every membership change fires
//! the focus hook of the affected object and queues a [`SelectionChange`].

use indexmap::IndexSet;

use crate::ids::{ActorId, ComponentId};
use crate::scene::{SceneGraph, focus_hook};

/// Predicate deciding whether a component may be selected.
///
/// Receives the owning actor (if any) and the component.
pub type SelectionFilter = Box<dyn Fn(Option<ActorId>, ComponentId) -> bool + Send + Sync>;

/// A single membership change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChange {
    pub component: ComponentId,
    /// true when added, false when removed
    pub selected: bool,
    /// Whether a focus hook was found and notified
    pub implements_focusable: bool,
}

pub struct SelectionManager {
    /// Insertion order is click order
    selected: IndexSet<ComponentId>,
    toggle_on_reselect: bool,
    component_based: bool,
    filter: Option<SelectionFilter>,
    changes: Vec<SelectionChange>,
}

impl Default for SelectionManager {
    fn default() -> Self {
        Self::new(false, true)
    }
}

impl std::fmt::Debug for SelectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionManager")
            .field("selected", &self.selected)
            .field("toggle_on_reselect", &self.toggle_on_reselect)
            .field("component_based", &self.component_based)
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

impl SelectionManager {
    pub fn new(component_based: bool, toggle_on_reselect: bool) -> Self {
        Self {
            selected: IndexSet::new(),
            toggle_on_reselect,
            component_based,
            filter: None,
            changes: Vec::new(),
        }
    }

    /// Selected components in selection order
    pub fn selected(&self) -> Vec<ComponentId> {
        self.selected.iter().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.selected.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, component: ComponentId) -> bool {
        self.selected.contains(&component)
    }

    pub fn first(&self) -> Option<ComponentId> {
        self.selected.first().copied()
    }

    pub fn last(&self) -> Option<ComponentId> {
        self.selected.last().copied()
    }

    pub fn component_based(&self) -> bool {
        self.component_based
    }

    pub fn toggle_on_reselect(&self) -> bool {
        self.toggle_on_reselect
    }

    pub fn set_toggle_on_reselect(&mut self, toggle: bool) {
        self.toggle_on_reselect = toggle;
    }

    /// Install or clear the selection predicate
    pub fn set_filter(&mut self, filter: Option<SelectionFilter>) {
        self.filter = filter;
    }

    /// Whether the component exists and passes the filter
    pub fn should_select(&self, scene: &dyn SceneGraph, component: ComponentId) -> bool {
        if !scene.contains(component) {
            return false;
        }
        match &self.filter {
            Some(filter) => filter(scene.owner(component), component),
            None => true,
        }
    }

    /// Select a component.
    ///
    /// Without `append` every other entry is deselected first. Reselecting an
    /// entry that is already selected removes it when toggling is enabled.
    /// Returns true if membership changed.
    pub fn select_component(
        &mut self,
        scene: &dyn SceneGraph,
        component: ComponentId,
        append: bool,
    ) -> bool {
        if !self.should_select(scene, component) {
            return false;
        }

        let mut changed = false;
        if !append {
            changed |= self.deselect_others(scene, Some(component));
        }
        changed | self.add_internal(scene, component)
    }

    /// Select an actor through its root component
    pub fn select_actor(&mut self, scene: &dyn SceneGraph, actor: ActorId, append: bool) -> bool {
        match scene.root_component(actor) {
            Some(root) => self.select_component(scene, root, append),
            None => false,
        }
    }

    /// Select several components at once.
    ///
    /// Without `append` the previous selection is cleared once, on the first
    /// valid entry. Invalid or filtered entries are skipped. Duplicates inside
    /// the batch follow the toggle policy.
    pub fn select_multiple_components(
        &mut self,
        scene: &dyn SceneGraph,
        components: &[ComponentId],
        mut append: bool,
    ) -> bool {
        let mut changed = false;
        for &component in components {
            if !self.should_select(scene, component) {
                continue;
            }
            if !append {
                changed |= self.deselect_others(scene, None);
                append = true;
            }
            changed |= self.add_internal(scene, component);
        }
        changed
    }

    /// Select several actors through their root components
    pub fn select_multiple_actors(
        &mut self,
        scene: &dyn SceneGraph,
        actors: &[ActorId],
        append: bool,
    ) -> bool {
        let roots: Vec<ComponentId> = actors
            .iter()
            .filter_map(|a| scene.root_component(*a))
            .collect();
        self.select_multiple_components(scene, &roots, append)
    }

    pub fn deselect_component(&mut self, scene: &dyn SceneGraph, component: ComponentId) -> bool {
        self.remove(scene, component)
    }

    pub fn deselect_actor(&mut self, scene: &dyn SceneGraph, actor: ActorId) -> bool {
        match scene.root_component(actor) {
            Some(root) => self.deselect_component(scene, root),
            None => false,
        }
    }

    /// Clear the selection, returning what was selected.
    ///
    /// With `destroy` the deselected objects are destroyed afterwards: single
    /// components in component mode when their actor owns more than one
    /// component, whole actors otherwise. Entries already gone are skipped.
    pub fn deselect_all(&mut self, scene: &mut dyn SceneGraph, destroy: bool) -> Vec<ComponentId> {
        let previous = self.selected();
        self.deselect_others(&*scene, None);

        if destroy {
            for &component in &previous {
                if !scene.contains(component) {
                    continue;
                }
                let Some(owner) = scene.owner(component) else {
                    continue;
                };
                if self.component_based && scene.component_count(owner) > 1 {
                    tracing::debug!("Destroying deselected {}", component);
                    scene.destroy_component(component);
                } else {
                    tracing::debug!("Destroying deselected {}", owner);
                    scene.destroy_actor(owner);
                }
            }
        }

        previous
    }

    /// Switch between component and actor granularity, reselecting what was
    /// selected at the new granularity.
    ///
    /// Going to actor mode selects each distinct owner once, in order.
    pub fn set_component_based(&mut self, scene: &dyn SceneGraph, component_based: bool) {
        let previous = self.selected();
        self.deselect_others(scene, None);
        self.component_based = component_based;

        if component_based {
            self.select_multiple_components(scene, &previous, false);
        } else {
            let owners: IndexSet<ActorId> =
                previous.iter().filter_map(|c| scene.owner(*c)).collect();
            let owners: Vec<ActorId> = owners.into_iter().collect();
            self.select_multiple_actors(scene, &owners, false);
        }
    }

    /// Drop entries whose component no longer exists.
    ///
    /// Each dropped entry is reported as deselected; its focus hook went with
    /// it, so none is called.
    pub fn prune_missing(&mut self, scene: &dyn SceneGraph) -> bool {
        let before = self.selected.len();
        let changes = &mut self.changes;
        self.selected.retain(|c| {
            let exists = scene.contains(*c);
            if !exists {
                changes.push(SelectionChange {
                    component: *c,
                    selected: false,
                    implements_focusable: false,
                });
            }
            exists
        });
        before != self.selected.len()
    }

    /// Take all queued membership changes
    pub fn drain_changes(&mut self) -> Vec<SelectionChange> {
        std::mem::take(&mut self.changes)
    }

    fn add_internal(&mut self, scene: &dyn SceneGraph, component: ComponentId) -> bool {
        if self.selected.insert(component) {
            self.notify(scene, component, true);
            true
        } else if self.toggle_on_reselect {
            self.remove(scene, component)
        } else {
            false
        }
    }

    fn remove(&mut self, scene: &dyn SceneGraph, component: ComponentId) -> bool {
        if !self.selected.shift_remove(&component) {
            return false;
        }
        self.notify(scene, component, false);
        true
    }

    fn notify(&mut self, scene: &dyn SceneGraph, component: ComponentId, selected: bool) {
        let hook = focus_hook(scene, component, self.component_based);
        if let Some(hook) = &hook {
            if selected {
                hook.on_focus(component, self.component_based);
            } else {
                hook.on_unfocus(component, self.component_based);
            }
        }
        self.changes.push(SelectionChange {
            component,
            selected,
            implements_focusable: hook.is_some(),
        });
    }

    /// Deselect everything except `keep`, in selection order
    fn deselect_others(&mut self, scene: &dyn SceneGraph, keep: Option<ComponentId>) -> bool {
        let previous = std::mem::take(&mut self.selected);
        let mut changed = false;
        for component in previous {
            if Some(component) == keep {
                self.selected.insert(component);
            } else {
                self.notify(scene, component, false);
                changed = true;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glam::Vec3;
    use parking_lot::Mutex;

    use super::*;
    use crate::scene::{Focusable, Scene};
    use crate::transform::Transform;

    #[derive(Default)]
    struct FocusLog {
        events: Mutex<Vec<(ComponentId, bool)>>,
    }

    impl Focusable for FocusLog {
        fn on_focus(&self, component: ComponentId, _component_based: bool) {
            self.events.lock().push((component, true));
        }

        fn on_unfocus(&self, component: ComponentId, _component_based: bool) {
            self.events.lock().push((component, false));
        }
    }

    fn three_actors(scene: &mut Scene) -> [ComponentId; 3] {
        [0.0, 1.0, 2.0].map(|x| {
            let actor = scene.spawn_actor("obj", Transform::from_translation(Vec3::new(x, 0.0, 0.0)));
            scene.root_component(actor).unwrap()
        })
    }

    #[test]
    fn test_reselect_toggles() {
        let mut scene = Scene::new();
        let [a, _, _] = three_actors(&mut scene);
        let mut selection = SelectionManager::new(true, true);

        assert!(selection.select_component(&scene, a, false));
        assert_eq!(selection.selected(), &[a]);
        assert!(selection.select_component(&scene, a, false));
        assert!(selection.is_empty());
        assert!(selection.select_component(&scene, a, false));
        assert_eq!(selection.selected(), &[a]);
    }

    #[test]
    fn test_reselect_without_toggle_is_noop() {
        let mut scene = Scene::new();
        let [a, _, _] = three_actors(&mut scene);
        let mut selection = SelectionManager::new(true, false);

        selection.select_component(&scene, a, false);
        assert!(!selection.select_component(&scene, a, true));
        assert_eq!(selection.selected(), &[a]);
    }

    #[test]
    fn test_order_preserved_and_reappended_at_end() {
        let mut scene = Scene::new();
        let [a, b, c] = three_actors(&mut scene);
        let mut selection = SelectionManager::new(true, true);

        selection.select_component(&scene, a, false);
        selection.select_component(&scene, b, true);
        selection.select_component(&scene, c, true);
        selection.deselect_component(&scene, b);
        assert_eq!(selection.selected(), &[a, c]);

        selection.select_component(&scene, b, true);
        assert_eq!(selection.selected(), &[a, c, b]);
    }

    #[test]
    fn test_select_without_append_replaces() {
        let mut scene = Scene::new();
        let [a, b, c] = three_actors(&mut scene);
        let mut selection = SelectionManager::new(true, true);

        selection.select_multiple_components(&scene, &[a, b], false);
        selection.select_component(&scene, c, false);
        assert_eq!(selection.selected(), &[c]);
    }

    #[test]
    fn test_multiple_skips_invalid_entries() {
        let mut scene = Scene::new();
        let [a, b, _] = three_actors(&mut scene);
        let missing = ComponentId::generate();
        let mut selection = SelectionManager::new(true, true);

        assert!(selection.select_multiple_components(&scene, &[missing, a, b], false));
        assert_eq!(selection.selected(), &[a, b]);

        // A batch with nothing valid keeps the previous selection
        assert!(!selection.select_multiple_components(&scene, &[missing], false));
        assert_eq!(selection.selected(), &[a, b]);
    }

    #[test]
    fn test_filter_rejects_components() {
        let mut scene = Scene::new();
        let [a, b, _] = three_actors(&mut scene);
        let mut selection = SelectionManager::new(true, true);
        selection.set_filter(Some(Box::new(move |_: Option<ActorId>, c: ComponentId| c != b)));

        assert!(!selection.select_component(&scene, b, false));
        assert!(selection.select_component(&scene, a, true));
        assert_eq!(selection.selected(), &[a]);
    }

    #[test]
    fn test_focus_hooks_and_changes() {
        let mut scene = Scene::new();
        let [a, b, _] = three_actors(&mut scene);
        let log = Arc::new(FocusLog::default());
        scene.set_component_focusable(a, log.clone()).unwrap();
        let mut selection = SelectionManager::new(true, true);

        selection.select_component(&scene, a, false);
        selection.select_component(&scene, b, true);
        selection.deselect_component(&scene, a);

        assert_eq!(*log.events.lock(), vec![(a, true), (a, false)]);
        let changes = selection.drain_changes();
        assert_eq!(changes.len(), 3);
        assert!(changes[0].selected && changes[0].implements_focusable);
        assert!(changes[1].selected && !changes[1].implements_focusable);
        assert!(!changes[2].selected && changes[2].implements_focusable);
        assert!(selection.drain_changes().is_empty());
    }

    #[test]
    fn test_actor_mode_uses_actor_hook() {
        let mut scene = Scene::new();
        let actor = scene.spawn_actor("obj", Transform::IDENTITY);
        let log = Arc::new(FocusLog::default());
        scene.set_actor_focusable(actor, log.clone()).unwrap();
        let mut selection = SelectionManager::new(false, true);

        selection.select_actor(&scene, actor, false);
        let root = scene.root_component(actor).unwrap();
        assert_eq!(*log.events.lock(), vec![(root, true)]);
    }

    #[test]
    fn test_deselect_all_destroys() {
        let mut scene = Scene::new();
        let actor = scene.spawn_actor("obj", Transform::IDENTITY);
        let part = scene
            .add_component(actor, None, "part", Transform::IDENTITY)
            .unwrap();
        let [lone, _, _] = three_actors(&mut scene);
        let lone_actor = scene.owner(lone).unwrap();

        let mut selection = SelectionManager::new(true, true);
        selection.select_multiple_components(&scene, &[part, lone], false);
        let removed = selection.deselect_all(&mut scene, true);

        assert_eq!(removed, vec![part, lone]);
        assert!(selection.is_empty());
        assert!(!scene.contains(part));
        assert!(scene.actor(actor).is_some());
        assert!(scene.actor(lone_actor).is_none());
    }

    #[test]
    fn test_switch_to_actor_mode_dedupes_owners() {
        let mut scene = Scene::new();
        let actor = scene.spawn_actor("obj", Transform::IDENTITY);
        let root = scene.root_component(actor).unwrap();
        let p1 = scene.add_component(actor, None, "p1", Transform::IDENTITY).unwrap();
        let p2 = scene.add_component(actor, None, "p2", Transform::IDENTITY).unwrap();
        let [other, _, _] = three_actors(&mut scene);

        let mut selection = SelectionManager::new(true, true);
        selection.select_multiple_components(&scene, &[p1, other, p2], false);

        selection.set_component_based(&scene, false);
        assert!(!selection.component_based());
        assert_eq!(selection.selected(), &[root, other]);

        selection.set_component_based(&scene, true);
        assert_eq!(selection.selected(), &[root, other]);
    }

    #[test]
    fn test_prune_missing() {
        let mut scene = Scene::new();
        let [a, b, _] = three_actors(&mut scene);
        let mut selection = SelectionManager::new(true, true);
        selection.select_multiple_components(&scene, &[a, b], false);

        selection.drain_changes();

        let owner = scene.owner(a).unwrap();
        scene.destroy_actor(owner);
        assert!(selection.prune_missing(&scene));
        assert_eq!(selection.selected(), &[b]);
        assert_eq!(
            selection.drain_changes(),
            vec![SelectionChange {
                component: a,
                selected: false,
                implements_focusable: false,
            }]
        );
        assert!(!selection.prune_missing(&scene));
    }

    #[test]
    fn test_toggle_inside_large_selection_keeps_order() {
        let mut scene = Scene::new();
        let components: Vec<ComponentId> = (0..500)
            .map(|i| {
                let actor = scene.spawn_actor(
                    format!("obj{i}"),
                    Transform::from_translation(Vec3::new(i as f32, 0.0, 0.0)),
                );
                scene.root_component(actor).unwrap()
            })
            .collect();
        let mut selection = SelectionManager::new(true, true);
        selection.select_multiple_components(&scene, &components, false);
        assert_eq!(selection.len(), 500);

        let middle = components[250];
        assert!(selection.contains(middle));
        assert!(selection.select_component(&scene, middle, true));
        assert!(!selection.contains(middle));

        let mut expected = components.clone();
        expected.remove(250);
        assert_eq!(selection.selected(), expected);
        assert_eq!(selection.first(), Some(components[0]));
        assert_eq!(selection.last(), Some(components[499]));

        // Reselecting appends at the end
        selection.select_component(&scene, middle, true);
        assert_eq!(selection.last(), Some(middle));
        assert_eq!(selection.len(), 500);
    }
}
