//! Hierarchy-preserving duplication of a selection

use std::collections::{HashMap, HashSet};

use crate::ids::{ActorId, ComponentId};
use crate::scene::SceneGraph;

/// Clone a selection at the requested granularity.
///
/// In component mode every listed component is cloned on its own. Otherwise
/// each distinct owning actor is cloned and the clone's root is returned.
pub fn clone_selection(
    scene: &mut dyn SceneGraph,
    selection: &[ComponentId],
    component_based: bool,
) -> Vec<ComponentId> {
    if component_based {
        return clone_components(scene, selection);
    }
    let actors: Vec<ActorId> = selection.iter().filter_map(|c| scene.owner(*c)).collect();
    clone_actors(scene, &actors)
}

/// Clone whole actors, returning the root component of each clone
pub fn clone_actors(scene: &mut dyn SceneGraph, actors: &[ActorId]) -> Vec<ComponentId> {
    let mut processed = HashSet::new();
    let mut clones = Vec::new();

    for &actor in actors {
        if !processed.insert(actor) {
            continue;
        }
        match scene.duplicate_actor(actor) {
            Some(root) => clones.push(root),
            None => tracing::warn!("Could not clone {}", actor),
        }
    }
    clones
}

/// Clone components, keeping the relative structure of the selection.
///
/// A clone whose original parent was cloned too is attached to that parent's
/// clone. Otherwise the original hierarchy is walked upwards: the clone is
/// attached to the clone of the closest cloned ancestor, or to its original
/// parent when no ancestor up to the actor root was cloned. All attachments
/// keep world transforms.
pub fn clone_components(scene: &mut dyn SceneGraph, components: &[ComponentId]) -> Vec<ComponentId> {
    let mut clones = Vec::new();
    let mut original_to_clone: HashMap<ComponentId, ComponentId> = HashMap::new();
    // clone -> (original parent, owner root)
    let mut pending: Vec<(ComponentId, ComponentId, ComponentId)> = Vec::new();

    for &original in components {
        if original_to_clone.contains_key(&original) {
            continue;
        }
        let Some(root) = scene.owner(original).and_then(|a| scene.root_component(a)) else {
            continue;
        };
        let Some(clone) = scene.duplicate_component(original) else {
            tracing::warn!("Could not clone {}", original);
            continue;
        };

        let original_parent = if original == root {
            root
        } else {
            scene.attach_parent(original).unwrap_or(root)
        };

        clones.push(clone);
        original_to_clone.insert(original, clone);
        pending.push((clone, original_parent, root));
    }

    for (clone, original_parent, root) in pending {
        let parent = resolve_clone_parent(
            &*scene,
            &original_to_clone,
            clone,
            original_parent,
            root,
        );
        if let Err(e) = scene.attach(clone, parent) {
            tracing::warn!("Failed to attach clone {} to {}: {}", clone, parent, e);
        }
    }

    clones
}

fn resolve_clone_parent(
    scene: &dyn SceneGraph,
    original_to_clone: &HashMap<ComponentId, ComponentId>,
    clone: ComponentId,
    original_parent: ComponentId,
    root: ComponentId,
) -> ComponentId {
    if let Some(&cloned_parent) = original_to_clone.get(&original_parent) {
        // A cloned root maps onto its own clone; keep the original root then
        return if cloned_parent != clone {
            cloned_parent
        } else {
            original_parent
        };
    }

    let mut visited = HashSet::new();
    let mut current = original_parent;
    loop {
        if current == root || !visited.insert(current) {
            return original_parent;
        }
        let Some(grandparent) = scene.attach_parent(current) else {
            return original_parent;
        };
        if let Some(&cloned) = original_to_clone.get(&grandparent) {
            return cloned;
        }
        current = grandparent;
    }
}
