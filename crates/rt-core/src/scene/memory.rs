//! In-memory scene graph

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use glam::Vec3;

use super::ray::{HitObject, HitRecord, RayFilter, RayQuery, ray_sphere_intersection};
use super::{FocusTarget, Focusable, SceneError, SceneGraph};
use crate::ids::{ActorId, ComponentId};
use crate::transform::Transform;
use crate::types::Mobility;

/// A node in an actor's attachment tree
#[derive(Clone)]
pub struct SceneComponent {
    pub id: ComponentId,
    pub name: String,
    pub owner: ActorId,
    pub parent: Option<ComponentId>,
    pub children: Vec<ComponentId>,
    /// Transform relative to the parent (world transform for parentless nodes)
    pub relative: Transform,
    pub mobility: Mobility,
    /// Named attachment points, relative to this component
    pub sockets: HashMap<String, Transform>,
    /// Collision sphere radius, `None` means not hit-testable
    pub bounds_radius: Option<f32>,
    pub focusable: Option<Arc<dyn Focusable>>,
}

impl fmt::Debug for SceneComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneComponent")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("relative", &self.relative)
            .field("mobility", &self.mobility)
            .field("focusable", &self.focusable.is_some())
            .finish_non_exhaustive()
    }
}

/// A scene object owning a tree of components
#[derive(Clone)]
pub struct SceneActor {
    pub id: ActorId,
    pub name: String,
    pub root: ComponentId,
    /// All owned components, root first
    pub components: Vec<ComponentId>,
    pub focusable: Option<Arc<dyn Focusable>>,
}

impl fmt::Debug for SceneActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneActor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("root", &self.root)
            .field("components", &self.components)
            .field("focusable", &self.focusable.is_some())
            .finish()
    }
}

/// Scene graph held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct Scene {
    actors: HashMap<ActorId, SceneActor>,
    components: HashMap<ComponentId, SceneComponent>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn an actor with a single root component placed at `transform`
    pub fn spawn_actor(&mut self, name: impl Into<String>, transform: Transform) -> ActorId {
        let name = name.into();
        let actor = ActorId::generate();
        let root = ComponentId::generate();

        self.components.insert(
            root,
            SceneComponent {
                id: root,
                name: format!("{name}_root"),
                owner: actor,
                parent: None,
                children: Vec::new(),
                relative: transform,
                mobility: Mobility::Movable,
                sockets: HashMap::new(),
                bounds_radius: None,
                focusable: None,
            },
        );
        self.actors.insert(
            actor,
            SceneActor {
                id: actor,
                name,
                root,
                components: vec![root],
                focusable: None,
            },
        );

        tracing::debug!("Spawned actor {}", actor);
        actor
    }

    /// Add a component to an actor, attached to `parent` (the actor root when `None`)
    pub fn add_component(
        &mut self,
        actor: ActorId,
        parent: Option<ComponentId>,
        name: impl Into<String>,
        relative: Transform,
    ) -> Result<ComponentId, SceneError> {
        let root = self
            .actors
            .get(&actor)
            .map(|a| a.root)
            .ok_or(SceneError::ActorNotFound(actor))?;
        let parent = parent.unwrap_or(root);
        if !self.components.contains_key(&parent) {
            return Err(SceneError::ComponentNotFound(parent));
        }

        let id = ComponentId::generate();
        self.components.insert(
            id,
            SceneComponent {
                id,
                name: name.into(),
                owner: actor,
                parent: Some(parent),
                children: Vec::new(),
                relative,
                mobility: Mobility::Movable,
                sockets: HashMap::new(),
                bounds_radius: None,
                focusable: None,
            },
        );
        if let Some(p) = self.components.get_mut(&parent) {
            p.children.push(id);
        }
        if let Some(a) = self.actors.get_mut(&actor) {
            a.components.push(id);
        }
        Ok(id)
    }

    pub fn set_component_focusable(
        &mut self,
        component: ComponentId,
        hook: Arc<dyn Focusable>,
    ) -> Result<(), SceneError> {
        let comp = self.component_mut(component)?;
        comp.focusable = Some(hook);
        Ok(())
    }

    pub fn set_actor_focusable(
        &mut self,
        actor: ActorId,
        hook: Arc<dyn Focusable>,
    ) -> Result<(), SceneError> {
        let entry = self
            .actors
            .get_mut(&actor)
            .ok_or(SceneError::ActorNotFound(actor))?;
        entry.focusable = Some(hook);
        Ok(())
    }

    /// Add a named attachment point relative to the component
    pub fn add_socket(
        &mut self,
        component: ComponentId,
        name: impl Into<String>,
        relative: Transform,
    ) -> Result<(), SceneError> {
        self.component_mut(component)?
            .sockets
            .insert(name.into(), relative);
        Ok(())
    }

    /// Make the component hit-testable with a bounding sphere
    pub fn set_bounds(&mut self, component: ComponentId, radius: f32) -> Result<(), SceneError> {
        self.component_mut(component)?.bounds_radius = Some(radius);
        Ok(())
    }

    pub fn actor(&self, id: ActorId) -> Option<&SceneActor> {
        self.actors.get(&id)
    }

    pub fn component(&self, id: ComponentId) -> Option<&SceneComponent> {
        self.components.get(&id)
    }

    pub fn actors(&self) -> impl Iterator<Item = &SceneActor> {
        self.actors.values()
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn children(&self, component: ComponentId) -> &[ComponentId] {
        self.components
            .get(&component)
            .map(|c| c.children.as_slice())
            .unwrap_or(&[])
    }

    fn component_mut(&mut self, id: ComponentId) -> Result<&mut SceneComponent, SceneError> {
        self.components
            .get_mut(&id)
            .ok_or(SceneError::ComponentNotFound(id))
    }

    fn detach_from_parent(&mut self, component: ComponentId) {
        let parent = self.components.get(&component).and_then(|c| c.parent);
        if let Some(p) = parent.and_then(|p| self.components.get_mut(&p)) {
            p.children.retain(|c| *c != component);
        }
    }

    /// Move a component under `parent` (or to the top level), keeping its world transform
    fn reparent_keep_world(&mut self, component: ComponentId, parent: Option<ComponentId>) {
        let Some(world) = self.world_transform(component) else {
            return;
        };
        let parent_world = parent.and_then(|p| self.world_transform(p));

        self.detach_from_parent(component);
        if let Some(p) = parent.and_then(|p| self.components.get_mut(&p)) {
            p.children.push(component);
        }
        if let Some(comp) = self.components.get_mut(&component) {
            comp.parent = parent;
            comp.relative = match parent_world {
                Some(pw) => world.world_to_relative(&pw),
                None => world,
            };
        }
    }

    fn is_ancestor(&self, ancestor: ComponentId, component: ComponentId) -> bool {
        let mut visited = HashSet::new();
        let mut current = Some(component);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            if !visited.insert(c) {
                break;
            }
            current = self.components.get(&c).and_then(|comp| comp.parent);
        }
        false
    }
}

impl SceneGraph for Scene {
    fn contains(&self, component: ComponentId) -> bool {
        self.components.contains_key(&component)
    }

    fn owner(&self, component: ComponentId) -> Option<ActorId> {
        self.components.get(&component).map(|c| c.owner)
    }

    fn root_component(&self, actor: ActorId) -> Option<ComponentId> {
        self.actors.get(&actor).map(|a| a.root)
    }

    fn attach_parent(&self, component: ComponentId) -> Option<ComponentId> {
        self.components.get(&component).and_then(|c| c.parent)
    }

    fn component_count(&self, actor: ActorId) -> usize {
        self.actors
            .get(&actor)
            .map(|a| a.components.len())
            .unwrap_or(0)
    }

    fn world_transform(&self, component: ComponentId) -> Option<Transform> {
        let comp = self.components.get(&component)?;
        match comp.parent {
            Some(parent) => Some(comp.relative.relative_to_world(&self.world_transform(parent)?)),
            None => Some(comp.relative),
        }
    }

    fn set_world_transform(&mut self, component: ComponentId, transform: Transform) {
        let parent_world = self
            .attach_parent(component)
            .and_then(|p| self.world_transform(p));
        if let Some(comp) = self.components.get_mut(&component) {
            comp.relative = match parent_world {
                Some(pw) => transform.world_to_relative(&pw),
                None => transform,
            };
        }
    }

    fn mobility(&self, component: ComponentId) -> Option<Mobility> {
        self.components.get(&component).map(|c| c.mobility)
    }

    fn set_mobility(&mut self, component: ComponentId, mobility: Mobility) {
        if let Some(comp) = self.components.get_mut(&component) {
            comp.mobility = mobility;
        }
    }

    fn socket_transform(&self, component: ComponentId, socket: &str) -> Option<Transform> {
        let relative = *self.components.get(&component)?.sockets.get(socket)?;
        Some(relative.relative_to_world(&self.world_transform(component)?))
    }

    fn focusable(&self, target: FocusTarget) -> Option<Arc<dyn Focusable>> {
        match target {
            FocusTarget::Component(id) => self.components.get(&id)?.focusable.clone(),
            FocusTarget::Actor(id) => self.actors.get(&id)?.focusable.clone(),
        }
    }

    fn duplicate_component(&mut self, component: ComponentId) -> Option<ComponentId> {
        let original = self.components.get(&component)?.clone();
        let id = ComponentId::generate();

        let copy = SceneComponent {
            id,
            name: format!("{}_copy", original.name),
            children: Vec::new(),
            ..original
        };
        let (owner, parent) = (copy.owner, copy.parent);
        self.components.insert(id, copy);

        if let Some(p) = parent.and_then(|p| self.components.get_mut(&p)) {
            p.children.push(id);
        }
        if let Some(a) = self.actors.get_mut(&owner) {
            a.components.push(id);
        }
        Some(id)
    }

    fn duplicate_actor(&mut self, actor: ActorId) -> Option<ComponentId> {
        let original = self.actors.get(&actor)?.clone();
        let new_actor = ActorId::generate();

        let mut mapping: HashMap<ComponentId, ComponentId> = HashMap::new();
        for id in &original.components {
            mapping.insert(*id, ComponentId::generate());
        }

        let mut components = Vec::with_capacity(original.components.len());
        for id in &original.components {
            let Some(comp) = self.components.get(id).cloned() else {
                continue;
            };
            let new_id = mapping[id];
            let parent = comp.parent.map(|p| mapping.get(&p).copied().unwrap_or(p));
            // A root attached to another actor keeps its world placement at the top level
            let relative = if *id == original.root {
                self.world_transform(*id).unwrap_or(comp.relative)
            } else {
                comp.relative
            };
            let copy = SceneComponent {
                id: new_id,
                owner: new_actor,
                parent: if *id == original.root { None } else { parent },
                children: comp
                    .children
                    .iter()
                    .filter_map(|c| mapping.get(c).copied())
                    .collect(),
                relative,
                ..comp
            };
            self.components.insert(new_id, copy);
            components.push(new_id);
        }

        let root = *mapping.get(&original.root)?;
        self.actors.insert(
            new_actor,
            SceneActor {
                id: new_actor,
                name: format!("{}_copy", original.name),
                root,
                components,
                focusable: original.focusable.clone(),
            },
        );

        tracing::debug!("Duplicated actor {} as {}", actor, new_actor);
        Some(root)
    }

    fn attach(&mut self, child: ComponentId, parent: ComponentId) -> Result<(), SceneError> {
        if !self.components.contains_key(&child) {
            return Err(SceneError::ComponentNotFound(child));
        }
        if !self.components.contains_key(&parent) {
            return Err(SceneError::ComponentNotFound(parent));
        }
        if self.is_ancestor(child, parent) {
            return Err(SceneError::WouldCreateCycle);
        }

        self.reparent_keep_world(child, Some(parent));
        Ok(())
    }

    fn destroy_component(&mut self, component: ComponentId) {
        let Some(comp) = self.components.get(&component) else {
            return;
        };
        let owner = comp.owner;
        let parent = comp.parent;
        let children = comp.children.clone();

        if self.actors.get(&owner).is_some_and(|a| a.root == component) {
            self.destroy_actor(owner);
            return;
        }

        for child in children {
            self.reparent_keep_world(child, parent);
        }
        self.detach_from_parent(component);
        self.components.remove(&component);
        if let Some(a) = self.actors.get_mut(&owner) {
            a.components.retain(|c| *c != component);
        }
    }

    fn destroy_actor(&mut self, actor: ActorId) {
        let Some(entry) = self.actors.get(&actor) else {
            return;
        };
        let root = entry.root;
        let owned: HashSet<ComponentId> = entry.components.iter().copied().collect();

        // Components of other actors attached into this one move to the top level
        let foreign: Vec<ComponentId> = self
            .components
            .values()
            .filter(|c| !owned.contains(&c.id) && c.parent.is_some_and(|p| owned.contains(&p)))
            .map(|c| c.id)
            .collect();
        for id in foreign {
            self.reparent_keep_world(id, None);
        }

        self.detach_from_parent(root);
        for id in &owned {
            self.components.remove(id);
        }
        self.actors.remove(&actor);
        tracing::debug!("Destroyed actor {}", actor);
    }
}

impl RayQuery for Scene {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, filter: &RayFilter) -> Vec<HitRecord> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return Vec::new();
        }

        let mut hits: Vec<HitRecord> = self
            .components
            .values()
            .filter_map(|comp| {
                let radius = comp.bounds_radius?;
                let center = self.world_transform(comp.id)?.translation;
                let t = ray_sphere_intersection(origin, dir, center, radius)?;
                filter.accepts(comp.owner, t).then(|| HitRecord {
                    object: HitObject::Component {
                        actor: comp.owner,
                        component: comp.id,
                    },
                    point: origin + dir * t,
                    distance: t,
                })
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}
