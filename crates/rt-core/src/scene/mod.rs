//! Host scene graph seen through opaque handles
//!
//! The transformer never owns scene objects. Everything it needs from the
//! host (placement, mobility, attachment hierarchy, duplication, focus hooks)
//! goes through the [`SceneGraph`] trait. [`Scene`] is an in-memory
//! implementation used by tools, tests and the demo binary.

mod memory;
mod ray;

use std::sync::Arc;

pub use memory::{Scene, SceneActor, SceneComponent};
pub use ray::{
    HitObject, HitRecord, RayFilter, RayQuery, closest_point_on_line, ray_plane_intersection,
    ray_sphere_intersection,
};

use crate::ids::{ActorId, ComponentId};
use crate::transform::Transform;
use crate::types::Mobility;

/// Which object a focus hook is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    Component(ComponentId),
    Actor(ActorId),
}

/// Optional capability of a scene object that wants to hear about selection
/// and transform changes.
///
/// `component_based` tells the hook whether the transformer currently works
/// on individual components (true) or on whole actors (false).
pub trait Focusable: Send + Sync {
    /// The object became part of the selection
    fn on_focus(&self, _component: ComponentId, _component_based: bool) {}

    /// The object left the selection
    fn on_unfocus(&self, _component: ComponentId, _component_based: bool) {}

    /// A new world transform is about to be committed
    fn on_new_transform(
        &self,
        _component: ComponentId,
        _transform: &Transform,
        _component_based: bool,
    ) {
    }
}

/// Scene graph operations consumed by the transformer
pub trait SceneGraph {
    /// Whether the component still exists
    fn contains(&self, component: ComponentId) -> bool;

    /// Actor owning the component
    fn owner(&self, component: ComponentId) -> Option<ActorId>;

    /// Root component of an actor
    fn root_component(&self, actor: ActorId) -> Option<ComponentId>;

    /// Parent the component is attached to
    fn attach_parent(&self, component: ComponentId) -> Option<ComponentId>;

    /// Number of components the actor owns
    fn component_count(&self, actor: ActorId) -> usize;

    fn world_transform(&self, component: ComponentId) -> Option<Transform>;

    fn set_world_transform(&mut self, component: ComponentId, transform: Transform);

    fn mobility(&self, component: ComponentId) -> Option<Mobility>;

    fn set_mobility(&mut self, component: ComponentId, mobility: Mobility);

    /// World transform of a named attachment point, if the component has it
    fn socket_transform(&self, component: ComponentId, socket: &str) -> Option<Transform>;

    /// Focus hook of a component or actor, absence is the common case
    fn focusable(&self, target: FocusTarget) -> Option<Arc<dyn Focusable>>;

    /// Duplicate a single component inside its owner, keeping its world transform
    fn duplicate_component(&mut self, component: ComponentId) -> Option<ComponentId>;

    /// Duplicate a whole actor, returning the root component of the copy
    fn duplicate_actor(&mut self, actor: ActorId) -> Option<ComponentId>;

    /// Attach `child` under `parent`, keeping the child's world transform
    fn attach(&mut self, child: ComponentId, parent: ComponentId) -> Result<(), SceneError>;

    fn destroy_component(&mut self, component: ComponentId);

    fn destroy_actor(&mut self, actor: ActorId);
}

/// Look up the focus hook relevant to a selected component.
///
/// In component-based mode the component's own hook is used, otherwise the
/// hook of the owning actor.
pub fn focus_hook(
    scene: &dyn SceneGraph,
    component: ComponentId,
    component_based: bool,
) -> Option<Arc<dyn Focusable>> {
    if component_based {
        return scene.focusable(FocusTarget::Component(component));
    }
    let owner = scene.owner(component)?;
    scene.focusable(FocusTarget::Actor(owner))
}

/// Scene-related errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("Component not found: {0}")]
    ComponentNotFound(ComponentId),
    #[error("Actor not found: {0}")]
    ActorNotFound(ActorId),
    #[error("Attachment would create a cycle")]
    WouldCreateCycle,
}
