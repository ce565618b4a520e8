//! Runtime Transformer core
//!
//! Data model shared by the gizmo and transformer crates:
//!
//! - [`Transform`] / [`TransformDelta`] - placements and per-tick changes
//! - [`TransformationKind`] / [`TransformationDomain`] - what is being manipulated
//! - [`scene`] - the host scene graph seen through opaque handles
//! - [`selection::SelectionManager`] - ordered, toggle-aware multi-selection
//! - [`duplicate`] - hierarchy-preserving cloning of selections

pub mod duplicate;
pub mod ids;
pub mod scene;
pub mod selection;
pub mod transform;
pub mod types;

pub use duplicate::{clone_actors, clone_components, clone_selection};
pub use ids::{ActorId, ComponentId, GizmoId, HandleId};
pub use scene::{
    FocusTarget, Focusable, HitObject, HitRecord, RayFilter, RayQuery, Scene, SceneActor,
    SceneComponent, SceneError, SceneGraph, focus_hook,
};
pub use selection::{SelectionChange, SelectionFilter, SelectionManager};
pub use transform::{Transform, TransformDelta};
pub use types::{Mobility, SpaceType, TransformationDomain, TransformationKind};
