//! Runtime Transformer
//!
//! Select scene objects by pointer ray and move, rotate or scale them with a
//! gizmo. The [`Transformer`] owns the selection, the gizmo pool and the
//! running manipulation; hosts feed it rays each tick and drain
//! [`TransformerEvent`]s.

pub mod compositor;
pub mod config;
pub mod events;
pub mod transformer;

pub use compositor::{CompositeOptions, CompositeReport, apply_delta, compose};
pub use config::{ConfigError, GizmoPlacement, SnapTable, TransformerConfig};
pub use events::TransformerEvent;
pub use transformer::{SharedTransformer, Transformer, ViewState, create_shared_transformer};
