//! Runtime Transformer gizmos
//!
//! Everything about the on-screen manipulator except drawing it:
//!
//! - [`handle`] / [`collision`] - hit geometry of gizmo parts and ray tests
//! - [`Gizmo`] - placement, space, view scaling, picking, domain resolution
//! - [`DragSession`] and [`Gizmo::delta_transform`] - pointer rays to deltas
//! - [`snapping`] - accumulated and per-object snapping
//! - [`GizmoPool`] - one pooled gizmo per transformation kind

pub mod collision;
pub mod config;
pub mod delta;
pub mod gizmo;
pub mod handle;
pub mod pool;
pub mod snapping;

pub use config::GizmoConfig;
pub use delta::DragSession;
pub use gizmo::{Gizmo, GizmoHit};
pub use handle::{GizmoHandle, HandleShape, build_handles};
pub use pool::GizmoPool;
pub use snapping::{snap_accumulated, snap_per_component, snap_to_step};
