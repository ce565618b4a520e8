//! Notifications queued by the transformer for the host

use rt_core::{ComponentId, SelectionChange, TransformationDomain, TransformationKind};

/// Something the host may want to react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformerEvent {
    /// A component entered or left the selection
    SelectionChanged {
        component: ComponentId,
        selected: bool,
        implements_focusable: bool,
    },
    /// The active gizmo's progress state changed
    GizmoStateChanged {
        kind: TransformationKind,
        in_progress: bool,
        domain: TransformationDomain,
    },
    /// A fixed object was left untouched while applying a delta
    ImmovableSkipped { component: ComponentId },
}

impl From<SelectionChange> for TransformerEvent {
    fn from(change: SelectionChange) -> Self {
        TransformerEvent::SelectionChanged {
            component: change.component,
            selected: change.selected,
            implements_focusable: change.implements_focusable,
        }
    }
}
