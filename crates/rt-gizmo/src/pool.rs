//! Gizmo pool
//!
//! One gizmo per transformation kind, created lazily and hidden instead of
//! destroyed. At most one gizmo is active (visible) at a time.

use rt_core::{GizmoId, TransformationKind};

use crate::config::GizmoConfig;
use crate::gizmo::Gizmo;

const SLOT_COUNT: usize = TransformationKind::GIZMO_KINDS.len();

/// Fixed set of gizmo slots keyed by transformation kind
#[derive(Debug, Clone, Default)]
pub struct GizmoPool {
    slots: [Option<Gizmo>; SLOT_COUNT],
    active: Option<TransformationKind>,
    config: GizmoConfig,
}

impl GizmoPool {
    /// Create an empty pool
    pub fn new(config: GizmoConfig) -> Self {
        Self {
            slots: Default::default(),
            active: None,
            config,
        }
    }

    /// Geometry settings used for new gizmos
    pub fn config(&self) -> &GizmoConfig {
        &self.config
    }

    /// Replace the settings; existing gizmos are dropped and rebuilt on demand
    pub fn set_config(&mut self, config: GizmoConfig) {
        let active = self.active;
        self.clear();
        self.config = config;
        if let Some(kind) = active {
            self.activate(kind);
        }
    }

    /// Create every gizmo up front, hidden and disabled
    pub fn prewarm(&mut self) {
        for kind in TransformationKind::GIZMO_KINDS {
            self.slot_or_create(kind);
        }
    }

    /// Drop every gizmo
    pub fn clear(&mut self) {
        self.slots = Default::default();
        self.active = None;
    }

    /// Number of gizmos created so far
    pub fn created_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Number of visible gizmos, never more than one
    pub fn visible_count(&self) -> usize {
        self.slots.iter().flatten().filter(|g| g.is_visible()).count()
    }

    /// Kind of the active gizmo
    pub fn active_kind(&self) -> Option<TransformationKind> {
        self.active
    }

    /// The active gizmo
    pub fn active(&self) -> Option<&Gizmo> {
        self.gizmo(self.active?)
    }

    /// The active gizmo, mutably
    pub fn active_mut(&mut self) -> Option<&mut Gizmo> {
        let index = self.active?.gizmo_index()?;
        self.slots[index].as_mut()
    }

    /// Pooled gizmo of a kind, if created
    pub fn gizmo(&self, kind: TransformationKind) -> Option<&Gizmo> {
        self.slots[kind.gizmo_index()?].as_ref()
    }

    /// Pooled gizmo with the given id
    pub fn find(&self, id: GizmoId) -> Option<&Gizmo> {
        self.slots.iter().flatten().find(|g| g.id() == id)
    }

    /// Show the gizmo of `kind`, hiding the previous one first.
    ///
    /// `NoTransform` has no gizmo: the active one is hidden and `None` returned.
    pub fn activate(&mut self, kind: TransformationKind) -> Option<&mut Gizmo> {
        if kind.gizmo_index().is_none() {
            self.deactivate();
            return None;
        }
        if self.active != Some(kind) {
            self.deactivate();
            self.slot_or_create(kind)?.show();
            self.active = Some(kind);
            tracing::debug!("Activated {} gizmo", kind.display_name());
        }
        self.active_mut()
    }

    /// Hide the active gizmo
    pub fn deactivate(&mut self) {
        if let Some(gizmo) = self.active_mut() {
            gizmo.hide();
            tracing::debug!("Hid {} gizmo", gizmo.kind().display_name());
        }
        self.active = None;
    }

    /// Bring the pool in line with the selection: the gizmo of `kind` is
    /// active while something is selected, nothing otherwise.
    pub fn sync(&mut self, has_selection: bool, kind: TransformationKind) -> Option<&mut Gizmo> {
        if has_selection {
            self.activate(kind)
        } else {
            self.deactivate();
            None
        }
    }

    fn slot_or_create(&mut self, kind: TransformationKind) -> Option<&mut Gizmo> {
        let index = kind.gizmo_index()?;
        let config = &self.config;
        Some(self.slots[index].get_or_insert_with(|| {
            tracing::debug!("Created {} gizmo", kind.display_name());
            Gizmo::new(kind, config)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_creation() {
        let mut pool = GizmoPool::new(GizmoConfig::default());
        assert_eq!(pool.created_count(), 0);
        pool.activate(TransformationKind::Rotation);
        assert_eq!(pool.created_count(), 1);
        assert_eq!(pool.active_kind(), Some(TransformationKind::Rotation));
    }

    #[test]
    fn test_prewarm_creates_hidden_gizmos() {
        let mut pool = GizmoPool::new(GizmoConfig::default());
        pool.prewarm();
        assert_eq!(pool.created_count(), 3);
        assert_eq!(pool.visible_count(), 0);
        assert!(pool.active().is_none());
    }

    #[test]
    fn test_switching_kind_keeps_one_visible() {
        let mut pool = GizmoPool::new(GizmoConfig::default());
        pool.activate(TransformationKind::Translation);
        let translation_id = pool.active().unwrap().id();
        pool.activate(TransformationKind::Scale);

        assert_eq!(pool.visible_count(), 1);
        assert_eq!(pool.active().unwrap().kind(), TransformationKind::Scale);
        assert!(!pool.find(translation_id).unwrap().is_visible());

        // Reactivation reuses the pooled instance
        pool.activate(TransformationKind::Translation);
        assert_eq!(pool.active().unwrap().id(), translation_id);
    }

    #[test]
    fn test_no_transform_hides_everything() {
        let mut pool = GizmoPool::new(GizmoConfig::default());
        pool.activate(TransformationKind::Translation);
        assert!(pool.activate(TransformationKind::NoTransform).is_none());
        assert_eq!(pool.visible_count(), 0);
        assert_eq!(pool.active_kind(), None);
    }

    #[test]
    fn test_sync_follows_selection() {
        let mut pool = GizmoPool::new(GizmoConfig::default());
        assert!(pool.sync(true, TransformationKind::Rotation).is_some());
        assert_eq!(pool.visible_count(), 1);
        assert!(pool.sync(false, TransformationKind::Rotation).is_none());
        assert_eq!(pool.visible_count(), 0);
        assert_eq!(pool.created_count(), 1);
    }

    #[test]
    fn test_clear_drops_gizmos() {
        let mut pool = GizmoPool::new(GizmoConfig::default());
        pool.prewarm();
        pool.activate(TransformationKind::Scale);
        pool.clear();
        assert_eq!(pool.created_count(), 0);
        assert!(pool.active().is_none());
    }
}
