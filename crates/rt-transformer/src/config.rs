//! Transformer configuration
//!
//! Every mode flag of the transformer in one serializable structure, stored
//! as RON.

use std::collections::HashMap;
use std::path::Path;

use rt_core::{SpaceType, TransformationKind};
use rt_gizmo::GizmoConfig;
use serde::{Deserialize, Serialize};

/// Which selected object the gizmo is placed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GizmoPlacement {
    /// Not configured; falls back to the last selection with a warning
    None,
    First,
    #[default]
    Last,
}

/// Snapping switches and step values per transformation kind.
///
/// Snapping is active for a kind only when enabled and its step is non-zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapTable {
    pub enabled: HashMap<TransformationKind, bool>,
    pub values: HashMap<TransformationKind, f32>,
}

impl SnapTable {
    pub fn set_enabled(&mut self, kind: TransformationKind, enabled: bool) {
        self.enabled.insert(kind, enabled);
    }

    pub fn set_value(&mut self, kind: TransformationKind, value: f32) {
        self.values.insert(kind, value);
    }

    /// Active snap step for a kind
    pub fn step(&self, kind: TransformationKind) -> Option<f32> {
        if !self.enabled.get(&kind).copied().unwrap_or(false) {
            return None;
        }
        self.values
            .get(&kind)
            .copied()
            .filter(|v| rt_gizmo::snapping::is_active_step(*v))
    }
}

/// Complete transformer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformerConfig {
    pub space: SpaceType,
    pub kind: TransformationKind,
    pub placement: GizmoPlacement,
    /// Socket on the target the gizmo snaps to, when the target has it
    pub attach_socket: Option<String>,
    pub snap: SnapTable,
    /// Move objects even when their mobility forbids it (and make them movable)
    pub force_mobility: bool,
    /// Spin objects about their own centers instead of orbiting the gizmo
    pub rotate_on_local_axis: bool,
    /// Move objects that implement focus hooks; when off they are only notified
    pub transform_focusable_objects: bool,
    /// Reselecting a selected object deselects it
    pub toggle_selected_in_multi_selection: bool,
    /// Select individual components instead of whole actors
    pub component_based: bool,
    pub gizmo: GizmoConfig,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            space: SpaceType::World,
            kind: TransformationKind::Translation,
            placement: GizmoPlacement::Last,
            attach_socket: None,
            snap: SnapTable::default(),
            force_mobility: false,
            rotate_on_local_axis: false,
            transform_focusable_objects: true,
            toggle_selected_in_multi_selection: true,
            component_based: false,
            gizmo: GizmoConfig::default(),
        }
    }
}

impl TransformerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Save configuration to a RON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = self.to_ron_string()?;
        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }

    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

/// Configuration-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Parse error: {0}")]
    Parse(String),
}
