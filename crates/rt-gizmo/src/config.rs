//! Gizmo configuration
//!
//! Handle dimensions are in gizmo units: one unit is the on-screen size the
//! gizmo is scaled to by [`crate::Gizmo::scale_to_view`].

use serde::{Deserialize, Serialize};

/// Gizmo geometry and interaction settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GizmoConfig {
    /// Length of the axis handles
    pub axis_length: f32,
    /// Pick radius of the axis handles
    pub axis_radius: f32,
    /// Distance of the plane handles from the gizmo origin
    pub plane_offset: f32,
    /// Half extent of the plane handles
    pub plane_size: f32,
    /// Radius of the rotation rings
    pub ring_radius: f32,
    /// Pick tolerance of the rotation rings
    pub ring_thickness: f32,
    /// Radius of the center handle
    pub center_radius: f32,
    /// Gizmo size relative to the visible height at its depth
    pub screen_size: f32,
    /// Scale change per gizmo unit of pointer travel
    pub scale_sensitivity: f32,
}

impl Default for GizmoConfig {
    fn default() -> Self {
        Self {
            axis_length: 1.0,
            axis_radius: 0.08,
            plane_offset: 0.25,
            plane_size: 0.125,
            ring_radius: 1.0,
            ring_thickness: 0.08,
            center_radius: 0.15,
            screen_size: 0.15,
            scale_sensitivity: 1.0,
        }
    }
}

impl GizmoConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }
}
