//! Pooled gizmo proxy objects
//!
//! A gizmo never owns scene objects: it follows the component it is attached
//! to, exposes its hit geometry and carries the progress state used for
//! visual feedback.

use glam::{Quat, Vec3};
use rt_core::{
    ComponentId, GizmoId, HandleId, HitObject, HitRecord, SceneGraph, SpaceType, Transform,
    TransformationDomain, TransformationKind,
};

use crate::config::GizmoConfig;
use crate::handle::{GizmoHandle, build_handles};

/// Smallest depth used when sizing the gizmo to the view
const MIN_VIEW_DEPTH: f32 = 1e-3;

/// Result of picking a gizmo with a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GizmoHit {
    /// Handle that was hit
    pub handle: HandleId,
    /// Domain tag of that handle
    pub domain: TransformationDomain,
    /// World position of the hit
    pub point: Vec3,
    /// Distance along the ray
    pub distance: f32,
}

/// A manipulator bound to one transformation kind
#[derive(Debug, Clone)]
pub struct Gizmo {
    id: GizmoId,
    kind: TransformationKind,
    handles: Vec<GizmoHandle>,
    location: Vec3,
    target_rotation: Quat,
    space: SpaceType,
    view_scale: f32,
    screen_size: f32,
    scale_sensitivity: f32,
    visible: bool,
    collision_enabled: bool,
    tick_enabled: bool,
    attached_to: Option<ComponentId>,
    attach_socket: Option<String>,
    in_progress: bool,
    progress_domain: TransformationDomain,
}

impl Gizmo {
    /// Create a hidden, disabled gizmo
    pub fn new(kind: TransformationKind, config: &GizmoConfig) -> Self {
        Self {
            id: GizmoId::generate(),
            kind,
            handles: build_handles(kind, config),
            location: Vec3::ZERO,
            target_rotation: Quat::IDENTITY,
            space: SpaceType::World,
            view_scale: 1.0,
            screen_size: config.screen_size,
            scale_sensitivity: config.scale_sensitivity,
            visible: false,
            collision_enabled: false,
            tick_enabled: false,
            attached_to: None,
            attach_socket: None,
            in_progress: false,
            progress_domain: TransformationDomain::None,
        }
    }

    /// Identity of this gizmo
    pub fn id(&self) -> GizmoId {
        self.id
    }

    /// Transformation kind this gizmo performs
    pub fn kind(&self) -> TransformationKind {
        self.kind
    }

    /// Hit-testable parts
    pub fn handles(&self) -> &[GizmoHandle] {
        &self.handles
    }

    /// Whether the gizmo is shown
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the gizmo answers ray picks
    pub fn collision_enabled(&self) -> bool {
        self.collision_enabled
    }

    /// Whether the gizmo is driven every tick
    pub fn tick_enabled(&self) -> bool {
        self.tick_enabled
    }

    /// World location (the pivot of rotations and scales)
    pub fn location(&self) -> Vec3 {
        self.location
    }

    /// Space the gizmo axes are actually expressed in.
    ///
    /// The scale gizmo always works in local space.
    pub fn effective_space(&self) -> SpaceType {
        match self.kind {
            TransformationKind::Scale => SpaceType::Local,
            _ => self.space,
        }
    }

    /// World orientation of the gizmo axes
    pub fn rotation(&self) -> Quat {
        match self.effective_space() {
            SpaceType::World => Quat::IDENTITY,
            SpaceType::Local => self.target_rotation,
        }
    }

    /// Placement including the view scale
    pub fn transform(&self) -> Transform {
        Transform::new(self.location, self.rotation(), Vec3::splat(self.view_scale))
    }

    /// Current view scale factor
    pub fn view_scale(&self) -> f32 {
        self.view_scale
    }

    /// Scale change per gizmo unit of pointer travel
    pub fn scale_sensitivity(&self) -> f32 {
        self.scale_sensitivity
    }

    /// Component the gizmo follows, if any
    pub fn attached_to(&self) -> Option<ComponentId> {
        self.attached_to
    }

    /// Socket used for the current attachment
    pub fn attach_socket(&self) -> Option<&str> {
        self.attach_socket.as_deref()
    }

    /// Progress state as `(in_progress, domain)`
    pub fn progress_state(&self) -> (bool, TransformationDomain) {
        (self.in_progress, self.progress_domain)
    }

    /// Make the gizmo visible, pickable and ticking
    pub fn show(&mut self) {
        self.visible = true;
        self.collision_enabled = true;
        self.tick_enabled = true;
    }

    /// Hide and disable the gizmo, dropping its attachment and progress state
    pub fn hide(&mut self) {
        self.visible = false;
        self.collision_enabled = false;
        self.tick_enabled = false;
        self.attached_to = None;
        self.attach_socket = None;
        self.in_progress = false;
        self.progress_domain = TransformationDomain::None;
    }

    /// Domain of the handle that was hit, `None` for untagged or unknown handles
    pub fn transformation_domain(&self, handle: HandleId) -> TransformationDomain {
        self.handles
            .iter()
            .find(|h| h.id == handle)
            .map(|h| h.domain)
            .unwrap_or_default()
    }

    /// Update the visual progress state, returning true if it changed
    pub fn set_transform_progress_state(
        &mut self,
        in_progress: bool,
        domain: TransformationDomain,
    ) -> bool {
        let domain = if in_progress {
            domain
        } else {
            TransformationDomain::None
        };
        if self.in_progress == in_progress && self.progress_domain == domain {
            return false;
        }
        self.in_progress = in_progress;
        self.progress_domain = domain;
        true
    }

    /// Snap the gizmo onto a component, or onto one of its sockets if it exists.
    ///
    /// Returns false if the component is gone.
    pub fn attach_to(
        &mut self,
        scene: &dyn SceneGraph,
        target: ComponentId,
        socket: Option<&str>,
    ) -> bool {
        let socket = socket.filter(|name| scene.socket_transform(target, name).is_some());
        self.attached_to = Some(target);
        self.attach_socket = socket.map(str::to_owned);
        self.follow_target(scene)
    }

    /// Move the gizmo to the current placement of its attachment
    pub fn follow_target(&mut self, scene: &dyn SceneGraph) -> bool {
        let Some(target) = self.attached_to else {
            return false;
        };
        let placement = match &self.attach_socket {
            Some(socket) => scene.socket_transform(target, socket),
            None => scene.world_transform(target),
        };
        match placement {
            Some(placement) => {
                self.location = placement.translation;
                self.target_rotation = placement.rotation;
                true
            }
            None => false,
        }
    }

    /// Choose world or local axes
    pub fn update_space(&mut self, space: SpaceType) {
        self.space = space;
    }

    /// Rescale the gizmo so it keeps a constant size on screen
    pub fn scale_to_view(&mut self, camera_location: Vec3, camera_forward: Vec3, fov_degrees: f32) {
        let forward = camera_forward.normalize_or_zero();
        let depth = if forward == Vec3::ZERO {
            (self.location - camera_location).length()
        } else {
            (self.location - camera_location).dot(forward)
        };
        let half_fov = (fov_degrees.to_radians() * 0.5).tan();
        let scale = depth.max(MIN_VIEW_DEPTH) * half_fov * self.screen_size;
        if scale.is_finite() && scale > 0.0 {
            self.view_scale = scale;
        }
    }

    /// Pick the nearest handle hit by a world-space ray
    pub fn pick(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<GizmoHit> {
        if !self.collision_enabled {
            return None;
        }
        let dir = ray_dir.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }

        // Handles are defined in gizmo space; bring the ray there
        let inverse = self.rotation().inverse();
        let local_origin = inverse * (ray_origin - self.location) / self.view_scale;
        let local_dir = inverse * dir;

        self.handles
            .iter()
            .filter_map(|h| {
                let t = h.shape.intersect(local_origin, local_dir)?;
                let distance = t * self.view_scale;
                Some(GizmoHit {
                    handle: h.id,
                    domain: h.domain,
                    point: ray_origin + dir * distance,
                    distance,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Express a pick as a ray query record
    pub fn hit_record(&self, hit: &GizmoHit) -> HitRecord {
        HitRecord {
            object: HitObject::Gizmo {
                gizmo: self.id,
                handle: hit.handle,
            },
            point: hit.point,
            distance: hit.distance,
        }
    }
}
