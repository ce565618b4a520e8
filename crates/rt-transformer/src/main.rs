//! Headless demo: select a crate by ray, drag it along X with snapping, then
//! duplicate it.

use glam::Vec3;
use rt_core::{RayFilter, Scene, SceneGraph, Transform, TransformationKind};
use rt_transformer::{Transformer, TransformerConfig, ViewState};

fn main() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rt_transformer=debug,rt_gizmo=debug,rt_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Runtime Transformer demo");

    let config = match std::env::args().nth(1) {
        Some(path) => TransformerConfig::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config {}: {}", path, e);
            TransformerConfig::default()
        }),
        None => {
            let mut config = TransformerConfig::default();
            config.snap.set_enabled(TransformationKind::Translation, true);
            config.snap.set_value(TransformationKind::Translation, 0.5);
            config
        }
    };

    let mut scene = Scene::new();
    let actor = scene.spawn_actor("crate", Transform::from_translation(Vec3::ZERO));
    let Some(root) = scene.root_component(actor) else {
        tracing::error!("Spawned actor has no root component");
        return;
    };
    if let Err(e) = scene.set_bounds(root, 0.5) {
        tracing::error!("Failed to set bounds: {}", e);
        return;
    }

    let mut transformer = Transformer::new(config);
    transformer.prewarm_gizmos();

    let camera = Vec3::new(0.0, 0.0, 10.0);
    let filter = RayFilter::default();

    // Click the crate to select it
    transformer.trace(&scene, camera, Vec3::NEG_Z, &filter, false);

    // Grab the X arrow of the gizmo and drag
    let grab = Vec3::new(0.6, 0.0, 10.0);
    transformer.trace(&scene, grab, Vec3::NEG_Z, &filter, false);

    let mut view = ViewState {
        camera_location: camera,
        camera_forward: Vec3::NEG_Z,
        fov_degrees: 60.0,
        pointer_ray: None,
    };
    for step in 0..=8 {
        let origin = grab + Vec3::X * (step as f32 * 0.3);
        view.pointer_ray = Some((origin, Vec3::NEG_Z));
        let delta = transformer.tick(&mut scene, &view);
        if !delta.is_zero() {
            tracing::info!("Tick {}: moved by {:?}", step, delta.translation);
        }
    }
    transformer.clear_domain();

    if let Some(placed) = scene.world_transform(root) {
        tracing::info!("Crate now at {:?}", placed.translation);
    }

    let clones = transformer.clone_selected(&mut scene, true, false);
    tracing::info!(
        "Cloned {} object(s), scene has {} actors",
        clones.len(),
        scene.actor_count()
    );

    for event in transformer.drain_events() {
        tracing::debug!("{:?}", event);
    }

    if let Ok(ron) = transformer.config().to_ron_string() {
        println!("{}", ron);
    }
}
