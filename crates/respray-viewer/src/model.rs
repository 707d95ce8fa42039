//! glTF car model loading and spawn tracking

use bevy::asset::LoadState;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use bevy::scene::{InstanceId, SceneSpawner};

use crate::app::StatusLine;
use crate::config::ViewerSettings;

pub struct ModelPlugin;

impl Plugin for ModelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CarModel>()
            .add_message::<ModelReady>()
            .add_systems(Startup, begin_load)
            .add_systems(Update, (poll_load, watch_instancing).chain());
    }
}

/// Marker component on the spawned model's root entity
#[derive(Component)]
pub struct CarRoot;

/// Sent once the scene spawner has finished instancing the model under its
/// root entity. Framing and material discovery both key off this.
#[derive(Message)]
pub struct ModelReady {
    pub root: Entity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    NotStarted,
    Loading,
    Spawned,
    Ready,
    Failed,
}

/// Tracks the one car model through load, spawn, and instancing
#[derive(Resource, Default)]
pub struct CarModel {
    pub gltf: Option<Handle<Gltf>>,
    pub root: Option<Entity>,
    pub instance: Option<InstanceId>,
    pub phase: LoadPhase,
}

fn begin_load(
    mut car: ResMut<CarModel>,
    mut status: ResMut<StatusLine>,
    asset_server: Res<AssetServer>,
    settings: Res<ViewerSettings>,
) {
    tracing::info!("Starting to load model: {}", settings.model_path);
    let handle: Handle<Gltf> = asset_server.load(&settings.model_path);
    car.gltf = Some(handle);
    car.phase = LoadPhase::Loading;
    status.0 = "Loading model…".to_string();
}

/// Check loading state and spawn the scene once the glTF is in
fn poll_load(
    mut commands: Commands,
    mut car: ResMut<CarModel>,
    mut status: ResMut<StatusLine>,
    mut scene_spawner: ResMut<SceneSpawner>,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
    settings: Res<ViewerSettings>,
) {
    if car.phase != LoadPhase::Loading {
        return;
    }
    let Some(handle) = car.gltf.clone() else {
        return;
    };

    match asset_server.get_load_state(handle.id()) {
        Some(LoadState::Loaded) => {
            let Some(gltf) = gltf_assets.get(&handle) else {
                return;
            };
            let scene_handle = if let Some(scene) = gltf.default_scene.clone() {
                scene
            } else if !gltf.scenes.is_empty() {
                // Use first scene if no default
                gltf.scenes[0].clone()
            } else {
                tracing::error!("Model {} contains no scenes", settings.model_path);
                status.0 = "ERROR loading model ❌ (see log)".to_string();
                car.phase = LoadPhase::Failed;
                return;
            };

            tracing::info!("Model loaded: {}", settings.model_path);
            let root = commands
                .spawn((Transform::default(), Visibility::default(), CarRoot))
                .id();
            car.instance = Some(scene_spawner.spawn_as_child(scene_handle, root));
            car.root = Some(root);
            car.phase = LoadPhase::Spawned;
        }
        Some(LoadState::Failed(err)) => {
            tracing::error!("Failed to load model {}: {}", settings.model_path, err);
            status.0 = "ERROR loading model ❌ (see log)".to_string();
            car.phase = LoadPhase::Failed;
        }
        _ => {
            // Still loading
        }
    }
}

/// The scene spawner fills in the hierarchy a frame or two after the spawn
/// request, so hold ModelReady back until the instance is complete and
/// downstream passes never see a half-built tree. Completion is the gate
/// here, not mesh presence: a meshless scene still becomes Ready and later
/// reports zero materials.
fn watch_instancing(
    mut car: ResMut<CarModel>,
    mut ready: MessageWriter<ModelReady>,
    scene_spawner: Res<SceneSpawner>,
) {
    if car.phase != LoadPhase::Spawned {
        return;
    }
    let (Some(root), Some(instance)) = (car.root, car.instance) else {
        return;
    };

    if scene_spawner.instance_is_ready(instance) {
        tracing::debug!("Model instanced");
        car.phase = LoadPhase::Ready;
        ready.write(ModelReady { root });
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::message::Messages;
    use bevy::ecs::system::RunSystemOnce;

    use super::*;

    fn tracked_model(root: Entity, instance: InstanceId) -> CarModel {
        CarModel {
            gltf: None,
            root: Some(root),
            instance: Some(instance),
            phase: LoadPhase::Spawned,
        }
    }

    #[test]
    fn test_finished_instance_promotes_phase_and_reports_root() {
        let mut world = World::new();
        world.init_resource::<AppTypeRegistry>();
        world.init_resource::<Messages<ModelReady>>();

        let mut scenes = Assets::<Scene>::default();
        let scene_handle = scenes.add(Scene::new(World::new()));
        world.insert_resource(scenes);

        let root = world
            .spawn((Transform::default(), Visibility::default(), CarRoot))
            .id();

        let mut spawner = SceneSpawner::default();
        let instance = spawner
            .spawn_sync(&mut world, scene_handle.id())
            .expect("empty scene should spawn");
        world.insert_resource(spawner);
        world.insert_resource(tracked_model(root, instance));

        world.run_system_once(watch_instancing).unwrap();

        assert_eq!(world.resource::<CarModel>().phase, LoadPhase::Ready);
        let sent: Vec<ModelReady> = world
            .resource_mut::<Messages<ModelReady>>()
            .drain()
            .collect();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].root, root);
    }

    #[test]
    fn test_pending_instance_holds_spawned_phase() {
        let mut world = World::new();
        world.init_resource::<Messages<ModelReady>>();

        let root = world
            .spawn((Transform::default(), Visibility::default(), CarRoot))
            .id();

        // Queued but never processed, so the instance stays pending
        let mut spawner = SceneSpawner::default();
        let instance = spawner.spawn(Handle::<Scene>::default());
        world.insert_resource(spawner);
        world.insert_resource(tracked_model(root, instance));

        world.run_system_once(watch_instancing).unwrap();

        assert_eq!(world.resource::<CarModel>().phase, LoadPhase::Spawned);
        assert!(world.resource::<Messages<ModelReady>>().is_empty());
    }

    #[test]
    fn test_untracked_model_is_left_alone() {
        let mut world = World::new();
        world.init_resource::<Messages<ModelReady>>();
        world.init_resource::<SceneSpawner>();
        world.init_resource::<CarModel>();

        world.run_system_once(watch_instancing).unwrap();

        assert_eq!(world.resource::<CarModel>().phase, LoadPhase::NotStarted);
        assert!(world.resource::<Messages<ModelReady>>().is_empty());
    }
}
