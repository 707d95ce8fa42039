//! 3D scene management: lighting, orbit camera, and model framing

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use bevy::camera::primitives::MeshAabb;
use bevy::camera::visibility::NoFrustumCulling;

use crate::config::ViewerSettings;
use crate::model::ModelReady;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraSettings>()
            .add_systems(Startup, setup_scene)
            .add_systems(Update, (frame_loaded_model, update_camera).chain());
    }
}

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Orbit camera state. Distance and pivot are re-seated by the framer once
/// the model is in; until then the defaults give a reasonable stand-off view
/// of the origin.
#[derive(Debug, Clone, Resource)]
pub struct CameraSettings {
    pub distance: f32,
    pub target_distance: f32,
    pub azimuth: f32,
    pub elevation: f32,
    pub target: Vec3,
    pub target_focus: Vec3,
    pub sensitivity: f32,
    pub zoom_speed: f32,
    pub smooth_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            distance: 8.0,
            target_distance: 8.0,
            azimuth: std::f32::consts::FRAC_PI_4,
            elevation: 0.25,
            target: Vec3::ZERO,
            target_focus: Vec3::ZERO,
            sensitivity: 0.005,
            zoom_speed: 0.1,
            smooth_factor: 0.15,
            min_distance: 0.05,
            max_distance: 500.0,
        }
    }
}

fn setup_scene(mut commands: Commands) {
    // Camera; the orbit controller repositions it every frame
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 60.0_f32.to_radians(),
            near: 0.01,
            far: 50_000.0,
            ..default()
        }),
        Transform::from_xyz(6.0, 2.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
    ));

    // Bright, even showroom ambient
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
        ..default()
    });

    // Key light, high right-front
    commands.spawn((
        DirectionalLight {
            illuminance: 12_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(6.0, 10.0, 7.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Fill from the opposite side, no shadows
    commands.spawn((
        DirectionalLight {
            illuminance: 4_900.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(-6.0, 4.0, -3.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Rim light from behind to outline the roofline
    commands.spawn((
        DirectionalLight {
            illuminance: 4_100.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(0.0, 6.0, -10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Camera placement derived from a model's bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framing {
    pub target: Vec3,
    pub distance: f32,
    pub azimuth: f32,
    pub elevation: f32,
    pub near: f32,
    pub far: f32,
}

/// Fit the view to an AABB: stand off along the (1, 0.35, 1) diagonal far
/// enough that the largest dimension fits the vertical FOV, scaled by the
/// margin, with clip planes proportional to the model scale.
pub fn frame_bounds(min: Vec3, max: Vec3, vertical_fov: f32, margin: f32) -> Framing {
    let center = (min + max) / 2.0;
    let size = max - min;
    // Point-sized models would collapse the math; give them a floor
    let max_dim = size.x.max(size.y).max(size.z).max(1e-3);

    let fit = (max_dim / 2.0) / (vertical_fov / 2.0).tan();
    let stand_off = fit.abs() * margin;

    let offset = Vec3::new(stand_off, stand_off * 0.35, stand_off);
    let distance = offset.length();

    Framing {
        target: center,
        distance,
        azimuth: offset.x.atan2(offset.z),
        elevation: (offset.y / distance).asin(),
        near: (max_dim / 100.0).max(0.01),
        far: max_dim * 100.0,
    }
}

/// One-shot framing pass: unions the spawned model's mesh bounds in world
/// space and re-seats the orbit pivot and clip planes. Meshes are also opted
/// out of frustum culling so large panels never pop while orbiting.
fn frame_loaded_model(
    mut commands: Commands,
    mut ready: MessageReader<ModelReady>,
    mut camera_settings: ResMut<CameraSettings>,
    mut projections: Query<&mut Projection, With<MainCamera>>,
    children_query: Query<&Children>,
    mesh_query: Query<(&Mesh3d, &GlobalTransform)>,
    mesh_assets: Res<Assets<Mesh>>,
    settings: Res<ViewerSettings>,
) {
    for message in ready.read() {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        let mut found = false;

        // Recursively union mesh AABBs under the model root
        fn collect_bounds(
            entity: Entity,
            commands: &mut Commands,
            children_query: &Query<&Children>,
            mesh_query: &Query<(&Mesh3d, &GlobalTransform)>,
            mesh_assets: &Assets<Mesh>,
            min: &mut Vec3,
            max: &mut Vec3,
            found: &mut bool,
        ) {
            if let Ok((mesh_handle, global_transform)) = mesh_query.get(entity) {
                commands.entity(entity).insert(NoFrustumCulling);

                if let Some(aabb) = mesh_assets.get(&mesh_handle.0).and_then(|m| m.compute_aabb())
                {
                    let center = Vec3::from(aabb.center);
                    let half = Vec3::from(aabb.half_extents);
                    // All eight corners, so rotated parts are bounded correctly
                    for sx in [-1.0, 1.0] {
                        for sy in [-1.0, 1.0] {
                            for sz in [-1.0, 1.0] {
                                let corner = center + half * Vec3::new(sx, sy, sz);
                                let world = global_transform.transform_point(corner);
                                *min = min.min(world);
                                *max = max.max(world);
                            }
                        }
                    }
                    *found = true;
                }
            }

            if let Ok(children) = children_query.get(entity) {
                for child in children.iter() {
                    collect_bounds(
                        child,
                        commands,
                        children_query,
                        mesh_query,
                        mesh_assets,
                        min,
                        max,
                        found,
                    );
                }
            }
        }

        collect_bounds(
            message.root,
            &mut commands,
            &children_query,
            &mesh_query,
            mesh_assets.as_ref(),
            &mut min,
            &mut max,
            &mut found,
        );

        if !found {
            tracing::warn!("Model has no boundable meshes, keeping the default view");
            continue;
        }

        let fov = match projections.single() {
            Ok(Projection::Perspective(p)) => p.fov,
            _ => 60.0_f32.to_radians(),
        };

        let framing = frame_bounds(min, max, fov, settings.frame_margin);

        camera_settings.target = framing.target;
        camera_settings.target_focus = framing.target;
        camera_settings.distance = framing.distance;
        camera_settings.target_distance = framing.distance;
        camera_settings.azimuth = framing.azimuth;
        camera_settings.elevation = framing.elevation;
        // Zoom limits scale with the model
        camera_settings.min_distance = framing.distance * 0.05;
        camera_settings.max_distance = framing.distance * 10.0;

        if let Ok(mut projection) = projections.single_mut() {
            if let Projection::Perspective(p) = projection.as_mut() {
                p.near = framing.near;
                p.far = framing.far;
            }
        }

        tracing::info!(
            distance = framing.distance,
            near = framing.near,
            far = framing.far,
            "Framed camera on model"
        );
    }
}

/// Damped orbit controls: left-drag or one-finger drag to orbit, wheel or
/// pinch to zoom. Panning is deliberately not offered; the pivot stays on
/// the car.
fn update_camera(
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mut settings: ResMut<CameraSettings>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    time: Res<Time>,
    mut contexts: bevy_egui::EguiContexts,
) {
    // Don't fight the panel for the pointer
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);

    let mut total_motion = Vec2::ZERO;
    for motion in mouse_motion.read() {
        total_motion += motion.delta;
    }

    // Orbit with left mouse drag
    if mouse_button.pressed(MouseButton::Left) && !egui_wants_pointer {
        settings.azimuth -= total_motion.x * settings.sensitivity;
        settings.elevation =
            (settings.elevation - total_motion.y * settings.sensitivity).clamp(-1.5, 1.5);
    }

    // Zoom with scroll
    if !egui_wants_pointer {
        for scroll in mouse_wheel.read() {
            let zoom_factor = 1.0 - scroll.y * settings.zoom_speed * 0.3;
            settings.target_distance = (settings.target_distance * zoom_factor)
                .clamp(settings.min_distance, settings.max_distance);
        }
    } else {
        // Drain the scroll events even if we're not using them
        for _ in mouse_wheel.read() {}
    }

    // Touch orbit
    if touch_input.iter().count() == 1 && !egui_wants_pointer {
        for touch in touch_input.iter() {
            let delta = touch.delta();
            if delta != Vec2::ZERO {
                settings.azimuth -= delta.x * settings.sensitivity;
                settings.elevation =
                    (settings.elevation - delta.y * settings.sensitivity).clamp(-1.5, 1.5);
            }
        }
    }

    // Pinch to zoom
    if touch_input.iter().count() == 2 {
        let touches: Vec<_> = touch_input.iter().collect();
        if let (Some(t1), Some(t2)) = (touches.first(), touches.get(1)) {
            let curr_dist = t1.position().distance(t2.position());
            let prev_dist = (t1.position() - t1.delta()).distance(t2.position() - t2.delta());
            let zoom_factor = prev_dist / curr_dist.max(1.0);
            settings.target_distance = (settings.target_distance * zoom_factor)
                .clamp(settings.min_distance, settings.max_distance);
        }
    }

    // Smooth interpolation for zoom and pivot
    let dt = time.delta_secs();
    let lerp_factor = 1.0 - (-settings.smooth_factor * 60.0 * dt).exp();
    settings.distance =
        settings.distance + (settings.target_distance - settings.distance) * lerp_factor;
    settings.target = settings.target + (settings.target_focus - settings.target) * lerp_factor;

    // Spherical placement, Y up
    if let Ok(mut transform) = camera_query.single_mut() {
        let x = settings.distance * settings.elevation.cos() * settings.azimuth.sin();
        let y = settings.distance * settings.elevation.sin();
        let z = settings.distance * settings.elevation.cos() * settings.azimuth.cos();

        transform.translation = settings.target + Vec3::new(x, y, z);
        transform.look_at(settings.target, Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_frame_bounds_unit_cube() {
        let framing = frame_bounds(
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
            60.0_f32.to_radians(),
            1.35,
        );

        // Tight fit for max_dim 2 at 60 degrees is 1/tan(30) = 1.732,
        // stand-off 1.35x that, camera offset (d, 0.35d, d)
        assert_eq!(framing.target, Vec3::ZERO);
        assert!(close(framing.distance, 2.3383 * 1.4569));
        assert!(close(framing.azimuth, std::f32::consts::FRAC_PI_4));
        assert!(close(framing.elevation, 0.2426));
        assert!(close(framing.near, 0.02));
        assert!(close(framing.far, 200.0));
    }

    #[test]
    fn test_frame_bounds_off_center() {
        let framing = frame_bounds(
            Vec3::new(10.0, 0.0, -4.0),
            Vec3::new(14.0, 2.0, 0.0),
            60.0_f32.to_radians(),
            1.35,
        );
        assert_eq!(framing.target, Vec3::new(12.0, 1.0, -2.0));
        // Largest dimension is 4
        assert!(close(framing.near, 0.04));
        assert!(close(framing.far, 400.0));
    }

    #[test]
    fn test_frame_bounds_small_model_floors_near_plane() {
        let framing = frame_bounds(
            Vec3::splat(-0.05),
            Vec3::splat(0.05),
            60.0_f32.to_radians(),
            1.35,
        );
        assert_eq!(framing.near, 0.01);
    }

    #[test]
    fn test_spherical_placement_matches_framing_diagonal() {
        let framing = frame_bounds(
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
            60.0_f32.to_radians(),
            1.35,
        );

        // Re-derive the camera offset from the spherical angles the way the
        // orbit controller does and check it lands on the (1, 0.35, 1) ray
        let x = framing.distance * framing.elevation.cos() * framing.azimuth.sin();
        let y = framing.distance * framing.elevation.sin();
        let z = framing.distance * framing.elevation.cos() * framing.azimuth.cos();

        assert!(close(x, z));
        assert!(close(y / x, 0.35));
    }

    #[test]
    fn test_margin_scales_distance() {
        let tight = frame_bounds(Vec3::splat(-1.0), Vec3::splat(1.0), 1.0, 1.0);
        let padded = frame_bounds(Vec3::splat(-1.0), Vec3::splat(1.0), 1.0, 1.35);
        assert!(close(padded.distance, tight.distance * 1.35));
    }
}
