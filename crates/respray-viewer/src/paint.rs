//! Material discovery and repaint passes over the loaded car
//!
//! The registry out of respray-core holds non-owning `AssetId`s plus
//! snapshots; these systems resolve ids back through `Assets` when a paint
//! or reset message arrives. Per-surface rules (eligibility, finish, what a
//! reset restores) all live in the core crate, this module only moves state
//! between `StandardMaterial` and `SurfaceStyle`.

use bevy::prelude::*;

use respray_core::{PaintRegistry, PaintStatus, Rgb, SurfaceStyle};

use crate::app::{PaintControls, StatusLine};
use crate::config::ViewerSettings;
use crate::model::ModelReady;

pub struct PaintPlugin;

impl Plugin for PaintPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CarPaint>()
            .add_message::<RecolorRequest>()
            .add_message::<ResetRequest>()
            .add_systems(
                Update,
                (
                    discover_surfaces,
                    queue_initial_paint,
                    apply_recolor,
                    apply_reset,
                )
                    .chain(),
            );
    }
}

/// Registry of paintable materials for the loaded model. `populated` flips
/// when discovery has run, even if it registered nothing; the registry is
/// never rebuilt for the same model.
#[derive(Resource, Default)]
pub struct CarPaint {
    pub registry: PaintRegistry<AssetId<StandardMaterial>, Handle<Image>>,
    pub populated: bool,
}

/// Ask for every registered material to take this color.
#[derive(Message)]
pub struct RecolorRequest {
    pub color: Rgb,
}

/// Ask for the factory materials back.
#[derive(Message)]
pub struct ResetRequest;

/// Read the paint-relevant slice of a `StandardMaterial`. Alpha rides in the
/// base color here, so opacity is read from there rather than a separate
/// channel.
fn style_of(material: &StandardMaterial) -> SurfaceStyle<Handle<Image>> {
    let color = material.base_color.to_srgba();
    SurfaceStyle {
        color: Some(Rgb::new(color.red, color.green, color.blue)),
        map: material.base_color_texture.clone(),
        roughness: Some(material.perceptual_roughness),
        metalness: Some(material.metallic),
        clearcoat: Some(material.clearcoat),
        clearcoat_roughness: Some(material.clearcoat_perceptual_roughness),
        transparent: matches!(
            material.alpha_mode,
            AlphaMode::Blend | AlphaMode::Premultiplied | AlphaMode::Add | AlphaMode::Multiply
        ),
        opacity: Some(color.alpha),
    }
}

/// Write a style back onto the material. The material's current alpha is
/// kept; painting changes hue, never translucency.
fn write_style(material: &mut StandardMaterial, style: &SurfaceStyle<Handle<Image>>) {
    if let Some(color) = style.color {
        let alpha = material.base_color.to_srgba().alpha;
        material.base_color = Color::srgba(color.r, color.g, color.b, alpha);
    }
    material.base_color_texture = style.map.clone();
    if let Some(roughness) = style.roughness {
        material.perceptual_roughness = roughness;
    }
    if let Some(metalness) = style.metalness {
        material.metallic = metalness;
    }
    if let Some(clearcoat) = style.clearcoat {
        material.clearcoat = clearcoat;
    }
    if let Some(clearcoat_roughness) = style.clearcoat_roughness {
        material.clearcoat_perceptual_roughness = clearcoat_roughness;
    }
}

/// Collect (material id, style) pairs under an entity in traversal order
fn collect_surfaces(
    entity: Entity,
    children_query: &Query<&Children>,
    material_query: &Query<&MeshMaterial3d<StandardMaterial>>,
    materials: &Assets<StandardMaterial>,
    out: &mut Vec<(AssetId<StandardMaterial>, SurfaceStyle<Handle<Image>>)>,
) {
    if let Ok(material_handle) = material_query.get(entity) {
        if let Some(material) = materials.get(&material_handle.0) {
            out.push((material_handle.0.id(), style_of(material)));
        }
    }
    if let Ok(children) = children_query.get(entity) {
        for child in children.iter() {
            collect_surfaces(child, children_query, material_query, materials, out);
        }
    }
}

/// One-shot registry build once the model's scene has been instanced
fn discover_surfaces(
    mut ready: MessageReader<ModelReady>,
    mut paint: ResMut<CarPaint>,
    mut status: ResMut<StatusLine>,
    children_query: Query<&Children>,
    material_query: Query<&MeshMaterial3d<StandardMaterial>>,
    materials: Res<Assets<StandardMaterial>>,
) {
    for message in ready.read() {
        if paint.populated {
            continue;
        }

        let mut surfaces = Vec::new();
        collect_surfaces(
            message.root,
            &children_query,
            &material_query,
            materials.as_ref(),
            &mut surfaces,
        );

        paint.registry = PaintRegistry::discover(surfaces);
        paint.populated = true;

        tracing::info!(materials = paint.registry.len(), "Discovered paintable materials");
        status.0 = PaintStatus::Loaded {
            count: paint.registry.len(),
        }
        .to_string();
    }
}

/// Fire the configured startup color exactly once, after discovery
fn queue_initial_paint(
    mut applied: Local<bool>,
    paint: Res<CarPaint>,
    settings: Res<ViewerSettings>,
    mut controls: ResMut<PaintControls>,
    mut recolor: MessageWriter<RecolorRequest>,
) {
    if *applied || !paint.populated {
        return;
    }
    *applied = true;

    if let Some(color) = settings.initial_color {
        controls.picker = color;
        recolor.write(RecolorRequest { color });
    }
}

/// Repaint every registered material. Mutating through `get_mut` marks the
/// asset modified, so the renderer re-uploads it on its own.
fn apply_recolor(
    mut requests: MessageReader<RecolorRequest>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut status: ResMut<StatusLine>,
    paint: Res<CarPaint>,
    controls: Res<PaintControls>,
    settings: Res<ViewerSettings>,
) {
    for request in requests.read() {
        if paint.registry.is_empty() {
            status.0 = PaintStatus::NothingToPaint.to_string();
            continue;
        }

        for entry in paint.registry.entries() {
            let Some(material) = materials.get_mut(entry.material) else {
                continue;
            };
            let mut style = style_of(material);
            style.repaint(request.color, controls.solid, &settings.finish);
            write_style(material, &style);
        }

        status.0 = paint.registry.paint_status(request.color).to_string();
        tracing::info!(
            color = %request.color.to_hex(),
            materials = paint.registry.len(),
            solid = controls.solid,
            "Repainted car"
        );
    }
}

/// Restore every registered material from its snapshot. With nothing
/// registered this stays silent; there is no factory state to report on.
fn apply_reset(
    mut requests: MessageReader<ResetRequest>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut status: ResMut<StatusLine>,
    paint: Res<CarPaint>,
) {
    for _ in requests.read() {
        for entry in paint.registry.entries() {
            let Some(material) = materials.get_mut(entry.material) else {
                continue;
            };
            let mut style = style_of(material);
            style.restore(&entry.original);
            write_style(material, &style);
        }

        if let Some(restored) = paint.registry.reset_status() {
            status.0 = restored.to_string();
            tracing::info!(materials = paint.registry.len(), "Restored original materials");
        }
    }
}
