//! Application assembly and shared resources

use bevy::asset::AssetMetaCheck;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use respray_core::{Rgb, DEFAULT_PICKER_COLOR};

use crate::config::ViewerSettings;
use crate::model::ModelPlugin;
use crate::paint::PaintPlugin;
use crate::scene::ScenePlugin;
use crate::ui::UiPlugin;

/// Text shown in the panel's status line, written by whichever system last
/// had something to report.
#[derive(Resource, Default)]
pub struct StatusLine(pub String);

/// UI-owned paint state: the custom picker's current color and the
/// solid-mode flag the recolor pass reads.
#[derive(Resource)]
pub struct PaintControls {
    pub picker: Rgb,
    pub solid: bool,
}

impl Default for PaintControls {
    fn default() -> Self {
        Self {
            picker: DEFAULT_PICKER_COLOR,
            solid: false,
        }
    }
}

/// Run the Bevy application
pub fn run(settings: ViewerSettings) {
    App::new()
        // Showroom backdrop (#f4f6fb)
        .insert_resource(ClearColor(Color::srgb(0.957, 0.965, 0.984)))
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: settings.window_title.clone(),
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    // Don't look for .meta files next to the model
                    meta_check: AssetMetaCheck::Never,
                    ..default()
                })
                .build()
                // main() installed the fmt subscriber already
                .disable::<LogPlugin>(),
        )
        .add_plugins(EguiPlugin::default())
        .insert_resource(PaintControls {
            solid: settings.solid_default,
            ..default()
        })
        .insert_resource(settings)
        .init_resource::<StatusLine>()
        .add_plugins(ScenePlugin)
        .add_plugins(ModelPlugin)
        .add_plugins(PaintPlugin)
        .add_plugins(UiPlugin)
        .run();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_controls_default_seeds_picker_color() {
        let controls = PaintControls::default();

        assert_eq!(controls.picker, DEFAULT_PICKER_COLOR);
        assert!(!controls.solid);
    }
}
