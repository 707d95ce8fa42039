//! Paint control panel using bevy_egui

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};

use respray_core::Rgb;

use crate::app::{PaintControls, StatusLine};
use crate::config::ViewerSettings;
use crate::paint::{RecolorRequest, ResetRequest};

const SOLID_ON: &str = "Solid ON ✅ (strong paint color)";
const SOLID_OFF: &str = "Solid OFF (tint textures)";

/// Grouped system parameters for the panel system
#[derive(SystemParam)]
pub struct UiParams<'w, 's> {
    pub contexts: EguiContexts<'w, 's>,
    pub controls: ResMut<'w, PaintControls>,
    pub status: ResMut<'w, StatusLine>,
    pub settings: Res<'w, ViewerSettings>,
    pub recolor: MessageWriter<'w, RecolorRequest>,
    pub reset: MessageWriter<'w, ResetRequest>,
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // Panel runs in EguiPrimaryContextPass for proper input handling (bevy_egui 0.38+)
        app.add_systems(EguiPrimaryContextPass, ui_system);
    }
}

fn ui_system(mut params: UiParams) {
    // Get the egui context - early return if not available
    let Ok(ctx) = params.contexts.ctx_mut() else { return };

    egui::Window::new("Car Configurator")
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(16.0, -16.0))
        .collapsible(false)
        .resizable(false)
        .default_width(300.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Change car paint color");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Reset").clicked() {
                        params.reset.write(ResetRequest);
                    }
                });
            });

            ui.separator();

            // Swatch chips, four to a row
            for row in params.settings.palette.chunks(4) {
                ui.horizontal(|ui| {
                    for swatch in row {
                        let [r, g, b] = swatch.color.to_u8();
                        let text = egui::RichText::new(&swatch.name)
                            .size(12.0)
                            .color(chip_text_color(swatch.color));
                        let chip = egui::Button::new(text)
                            .fill(egui::Color32::from_rgb(r, g, b))
                            .min_size(egui::vec2(64.0, 24.0));

                        if ui.add(chip).on_hover_text(swatch.color.to_hex()).clicked() {
                            params.controls.picker = swatch.color;
                            params.recolor.write(RecolorRequest {
                                color: swatch.color,
                            });
                        }
                    }
                });
            }

            ui.add_space(4.0);

            ui.horizontal(|ui| {
                ui.label("Custom:");
                let mut rgb = params.controls.picker.to_u8();
                if egui::color_picker::color_edit_button_srgb(ui, &mut rgb).changed() {
                    let color = Rgb::from_u8(rgb[0], rgb[1], rgb[2]);
                    params.controls.picker = color;
                    params.recolor.write(RecolorRequest { color });
                }
            });

            // Flipping the mode only records it; the next paint pass uses it
            if ui
                .checkbox(&mut params.controls.solid, "Solid paint mode")
                .changed()
            {
                params.status.0 = if params.controls.solid {
                    SOLID_ON.to_string()
                } else {
                    SOLID_OFF.to_string()
                };
            }

            ui.separator();

            ui.label(
                egui::RichText::new(params.status.0.as_str())
                    .size(12.0)
                    .color(egui::Color32::GRAY),
            );
        });
}

/// Black on light chips, white on dark ones
fn chip_text_color(color: Rgb) -> egui::Color32 {
    let luminance = 0.2126 * color.r + 0.7152 * color.g + 0.0722 * color.b;
    if luminance > 0.5 {
        egui::Color32::BLACK
    } else {
        egui::Color32::WHITE
    }
}
