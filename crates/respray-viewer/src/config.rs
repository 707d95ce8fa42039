//! Configuration loading and validation

use anyhow::{Context, Result};
use bevy::prelude::Resource;
use respray_core::{default_palette, PaintFinish, Rgb, Swatch};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub paint: PaintConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    /// Palette override; the stock eight colors are used when empty
    #[serde(default, rename = "swatch")]
    pub swatches: Vec<SwatchConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model path relative to the asset root
    #[serde(default = "default_model_path")]
    pub path: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

fn default_model_path() -> String {
    "models/model.glb".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
        }
    }
}

fn default_title() -> String {
    "Car Configurator".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaintConfig {
    /// Color applied once the model is ready (hex string)
    #[serde(default)]
    pub initial_color: Option<String>,
    /// Start with solid mode on (textures stripped when painting)
    #[serde(default)]
    pub solid: bool,
    /// Finish forced onto painted surfaces
    #[serde(default = "default_roughness")]
    pub roughness: f32,
    #[serde(default = "default_metalness")]
    pub metalness: f32,
    #[serde(default = "default_clearcoat")]
    pub clearcoat: f32,
    #[serde(default = "default_clearcoat_roughness")]
    pub clearcoat_roughness: f32,
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            initial_color: None,
            solid: false,
            roughness: default_roughness(),
            metalness: default_metalness(),
            clearcoat: default_clearcoat(),
            clearcoat_roughness: default_clearcoat_roughness(),
        }
    }
}

fn default_roughness() -> f32 {
    PaintFinish::default().roughness
}

fn default_metalness() -> f32 {
    PaintFinish::default().metalness
}

fn default_clearcoat() -> f32 {
    PaintFinish::default().clearcoat
}

fn default_clearcoat_roughness() -> f32 {
    PaintFinish::default().clearcoat_roughness
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Margin multiplier on the tightly-fit framing distance
    #[serde(default = "default_margin")]
    pub margin: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            margin: default_margin(),
        }
    }
}

fn default_margin() -> f32 {
    1.35
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwatchConfig {
    /// Swatch name shown as the chip tooltip
    pub name: String,
    /// Hex color, e.g. "#ef4444"
    pub color: String,
}

/// Runtime settings resource distilled from the config file and CLI
#[derive(Resource, Debug, Clone)]
pub struct ViewerSettings {
    pub model_path: String,
    pub window_title: String,
    pub palette: Vec<Swatch>,
    pub finish: PaintFinish,
    pub initial_color: Option<Rgb>,
    pub solid_default: bool,
    pub frame_margin: f32,
}

impl Config {
    /// Convert to ViewerSettings, parsing every hex color up front so bad
    /// values fail at startup instead of mid-session.
    pub fn to_viewer_settings(&self) -> Result<ViewerSettings> {
        let palette = if self.swatches.is_empty() {
            default_palette()
        } else {
            self.swatches
                .iter()
                .map(|s| {
                    let color = Rgb::from_hex(&s.color)
                        .with_context(|| format!("bad swatch color for {:?}", s.name))?;
                    Ok(Swatch::new(s.name.clone(), color))
                })
                .collect::<Result<Vec<_>>>()?
        };

        let initial_color = self
            .paint
            .initial_color
            .as_deref()
            .map(|hex| Rgb::from_hex(hex).with_context(|| format!("bad initial color {hex:?}")))
            .transpose()?;

        Ok(ViewerSettings {
            model_path: self.model.path.clone(),
            window_title: self.window.title.clone(),
            palette,
            finish: PaintFinish {
                roughness: self.paint.roughness,
                metalness: self.paint.metalness,
                clearcoat: self.paint.clearcoat,
                clearcoat_roughness: self.paint.clearcoat_roughness,
            },
            initial_color,
            solid_default: self.paint.solid,
            frame_margin: self.camera.margin,
        })
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        let settings = config.to_viewer_settings().unwrap();

        assert_eq!(settings.model_path, "models/model.glb");
        assert_eq!(settings.palette.len(), 8);
        assert_eq!(settings.finish, PaintFinish::default());
        assert_eq!(settings.initial_color, None);
        assert!(!settings.solid_default);
        assert_eq!(settings.frame_margin, 1.35);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str(
            r##"
            [model]
            path = "models/roadster.glb"

            [paint]
            initial_color = "#ef4444"
            "##,
        )
        .unwrap();
        let settings = config.to_viewer_settings().unwrap();

        assert_eq!(settings.model_path, "models/roadster.glb");
        assert_eq!(settings.initial_color, Some(Rgb::from_u8(0xef, 0x44, 0x44)));
        // Untouched sections fall back to defaults
        assert_eq!(settings.window_title, "Car Configurator");
        assert_eq!(settings.finish.clearcoat, 1.0);
    }

    #[test]
    fn test_swatch_override() {
        let config: Config = toml::from_str(
            r##"
            [[swatch]]
            name = "Racing Green"
            color = "#004225"

            [[swatch]]
            name = "Gulf Blue"
            color = "#7cb7d7"
            "##,
        )
        .unwrap();
        let settings = config.to_viewer_settings().unwrap();

        assert_eq!(settings.palette.len(), 2);
        assert_eq!(settings.palette[0].name, "Racing Green");
        assert_eq!(settings.palette[1].color, Rgb::from_u8(0x7c, 0xb7, 0xd7));
    }

    #[test]
    fn test_bad_color_is_rejected() {
        let config: Config = toml::from_str(
            r#"
            [paint]
            initial_color = "not-a-color"
            "#,
        )
        .unwrap();
        assert!(config.to_viewer_settings().is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("respray.toml");
        std::fs::write(
            &path,
            r#"
            [window]
            title = "Showroom"

            [camera]
            margin = 1.5
            "#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.window.title, "Showroom");
        assert_eq!(config.camera.margin, 1.5);
        assert_eq!(config.model.path, "models/model.glb");
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.window.title, "Car Configurator");
    }
}
