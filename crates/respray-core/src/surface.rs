//! Paint-relevant surface model and the repaint/restore rules
//!
//! A `SurfaceStyle` is the renderer-independent view of one material: its
//! color, its base texture, and the finish parameters the material kind
//! happens to expose. Finish fields are `Option` so that "this material has
//! no clearcoat at all" is a stated fact rather than a runtime probe; repaint
//! and restore touch only the parameters that are present.
//!
//! `Tex` is the host's texture handle type. The core never inspects it, it
//! only stores and swaps it.

use crate::color::Rgb;

/// Transparent surfaces below this opacity are treated as glass or glazing
/// and excluded from repainting.
pub const GLASS_OPACITY_CUTOFF: f32 = 0.98;

/// Finish forced onto every painted surface: glossy, barely metallic, with a
/// lacquer-style clear coat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintFinish {
    pub roughness: f32,
    pub metalness: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
}

impl Default for PaintFinish {
    fn default() -> Self {
        Self {
            roughness: 0.22,
            metalness: 0.08,
            clearcoat: 1.0,
            clearcoat_roughness: 0.08,
        }
    }
}

/// One material's paint-relevant state.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceStyle<Tex> {
    /// Base color, absent on non-colorable material kinds.
    pub color: Option<Rgb>,
    /// Base color texture.
    pub map: Option<Tex>,
    pub roughness: Option<f32>,
    pub metalness: Option<f32>,
    pub clearcoat: Option<f32>,
    pub clearcoat_roughness: Option<f32>,
    /// Whether the material renders with alpha blending.
    pub transparent: bool,
    pub opacity: Option<f32>,
}

impl<Tex> Default for SurfaceStyle<Tex> {
    fn default() -> Self {
        Self {
            color: None,
            map: None,
            roughness: None,
            metalness: None,
            clearcoat: None,
            clearcoat_roughness: None,
            transparent: false,
            opacity: None,
        }
    }
}

impl<Tex> SurfaceStyle<Tex> {
    /// Eligibility filter: colorable, and not a glass-like surface.
    pub fn is_paintable(&self) -> bool {
        if self.color.is_none() {
            return false;
        }
        if self.transparent && matches!(self.opacity, Some(o) if o < GLASS_OPACITY_CUTOFF) {
            return false;
        }
        true
    }

    /// Repaint this surface: set the color, optionally strip the texture so
    /// the flat color dominates, and force the paint finish onto whichever
    /// finish parameters this material exposes.
    pub fn repaint(&mut self, color: Rgb, strip_map: bool, finish: &PaintFinish) {
        self.color = Some(color);

        if strip_map {
            // Baked textures darken the paint; solid mode removes them.
            self.map = None;
        }

        if let Some(r) = self.roughness.as_mut() {
            *r = finish.roughness;
        }
        if let Some(m) = self.metalness.as_mut() {
            *m = finish.metalness;
        }
        if let Some(c) = self.clearcoat.as_mut() {
            *c = finish.clearcoat;
        }
        if let Some(cr) = self.clearcoat_roughness.as_mut() {
            *cr = finish.clearcoat_roughness;
        }
    }

    /// Restore this surface from its snapshot. Finish parameters missing
    /// from the snapshot (unsupported by this material kind) stay untouched;
    /// the texture reference is restored as-is, including "no texture".
    pub fn restore(&mut self, snapshot: &SurfaceSnapshot<Tex>)
    where
        Tex: Clone,
    {
        self.color = Some(snapshot.color);

        if let (Some(slot), Some(orig)) = (self.roughness.as_mut(), snapshot.roughness) {
            *slot = orig;
        }
        if let (Some(slot), Some(orig)) = (self.metalness.as_mut(), snapshot.metalness) {
            *slot = orig;
        }
        if let (Some(slot), Some(orig)) = (self.clearcoat.as_mut(), snapshot.clearcoat) {
            *slot = orig;
        }
        if let (Some(slot), Some(orig)) =
            (self.clearcoat_roughness.as_mut(), snapshot.clearcoat_roughness)
        {
            *slot = orig;
        }

        self.map = snapshot.map.clone();
    }
}

/// Immutable record of a surface's original appearance, captured once at
/// discovery time and never written again.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSnapshot<Tex> {
    pub color: Rgb,
    pub map: Option<Tex>,
    pub roughness: Option<f32>,
    pub metalness: Option<f32>,
    pub clearcoat: Option<f32>,
    pub clearcoat_roughness: Option<f32>,
}

impl<Tex: Clone> SurfaceSnapshot<Tex> {
    /// Deep-copy the color and finish values; keep the texture reference
    /// as-is. Discovery only snapshots paintable surfaces, which always have
    /// a color; white stands in should one ever arrive without.
    pub fn capture(style: &SurfaceStyle<Tex>) -> Self {
        Self {
            color: style.color.unwrap_or(Rgb::WHITE),
            map: style.map.clone(),
            roughness: style.roughness,
            metalness: style.metalness,
            clearcoat: style.clearcoat,
            clearcoat_roughness: style.clearcoat_roughness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_panel() -> SurfaceStyle<&'static str> {
        SurfaceStyle {
            color: Some(Rgb::from_u8(0x80, 0x10, 0x10)),
            map: Some("body_diffuse.png"),
            roughness: Some(0.7),
            metalness: Some(0.4),
            clearcoat: Some(0.0),
            clearcoat_roughness: Some(0.5),
            ..Default::default()
        }
    }

    #[test]
    fn test_glass_is_not_paintable() {
        let glass = SurfaceStyle::<&str> {
            color: Some(Rgb::WHITE),
            transparent: true,
            opacity: Some(0.5),
            ..Default::default()
        };
        assert!(!glass.is_paintable());
    }

    #[test]
    fn test_nearly_opaque_transparent_surface_is_paintable() {
        let tinted = SurfaceStyle::<&str> {
            color: Some(Rgb::WHITE),
            transparent: true,
            opacity: Some(0.99),
            ..Default::default()
        };
        assert!(tinted.is_paintable());
    }

    #[test]
    fn test_transparent_without_opacity_is_paintable() {
        let style = SurfaceStyle::<&str> {
            color: Some(Rgb::WHITE),
            transparent: true,
            opacity: None,
            ..Default::default()
        };
        assert!(style.is_paintable());
    }

    #[test]
    fn test_colorless_is_not_paintable() {
        let depth_only = SurfaceStyle::<&str> {
            color: None,
            opacity: Some(0.5),
            ..Default::default()
        };
        assert!(!depth_only.is_paintable());
    }

    #[test]
    fn test_repaint_forces_finish() {
        let mut style = body_panel();
        let red = Rgb::from_hex("#ef4444").unwrap();
        style.repaint(red, false, &PaintFinish::default());

        assert_eq!(style.color, Some(red));
        assert_eq!(style.roughness, Some(0.22));
        assert_eq!(style.metalness, Some(0.08));
        assert_eq!(style.clearcoat, Some(1.0));
        assert_eq!(style.clearcoat_roughness, Some(0.08));
        // Not in solid mode: texture stays.
        assert_eq!(style.map, Some("body_diffuse.png"));
    }

    #[test]
    fn test_repaint_skips_missing_finish_parameters() {
        let mut style = SurfaceStyle::<&str> {
            color: Some(Rgb::WHITE),
            roughness: Some(0.9),
            ..Default::default()
        };
        style.repaint(Rgb::from_u8(0, 0, 0), false, &PaintFinish::default());

        assert_eq!(style.roughness, Some(0.22));
        assert_eq!(style.clearcoat, None);
        assert_eq!(style.clearcoat_roughness, None);
    }

    #[test]
    fn test_solid_mode_strips_texture() {
        let mut style = body_panel();
        style.repaint(Rgb::WHITE, true, &PaintFinish::default());
        assert_eq!(style.map, None);
    }

    #[test]
    fn test_restore_round_trip() {
        let original = body_panel();
        let snapshot = SurfaceSnapshot::capture(&original);

        let mut style = original.clone();
        style.repaint(Rgb::from_u8(0x22, 0xc5, 0x5e), true, &PaintFinish::default());
        assert_ne!(style, original);

        style.restore(&snapshot);
        assert_eq!(style, original);
    }

    #[test]
    fn test_restore_leaves_unsupported_parameters_untouched() {
        // A snapshot from a material without clearcoat must not invent one.
        let plain = SurfaceStyle::<&str> {
            color: Some(Rgb::WHITE),
            roughness: Some(0.6),
            ..Default::default()
        };
        let snapshot = SurfaceSnapshot::capture(&plain);

        let mut style = plain.clone();
        style.repaint(Rgb::from_u8(1, 2, 3), false, &PaintFinish::default());
        style.restore(&snapshot);

        assert_eq!(style.clearcoat, None);
        assert_eq!(style.roughness, Some(0.6));
    }

    #[test]
    fn test_snapshot_is_unaffected_by_later_repaint() {
        let mut style = body_panel();
        let snapshot = SurfaceSnapshot::capture(&style);
        let before = snapshot.clone();

        style.repaint(Rgb::from_u8(0xff, 0x00, 0x00), true, &PaintFinish::default());

        assert_eq!(snapshot, before);
        assert_eq!(snapshot.color, Rgb::from_u8(0x80, 0x10, 0x10));
    }
}
