//! Respray Core - paint logic for the car configurator
//!
//! This crate provides the renderer-independent half of Respray:
//! - RGB color values and hex parsing
//! - The paint-relevant surface model with optional finish parameters
//! - Eligibility filtering, snapshot capture, and the repaint/restore rules
//! - The ordered material registry and its status reporting
//! - The default paint palette
//!
//! Everything here is generic over the host's material and texture handle
//! types; the viewer crate bridges these to the engine's material assets.

pub mod color;
pub mod palette;
pub mod registry;
pub mod surface;

pub use color::{ColorParseError, Rgb};
pub use palette::{default_palette, Swatch, DEFAULT_PICKER_COLOR};
pub use registry::{PaintRegistry, PaintStatus, RegistryEntry};
pub use surface::{PaintFinish, SurfaceSnapshot, SurfaceStyle, GLASS_OPACITY_CUTOFF};
