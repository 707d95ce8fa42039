//! Ordered registry of paintable materials and their snapshots
//!
//! Discovery walks the loaded model once, filters each encountered material
//! through the eligibility rule, deduplicates shared materials by identity,
//! and captures one immutable snapshot per survivor. The registry is
//! populated exactly once per load and the entry order is the traversal's
//! first-encounter order, so repeated repaints and resets visit materials
//! deterministically.
//!
//! The registry never owns live materials. `Id` is the host's non-owning
//! material handle; the host resolves it back to mutable material state when
//! executing a paint or reset pass.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use crate::color::Rgb;
use crate::surface::{SurfaceSnapshot, SurfaceStyle};

/// One registered material: its handle and its original appearance.
#[derive(Debug, Clone)]
pub struct RegistryEntry<Id, Tex> {
    pub material: Id,
    pub original: SurfaceSnapshot<Tex>,
}

/// Index-aligned pairing of material handles and snapshots.
#[derive(Debug, Clone)]
pub struct PaintRegistry<Id, Tex> {
    entries: Vec<RegistryEntry<Id, Tex>>,
}

impl<Id, Tex> Default for PaintRegistry<Id, Tex> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<Id, Tex> PaintRegistry<Id, Tex>
where
    Id: Clone + Eq + Hash,
    Tex: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry from surfaces in traversal order. Unpaintable
    /// surfaces are skipped; a material seen through several meshes is
    /// registered once, at its first encounter; snapshots are captured here
    /// and never rewritten.
    pub fn discover<I>(surfaces: I) -> Self
    where
        I: IntoIterator<Item = (Id, SurfaceStyle<Tex>)>,
    {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for (id, style) in surfaces {
            if !style.is_paintable() {
                continue;
            }
            if !seen.insert(id.clone()) {
                continue;
            }
            entries.push(RegistryEntry {
                material: id,
                original: SurfaceSnapshot::capture(&style),
            });
        }

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered materials with their snapshots, in registration order.
    pub fn entries(&self) -> &[RegistryEntry<Id, Tex>] {
        &self.entries
    }

    /// Status for a paint pass over this registry. An empty registry is not
    /// an error, it just reports that there is nothing to recolor.
    pub fn paint_status(&self, color: Rgb) -> PaintStatus {
        if self.is_empty() {
            PaintStatus::NothingToPaint
        } else {
            PaintStatus::Painted {
                color,
                count: self.len(),
            }
        }
    }

    /// Status for a reset pass. `None` means stay silent: resetting before a
    /// model is loaded has nothing to report, unlike painting, which
    /// announces the empty registry. That asymmetry is deliberate.
    pub fn reset_status(&self) -> Option<PaintStatus> {
        if self.is_empty() {
            None
        } else {
            Some(PaintStatus::Restored)
        }
    }
}

/// Outcome of a registry operation, formatted for the UI status line.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintStatus {
    /// Discovery finished after a successful model load.
    Loaded { count: usize },
    /// A paint pass recolored every registered material.
    Painted { color: Rgb, count: usize },
    /// A paint pass found an empty registry.
    NothingToPaint,
    /// A reset pass restored every registered material.
    Restored,
}

impl fmt::Display for PaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaintStatus::Loaded { count } => {
                write!(f, "Model loaded ✅ (materials: {count})")
            }
            PaintStatus::Painted { color, count } => {
                write!(
                    f,
                    "Color: {} (materials: {count})",
                    color.to_hex().to_uppercase()
                )
            }
            PaintStatus::NothingToPaint => write!(f, "No materials detected to recolor."),
            PaintStatus::Restored => write!(f, "Reset ✅"),
        }
    }
}
