//! Per-frame picking.
//!
//! Runs once per rendered frame, not per pointer event: the ray is cast
//! through whatever pointer position was recorded last.

use cgmath::Vector2;
use log::debug;

use super::{selection::MaterialSlots, Intersection, Raycast, Selection};
use crate::gfx::{
    camera::Camera,
    resources::material::MaterialId,
    scene::{EntityRegistry, ObjectId},
};

/// What a pick did to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    /// The selection is the same as before the pick
    Unchanged,
    /// A new entity is highlighted
    Selected(ObjectId),
    /// The previous highlight was removed and nothing replaced it
    Cleared,
}

/// Resolves the nearest hit under the pointer to a registry entity and
/// updates the selection.
#[derive(Debug, Clone)]
pub struct PickingEngine {
    highlight: MaterialId,
}

impl PickingEngine {
    /// Creates an engine that highlights with the material registered as `highlight`
    pub fn new(highlight: impl Into<MaterialId>) -> Self {
        Self {
            highlight: highlight.into(),
        }
    }

    pub fn highlight(&self) -> &MaterialId {
        &self.highlight
    }

    pub fn set_highlight(&mut self, highlight: impl Into<MaterialId>) {
        self.highlight = highlight.into();
    }

    /// Casts a ray from `camera` through `ndc` and returns the hits, nearest first.
    ///
    /// A camera whose view-projection cannot be inverted hits nothing.
    pub fn cast<C, R>(&self, camera: &C, ndc: Vector2<f32>, scene: &R) -> Vec<Intersection>
    where
        C: Camera + ?Sized,
        R: Raycast + ?Sized,
    {
        let Some(ray) = camera.ray_from_ndc(ndc) else {
            debug!("view-projection not invertible, skipping pick");
            return Vec::new();
        };
        scene.intersect_ray(&ray)
    }

    /// Applies the picking policy to a set of hits.
    ///
    /// Only the nearest hit counts (the first one on equal distances). If it
    /// is not a selectable registry entity the selection is reset, so
    /// non-pickable geometry in front of a pickable object blocks it.
    pub fn resolve<S>(
        &self,
        hits: &[Intersection],
        registry: &EntityRegistry,
        selection: &mut Selection,
        slots: &mut S,
    ) -> PickOutcome
    where
        S: MaterialSlots + ?Sized,
    {
        let before = selection.selected();

        let nearest = hits
            .iter()
            .min_by(|a, b| a.distance.total_cmp(&b.distance));

        match nearest.and_then(|hit| registry.lookup(hit.object)) {
            Some(entity) if entity.is_selectable() => {
                selection.set_selected(entity.id(), &self.highlight, slots)
            }
            _ => selection.reset(slots),
        }

        let after = selection.selected();
        if before == after {
            return PickOutcome::Unchanged;
        }

        match after {
            Some(id) => {
                debug!("picked {}", id);
                PickOutcome::Selected(id)
            }
            None => {
                debug!("selection cleared");
                PickOutcome::Cleared
            }
        }
    }
}
