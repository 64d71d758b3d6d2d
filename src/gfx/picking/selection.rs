//! Exclusive highlight selection.
//!
//! [`Selection`] owns the material override of at most one entity. Selecting
//! an entity remembers the material it had and swaps in the highlight
//! material; resetting puts the remembered material back.

use log::debug;

use crate::gfx::{resources::material::MaterialId, scene::ObjectId};

/// Per-object material access used by [`Selection`].
///
/// Implemented by [`Scene`](crate::gfx::scene::Scene); anything that can
/// read and replace an object's material can host a selection.
pub trait MaterialSlots {
    /// Current material of `id`, or `None` when the object is unknown.
    fn material(&self, id: ObjectId) -> Option<&MaterialId>;

    /// Replaces the material of `id`. Returns `false` when the object is unknown.
    fn set_material(&mut self, id: ObjectId, material: MaterialId) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq)]
enum SelectionState {
    #[default]
    Empty,
    Highlighting {
        entity: ObjectId,
        original: MaterialId,
    },
}

/// At most one highlighted entity and the material it had before.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    state: SelectionState,
}

impl Selection {
    /// Creates an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// The highlighted entity, if any
    pub fn selected(&self) -> Option<ObjectId> {
        match &self.state {
            SelectionState::Empty => None,
            SelectionState::Highlighting { entity, .. } => Some(*entity),
        }
    }

    /// Material the highlighted entity had before it was highlighted
    pub fn original_material(&self) -> Option<&MaterialId> {
        match &self.state {
            SelectionState::Empty => None,
            SelectionState::Highlighting { original, .. } => Some(original),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.state == SelectionState::Empty
    }

    /// Restores the highlighted entity's original material and clears the
    /// selection. Does nothing when the selection is empty.
    pub fn reset<S: MaterialSlots + ?Sized>(&mut self, slots: &mut S) {
        if let SelectionState::Highlighting { entity, original } = std::mem::take(&mut self.state)
        {
            if !slots.set_material(entity, original) {
                debug!("selected object {} vanished before its material was restored", entity);
            }
        }
    }

    /// Highlights `entity` with `highlight`.
    ///
    /// Re-selecting the active entity is a no-op, so the remembered original
    /// is never overwritten by the highlight material. A different active
    /// entity is restored first.
    pub fn set_selected<S: MaterialSlots + ?Sized>(
        &mut self,
        entity: ObjectId,
        highlight: &MaterialId,
        slots: &mut S,
    ) {
        if self.selected() == Some(entity) {
            return;
        }

        self.reset(slots);

        let Some(original) = slots.material(entity).cloned() else {
            debug!("object {} has no material slot; selection left empty", entity);
            return;
        };

        slots.set_material(entity, highlight.clone());
        self.state = SelectionState::Highlighting { entity, original };
    }

    /// Drops the selection if it points at `id`, without touching materials.
    ///
    /// Used when the entity is being removed from the scene and its material
    /// slot may already be gone. Returns `true` if the selection was cleared.
    pub fn forget(&mut self, id: ObjectId) -> bool {
        if self.selected() == Some(id) {
            self.state = SelectionState::Empty;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::collections::HashMap;

    #[derive(Default)]
    struct Slots(HashMap<ObjectId, MaterialId>);

    impl MaterialSlots for Slots {
        fn material(&self, id: ObjectId) -> Option<&MaterialId> {
            self.0.get(&id)
        }

        fn set_material(&mut self, id: ObjectId, material: MaterialId) -> bool {
            match self.0.get_mut(&id) {
                Some(slot) => {
                    *slot = material;
                    true
                }
                None => false,
            }
        }
    }

    fn highlight() -> MaterialId {
        "highlight".to_string()
    }

    fn slots_with(materials: &[&str]) -> (Slots, Vec<ObjectId>) {
        let mut slots = Slots::default();
        let ids = materials
            .iter()
            .map(|material| {
                let id = ObjectId::next();
                slots.0.insert(id, material.to_string());
                id
            })
            .collect();
        (slots, ids)
    }

    #[test]
    fn test_reset_restores_original() {
        let (mut slots, ids) = slots_with(&["brick"]);
        let mut selection = Selection::new();

        selection.set_selected(ids[0], &highlight(), &mut slots);
        assert_eq!(slots.0[&ids[0]], "highlight");
        assert_eq!(selection.original_material(), Some(&"brick".to_string()));

        selection.reset(&mut slots);
        assert_eq!(slots.0[&ids[0]], "brick");
        assert!(selection.is_empty());
    }

    #[test]
    fn test_reset_on_empty_is_noop() {
        let (mut slots, ids) = slots_with(&["brick"]);
        let mut selection = Selection::new();

        selection.reset(&mut slots);
        selection.reset(&mut slots);
        assert!(selection.is_empty());
        assert_eq!(slots.0[&ids[0]], "brick");
    }

    #[test]
    fn test_reselecting_keeps_original() {
        let (mut slots, ids) = slots_with(&["brick"]);
        let mut selection = Selection::new();

        selection.set_selected(ids[0], &highlight(), &mut slots);
        selection.set_selected(ids[0], &highlight(), &mut slots);
        assert_eq!(selection.original_material(), Some(&"brick".to_string()));

        selection.reset(&mut slots);
        assert_eq!(slots.0[&ids[0]], "brick");
    }

    #[test]
    fn test_switching_restores_previous() {
        let (mut slots, ids) = slots_with(&["brick", "steel"]);
        let mut selection = Selection::new();

        selection.set_selected(ids[0], &highlight(), &mut slots);
        selection.set_selected(ids[1], &highlight(), &mut slots);

        assert_eq!(slots.0[&ids[0]], "brick");
        assert_eq!(slots.0[&ids[1]], "highlight");
        assert_eq!(selection.selected(), Some(ids[1]));
        assert_eq!(selection.original_material(), Some(&"steel".to_string()));
    }

    #[test]
    fn test_unknown_object_leaves_selection_empty() {
        let (mut slots, ids) = slots_with(&["brick"]);
        let mut selection = Selection::new();

        selection.set_selected(ids[0], &highlight(), &mut slots);
        selection.set_selected(ObjectId::next(), &highlight(), &mut slots);

        assert!(selection.is_empty());
        assert_eq!(slots.0[&ids[0]], "brick");
    }

    #[test]
    fn test_forget_skips_restore() {
        let (mut slots, ids) = slots_with(&["brick", "steel"]);
        let mut selection = Selection::new();

        selection.set_selected(ids[0], &highlight(), &mut slots);
        assert!(!selection.forget(ids[1]));
        assert_eq!(selection.selected(), Some(ids[0]));

        assert!(selection.forget(ids[0]));
        assert!(selection.is_empty());
        // No restore happened
        assert_eq!(slots.0[&ids[0]], "highlight");
    }

    #[test]
    fn test_random_sequences_highlight_at_most_one() {
        let mut rng = StdRng::seed_from_u64(0x5e1ec7);
        let originals = ["a", "b", "c", "d", "e"];

        for _ in 0..200 {
            let (mut slots, ids) = slots_with(&originals);
            let mut selection = Selection::new();

            for _ in 0..40 {
                if rng.random_bool(0.25) {
                    selection.reset(&mut slots);
                } else {
                    let target = ids[rng.random_range(0..ids.len())];
                    selection.set_selected(target, &highlight(), &mut slots);
                }

                let highlighted: Vec<_> = ids
                    .iter()
                    .filter(|id| slots.0[*id] == "highlight")
                    .collect();
                assert!(highlighted.len() <= 1);
                assert_eq!(highlighted.first().map(|id| **id), selection.selected());

                // Every other object holds its own original material
                for (id, original) in ids.iter().zip(originals) {
                    if Some(*id) != selection.selected() {
                        assert_eq!(slots.0[id], original);
                    }
                }
            }

            selection.reset(&mut slots);
            for (id, original) in ids.iter().zip(originals) {
                assert_eq!(slots.0[id], original);
            }
        }
    }
}
