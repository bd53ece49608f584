//! Selection state and gesture routing.

use crate::document::{EmojiArtDocument, EmojiId};
use crate::gesture::{GestureKind, GestureTarget};
use std::collections::BTreeSet;

/// The two mutually exclusive gesture families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureFamily {
    /// Whole-canvas pan and zoom.
    Viewport,
    /// Move and scale of the selected emoji.
    Selection,
}

/// Selected emoji plus the delete-mode toggle.
///
/// Not persisted with the document; lives for one UI session.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: BTreeSet<EmojiId>,
    delete_mode: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip an emoji's membership. Returns true if it is now selected.
    pub fn toggle(&mut self, id: EmojiId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    pub fn insert(&mut self, id: EmojiId) -> bool {
        self.selected.insert(id)
    }

    pub fn remove(&mut self, id: EmojiId) -> bool {
        self.selected.remove(&id)
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn contains(&self, id: EmojiId) -> bool {
        self.selected.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Selected identifiers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = EmojiId> + '_ {
        self.selected.iter().copied()
    }

    /// Drop identifiers that no longer exist in the document.
    pub fn retain_existing(&mut self, document: &EmojiArtDocument) {
        self.selected.retain(|&id| document.contains(id));
    }

    pub fn is_delete_mode(&self) -> bool {
        self.delete_mode
    }

    /// Flip delete mode. Returns the new state.
    pub fn toggle_delete_mode(&mut self) -> bool {
        self.delete_mode = !self.delete_mode;
        self.delete_mode
    }

    /// The only family whose gestures are enabled right now.
    pub fn active_family(&self) -> GestureFamily {
        if self.is_empty() {
            GestureFamily::Viewport
        } else {
            GestureFamily::Selection
        }
    }

    /// Decide which family a new gesture belongs to, if any.
    ///
    /// With nothing selected, every drag and pinch drives the viewport,
    /// including ones that start on an emoji. With a selection, pinches
    /// anywhere scale it and drags that start on any emoji move it; a drag
    /// on empty canvas has no recognizer and is dropped.
    pub fn route(&self, kind: GestureKind, target: GestureTarget) -> Option<GestureFamily> {
        match (self.active_family(), kind, target) {
            (GestureFamily::Viewport, _, _) => Some(GestureFamily::Viewport),
            (GestureFamily::Selection, GestureKind::Pinch, _) => Some(GestureFamily::Selection),
            (GestureFamily::Selection, GestureKind::Drag, GestureTarget::Emoji(_)) => {
                Some(GestureFamily::Selection)
            }
            (GestureFamily::Selection, GestureKind::Drag, GestureTarget::Canvas) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Position;

    #[test]
    fn test_toggle() {
        let mut selection = Selection::new();
        assert!(selection.toggle(1));
        assert!(selection.contains(1));
        assert!(!selection.toggle(1));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut selection = Selection::new();
        selection.toggle(1);
        selection.toggle(2);
        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_delete_mode_is_independent() {
        let mut selection = Selection::new();
        selection.toggle(4);
        assert!(selection.toggle_delete_mode());
        assert!(selection.contains(4));
        selection.clear();
        assert!(selection.is_delete_mode());
        assert!(!selection.toggle_delete_mode());
    }

    #[test]
    fn test_routing_with_empty_selection() {
        let selection = Selection::new();
        assert_eq!(selection.active_family(), GestureFamily::Viewport);
        assert_eq!(
            selection.route(GestureKind::Drag, GestureTarget::Canvas),
            Some(GestureFamily::Viewport)
        );
        assert_eq!(
            selection.route(GestureKind::Drag, GestureTarget::Emoji(1)),
            Some(GestureFamily::Viewport)
        );
        assert_eq!(
            selection.route(GestureKind::Pinch, GestureTarget::Canvas),
            Some(GestureFamily::Viewport)
        );
    }

    #[test]
    fn test_routing_with_selection() {
        let mut selection = Selection::new();
        selection.toggle(1);
        assert_eq!(selection.active_family(), GestureFamily::Selection);
        assert_eq!(selection.route(GestureKind::Drag, GestureTarget::Canvas), None);
        assert_eq!(
            selection.route(GestureKind::Drag, GestureTarget::Emoji(2)),
            Some(GestureFamily::Selection)
        );
        assert_eq!(
            selection.route(GestureKind::Pinch, GestureTarget::Canvas),
            Some(GestureFamily::Selection)
        );
    }

    #[test]
    fn test_retain_existing() {
        let mut document = EmojiArtDocument::new();
        let kept = document.add_emoji("🌞", Position::ZERO, 40);
        let mut selection = Selection::new();
        selection.toggle(kept);
        selection.toggle(kept + 100);

        selection.retain_existing(&document);
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec![kept]);
    }
}
