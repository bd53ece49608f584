//! Turns finished gestures into document edits.
//!
//! Every edit applies to each selected emoji on its own: a pinch scales
//! each emoji's own size by the same factor and a drag moves each by the
//! same offset. Selected identifiers that no longer exist are skipped.
//! One undo step is recorded per edit that touches at least one emoji.

use crate::document::{EmojiArtDocument, EmojiId};
use crate::selection::Selection;
use kurbo::Vec2;

fn has_targets(document: &EmojiArtDocument, selection: &Selection) -> bool {
    selection.iter().any(|id| document.contains(id))
}

/// Scale every selected emoji by a finished pinch's factor.
/// Returns the number of emoji resized.
pub fn resize_selection(document: &mut EmojiArtDocument, selection: &Selection, factor: f64) -> usize {
    if !(factor.is_finite() && factor > 0.0) {
        log::warn!("Ignoring selection resize by invalid factor {}", factor);
        return 0;
    }
    if !has_targets(document, selection) {
        return 0;
    }
    document.push_undo();
    let resized = selection
        .iter()
        .filter(|&id| document.resize_emoji(id, factor))
        .count();
    log::debug!("Resized {} emoji by {}", resized, factor);
    resized
}

/// Move every selected emoji by a finished drag's screen translation.
/// Returns the number of emoji moved.
pub fn move_selection(document: &mut EmojiArtDocument, selection: &Selection, offset: Vec2) -> usize {
    if !has_targets(document, selection) {
        return 0;
    }
    document.push_undo();
    let moved = selection
        .iter()
        .filter(|&id| document.move_emoji(id, offset))
        .count();
    log::debug!("Moved {} emoji by ({}, {})", moved, offset.x, offset.y);
    moved
}

/// Delete one emoji from both the document and the selection.
/// Returns false if it was already gone.
pub fn remove_emoji(document: &mut EmojiArtDocument, selection: &mut Selection, id: EmojiId) -> bool {
    selection.remove(id);
    if !document.contains(id) {
        return false;
    }
    document.push_undo();
    document.remove_emoji(id);
    log::debug!("Removed emoji {}", id);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Position;

    fn document_with(sizes: &[u32]) -> (EmojiArtDocument, Vec<EmojiId>) {
        let mut document = EmojiArtDocument::new();
        let ids = sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| document.add_emoji("⭐", Position::new(i as i32 * 10, 0), size))
            .collect();
        (document, ids)
    }

    #[test]
    fn test_resize_applies_factor_to_each_size() {
        let (mut document, ids) = document_with(&[40, 25, 10]);
        let mut selection = Selection::new();
        selection.toggle(ids[0]);
        selection.toggle(ids[1]);

        assert_eq!(resize_selection(&mut document, &selection, 2.0), 2);
        assert_eq!(document.emoji(ids[0]).unwrap().size, 80);
        assert_eq!(document.emoji(ids[1]).unwrap().size, 50);
        assert_eq!(document.emoji(ids[2]).unwrap().size, 10);
    }

    #[test]
    fn test_sequential_resize_truncates_per_step() {
        let (mut document, ids) = document_with(&[10, 10]);
        let mut first = Selection::new();
        first.toggle(ids[0]);
        let mut second = Selection::new();
        second.toggle(ids[1]);

        resize_selection(&mut document, &first, 1.15);
        resize_selection(&mut document, &first, 1.15);
        resize_selection(&mut document, &second, 1.15 * 1.15);

        // 10 -> 11 -> 12 step by step, but 10 * 1.3225 -> 13 in one go.
        assert_eq!(document.emoji(ids[0]).unwrap().size, 12);
        assert_eq!(document.emoji(ids[1]).unwrap().size, 13);
    }

    #[test]
    fn test_sequential_resize_matches_combined_when_exact() {
        let (mut document, ids) = document_with(&[40, 40]);
        let mut first = Selection::new();
        first.toggle(ids[0]);
        let mut second = Selection::new();
        second.toggle(ids[1]);

        resize_selection(&mut document, &first, 1.5);
        resize_selection(&mut document, &first, 0.5);
        resize_selection(&mut document, &second, 0.75);

        assert_eq!(document.emoji(ids[0]).unwrap().size, 30);
        assert_eq!(document.emoji(ids[1]).unwrap().size, 30);
    }

    #[test]
    fn test_move_translates_each_selected() {
        let (mut document, ids) = document_with(&[40, 40]);
        let mut selection = Selection::new();
        selection.toggle(ids[0]);
        selection.toggle(ids[1]);

        assert_eq!(move_selection(&mut document, &selection, Vec2::new(5.5, -7.2)), 2);
        assert_eq!(document.emoji(ids[0]).unwrap().position, Position::new(5, 7));
        assert_eq!(document.emoji(ids[1]).unwrap().position, Position::new(15, 7));
    }

    #[test]
    fn test_edits_skip_stale_ids() {
        let (mut document, ids) = document_with(&[40]);
        let mut selection = Selection::new();
        selection.toggle(ids[0]);
        selection.toggle(999);

        assert_eq!(move_selection(&mut document, &selection, Vec2::new(1.0, 0.0)), 1);
        assert_eq!(resize_selection(&mut document, &selection, 2.0), 1);
    }

    #[test]
    fn test_edit_without_targets_records_no_undo() {
        let (mut document, _) = document_with(&[40]);
        let mut selection = Selection::new();
        selection.toggle(999);

        assert_eq!(move_selection(&mut document, &selection, Vec2::new(1.0, 0.0)), 0);
        assert_eq!(resize_selection(&mut document, &selection, 2.0), 0);
        assert!(!document.can_undo());
    }

    #[test]
    fn test_one_undo_step_per_gesture() {
        let (mut document, ids) = document_with(&[40, 40]);
        let mut selection = Selection::new();
        selection.toggle(ids[0]);
        selection.toggle(ids[1]);

        move_selection(&mut document, &selection, Vec2::new(3.0, 0.0));
        assert!(document.undo());
        assert!(!document.can_undo());
        assert_eq!(document.emoji(ids[0]).unwrap().position, Position::new(0, 0));
        assert_eq!(document.emoji(ids[1]).unwrap().position, Position::new(10, 0));
    }

    #[test]
    fn test_remove_selected_emoji() {
        let (mut document, ids) = document_with(&[40, 40]);
        let mut selection = Selection::new();
        selection.toggle(ids[0]);
        selection.toggle(ids[1]);

        assert!(remove_emoji(&mut document, &mut selection, ids[0]));
        assert!(!document.contains(ids[0]));
        assert!(!selection.contains(ids[0]));
        assert!(selection.contains(ids[1]));
    }

    #[test]
    fn test_remove_absent_emoji_is_noop() {
        let (mut document, ids) = document_with(&[40]);
        let mut selection = Selection::new();

        assert!(!remove_emoji(&mut document, &mut selection, ids[0] + 1));
        assert_eq!(document.len(), 1);
        assert!(!document.can_undo());
    }
}
