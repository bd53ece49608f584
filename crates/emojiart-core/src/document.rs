//! Emoji Art document and its edit operations.

use crate::config::DEFAULT_UNDO_LIMIT;
use crate::error::{DocumentError, DocumentResult};
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Identifier of an emoji within one document. Never reused.
pub type EmojiId = u64;

/// Largest identifier a document may hold: 2^53 - 1, the largest integer
/// every JSON reader represents exactly.
pub const MAX_EMOJI_ID: EmojiId = (1 << 53) - 1;

/// Integer position in document space.
///
/// The origin is the canvas center and y grows upward, the opposite of
/// screen space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate by a screen-space offset.
    ///
    /// Each component truncates toward zero and the y component is negated.
    pub fn offset_by(self, offset: Vec2) -> Self {
        Self {
            x: self.x.saturating_add(offset.x as i32),
            y: self.y.saturating_add(-offset.y as i32),
        }
    }
}

/// A single emoji placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emoji {
    pub id: EmojiId,
    /// The symbol to draw.
    pub string: String,
    pub position: Position,
    /// Font size in document units.
    pub size: u32,
}

impl Emoji {
    /// Check whether a document-space point falls inside this emoji's
    /// square of side `size` centered on its position.
    pub fn contains(&self, point: Position) -> bool {
        let half = f64::from(self.size) / 2.0;
        let dx = f64::from(point.x) - f64::from(self.position.x);
        let dy = f64::from(point.y) - f64::from(self.position.y);
        dx.abs() <= half && dy.abs() <= half
    }
}

/// Undo/redo snapshot. Excludes the id counter: undo never rewinds
/// identifier allocation.
#[derive(Debug, Clone)]
struct DocumentSnapshot {
    emojis: Vec<Emoji>,
    background: Option<Url>,
}

fn default_undo_limit() -> usize {
    DEFAULT_UNDO_LIMIT
}

/// The Emoji Art document: emoji in z-order plus an optional background.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmojiArtDocument {
    /// Unique document identifier.
    pub id: String,
    /// Emoji back to front.
    emojis: Vec<Emoji>,
    /// Background image reference.
    background: Option<Url>,
    /// Next identifier to hand out.
    next_id: EmojiId,
    #[serde(skip)]
    undo_stack: Vec<DocumentSnapshot>,
    #[serde(skip)]
    redo_stack: Vec<DocumentSnapshot>,
    #[serde(skip, default = "default_undo_limit")]
    undo_limit: usize,
}

impl Default for EmojiArtDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl EmojiArtDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            emojis: Vec::new(),
            background: None,
            next_id: 1,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            undo_limit: DEFAULT_UNDO_LIMIT,
        }
    }

    /// Set how many undo states are kept, dropping the oldest ones if needed.
    pub fn set_undo_limit(&mut self, limit: usize) {
        self.undo_limit = limit;
        if self.undo_stack.len() > limit {
            let excess = self.undo_stack.len() - limit;
            self.undo_stack.drain(..excess);
        }
    }

    fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            emojis: self.emojis.clone(),
            background: self.background.clone(),
        }
    }

    fn restore(&mut self, snapshot: DocumentSnapshot) {
        self.emojis = snapshot.emojis;
        self.background = snapshot.background;
    }

    /// Push current state to undo stack (call before making changes).
    pub fn push_undo(&mut self) {
        if self.undo_limit == 0 {
            return;
        }
        let snapshot = self.snapshot();
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();

        if self.undo_stack.len() > self.undo_limit {
            self.undo_stack.remove(0);
        }
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.redo_stack.push(current);
        self.restore(snapshot);
        true
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.undo_stack.push(current);
        self.restore(snapshot);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Emoji in z-order (back to front).
    pub fn emojis(&self) -> &[Emoji] {
        &self.emojis
    }

    /// Get an emoji by ID.
    pub fn emoji(&self, id: EmojiId) -> Option<&Emoji> {
        self.emojis.iter().find(|emoji| emoji.id == id)
    }

    fn emoji_mut(&mut self, id: EmojiId) -> Option<&mut Emoji> {
        self.emojis.iter_mut().find(|emoji| emoji.id == id)
    }

    pub fn contains(&self, id: EmojiId) -> bool {
        self.emoji(id).is_some()
    }

    pub fn background(&self) -> Option<&Url> {
        self.background.as_ref()
    }

    /// Append an emoji on top of the others and return its new identifier.
    pub fn add_emoji(&mut self, string: impl Into<String>, position: Position, size: u32) -> EmojiId {
        let id = self.next_id;
        self.next_id += 1;
        self.emojis.push(Emoji {
            id,
            string: string.into(),
            position,
            size,
        });
        id
    }

    /// Move an emoji by a screen-space offset.
    /// Returns false if the emoji does not exist.
    pub fn move_emoji(&mut self, id: EmojiId, offset: Vec2) -> bool {
        match self.emoji_mut(id) {
            Some(emoji) => {
                emoji.position = emoji.position.offset_by(offset);
                true
            }
            None => false,
        }
    }

    /// Scale an emoji's size, truncating the result.
    /// Returns false if the emoji does not exist or the factor is not a
    /// positive finite number.
    pub fn resize_emoji(&mut self, id: EmojiId, factor: f64) -> bool {
        if !(factor.is_finite() && factor > 0.0) {
            log::warn!("Ignoring resize of emoji {} by invalid factor {}", id, factor);
            return false;
        }
        match self.emoji_mut(id) {
            Some(emoji) => {
                emoji.size = (f64::from(emoji.size) * factor) as u32;
                true
            }
            None => false,
        }
    }

    /// Remove an emoji from the document.
    pub fn remove_emoji(&mut self, id: EmojiId) -> Option<Emoji> {
        let index = self.emojis.iter().position(|emoji| emoji.id == id)?;
        Some(self.emojis.remove(index))
    }

    /// Replace the background reference.
    pub fn set_background(&mut self, url: Url) {
        self.background = Some(url);
    }

    /// Topmost emoji covering a document-space point.
    pub fn emoji_at(&self, point: Position) -> Option<EmojiId> {
        self.emojis
            .iter()
            .rev()
            .find(|emoji| emoji.contains(point))
            .map(|emoji| emoji.id)
    }

    pub fn is_empty(&self) -> bool {
        self.emojis.is_empty()
    }

    pub fn len(&self) -> usize {
        self.emojis.len()
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> DocumentResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a document from JSON.
    ///
    /// The id counter is bumped past every stored identifier so a
    /// hand-edited file cannot cause identifiers to be reused. Identifiers
    /// above [`MAX_EMOJI_ID`] are rejected.
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        let mut document: Self = serde_json::from_str(json)?;
        if document.next_id > MAX_EMOJI_ID + 1 {
            return Err(DocumentError::IdOutOfRange(document.next_id));
        }
        if let Some(max_id) = document.emojis.iter().map(|emoji| emoji.id).max() {
            if max_id > MAX_EMOJI_ID {
                return Err(DocumentError::IdOutOfRange(max_id));
            }
            document.next_id = document.next_id.max(max_id + 1);
        }
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_creation() {
        let doc = EmojiArtDocument::new();
        assert!(doc.is_empty());
        assert!(doc.background().is_none());
    }

    #[test]
    fn test_add_emoji_allocates_distinct_ids() {
        let mut doc = EmojiArtDocument::new();
        let a = doc.add_emoji("😀", Position::new(10, 10), 40);
        let b = doc.add_emoji("😀", Position::new(10, 10), 40);

        assert_ne!(a, b);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.emojis()[0].id, a);
        assert_eq!(doc.emojis()[1].id, b);
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let mut doc = EmojiArtDocument::new();
        let a = doc.add_emoji("🐶", Position::ZERO, 40);
        doc.remove_emoji(a);
        let b = doc.add_emoji("🐶", Position::ZERO, 40);
        assert!(b > a);
    }

    #[test]
    fn test_move_emoji_flips_y() {
        let mut doc = EmojiArtDocument::new();
        let id = doc.add_emoji("🌵", Position::new(5, 5), 40);

        assert!(doc.move_emoji(id, Vec2::new(10.7, 20.9)));
        assert_eq!(doc.emoji(id).unwrap().position, Position::new(15, -15));
    }

    #[test]
    fn test_move_truncates_toward_zero() {
        let mut doc = EmojiArtDocument::new();
        let id = doc.add_emoji("🌵", Position::ZERO, 40);

        doc.move_emoji(id, Vec2::new(-3.9, -2.5));
        assert_eq!(doc.emoji(id).unwrap().position, Position::new(-3, 2));
    }

    #[test]
    fn test_resize_emoji_truncates() {
        let mut doc = EmojiArtDocument::new();
        let id = doc.add_emoji("🎈", Position::ZERO, 40);

        assert!(doc.resize_emoji(id, 1.26));
        assert_eq!(doc.emoji(id).unwrap().size, 50);
    }

    #[test]
    fn test_resize_rejects_invalid_factor() {
        let mut doc = EmojiArtDocument::new();
        let id = doc.add_emoji("🎈", Position::ZERO, 40);

        assert!(!doc.resize_emoji(id, 0.0));
        assert!(!doc.resize_emoji(id, -2.0));
        assert!(!doc.resize_emoji(id, f64::NAN));
        assert_eq!(doc.emoji(id).unwrap().size, 40);
    }

    #[test]
    fn test_missing_ids_are_noops() {
        let mut doc = EmojiArtDocument::new();
        doc.add_emoji("🎈", Position::ZERO, 40);

        assert!(!doc.move_emoji(99, Vec2::new(1.0, 1.0)));
        assert!(!doc.resize_emoji(99, 2.0));
        assert!(doc.remove_emoji(99).is_none());
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_set_background_replaces() {
        let mut doc = EmojiArtDocument::new();
        doc.set_background(Url::parse("https://example.com/a.png").unwrap());
        doc.set_background(Url::parse("https://example.com/b.png").unwrap());
        assert_eq!(doc.background().unwrap().as_str(), "https://example.com/b.png");
    }

    #[test]
    fn test_emoji_at_prefers_topmost() {
        let mut doc = EmojiArtDocument::new();
        let back = doc.add_emoji("🍎", Position::new(0, 0), 40);
        let front = doc.add_emoji("🍐", Position::new(10, 0), 40);

        assert_eq!(doc.emoji_at(Position::new(5, 0)), Some(front));
        assert_eq!(doc.emoji_at(Position::new(-15, 0)), Some(back));
        assert_eq!(doc.emoji_at(Position::new(200, 200)), None);
    }

    #[test]
    fn test_undo_redo_add() {
        let mut doc = EmojiArtDocument::new();
        doc.push_undo();
        let id = doc.add_emoji("🍕", Position::ZERO, 40);

        assert!(doc.undo());
        assert!(doc.is_empty());
        assert!(doc.redo());
        assert!(doc.contains(id));
    }

    #[test]
    fn test_undo_does_not_recycle_ids() {
        let mut doc = EmojiArtDocument::new();
        doc.push_undo();
        let first = doc.add_emoji("🍕", Position::ZERO, 40);
        doc.undo();
        let second = doc.add_emoji("🍕", Position::ZERO, 40);
        assert_ne!(first, second);
    }

    #[test]
    fn test_undo_limit() {
        let mut doc = EmojiArtDocument::new();
        doc.set_undo_limit(2);
        for _ in 0..5 {
            doc.push_undo();
            doc.add_emoji("🍕", Position::ZERO, 40);
        }
        assert!(doc.undo());
        assert!(doc.undo());
        assert!(!doc.undo());
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn test_zero_undo_limit_disables_history() {
        let mut doc = EmojiArtDocument::new();
        doc.set_undo_limit(0);
        doc.push_undo();
        doc.add_emoji("🍕", Position::ZERO, 40);
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_json_keeps_id_counter() {
        let mut doc = EmojiArtDocument::new();
        let a = doc.add_emoji("🐱", Position::new(1, 2), 30);
        let b = doc.add_emoji("🐭", Position::new(3, 4), 20);
        doc.remove_emoji(b);

        let json = doc.to_json().unwrap();
        let mut loaded = EmojiArtDocument::from_json(&json).unwrap();
        assert_eq!(loaded.emojis(), doc.emojis());
        assert_eq!(loaded.id, doc.id);

        let c = loaded.add_emoji("🐹", Position::ZERO, 40);
        assert!(c > a && c > b);
    }

    #[test]
    fn test_from_json_bumps_stale_counter() {
        let json = r#"{
            "id": "doc",
            "emojis": [{ "id": 7, "string": "🦊", "position": { "x": 0, "y": 0 }, "size": 40 }],
            "background": null,
            "next_id": 1
        }"#;
        let mut doc = EmojiArtDocument::from_json(json).unwrap();
        assert_eq!(doc.add_emoji("🦊", Position::ZERO, 40), 8);
    }

    #[test]
    fn test_from_json_rejects_huge_ids() {
        let json = r#"{
            "id": "doc",
            "emojis": [{ "id": 18446744073709551615, "string": "🦊", "position": { "x": 0, "y": 0 }, "size": 40 }],
            "background": null,
            "next_id": 1
        }"#;
        let err = EmojiArtDocument::from_json(json).unwrap_err();
        assert!(matches!(err, DocumentError::IdOutOfRange(u64::MAX)));

        let json = r#"{ "id": "doc", "emojis": [], "background": null, "next_id": 18446744073709551615 }"#;
        let err = EmojiArtDocument::from_json(json).unwrap_err();
        assert!(matches!(err, DocumentError::IdOutOfRange(u64::MAX)));
    }

    #[test]
    fn test_from_json_accepts_max_id_counter() {
        let json = format!(
            r#"{{ "id": "doc", "emojis": [], "background": null, "next_id": {} }}"#,
            MAX_EMOJI_ID
        );
        let mut doc = EmojiArtDocument::from_json(&json).unwrap();
        assert_eq!(doc.add_emoji("🦊", Position::ZERO, 40), MAX_EMOJI_ID);

        let reloaded = EmojiArtDocument::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(reloaded.emoji(MAX_EMOJI_ID).map(|emoji| emoji.string.as_str()), Some("🦊"));
    }
}
