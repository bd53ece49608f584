//! Emoji Art Core Library
//!
//! Platform-agnostic gesture-to-document engine for the Emoji Art canvas:
//! viewport transforms, selection-driven gesture routing, and the edits
//! that finished gestures and drops produce.

pub mod canvas;
pub mod config;
pub mod document;
pub mod drop;
pub mod error;
pub mod gesture;
pub mod resolver;
pub mod selection;
pub mod viewport;

pub use canvas::{Canvas, SharedCanvas};
pub use config::EditorConfig;
pub use document::{Emoji, EmojiArtDocument, EmojiId, MAX_EMOJI_ID, Position};
pub use drop::DropPayload;
pub use error::{ConfigError, DocumentError};
pub use gesture::{GestureOverlay, GesturePhase, GestureTarget, InputEvent, InteractionMode};
pub use selection::{GestureFamily, Selection};
pub use viewport::{Viewport, to_document_space, to_screen_space, to_view_space};
