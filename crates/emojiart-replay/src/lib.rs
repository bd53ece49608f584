//! Headless Emoji Art shell.
//!
//! Loads an editor config and optionally an existing document, then feeds a
//! recorded script of input events through a [`SharedCanvas`] and reports
//! the resulting document.

use emojiart_core::{Canvas, ConfigError, DocumentError, EditorConfig, EmojiArtDocument, InputEvent, SharedCanvas};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Replay errors.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid script: {0}")]
    Script(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
}

/// A recorded editing session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Script {
    /// Overrides the configured viewport size.
    #[serde(default)]
    pub viewport_size: Option<Size>,
    pub events: Vec<InputEvent>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ReplayError> {
        Self::from_json(&read(path)?)
    }
}

/// Counts from one replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub events: usize,
    /// Events that changed some state.
    pub handled: usize,
}

fn read(path: &Path) -> Result<String, ReplayError> {
    std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a document JSON file.
pub fn load_document(path: &Path) -> Result<EmojiArtDocument, ReplayError> {
    let document = EmojiArtDocument::from_json(&read(path)?)?;
    log::info!("Loaded document {} with {} emoji", document.id, document.len());
    Ok(document)
}

/// Build the canvas handle the session runs against.
pub fn open_canvas(config: EditorConfig, document: Option<EmojiArtDocument>) -> SharedCanvas {
    let canvas = match document {
        Some(document) => Canvas::with_document(document, config),
        None => Canvas::new(config),
    };
    SharedCanvas::new(canvas)
}

/// Feed every event of a script to the canvas in order.
pub fn replay(canvas: &SharedCanvas, script: Script) -> ReplaySummary {
    if let Some(size) = script.viewport_size {
        canvas.update(|canvas| canvas.set_viewport_size(size.width, size.height));
    }

    let mut summary = ReplaySummary::default();
    for event in script.events {
        summary.events += 1;
        log::debug!("Event {}: {:?}", summary.events, event);
        if canvas.handle_event(event) {
            summary.handled += 1;
        }
    }
    log::info!("Replayed {} events, {} handled", summary.events, summary.handled);
    summary
}
