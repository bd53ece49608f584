//! Drag-and-drop payloads.

use crate::document::EmojiArtDocument;
use crate::viewport::Viewport;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use url::Url;

/// One representation offered by a drop, in the order the source listed them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropPayload {
    /// An image reference, used as the background.
    Url(Url),
    /// A string, placed as an emoji.
    Text(String),
    /// Raw bytes. Not handled.
    Data(Vec<u8>),
}

/// Apply the first payload this editor understands.
///
/// A URL becomes the background. Text becomes a new emoji at the drop
/// location, sized so it keeps `palette_emoji_size` on screen at the
/// current zoom. Returns false if no payload was recognized.
pub fn resolve_drop(
    document: &mut EmojiArtDocument,
    payloads: &[DropPayload],
    location: Point,
    viewport_center: Point,
    viewport: &Viewport,
    palette_emoji_size: f64,
) -> bool {
    for payload in payloads {
        match payload {
            DropPayload::Url(url) => {
                document.push_undo();
                document.set_background(url.clone());
                log::debug!("Dropped background {}", url);
                return true;
            }
            DropPayload::Text(string) => {
                let position = viewport.screen_to_document(location, viewport_center);
                let size = (palette_emoji_size / viewport.zoom()) as u32;
                document.push_undo();
                let id = document.add_emoji(string.as_str(), position, size);
                log::debug!("Dropped emoji {} {:?} at {:?} size {}", id, string, position, size);
                return true;
            }
            DropPayload::Data(_) => {}
        }
    }
    log::debug!("Drop with {} payload(s) not handled", payloads.len());
    false
}
