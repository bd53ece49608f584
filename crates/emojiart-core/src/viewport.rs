//! Viewport module for pan/zoom transforms.
//!
//! The content layer is drawn at its natural size around the viewport
//! center, then scaled by `zoom` about that center and shifted by `pan`.
//! Document space has its origin at the viewport center and y pointing up.

use crate::document::Position;
use crate::gesture::GestureOverlay;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Map a screen point to document space.
///
/// Both components truncate toward zero, so this is lossy: see
/// [`to_view_space`] for the forward direction.
pub fn to_document_space(screen_point: Point, viewport_center: Point, pan: Vec2, zoom: f64) -> Position {
    Position {
        x: ((screen_point.x - viewport_center.x - pan.x) / zoom) as i32,
        y: (-(screen_point.y - viewport_center.y - pan.y) / zoom) as i32,
    }
}

/// Where an emoji sits inside the unscaled content layer.
///
/// This ignores pan and zoom, which are applied to the layer as a whole.
pub fn to_screen_space(position: Position, viewport_center: Point) -> Point {
    Point::new(
        viewport_center.x + f64::from(position.x),
        viewport_center.y - f64::from(position.y),
    )
}

/// Where an emoji appears on screen once the layer's zoom and pan are applied.
///
/// Round-tripping a screen point through [`to_document_space`] and back
/// lands within one document unit, i.e. `zoom` screen units, of the start.
pub fn to_view_space(position: Position, viewport_center: Point, viewport: &Viewport) -> Point {
    let local = to_screen_space(position, viewport_center) - viewport_center;
    viewport_center + viewport.pan + local * viewport.zoom
}

/// Persisted zoom and pan of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawViewport")]
pub struct Viewport {
    /// Translation of the content layer in screen units.
    pub pan: Vec2,
    /// Always positive and finite.
    zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

fn is_valid_scale(scale: f64) -> bool {
    scale.is_finite() && scale > 0.0
}

/// Unchecked wire form of [`Viewport`].
#[derive(Deserialize)]
struct RawViewport {
    pan: Vec2,
    zoom: f64,
}

impl TryFrom<RawViewport> for Viewport {
    type Error = String;

    fn try_from(raw: RawViewport) -> Result<Self, Self::Error> {
        Viewport::with_zoom(raw.zoom, raw.pan)
            .ok_or_else(|| format!("zoom must be positive and finite, got {}", raw.zoom))
    }
}

impl Viewport {
    /// Create a viewport at 100% with no pan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a viewport with the given zoom, or `None` if it is not positive.
    pub fn with_zoom(zoom: f64, pan: Vec2) -> Option<Self> {
        is_valid_scale(zoom).then_some(Self { pan, zoom })
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Convert a screen point to document space.
    pub fn screen_to_document(&self, screen_point: Point, viewport_center: Point) -> Position {
        to_document_space(screen_point, viewport_center, self.pan, self.zoom)
    }

    /// Convert a document position to its on-screen location.
    pub fn document_to_screen(&self, position: Position, viewport_center: Point) -> Point {
        to_view_space(position, viewport_center, self)
    }

    /// Fold a finished pinch into the zoom.
    /// Returns false, leaving the zoom untouched, for non-positive scales.
    pub fn commit_zoom(&mut self, end_scale: f64) -> bool {
        let zoom = self.zoom * end_scale;
        if !is_valid_scale(zoom) {
            log::warn!("Ignoring zoom by invalid scale {}", end_scale);
            return false;
        }
        self.zoom = zoom;
        true
    }

    /// Fold a finished drag into the pan.
    pub fn commit_pan(&mut self, end_translation: Vec2) {
        self.pan += end_translation;
    }

    /// The viewport as it should be drawn while a gesture is in flight.
    ///
    /// Overlays with an invalid scale leave the zoom as persisted.
    pub fn with_overlay(&self, overlay: &GestureOverlay) -> Viewport {
        let zoom = self.zoom * overlay.scale;
        Viewport {
            pan: self.pan + overlay.translation,
            zoom: if is_valid_scale(zoom) { zoom } else { self.zoom },
        }
    }

    /// Reset to 100% with no pan.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
