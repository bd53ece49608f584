//! Canvas editing session and event dispatch.

use crate::config::{EditorConfig, is_valid_viewport_size};
use crate::document::{EmojiArtDocument, EmojiId, Position};
use crate::drop::{DropPayload, resolve_drop};
use crate::gesture::{
    FinishedGesture, GestureKind, GestureOverlay, GesturePhase, GestureTarget, GestureTracker,
    InputEvent, InteractionMode,
};
use crate::resolver;
use crate::selection::{GestureFamily, Selection};
use crate::viewport::Viewport;
use kurbo::{Point, Size, Vec2};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Runtime editing state for one document (not persisted apart from the
/// document itself).
#[derive(Debug, Clone)]
pub struct Canvas {
    /// The document being edited.
    pub document: EmojiArtDocument,
    /// Committed zoom and pan.
    pub viewport: Viewport,
    /// Selected emoji and delete mode.
    pub selection: Selection,
    gestures: GestureTracker,
    config: EditorConfig,
    viewport_size: Size,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Canvas {
    /// Create a canvas with an empty document.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_document(EmojiArtDocument::new(), config)
    }

    /// Create a canvas with an existing document.
    pub fn with_document(mut document: EmojiArtDocument, config: EditorConfig) -> Self {
        document.set_undo_limit(config.undo_limit);
        Self {
            document,
            viewport: Viewport::new(),
            selection: Selection::new(),
            gestures: GestureTracker::new(),
            viewport_size: config.viewport_size,
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Set the viewport size.
    /// Returns false, keeping the current size, for negative or non-finite sizes.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) -> bool {
        let size = Size::new(width, height);
        if !is_valid_viewport_size(size) {
            log::warn!("Ignoring invalid viewport size {}x{}", width, height);
            return false;
        }
        self.viewport_size = size;
        true
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    /// Center of the viewport in screen coordinates; document origin.
    pub fn viewport_center(&self) -> Point {
        Point::new(self.viewport_size.width / 2.0, self.viewport_size.height / 2.0)
    }

    pub fn mode(&self) -> InteractionMode {
        self.gestures.mode()
    }

    /// Viewport to draw with, including any in-flight pan/zoom.
    pub fn live_viewport(&self) -> Viewport {
        self.viewport
            .with_overlay(&self.gestures.overlay(GestureFamily::Viewport))
    }

    /// Extra scale and offset to draw an emoji with while the selection is
    /// being edited. Identity for unselected emoji.
    pub fn live_emoji_overlay(&self, id: EmojiId) -> GestureOverlay {
        if self.selection.contains(id) {
            self.gestures.overlay(GestureFamily::Selection)
        } else {
            GestureOverlay::IDENTITY
        }
    }

    /// Map a screen point to document space with the committed viewport.
    pub fn document_position(&self, screen_point: Point) -> Position {
        self.viewport
            .screen_to_document(screen_point, self.viewport_center())
    }

    /// Topmost emoji under a screen point.
    pub fn emoji_at(&self, screen_point: Point) -> Option<EmojiId> {
        self.document.emoji_at(self.document_position(screen_point))
    }

    /// Hit-test a screen point into a gesture target.
    pub fn target_at(&self, screen_point: Point) -> GestureTarget {
        self.emoji_at(screen_point)
            .map_or(GestureTarget::Canvas, GestureTarget::Emoji)
    }

    /// Process one input event.
    /// Returns true if it changed the document, viewport, selection or
    /// gesture state.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Drag {
                phase,
                target,
                translation,
            } => self.handle_drag(phase, target, translation),
            InputEvent::Pinch {
                phase,
                target,
                scale,
            } => self.handle_pinch(phase, target, scale),
            InputEvent::TapCanvas => self.tap_canvas(),
            InputEvent::TapEmoji { id } => self.tap_emoji(id),
            InputEvent::TapDeleteBadge { id } => self.tap_delete_badge(id),
            InputEvent::ToggleDeleteMode => {
                self.selection.toggle_delete_mode();
                true
            }
            InputEvent::Drop { payloads, location } => self.drop(&payloads, location),
            InputEvent::Undo => self.undo(),
            InputEvent::Redo => self.redo(),
        }
    }

    /// Feed one phase of a drag gesture.
    pub fn handle_drag(&mut self, phase: GesturePhase, target: GestureTarget, translation: Vec2) -> bool {
        match phase {
            GesturePhase::Began => self.begin_gesture(GestureKind::Drag, target),
            GesturePhase::Changed => {
                log::trace!("Drag changed to ({}, {})", translation.x, translation.y);
                self.gestures.update_drag(translation)
            }
            GesturePhase::Ended => match self.gestures.end_drag(translation) {
                Some(finished) => self.commit(finished),
                None => false,
            },
            GesturePhase::Cancelled => self.gestures.cancel(GestureKind::Drag),
        }
    }

    /// Feed one phase of a pinch gesture.
    pub fn handle_pinch(&mut self, phase: GesturePhase, target: GestureTarget, scale: f64) -> bool {
        match phase {
            GesturePhase::Began => self.begin_gesture(GestureKind::Pinch, target),
            GesturePhase::Changed => {
                log::trace!("Pinch changed to {}", scale);
                self.gestures.update_pinch(scale)
            }
            GesturePhase::Ended => match self.gestures.end_pinch(scale) {
                Some(finished) => self.commit(finished),
                None => false,
            },
            GesturePhase::Cancelled => self.gestures.cancel(GestureKind::Pinch),
        }
    }

    fn begin_gesture(&mut self, kind: GestureKind, target: GestureTarget) -> bool {
        let Some(family) = self.selection.route(kind, target) else {
            log::debug!("No {:?} gesture enabled on {:?}", kind, target);
            return false;
        };
        let began = self.gestures.begin(kind, family);
        if !began {
            log::debug!("Ignoring {:?} begin while {:?}", kind, self.gestures.mode());
        }
        began
    }

    fn commit(&mut self, finished: FinishedGesture) -> bool {
        match finished {
            FinishedGesture::Drag {
                family: GestureFamily::Viewport,
                translation,
            } => {
                self.viewport.commit_pan(translation);
                log::debug!("Panned to ({}, {})", self.viewport.pan.x, self.viewport.pan.y);
                true
            }
            FinishedGesture::Pinch {
                family: GestureFamily::Viewport,
                scale,
            } => {
                let committed = self.viewport.commit_zoom(scale);
                if committed {
                    log::debug!("Zoomed to {}", self.viewport.zoom());
                }
                committed
            }
            FinishedGesture::Drag {
                family: GestureFamily::Selection,
                translation,
            } => resolver::move_selection(&mut self.document, &self.selection, translation) > 0,
            FinishedGesture::Pinch {
                family: GestureFamily::Selection,
                scale,
            } => resolver::resize_selection(&mut self.document, &self.selection, scale) > 0,
        }
    }

    /// Tap on empty canvas: clear the selection.
    pub fn tap_canvas(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        self.selection.clear();
        self.cancel_disabled_gestures();
        true
    }

    /// Tap on an emoji: toggle its selection.
    pub fn tap_emoji(&mut self, id: EmojiId) -> bool {
        if !self.document.contains(id) {
            return false;
        }
        self.selection.toggle(id);
        self.cancel_disabled_gestures();
        true
    }

    /// Tap on an emoji's delete badge; only acts in delete mode.
    pub fn tap_delete_badge(&mut self, id: EmojiId) -> bool {
        if !self.selection.is_delete_mode() {
            return false;
        }
        let removed = resolver::remove_emoji(&mut self.document, &mut self.selection, id);
        self.cancel_disabled_gestures();
        removed
    }

    /// Cancel in-flight gestures once the selection no longer enables their family.
    fn cancel_disabled_gestures(&mut self) {
        let Some(family) = self.gestures.family() else {
            return;
        };
        if family != self.selection.active_family() {
            log::debug!("Cancelling {:?} gesture after selection change", family);
            self.gestures.cancel_all();
        }
    }

    /// Handle a drop at a screen location. Returns true if a payload was used.
    pub fn drop(&mut self, payloads: &[DropPayload], location: Point) -> bool {
        let viewport_center = self.viewport_center();
        resolve_drop(
            &mut self.document,
            payloads,
            location,
            viewport_center,
            &self.viewport,
            self.config.palette_emoji_size,
        )
    }

    /// Undo the last document edit, discarding any in-flight gesture.
    pub fn undo(&mut self) -> bool {
        if !self.document.undo() {
            return false;
        }
        self.gestures.cancel_all();
        self.selection.retain_existing(&self.document);
        true
    }

    /// Redo the last undone document edit.
    pub fn redo(&mut self) -> bool {
        if !self.document.redo() {
            return false;
        }
        self.gestures.cancel_all();
        self.selection.retain_existing(&self.document);
        true
    }
}

/// Mutex-guarded canvas handle for callers on more than one thread.
///
/// All edits go through the lock, so the selection can never refer to an
/// emoji another caller has just deleted.
#[derive(Debug, Clone, Default)]
pub struct SharedCanvas {
    inner: Arc<Mutex<Canvas>>,
}

impl SharedCanvas {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            inner: Arc::new(Mutex::new(canvas)),
        }
    }

    // Canvas methods do not panic mid-edit, so a poisoned lock still
    // guards consistent state.
    fn lock(&self) -> MutexGuard<'_, Canvas> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Process one input event under the lock.
    pub fn handle_event(&self, event: InputEvent) -> bool {
        self.lock().handle_event(event)
    }

    /// Read the canvas under the lock.
    pub fn read<R>(&self, f: impl FnOnce(&Canvas) -> R) -> R {
        f(&self.lock())
    }

    /// Mutate the canvas under the lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut Canvas) -> R) -> R {
        f(&mut self.lock())
    }
}
