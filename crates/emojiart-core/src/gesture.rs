//! Gesture events and the interaction state machine.
//!
//! Platform gesture recognizers report drags and pinches as
//! begin/update/end/cancel phases. [`GestureTracker`] keeps the in-flight
//! values of those gestures as a transient overlay; nothing here touches
//! the document or the persisted viewport. Committing is the caller's job
//! once a gesture ends.

use crate::document::EmojiId;
use crate::drop::DropPayload;
use crate::selection::GestureFamily;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Phase of a continuous gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// What a gesture started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureTarget {
    /// Empty canvas area (or the background image).
    Canvas,
    /// An emoji on the canvas.
    Emoji(EmojiId),
}

/// Continuous gesture kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    Drag,
    Pinch,
}

/// A discrete input event delivered by the interaction layer.
///
/// Drag translations and pinch scales are cumulative since the gesture
/// began, as reported by the platform recognizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    Drag {
        phase: GesturePhase,
        target: GestureTarget,
        #[serde(default)]
        translation: Vec2,
    },
    Pinch {
        phase: GesturePhase,
        target: GestureTarget,
        #[serde(default = "unit_scale")]
        scale: f64,
    },
    /// Tap on empty canvas area.
    TapCanvas,
    /// Tap on an emoji body.
    TapEmoji { id: EmojiId },
    /// Tap on an emoji's delete badge.
    TapDeleteBadge { id: EmojiId },
    ToggleDeleteMode,
    Drop {
        payloads: Vec<DropPayload>,
        location: Point,
    },
    Undo,
    Redo,
}

fn unit_scale() -> f64 {
    1.0
}

/// Live, uncommitted gesture values: a multiplicative scale and an
/// additive translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureOverlay {
    pub scale: f64,
    pub translation: Vec2,
}

impl GestureOverlay {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translation: Vec2::ZERO,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for GestureOverlay {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Which gesture family, if any, currently owns the pointer.
///
/// Delete mode is orthogonal and lives on
/// [`Selection`](crate::selection::Selection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    /// The whole canvas is being panned and/or zoomed.
    PanZoomActive,
    /// The selected emoji are being moved and/or scaled.
    SelectionEditActive,
}

impl From<GestureFamily> for InteractionMode {
    fn from(family: GestureFamily) -> Self {
        match family {
            GestureFamily::Viewport => Self::PanZoomActive,
            GestureFamily::Selection => Self::SelectionEditActive,
        }
    }
}

/// A gesture that just finished and must be committed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FinishedGesture {
    Drag { family: GestureFamily, translation: Vec2 },
    Pinch { family: GestureFamily, scale: f64 },
}

/// Tracks in-flight drag and pinch gestures.
///
/// One drag and one pinch may be live at once, but only within a single
/// gesture family: the first gesture to begin claims the family and the
/// tracker returns to idle when every live gesture has ended or been
/// cancelled.
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    family: Option<GestureFamily>,
    drag: Option<Vec2>,
    pinch: Option<f64>,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InteractionMode {
        self.family.map(InteractionMode::from).unwrap_or_default()
    }

    pub fn family(&self) -> Option<GestureFamily> {
        self.family
    }

    pub fn is_active(&self, kind: GestureKind) -> bool {
        match kind {
            GestureKind::Drag => self.drag.is_some(),
            GestureKind::Pinch => self.pinch.is_some(),
        }
    }

    /// Start a gesture. Fails if the same kind is already live or another
    /// family owns the pointer.
    pub fn begin(&mut self, kind: GestureKind, family: GestureFamily) -> bool {
        if self.family.is_some_and(|active| active != family) || self.is_active(kind) {
            return false;
        }
        self.family = Some(family);
        match kind {
            GestureKind::Drag => self.drag = Some(Vec2::ZERO),
            GestureKind::Pinch => self.pinch = Some(1.0),
        }
        true
    }

    /// Record the latest drag translation. Ignored if no drag is live.
    pub fn update_drag(&mut self, translation: Vec2) -> bool {
        match self.drag.as_mut() {
            Some(live) => {
                *live = translation;
                true
            }
            None => false,
        }
    }

    /// Record the latest pinch scale. Ignored if no pinch is live.
    pub fn update_pinch(&mut self, scale: f64) -> bool {
        match self.pinch.as_mut() {
            Some(live) => {
                *live = scale;
                true
            }
            None => false,
        }
    }

    /// Finish the live drag with its final translation.
    pub fn end_drag(&mut self, translation: Vec2) -> Option<FinishedGesture> {
        self.drag.take()?;
        let family = self.release()?;
        Some(FinishedGesture::Drag { family, translation })
    }

    /// Finish the live pinch with its final scale.
    pub fn end_pinch(&mut self, scale: f64) -> Option<FinishedGesture> {
        self.pinch.take()?;
        let family = self.release()?;
        Some(FinishedGesture::Pinch { family, scale })
    }

    /// Discard a live gesture without committing anything.
    pub fn cancel(&mut self, kind: GestureKind) -> bool {
        let was_live = match kind {
            GestureKind::Drag => self.drag.take().is_some(),
            GestureKind::Pinch => self.pinch.take().is_some(),
        };
        if was_live {
            self.release();
        }
        was_live
    }

    /// Drop every live gesture.
    pub fn cancel_all(&mut self) {
        self.drag = None;
        self.pinch = None;
        self.family = None;
    }

    /// Overlay for a family; identity unless that family owns the pointer.
    pub fn overlay(&self, family: GestureFamily) -> GestureOverlay {
        if self.family != Some(family) {
            return GestureOverlay::IDENTITY;
        }
        GestureOverlay {
            scale: self.pinch.unwrap_or(1.0),
            translation: self.drag.unwrap_or(Vec2::ZERO),
        }
    }

    /// Family that owned the gesture just taken; clears it once nothing is live.
    fn release(&mut self) -> Option<GestureFamily> {
        let family = self.family;
        if self.drag.is_none() && self.pinch.is_none() {
            self.family = None;
        }
        family
    }
}
