//! Which part of the surface the canvas shows.
//!
//! The layout already keeps the head centred through its layer offset. While
//! following, the camera adds nothing. Once the user pans, the camera remembers the
//! layer offset at that moment and cancels later offset changes, so the chain stays
//! put under the user's pan until they return to following.

use crate::layout::{LayoutParams, Point};
use crate::model::KeyAction;

/// Pan state of the chain canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Camera {
    pan: Point,
    /// Layer offset when following stopped. `None` while following.
    anchor: Option<Point>,
}

impl Camera {
    /// Camera following the head.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the camera tracks the head.
    pub fn is_following(&self) -> bool {
        self.anchor.is_none()
    }

    /// Apply a view action. Returns `true` if the camera changed.
    ///
    /// Pans move by one slot horizontally and one row vertically.
    pub fn apply(&mut self, action: KeyAction, params: &LayoutParams, layer_offset: Point) -> bool {
        let (dx, dy) = match action {
            KeyAction::PanLeft => (-params.slot_width, 0.0),
            KeyAction::PanRight => (params.slot_width, 0.0),
            KeyAction::PanUp => (0.0, -params.slot_height),
            KeyAction::PanDown => (0.0, params.slot_height),
            KeyAction::FollowHead => {
                let changed = !self.is_following() || self.pan != Point::default();
                *self = Self::new();
                return changed;
            }
            _ => return false,
        };
        if self.anchor.is_none() {
            self.anchor = Some(layer_offset);
        }
        self.pan = Point::new(self.pan.x + dx, self.pan.y + dy);
        true
    }

    /// Top-left surface coordinate shown at the canvas origin.
    pub fn origin(&self, layer_offset: Point) -> Point {
        match self.anchor {
            None => self.pan,
            Some(anchor) => Point::new(
                self.pan.x + layer_offset.x - anchor.x,
                self.pan.y + layer_offset.y - anchor.y,
            ),
        }
    }
}
