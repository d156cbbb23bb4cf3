//! Hit-testing a pointer against a card's regions.
//!
//! Drag starts only from the body. The resize handle and the delete control
//! are separate regions that the drag gesture never sees.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{CONTROL_INSET_PX, CONTROL_SIZE_PX, RESIZE_HANDLE_PX};
use crate::geom::{Point, Rect};

/// Which part of a card was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    /// Anywhere that starts a drag.
    Body,
    /// The bottom-right resize grip.
    ResizeHandle,
    /// A button (delete) that handles its own clicks.
    Control,
}

/// Bottom-right grip region of a card occupying `frame`.
#[must_use]
pub fn resize_handle_rect(frame: Rect) -> Rect {
    let side = RESIZE_HANDLE_PX.min(frame.size.width).min(frame.size.height);
    Rect::new(frame.right() - side, frame.bottom() - side, side, side)
}

/// Top-right delete control region of a card occupying `frame`.
#[must_use]
pub fn control_rect(frame: Rect) -> Rect {
    Rect::new(
        frame.right() - CONTROL_INSET_PX - CONTROL_SIZE_PX,
        frame.origin.y + CONTROL_INSET_PX,
        CONTROL_SIZE_PX,
        CONTROL_SIZE_PX,
    )
}

/// Test which part of the card occupying `frame` is under `pt`.
///
/// The resize handle sits above everything else, then the control, then
/// the body. Returns `None` when `pt` is outside the card.
#[must_use]
pub fn hit_test(frame: Rect, pt: Point) -> Option<HitPart> {
    if !frame.contains(pt) {
        return None;
    }
    if resize_handle_rect(frame).contains(pt) {
        return Some(HitPart::ResizeHandle);
    }
    if control_rect(frame).contains(pt) {
        return Some(HitPart::Control);
    }
    Some(HitPart::Body)
}
