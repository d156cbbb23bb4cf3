//! Input model: pointer samples, the mouse and touch adapters, and the
//! per-card gesture state.
//!
//! Mouse and touch events are reduced to one abstract [`PointerSample`] by
//! the [`PointerInput`] adapters, so the gesture engine runs a single state
//! machine for both. `InputState` is the active gesture tracked between
//! pointer-down and pointer-up, carrying everything needed to compute the
//! live feedback and the final commit.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geom::{Point, Size};

/// Which device produced a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSource {
    Mouse,
    Touch,
}

/// One pointer position, already reduced from a device event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub source: PointerSource,
    /// Client coordinates in CSS pixels.
    pub point: Point,
}

impl PointerSample {
    #[must_use]
    pub fn mouse(x: f64, y: f64) -> Self {
        Self { source: PointerSource::Mouse, point: Point::new(x, y) }
    }

    #[must_use]
    pub fn touch(x: f64, y: f64) -> Self {
        Self { source: PointerSource::Touch, point: Point::new(x, y) }
    }
}

/// Anything that can be reduced to a pointer sample.
pub trait PointerInput {
    /// The sample this event contributes, or `None` if the gesture engine
    /// should ignore it.
    fn sample(&self) -> Option<PointerSample>;
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Button {
    /// Left mouse button.
    #[default]
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button; reserved for the context menu.
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` value.
    #[must_use]
    pub fn from_dom(button: i16) -> Self {
        match button {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// A mouse event as the engine needs it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseInput {
    pub client_x: f64,
    pub client_y: f64,
    pub button: Button,
}

impl MouseInput {
    #[must_use]
    pub fn primary(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y, button: Button::Primary }
    }
}

impl PointerInput for MouseInput {
    fn sample(&self) -> Option<PointerSample> {
        (self.button == Button::Primary).then(|| PointerSample::mouse(self.client_x, self.client_y))
    }
}

/// Touch event phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
}

/// A touch event as the engine needs it.
///
/// `touches` holds the fingers still on the surface; `changed` holds the ones
/// that triggered the event. A lifted finger only appears in `changed`.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchInput {
    pub phase: TouchPhase,
    pub touches: Vec<Point>,
    pub changed: Vec<Point>,
}

impl TouchInput {
    #[must_use]
    pub fn start(x: f64, y: f64) -> Self {
        let p = Point::new(x, y);
        Self { phase: TouchPhase::Start, touches: vec![p], changed: vec![p] }
    }

    #[must_use]
    pub fn moved(x: f64, y: f64) -> Self {
        let p = Point::new(x, y);
        Self { phase: TouchPhase::Move, touches: vec![p], changed: vec![p] }
    }

    #[must_use]
    pub fn end(x: f64, y: f64) -> Self {
        Self { phase: TouchPhase::End, touches: Vec::new(), changed: vec![Point::new(x, y)] }
    }
}

impl PointerInput for TouchInput {
    fn sample(&self) -> Option<PointerSample> {
        let point = match self.phase {
            // A second finger landing is a pinch, not a card gesture.
            TouchPhase::Start if self.touches.len() > 1 => return None,
            TouchPhase::Start | TouchPhase::Move => self.touches.first()?,
            TouchPhase::End => self.changed.first()?,
        };
        Some(PointerSample::touch(point.x, point.y))
    }
}

/// Internal state for one card's gesture state machine.
///
/// Each active variant carries the context captured at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Pointer is down on the card body but has not moved past the drag threshold.
    Pressed {
        source: PointerSource,
        /// Pointer position at pointer-down.
        anchor: Point,
        /// On-screen card position at pointer-down.
        origin: Point,
    },
    /// The card follows the pointer.
    Dragging {
        source: PointerSource,
        anchor: Point,
        origin: Point,
        /// Position currently displayed.
        current: Point,
    },
    /// The card's size follows the pointer.
    Resizing {
        source: PointerSource,
        anchor: Point,
        /// Rendered size at pointer-down.
        origin_size: Size,
        /// Width-to-height ratio locked at pointer-down (image cards only).
        aspect: Option<f64>,
        /// Size currently displayed.
        current: Size,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Device that owns the active gesture.
    #[must_use]
    pub fn source(&self) -> Option<PointerSource> {
        match self {
            Self::Idle => None,
            Self::Pressed { source, .. } | Self::Dragging { source, .. } | Self::Resizing { source, .. } => {
                Some(*source)
            }
        }
    }
}
