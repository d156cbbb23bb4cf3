//! DOM adapters: reduce browser mouse and touch events to engine inputs.
//!
//! Only compiled with the `web` feature. The host wires `mousedown` /
//! `touchstart` on each card element and `mousemove` / `mouseup` /
//! `touchmove` / `touchend` on the window, converts each event here, and
//! applies the returned [`crate::engine::Action`]s (calling
//! `preventDefault` itself on [`crate::engine::Action::PreventDefault`]).

use wasm_bindgen::JsCast;
use web_sys::{Element, Event, MouseEvent, TouchEvent, TouchList};

use crate::geom::Point;
use crate::hit::HitPart;
use crate::input::{Button, MouseInput, TouchInput, TouchPhase};

/// Class carried by the resize grip element.
pub const RESIZE_HANDLE_SELECTOR: &str = ".resize-handle";
/// Selector for card controls that must not start a gesture.
pub const CONTROL_SELECTOR: &str = "button, input, [contenteditable=\"true\"]";

impl From<&MouseEvent> for MouseInput {
    fn from(event: &MouseEvent) -> Self {
        Self {
            client_x: f64::from(event.client_x()),
            client_y: f64::from(event.client_y()),
            button: Button::from_dom(event.button()),
        }
    }
}

impl From<&TouchEvent> for TouchInput {
    fn from(event: &TouchEvent) -> Self {
        let phase = match event.type_().as_str() {
            "touchstart" => TouchPhase::Start,
            "touchmove" => TouchPhase::Move,
            _ => TouchPhase::End,
        };
        Self { phase, touches: points(&event.touches()), changed: points(&event.changed_touches()) }
    }
}

fn points(list: &TouchList) -> Vec<Point> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| Point::new(f64::from(t.client_x()), f64::from(t.client_y())))
        .collect()
}

/// Which part of a card the event's target belongs to.
#[must_use]
pub fn pressed_part(event: &Event) -> HitPart {
    let Some(target) = event.target() else {
        return HitPart::Body;
    };
    let Some(element) = target.dyn_ref::<Element>() else {
        return HitPart::Body;
    };
    if matches_closest(element, RESIZE_HANDLE_SELECTOR) {
        HitPart::ResizeHandle
    } else if matches_closest(element, CONTROL_SELECTOR) {
        HitPart::Control
    } else {
        HitPart::Body
    }
}

fn matches_closest(element: &Element, selector: &str) -> bool {
    matches!(element.closest(selector), Ok(Some(_)))
}
