use super::*;

// =============================================================
// Button
// =============================================================

#[test]
fn button_from_dom_values() {
    assert_eq!(Button::from_dom(0), Button::Primary);
    assert_eq!(Button::from_dom(1), Button::Middle);
    assert_eq!(Button::from_dom(2), Button::Secondary);
    assert_eq!(Button::from_dom(7), Button::Primary);
}

// =============================================================
// Mouse adapter
// =============================================================

#[test]
fn mouse_primary_produces_sample() {
    let sample = MouseInput::primary(12.0, 34.0).sample();
    assert_eq!(sample, Some(PointerSample::mouse(12.0, 34.0)));
}

#[test]
fn mouse_secondary_is_ignored() {
    let input = MouseInput { client_x: 1.0, client_y: 1.0, button: Button::Secondary };
    assert_eq!(input.sample(), None);
}

// =============================================================
// Touch adapter
// =============================================================

#[test]
fn touch_start_uses_first_touch() {
    assert_eq!(TouchInput::start(5.0, 6.0).sample(), Some(PointerSample::touch(5.0, 6.0)));
}

#[test]
fn touch_start_with_two_fingers_is_ignored() {
    let input = TouchInput {
        phase: TouchPhase::Start,
        touches: vec![Point::new(0.0, 0.0), Point::new(50.0, 50.0)],
        changed: vec![Point::new(50.0, 50.0)],
    };
    assert_eq!(input.sample(), None);
}

#[test]
fn touch_end_uses_changed_touch() {
    assert_eq!(TouchInput::end(7.0, 8.0).sample(), Some(PointerSample::touch(7.0, 8.0)));
}

#[test]
fn touch_move_without_touches_is_ignored() {
    let input = TouchInput { phase: TouchPhase::Move, touches: Vec::new(), changed: Vec::new() };
    assert_eq!(input.sample(), None);
}

#[test]
fn both_adapters_yield_identical_points() {
    let m = MouseInput::primary(3.0, 4.0).sample().map(|s| s.point);
    let t = TouchInput::moved(3.0, 4.0).sample().map(|s| s.point);
    assert_eq!(m, t);
}

// =============================================================
// InputState
// =============================================================

#[test]
fn input_state_default_is_idle() {
    assert!(InputState::default().is_idle());
    assert_eq!(InputState::default().source(), None);
}

#[test]
fn input_state_reports_source() {
    let state = InputState::Pressed {
        source: PointerSource::Touch,
        anchor: Point::default(),
        origin: Point::default(),
    };
    assert!(!state.is_idle());
    assert_eq!(state.source(), Some(PointerSource::Touch));
}
