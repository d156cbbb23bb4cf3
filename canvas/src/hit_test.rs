use super::*;

fn frame() -> Rect {
    Rect::new(100.0, 100.0, 300.0, 200.0)
}

#[test]
fn outside_card_misses() {
    assert_eq!(hit_test(frame(), Point::new(50.0, 50.0)), None);
    assert_eq!(hit_test(frame(), Point::new(401.0, 150.0)), None);
}

#[test]
fn center_is_body() {
    assert_eq!(hit_test(frame(), Point::new(250.0, 200.0)), Some(HitPart::Body));
}

#[test]
fn bottom_right_corner_is_resize_handle() {
    assert_eq!(hit_test(frame(), Point::new(399.0, 299.0)), Some(HitPart::ResizeHandle));
    assert_eq!(hit_test(frame(), Point::new(371.0, 271.0)), Some(HitPart::ResizeHandle));
}

#[test]
fn just_outside_handle_is_body() {
    assert_eq!(hit_test(frame(), Point::new(365.0, 299.0)), Some(HitPart::Body));
}

#[test]
fn top_right_is_control() {
    assert_eq!(hit_test(frame(), Point::new(380.0, 120.0)), Some(HitPart::Control));
}

#[test]
fn handle_shrinks_on_tiny_frames() {
    let tiny = Rect::new(0.0, 0.0, 20.0, 10.0);
    assert_eq!(resize_handle_rect(tiny), Rect::new(10.0, 0.0, 10.0, 10.0));
}
