#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::CardId;
use crate::geom::Point;

fn card(kind: CardKind) -> Card {
    Card::new(CardId::from("c"), kind, Point::new(10.0, 20.0))
}

#[test]
fn explicit_size_wins() {
    let mut c = card(CardKind::Task);
    c.width = Some(320.0);
    c.height = Some(140.0);
    assert_eq!(rendered_size(&c, &NoContent), Size::new(320.0, 140.0));
    assert_eq!(rendered_rect(&c, &NoContent), Rect::new(10.0, 20.0, 320.0, 140.0));
}

#[test]
fn auto_note_is_at_least_base_height() {
    let c = card(CardKind::Note);
    assert_eq!(rendered_size(&c, &NoContent), Size::new(240.0, 80.0));
}

#[test]
fn auto_image_height_follows_aspect() {
    let mut c = card(CardKind::Image);
    c.natural_width = Some(500.0);
    c.natural_height = Some(250.0);
    assert_eq!(rendered_size(&c, &NoContent), Size::new(250.0, 125.0));
}

#[test]
fn estimate_counts_wrapped_lines() {
    let measure = TextEstimate { char_width: 10.0, line_height: 20.0, padding: 10.0 };
    let mut c = card(CardKind::Task);
    // Inner width 100 -> 10 chars per line.
    c.title = Some("abcdefghijklmno".into());
    c.sub_info = Some("one\ntwo".into());
    // title: 2 lines, sub-items: 2 lines, plus 2 * padding.
    assert_eq!(measure.content_height(&c, 120.0), 4.0 * 20.0 + 20.0);
}

#[test]
fn estimate_strips_markup_from_description() {
    let measure = TextEstimate { char_width: 10.0, line_height: 10.0, padding: 0.0 };
    let mut c = card(CardKind::Note);
    c.description = Some("<p>abc</p><p>def</p>".into());
    assert_eq!(measure.content_height(&c, 100.0), 20.0);
}

#[test]
fn estimate_ignores_images() {
    let c = card(CardKind::Image);
    assert_eq!(TextEstimate::default().content_height(&c, 300.0), 0.0);
}

#[test]
fn narrower_width_grows_estimated_height() {
    let measure = TextEstimate::default();
    let mut c = card(CardKind::Note);
    c.description = Some("a fairly long sticky note that will need to wrap".into());
    assert!(measure.content_height(&c, 200.0) > measure.content_height(&c, 600.0));
}
