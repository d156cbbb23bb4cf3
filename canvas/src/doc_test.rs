#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn card(id: &str, kind: CardKind) -> Card {
    Card::new(CardId::from(id), kind, Point::new(0.0, 0.0))
}

fn board_of(ids: &[&str]) -> Board {
    Board::from_cards(ids.iter().map(|id| card(id, CardKind::Task)).collect(), Theme::Dark)
}

fn order(board: &Board) -> Vec<&str> {
    board.cards().iter().map(|c| c.id.as_str()).collect()
}

// =============================================================
// CardId
// =============================================================

#[test]
fn generated_ids_are_distinct() {
    let a = CardId::generate();
    let b = CardId::generate();
    assert_ne!(a, b);
    assert!(Uuid::parse_str(a.as_str()).is_ok());
}

#[test]
fn card_id_serializes_as_plain_string() {
    assert_eq!(serde_json::to_string(&CardId::from("t1")).unwrap(), "\"t1\"");
}

// =============================================================
// CardKind serde
// =============================================================

#[test]
fn kind_serde_all_variants() {
    let cases = [(CardKind::Task, "\"task\""), (CardKind::Note, "\"note\""), (CardKind::Image, "\"image\"")];
    for (kind, expected) in cases {
        assert_eq!(serde_json::to_string(&kind).unwrap(), expected);
        let back: CardKind = serde_json::from_str(expected).unwrap();
        assert_eq!(back, kind);
    }
}

#[test]
fn kind_deserialize_invalid_rejects() {
    assert!(serde_json::from_str::<CardKind>("\"sticker\"").is_err());
}

#[test]
fn kind_defaults() {
    assert_eq!(CardKind::Note.default_color(), "#f1c40f");
    assert_eq!(CardKind::Task.default_color(), "var(--primary)");
    assert_eq!(CardKind::Task.default_width(), 300.0);
    assert_eq!(CardKind::Note.default_width(), 240.0);
    assert_eq!(CardKind::Image.default_width(), 250.0);
    assert!(CardKind::Note.is_text());
    assert!(!CardKind::Image.is_text());
}

// =============================================================
// Card serde
// =============================================================

#[test]
fn card_uses_camel_case_wire_names() {
    let mut c = card("n1", CardKind::Task);
    c.sub_info = Some("a\nb".into());
    c.title_color = Some("#fff".into());
    c.desc_color = Some("#eee".into());
    let value = serde_json::to_value(&c).unwrap();
    assert_eq!(value["type"], "task");
    assert_eq!(value["subInfo"], "a\nb");
    assert_eq!(value["titleColor"], "#fff");
    assert_eq!(value["descColor"], "#eee");
    assert!(value.get("width").is_none());
    assert!(value.get("imageData").is_none());
}

#[test]
fn card_missing_type_defaults_to_task() {
    let c: Card = serde_json::from_value(json!({"id": "x", "x": 1, "y": 2})).unwrap();
    assert_eq!(c.kind, CardKind::Task);
    assert_eq!(c.position(), Point::new(1.0, 2.0));
}

#[test]
fn card_preserves_unknown_fields() {
    let raw = json!({"id": "x", "type": "note", "x": 0, "y": 0, "pinned": true, "tags": ["a"]});
    let c: Card = serde_json::from_value(raw).unwrap();
    assert_eq!(c.extra.get("pinned"), Some(&json!(true)));
    let back = serde_json::to_value(&c).unwrap();
    assert_eq!(back["tags"], json!(["a"]));
}

#[test]
fn card_image_fields_round_trip() {
    let raw = json!({
        "id": "i1", "type": "image", "x": 5.5, "y": 6.25,
        "width": 300.0, "height": 150.0,
        "imageData": "data:image/png;base64,AAAA",
        "naturalWidth": 600.0, "naturalHeight": 300.0
    });
    let c: Card = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(c.image_data.as_deref(), Some("data:image/png;base64,AAAA"));
    assert_eq!(c.size(), Some(Size::new(300.0, 150.0)));
    assert_eq!(serde_json::to_value(&c).unwrap(), raw);
}

// =============================================================
// Card sizing
// =============================================================

#[test]
fn size_requires_both_dimensions() {
    let mut c = card("a", CardKind::Task);
    c.width = Some(250.0);
    assert_eq!(c.size(), None);
    c.height = Some(90.0);
    assert_eq!(c.size(), Some(Size::new(250.0, 90.0)));
}

#[test]
fn text_card_minimum_is_200_by_80() {
    assert_eq!(card("a", CardKind::Task).min_size(), Size::new(200.0, 80.0));
    assert_eq!(card("a", CardKind::Note).min_size(), Size::new(200.0, 80.0));
}

#[test]
fn image_minimum_follows_natural_aspect() {
    let mut c = card("i", CardKind::Image);
    c.natural_width = Some(800.0);
    c.natural_height = Some(400.0);
    assert_eq!(c.locked_aspect(), Some(2.0));
    assert_eq!(c.min_size(), Size::new(100.0, 50.0));
}

#[test]
fn image_aspect_falls_back_to_explicit_size_then_square() {
    let mut c = card("i", CardKind::Image);
    assert_eq!(c.locked_aspect(), Some(1.0));
    c.width = Some(300.0);
    c.height = Some(100.0);
    assert_eq!(c.locked_aspect(), Some(3.0));
}

#[test]
fn text_cards_have_no_locked_aspect() {
    assert_eq!(card("t", CardKind::Task).locked_aspect(), None);
}

#[test]
fn clamp_text_card_per_dimension() {
    let c = card("a", CardKind::Note);
    assert_eq!(c.clamp_size(Size::new(50.0, 500.0)), Size::new(200.0, 500.0));
    assert_eq!(c.clamp_size(Size::new(400.0, 10.0)), Size::new(400.0, 80.0));
}

#[test]
fn clamp_image_scales_both_dimensions() {
    let mut c = card("i", CardKind::Image);
    c.natural_width = Some(400.0);
    c.natural_height = Some(200.0);
    assert_eq!(c.clamp_size(Size::new(50.0, 25.0)), Size::new(100.0, 50.0));
    assert_eq!(c.clamp_size(Size::new(300.0, 150.0)), Size::new(300.0, 150.0));
}

// =============================================================
// Card patching
// =============================================================

#[test]
fn patch_merges_only_present_fields() {
    let mut c = card("a", CardKind::Task);
    c.title = Some("Ship v1".into());
    c.apply_patch(&CardPatch::position(Point::new(40.0, 50.0)));
    assert_eq!(c.position(), Point::new(40.0, 50.0));
    assert_eq!(c.title.as_deref(), Some("Ship v1"));
}

#[test]
fn patch_never_changes_kind_or_id() {
    let mut c = card("a", CardKind::Note);
    c.apply_patch(&CardPatch { title: Some("t".into()), color: Some("#e74c3c".into()), ..Default::default() });
    assert_eq!(c.kind, CardKind::Note);
    assert_eq!(c.id.as_str(), "a");
    assert_eq!(c.accent(), "#e74c3c");
}

#[test]
fn patch_clamps_size_below_minimum() {
    let mut c = card("a", CardKind::Task);
    c.apply_patch(&CardPatch::size(Size::new(10.0, 10.0)));
    assert_eq!(c.size(), Some(Size::new(200.0, 80.0)));
}

#[test]
fn patch_with_single_dimension_clamps_it() {
    let mut c = card("a", CardKind::Task);
    c.apply_patch(&CardPatch { width: Some(5.0), ..Default::default() });
    assert_eq!(c.width, Some(200.0));
    assert_eq!(c.height, None);
}

fn sized_image(natural: Size, size: Size) -> Card {
    let mut c = card("i", CardKind::Image);
    c.natural_width = Some(natural.width);
    c.natural_height = Some(natural.height);
    c.width = Some(size.width);
    c.height = Some(size.height);
    c
}

#[test]
fn image_width_patch_derives_height_from_natural_ratio() {
    let mut c = sized_image(Size::new(200.0, 100.0), Size::new(200.0, 100.0));
    c.apply_patch(&CardPatch { width: Some(400.0), ..Default::default() });
    assert_eq!(c.size(), Some(Size::new(400.0, 200.0)));
}

#[test]
fn image_size_patch_below_minimum_keeps_ratio() {
    let mut c = sized_image(Size::new(200.0, 100.0), Size::new(200.0, 100.0));
    c.apply_patch(&CardPatch::size(Size::new(100.0, 10.0)));
    assert_eq!(c.size(), Some(Size::new(100.0, 50.0)));
}

#[test]
fn image_height_patch_keeps_width() {
    let mut c = sized_image(Size::new(200.0, 100.0), Size::new(300.0, 150.0));
    c.apply_patch(&CardPatch { height: Some(600.0), ..Default::default() });
    assert_eq!(c.size(), Some(Size::new(300.0, 150.0)));
}

#[test]
fn image_without_natural_size_keeps_its_own_ratio_on_width_patch() {
    let mut c = card("i", CardKind::Image);
    c.width = Some(300.0);
    c.height = Some(100.0);
    c.apply_patch(&CardPatch { width: Some(150.0), ..Default::default() });
    assert_eq!(c.size(), Some(Size::new(150.0, 50.0)));
}

#[test]
fn normalize_repairs_drifted_image_size() {
    let mut c = sized_image(Size::new(200.0, 100.0), Size::new(10.0, 90.0));
    c.normalize_size();
    assert_eq!(c.size(), Some(Size::new(100.0, 50.0)));
}

#[test]
fn empty_patch_is_detected() {
    assert!(CardPatch::default().is_empty());
    assert!(!CardPatch::color("#fff").is_empty());
}

#[test]
fn patch_serializes_sparse() {
    let value = serde_json::to_value(CardPatch::size(Size::new(220.0, 90.0))).unwrap();
    assert_eq!(value, json!({"width": 220.0, "height": 90.0}));
}

#[test]
fn sub_items_skip_blank_lines() {
    let mut c = card("a", CardKind::Task);
    c.sub_info = Some("first\n\n  \nsecond".into());
    assert_eq!(c.sub_items(), vec!["first", "second"]);
}

// =============================================================
// NewCard
// =============================================================

#[test]
fn new_task_into_card_carries_content() {
    let c = NewCard::task("Ship v1")
        .with_description("<p>notes</p>")
        .with_sub_info("a\nb")
        .with_color("#2ecc71")
        .into_card(CardId::from("t1"), Point::new(3.0, 4.0));
    assert_eq!(c.kind, CardKind::Task);
    assert_eq!(c.title.as_deref(), Some("Ship v1"));
    assert_eq!(c.description.as_deref(), Some("<p>notes</p>"));
    assert_eq!(c.sub_info.as_deref(), Some("a\nb"));
    assert_eq!(c.accent(), "#2ecc71");
    assert_eq!(c.size(), None);
}

#[test]
fn new_image_records_natural_size_and_clamps() {
    let c = NewCard::image("data:image/png;base64,AA", Size::new(40.0, 20.0))
        .with_size(Size::new(40.0, 20.0))
        .into_card(CardId::from("i1"), Point::default());
    assert_eq!(c.natural_width, Some(40.0));
    assert_eq!(c.size(), Some(Size::new(100.0, 50.0)));
}

// =============================================================
// Theme
// =============================================================

#[test]
fn theme_defaults_to_dark_and_toggles() {
    assert_eq!(Theme::default(), Theme::Dark);
    assert_eq!(Theme::Dark.toggled(), Theme::Light);
    assert_eq!(Theme::Light.toggled(), Theme::Dark);
    assert_eq!(Theme::Light.as_str(), "light");
}

// =============================================================
// Board
// =============================================================

#[test]
fn board_wire_shape_uses_tasks_key() {
    let board = board_of(&["a"]);
    let value = serde_json::to_value(&board).unwrap();
    assert_eq!(value["theme"], "dark");
    assert_eq!(value["tasks"][0]["id"], "a");
}

#[test]
fn board_json_round_trip_is_deep_equal() {
    let mut board = board_of(&["a", "b"]);
    board.apply_patch(&CardId::from("a"), &CardPatch::position(Point::new(0.1 + 0.2, 1.0 / 3.0)));
    board.toggle_theme();
    let raw = board.to_json().unwrap();
    assert_eq!(Board::from_json(&raw).unwrap(), board);
}

#[test]
fn board_from_json_defaults_missing_fields() {
    let board = Board::from_json("{}").unwrap();
    assert!(board.is_empty());
    assert_eq!(board.theme, Theme::Dark);
}

#[test]
fn board_from_json_rejects_garbage() {
    assert!(Board::from_json("not json").is_err());
    assert!(Board::from_json("{\"tasks\": 5}").is_err());
}

#[test]
fn board_from_json_drops_repeated_ids() {
    let raw = r#"{"tasks":[{"id":"a","x":1,"y":1},{"id":"a","x":2,"y":2},{"id":"b","x":0,"y":0}],"theme":"light"}"#;
    let board = Board::from_json(raw).unwrap();
    assert_eq!(order(&board), vec!["a", "b"]);
    assert_eq!(board.get(&CardId::from("a")).unwrap().x, 1.0);
}

#[test]
fn push_rejects_duplicate_id() {
    let mut board = board_of(&["a"]);
    assert!(!board.push(card("a", CardKind::Note)));
    assert_eq!(board.len(), 1);
    assert!(board.push(card("b", CardKind::Note)));
    assert_eq!(order(&board), vec!["a", "b"]);
}

#[test]
fn apply_patch_missing_card_returns_false() {
    let mut board = board_of(&["a"]);
    assert!(!board.apply_patch(&CardId::from("zzz"), &CardPatch::color("#fff")));
}

#[test]
fn remove_is_idempotent() {
    let mut board = board_of(&["a", "b"]);
    assert!(board.remove(&CardId::from("a")).is_some());
    assert!(board.remove(&CardId::from("a")).is_none());
    assert_eq!(order(&board), vec!["b"]);
}

#[test]
fn bring_to_front_moves_to_end_preserving_others() {
    let mut board = board_of(&["a", "b", "c", "d"]);
    assert!(board.bring_to_front(&CardId::from("b")));
    assert_eq!(order(&board), vec!["a", "c", "d", "b"]);
}

#[test]
fn bring_to_front_twice_equals_once() {
    let mut once = board_of(&["a", "b", "c"]);
    once.bring_to_front(&CardId::from("a"));
    let mut twice = once.clone();
    twice.bring_to_front(&CardId::from("a"));
    assert_eq!(once, twice);
}

#[test]
fn send_to_back_moves_to_start_preserving_others() {
    let mut board = board_of(&["a", "b", "c", "d"]);
    assert!(board.send_to_back(&CardId::from("c")));
    assert_eq!(order(&board), vec!["c", "a", "b", "d"]);
}

#[test]
fn restacking_missing_card_is_noop() {
    let mut board = board_of(&["a", "b"]);
    assert!(!board.bring_to_front(&CardId::from("x")));
    assert!(!board.send_to_back(&CardId::from("x")));
    assert_eq!(order(&board), vec!["a", "b"]);
}

#[test]
fn index_of_reports_stacking_rank() {
    let board = board_of(&["a", "b"]);
    assert_eq!(board.index_of(&CardId::from("a")), Some(0));
    assert_eq!(board.index_of(&CardId::from("b")), Some(1));
    assert_eq!(board.ids(), vec![CardId::from("a"), CardId::from("b")]);
}

#[test]
fn palette_starts_with_primary() {
    assert_eq!(ACCENT_PALETTE[0], "var(--primary)");
    assert!(ACCENT_PALETTE.contains(&CardKind::Note.default_color()));
}
