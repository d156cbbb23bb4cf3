//! Document model: cards, the board that orders them, and sparse updates.
//!
//! This module defines what is on the canvas (`Card`, `CardKind`), a
//! sparse-update type for incremental edits (`CardPatch`), the payload a
//! creator hands over before an id and position exist (`NewCard`), and the
//! aggregate root that owns every live card (`Board`).
//!
//! Stacking order is the position in `Board::cards`: later cards are drawn
//! above earlier ones. There is no numeric z-index to renormalize.
//!
//! The serde shape is the persisted and broadcast wire format:
//! `{"tasks": [...], "theme": "dark"}` with camelCase card fields. Card fields
//! this crate does not know about are kept in `Card::extra` and written back
//! untouched.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::consts::{
    IMAGE_CARD_MIN_WIDTH, IMAGE_DEFAULT_WIDTH, NOTE_DEFAULT_WIDTH, TASK_DEFAULT_WIDTH, TEXT_CARD_MIN_HEIGHT,
    TEXT_CARD_MIN_WIDTH,
};
use crate::geom::{Point, Size};

/// Opaque unique identifier for a card.
///
/// Fresh ids are random UUID strings, but any string loaded from storage is
/// accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Generate a fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// The kind of a card. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    /// Titled card with a rich description and optional sub-items.
    #[default]
    Task,
    /// Sticky note.
    Note,
    /// Imported picture with a locked aspect ratio.
    Image,
}

impl CardKind {
    /// Wire name: `task`, `note` or `image`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Note => "note",
            Self::Image => "image",
        }
    }

    /// Whether the card holds text content that can overflow its box.
    #[must_use]
    pub fn is_text(self) -> bool {
        matches!(self, Self::Task | Self::Note)
    }

    /// Accent color used when the card has none of its own.
    #[must_use]
    pub fn default_color(self) -> &'static str {
        match self {
            Self::Note => "#f1c40f",
            Self::Task | Self::Image => "var(--primary)",
        }
    }

    /// Rendered width when the card has no explicit size.
    #[must_use]
    pub fn default_width(self) -> f64 {
        match self {
            Self::Task => TASK_DEFAULT_WIDTH,
            Self::Note => NOTE_DEFAULT_WIDTH,
            Self::Image => IMAGE_DEFAULT_WIDTH,
        }
    }
}

/// Accent colors offered by the color picker and context menu.
pub const ACCENT_PALETTE: [&str; 5] = ["var(--primary)", "#e74c3c", "#2ecc71", "#f1c40f", "#9b59b6"];

/// A card as stored in the board and on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Unique identifier, immutable after creation.
    pub id: CardId,
    /// Task, note or image.
    #[serde(rename = "type", default)]
    pub kind: CardKind,
    /// Left edge in canvas coordinates.
    #[serde(default)]
    pub x: f64,
    /// Top edge in canvas coordinates.
    #[serde(default)]
    pub y: f64,
    /// Explicit width. Absent means auto-size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Explicit height. Absent means auto-size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Accent color as a CSS color string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Rich content produced by the editor; opaque to this crate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Newline-separated sub-items shown under a task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_info_color: Option<String>,
    /// Encoded image bytes as a data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
    /// Intrinsic pixel width of the image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_width: Option<f64>,
    /// Intrinsic pixel height of the image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_height: Option<f64>,
    /// Fields written by other producers, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Card {
    /// Create a bare card of `kind` at `position`.
    #[must_use]
    pub fn new(id: CardId, kind: CardKind, position: Point) -> Self {
        Self {
            id,
            kind,
            x: position.x,
            y: position.y,
            width: None,
            height: None,
            color: None,
            title: None,
            description: None,
            sub_info: None,
            title_color: None,
            desc_color: None,
            sub_info_color: None,
            image_data: None,
            natural_width: None,
            natural_height: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Explicit size, present only when both dimensions are set.
    #[must_use]
    pub fn size(&self) -> Option<Size> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some(Size::new(w, h)),
            _ => None,
        }
    }

    /// Accent color, falling back to the kind default.
    #[must_use]
    pub fn accent(&self) -> &str {
        self.color.as_deref().unwrap_or(self.kind.default_color())
    }

    /// Sub-items of a task, one per non-empty line.
    #[must_use]
    pub fn sub_items(&self) -> Vec<&str> {
        self.sub_info
            .as_deref()
            .map(|s| s.lines().filter(|l| !l.trim().is_empty()).collect())
            .unwrap_or_default()
    }

    /// Width-to-height ratio an image card must keep.
    ///
    /// Taken from the intrinsic dimensions, then the explicit size, then 1.
    /// `None` for text cards, which have no locked ratio.
    #[must_use]
    pub fn locked_aspect(&self) -> Option<f64> {
        if self.kind != CardKind::Image {
            return None;
        }
        let natural = match (self.natural_width, self.natural_height) {
            (Some(w), Some(h)) => Size::new(w, h).aspect(),
            _ => None,
        };
        Some(natural.or_else(|| self.size().and_then(Size::aspect)).unwrap_or(1.0))
    }

    /// Smallest size this card may be given.
    #[must_use]
    pub fn min_size(&self) -> Size {
        match self.locked_aspect() {
            Some(aspect) => Size::new(IMAGE_CARD_MIN_WIDTH, IMAGE_CARD_MIN_WIDTH / aspect),
            None => Size::new(TEXT_CARD_MIN_WIDTH, TEXT_CARD_MIN_HEIGHT),
        }
    }

    /// Clamp `size` to this card's minimum.
    ///
    /// Text cards clamp each dimension independently. Image cards keep the
    /// requested width (at least the minimum) and take the height from the
    /// locked ratio.
    #[must_use]
    pub fn clamp_size(&self, size: Size) -> Size {
        match self.locked_aspect() {
            Some(aspect) => fit_aspect(size.width, aspect),
            None => {
                let min = self.min_size();
                Size::new(size.width.max(min.width), size.height.max(min.height))
            }
        }
    }

    /// Merge the present fields of `patch` into this card.
    ///
    /// The id and kind never change. Explicit dimensions are clamped to the
    /// kind minimum after the merge. An image keeps the ratio it had before
    /// the patch: its width wins and the height is derived from it.
    pub fn apply_patch(&mut self, patch: &CardPatch) {
        let aspect = self.locked_aspect();
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(w) = patch.width {
            self.width = Some(w);
        }
        if let Some(h) = patch.height {
            self.height = Some(h);
        }
        merge_text(&mut self.color, patch.color.as_ref());
        merge_text(&mut self.title, patch.title.as_ref());
        merge_text(&mut self.description, patch.description.as_ref());
        merge_text(&mut self.sub_info, patch.sub_info.as_ref());
        merge_text(&mut self.title_color, patch.title_color.as_ref());
        merge_text(&mut self.desc_color, patch.desc_color.as_ref());
        merge_text(&mut self.sub_info_color, patch.sub_info_color.as_ref());
        match aspect {
            Some(aspect) => self.fit_locked_aspect(aspect),
            None => self.normalize_size(),
        }
    }

    /// Enforce the minimum size on whatever explicit dimensions are set.
    ///
    /// Images are also brought back to their locked ratio.
    pub fn normalize_size(&mut self) {
        if let Some(aspect) = self.locked_aspect() {
            self.fit_locked_aspect(aspect);
            return;
        }
        match (self.width, self.height) {
            (Some(w), Some(h)) => {
                let clamped = self.clamp_size(Size::new(w, h));
                self.width = Some(clamped.width);
                self.height = Some(clamped.height);
            }
            (Some(w), None) => self.width = Some(w.max(self.min_size().width)),
            (None, Some(h)) => self.height = Some(h.max(self.min_size().height)),
            (None, None) => {}
        }
    }

    fn fit_locked_aspect(&mut self, aspect: f64) {
        if let Some(width) = self.width.or_else(|| self.height.map(|h| h * aspect)) {
            let size = fit_aspect(width, aspect);
            self.width = Some(size.width);
            self.height = Some(size.height);
        }
    }
}

/// Image size for `width` at `aspect`, never narrower than the image minimum.
fn fit_aspect(width: f64, aspect: f64) -> Size {
    let width = width.max(IMAGE_CARD_MIN_WIDTH);
    Size::new(width, width / aspect)
}

fn merge_text(slot: &mut Option<String>, incoming: Option<&String>) {
    if let Some(value) = incoming {
        *slot = Some(value.clone());
    }
}

/// Sparse update for a card. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_info_color: Option<String>,
}

impl CardPatch {
    /// Patch that moves a card to `position`.
    #[must_use]
    pub fn position(position: Point) -> Self {
        Self { x: Some(position.x), y: Some(position.y), ..Default::default() }
    }

    /// Patch that gives a card an explicit `size`.
    #[must_use]
    pub fn size(size: Size) -> Self {
        Self { width: Some(size.width), height: Some(size.height), ..Default::default() }
    }

    /// Patch that recolors a card's accent.
    #[must_use]
    pub fn color(color: impl Into<String>) -> Self {
        Self { color: Some(color.into()), ..Default::default() }
    }

    /// Whether the patch carries no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Everything a creator supplies for a new card. The store adds the id and
/// the initial position.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCard {
    pub kind: CardKind,
    pub title: Option<String>,
    pub description: Option<String>,
    pub sub_info: Option<String>,
    pub color: Option<String>,
    pub size: Option<Size>,
    pub image_data: Option<String>,
    pub natural_size: Option<Size>,
}

impl NewCard {
    #[must_use]
    pub fn of_kind(kind: CardKind) -> Self {
        Self {
            kind,
            title: None,
            description: None,
            sub_info: None,
            color: None,
            size: None,
            image_data: None,
            natural_size: None,
        }
    }

    #[must_use]
    pub fn task(title: impl Into<String>) -> Self {
        Self { title: Some(title.into()), ..Self::of_kind(CardKind::Task) }
    }

    #[must_use]
    pub fn note(text: impl Into<String>) -> Self {
        Self { description: Some(text.into()), ..Self::of_kind(CardKind::Note) }
    }

    /// Image card from a data URL and its intrinsic pixel size.
    #[must_use]
    pub fn image(data_url: impl Into<String>, natural_size: Size) -> Self {
        Self { image_data: Some(data_url.into()), natural_size: Some(natural_size), ..Self::of_kind(CardKind::Image) }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_sub_info(mut self, sub_info: impl Into<String>) -> Self {
        self.sub_info = Some(sub_info.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Materialize the card with its assigned id and position.
    #[must_use]
    pub fn into_card(self, id: CardId, position: Point) -> Card {
        let mut card = Card::new(id, self.kind, position);
        card.title = self.title;
        card.description = self.description;
        card.sub_info = self.sub_info;
        card.color = self.color;
        card.image_data = self.image_data;
        if let Some(natural) = self.natural_size {
            card.natural_width = Some(natural.width);
            card.natural_height = Some(natural.height);
        }
        if let Some(size) = self.size {
            card.width = Some(size.width);
            card.height = Some(size.height);
        }
        card.normalize_size();
        card
    }
}

/// Board-wide color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Value for the `data-theme` attribute.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

/// The whole document: cards in stacking order plus the theme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    #[serde(rename = "tasks", default)]
    cards: Vec<Card>,
    #[serde(default)]
    pub theme: Theme,
}

impl Board {
    /// Create an empty board with the default theme.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from cards in stacking order, dropping repeated ids.
    #[must_use]
    pub fn from_cards(cards: Vec<Card>, theme: Theme) -> Self {
        let mut board = Self { cards, theme };
        board.drop_duplicate_ids();
        board
    }

    /// Parse the wire format.
    ///
    /// The result is [`repair`](Self::repair)ed, so ids are unique and sizes
    /// respect the card minimums for anything that parses.
    ///
    /// # Errors
    ///
    /// Returns the JSON error for malformed input.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        Self::from_json_repaired(raw).map(|(board, _)| board)
    }

    /// Like [`from_json`](Self::from_json), also returning how many cards
    /// were dropped for repeating an id.
    ///
    /// # Errors
    ///
    /// Returns the JSON error for malformed input.
    pub fn from_json_repaired(raw: &str) -> Result<(Self, usize), serde_json::Error> {
        let mut board: Self = serde_json::from_str(raw)?;
        let dropped = board.repair();
        Ok((board, dropped))
    }

    /// Bring data from outside (storage, another window) back within the
    /// model's invariants: later cards repeating an id are dropped and every
    /// explicit size is normalized. Returns the number of cards dropped.
    pub fn repair(&mut self) -> usize {
        let dropped = self.drop_duplicate_ids();
        for card in &mut self.cards {
            card.normalize_size();
        }
        dropped
    }

    /// Serialize to the wire format.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if an `extra` value cannot be serialized.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Remove cards whose id already appeared earlier. Returns how many were dropped.
    pub fn drop_duplicate_ids(&mut self) -> usize {
        let before = self.cards.len();
        let mut seen = std::collections::HashSet::new();
        self.cards.retain(|c| seen.insert(c.id.clone()));
        before - self.cards.len()
    }

    /// Cards bottom to top.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| &c.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.index_of(id).is_some()
    }

    /// Stacking rank of a card: 0 is the bottom.
    #[must_use]
    pub fn index_of(&self, id: &CardId) -> Option<usize> {
        self.cards.iter().position(|c| &c.id == id)
    }

    /// Ids bottom to top.
    #[must_use]
    pub fn ids(&self) -> Vec<CardId> {
        self.cards.iter().map(|c| c.id.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Append a card on top of the stack. Returns false, leaving the board
    /// unchanged, if its id is already present.
    pub fn push(&mut self, card: Card) -> bool {
        if self.contains(&card.id) {
            return false;
        }
        self.cards.push(card);
        true
    }

    /// Apply a partial update. Returns false if the card doesn't exist.
    pub fn apply_patch(&mut self, id: &CardId, patch: &CardPatch) -> bool {
        let Some(card) = self.cards.iter_mut().find(|c| &c.id == id) else {
            return false;
        };
        card.apply_patch(patch);
        true
    }

    /// Remove a card by id, returning it if it was present.
    pub fn remove(&mut self, id: &CardId) -> Option<Card> {
        let index = self.index_of(id)?;
        Some(self.cards.remove(index))
    }

    /// Move a card to the top of the stack. Returns false if it doesn't exist.
    pub fn bring_to_front(&mut self, id: &CardId) -> bool {
        let Some(card) = self.remove(id) else {
            return false;
        };
        self.cards.push(card);
        true
    }

    /// Move a card to the bottom of the stack. Returns false if it doesn't exist.
    pub fn send_to_back(&mut self, id: &CardId) -> bool {
        let Some(card) = self.remove(id) else {
            return false;
        };
        self.cards.insert(0, card);
        true
    }

    /// Flip between dark and light.
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }
}
