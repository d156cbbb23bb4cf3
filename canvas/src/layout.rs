//! Rendered geometry of cards.
//!
//! A card with an explicit size renders at that size. A card without one is
//! auto-sized: the width comes from its kind and the height from its content
//! (text) or its aspect ratio (image). Content height is a presentation
//! concern, so it is supplied through [`ContentMeasure`].

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use crate::consts::TEXT_CARD_MIN_HEIGHT;
use crate::doc::{Card, CardKind};
use crate::geom::{Rect, Size};

/// Reports the natural (scroll) height of a card's content.
pub trait ContentMeasure {
    /// Height the card's content needs when laid out at `width`.
    fn content_height(&self, card: &Card, width: f64) -> f64;
}

/// Measure for hosts that have no content to lay out. Never forces growth.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContent;

impl ContentMeasure for NoContent {
    fn content_height(&self, _card: &Card, _width: f64) -> f64 {
        0.0
    }
}

/// Monospace-style estimate of wrapped text height, for hosts without a DOM.
#[derive(Debug, Clone, Copy)]
pub struct TextEstimate {
    /// Average advance of one character.
    pub char_width: f64,
    /// Height of one wrapped line.
    pub line_height: f64,
    /// Inner padding on every side.
    pub padding: f64,
}

impl Default for TextEstimate {
    fn default() -> Self {
        Self { char_width: 8.0, line_height: 24.0, padding: 20.0 }
    }
}

impl TextEstimate {
    fn wrapped_lines(&self, text: &str, inner_width: f64) -> usize {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let per_line = (inner_width / self.char_width).floor().max(1.0) as usize;
        text.lines()
            .map(|line| {
                let chars = line.chars().count();
                chars.div_ceil(per_line).max(1)
            })
            .sum()
    }
}

impl ContentMeasure for TextEstimate {
    fn content_height(&self, card: &Card, width: f64) -> f64 {
        if !card.kind.is_text() {
            return 0.0;
        }
        let inner = (width - 2.0 * self.padding).max(self.char_width);
        let description = card.description.as_deref().map(strip_markup).unwrap_or_default();
        let mut lines = 0;
        for text in [card.title.as_deref().unwrap_or(""), description.as_str()] {
            if !text.is_empty() {
                lines += self.wrapped_lines(text, inner);
            }
        }
        if card.kind == CardKind::Task {
            lines += card.sub_items().len();
        }
        #[allow(clippy::cast_precision_loss)]
        let body = lines as f64 * self.line_height;
        body + 2.0 * self.padding
    }
}

/// Drop anything between `<` and `>` so rich content measures as plain text.
/// Block-level closing tags become line breaks.
fn strip_markup(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut tag = String::new();
    let mut in_tag = false;
    for ch in raw.chars() {
        match (in_tag, ch) {
            (false, '<') => {
                in_tag = true;
                tag.clear();
            }
            (true, '>') => {
                in_tag = false;
                let name = tag.trim().to_ascii_lowercase();
                if matches!(name.as_str(), "/p" | "/div" | "/li" | "/pre" | "br" | "br/" | "br /") {
                    out.push('\n');
                }
            }
            (true, c) => tag.push(c),
            (false, c) => out.push(c),
        }
    }
    out.trim_end_matches('\n').to_string()
}

/// Size a card occupies on screen.
#[must_use]
pub fn rendered_size(card: &Card, measure: &dyn ContentMeasure) -> Size {
    let width = card.width.unwrap_or_else(|| card.kind.default_width());
    let height = match (card.height, card.kind) {
        (Some(h), _) => h,
        (None, CardKind::Image) => width / card.locked_aspect().unwrap_or(1.0),
        (None, CardKind::Note) => measure.content_height(card, width).max(TEXT_CARD_MIN_HEIGHT),
        (None, CardKind::Task) => measure.content_height(card, width),
    };
    Size::new(width, height)
}

/// Rectangle a card occupies on screen.
#[must_use]
pub fn rendered_rect(card: &Card, measure: &dyn ContentMeasure) -> Rect {
    let size = rendered_size(card, measure);
    Rect::new(card.x, card.y, size.width, size.height)
}
