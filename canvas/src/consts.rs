//! Shared numeric constants for the canvas crate.

// ── Gestures ────────────────────────────────────────────────────

/// Pointer travel, in CSS pixels, a press must exceed before it becomes a drag.
pub const DRAG_THRESHOLD_PX: f64 = 5.0;

// ── Minimum sizes ───────────────────────────────────────────────

/// Minimum width of task and note cards.
pub const TEXT_CARD_MIN_WIDTH: f64 = 200.0;

/// Minimum height of task and note cards.
pub const TEXT_CARD_MIN_HEIGHT: f64 = 80.0;

/// Minimum width of image cards. The minimum height follows from the aspect ratio.
pub const IMAGE_CARD_MIN_WIDTH: f64 = 100.0;

// ── Default rendered sizes ──────────────────────────────────────

/// Rendered width of a task card that has no explicit size.
pub const TASK_DEFAULT_WIDTH: f64 = 300.0;

/// Rendered width of a note card that has no explicit size.
pub const NOTE_DEFAULT_WIDTH: f64 = 240.0;

/// Rendered width of an image card that has no explicit size.
pub const IMAGE_DEFAULT_WIDTH: f64 = 250.0;

// ── Hit regions ─────────────────────────────────────────────────

/// Side length of the square resize handle in the bottom-right corner.
pub const RESIZE_HANDLE_PX: f64 = 30.0;

/// Inset of the delete control from the top-right corner.
pub const CONTROL_INSET_PX: f64 = 8.0;

/// Side length of the square delete control.
pub const CONTROL_SIZE_PX: f64 = 24.0;

// ── Placement ───────────────────────────────────────────────────

/// Margin kept free at the right and bottom viewport edges when placing a new card.
pub const SPAWN_MARGIN_PX: f64 = 200.0;
