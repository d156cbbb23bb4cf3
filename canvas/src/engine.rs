//! Gesture engine: per-card drag and resize state machines plus the router
//! that feeds them window-level pointer events.
//!
//! DESIGN
//! ======
//! A gesture has two phases. While the pointer is down the engine only emits
//! visual actions (`MoveTo`, `ResizeTo`) and records them in a live overlay
//! that the presentation layer draws on top of the board; the board itself is
//! untouched. On release exactly one `Commit` is emitted, which the host
//! forwards to the store. A press that never crosses the drag threshold
//! commits nothing, so click and double-click reach their own handlers.
//!
//! Move and release events are routed from window-level listeners, so a
//! pointer that leaves the card mid-gesture is still tracked to completion.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::BTreeMap;

use crate::consts::{DRAG_THRESHOLD_PX, IMAGE_CARD_MIN_WIDTH, TEXT_CARD_MIN_HEIGHT, TEXT_CARD_MIN_WIDTH};
use crate::doc::{Board, Card, CardId, CardKind, CardPatch};
use crate::geom::{Point, Rect, Size};
use crate::hit::{HitPart, hit_test};
use crate::input::{InputState, PointerInput, PointerSample, PointerSource};
use crate::layout::{ContentMeasure, rendered_rect};

/// Cursor shown over an idle card.
pub const CURSOR_GRAB: &str = "grab";
/// Cursor shown while a card follows the pointer.
pub const CURSOR_GRABBING: &str = "grabbing";
/// Cursor shown while resizing.
pub const CURSOR_RESIZE: &str = "nwse-resize";

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Display the card at `position`. Visual only.
    MoveTo { id: CardId, position: Point },
    /// Display the card at `size`. Visual only.
    ResizeTo { id: CardId, size: Size },
    /// Raise the card above its neighbours and deepen its shadow while the gesture runs.
    Lift { id: CardId },
    /// Undo `Lift`.
    Settle { id: CardId },
    SetCursor(&'static str),
    /// Call `preventDefault` on the event being handled.
    PreventDefault,
    /// Press and release without a drag; the click handlers own it.
    Clicked { id: CardId },
    /// The gesture's single authoritative mutation.
    Commit { id: CardId, patch: CardPatch },
}

/// Drag and resize state machine for one card.
#[derive(Debug, Clone)]
pub struct CardController {
    id: CardId,
    kind: CardKind,
    locked_aspect: Option<f64>,
    pub input: InputState,
}

impl CardController {
    #[must_use]
    pub fn new(id: CardId, kind: CardKind) -> Self {
        Self { id, kind, locked_aspect: None, input: InputState::Idle }
    }

    /// Controller for `card`, carrying the ratio an image resize must keep.
    #[must_use]
    pub fn for_card(card: &Card) -> Self {
        Self { locked_aspect: card.locked_aspect(), ..Self::new(card.id.clone(), card.kind) }
    }

    #[must_use]
    pub fn id(&self) -> &CardId {
        &self.id
    }

    /// Start a gesture on the `part` of a card currently displayed at `frame`.
    ///
    /// Body presses wait for the drag threshold; handle presses resize at
    /// once. Presses on controls, or while a gesture is already running, are
    /// ignored.
    pub fn on_pointer_down(&mut self, sample: PointerSample, part: HitPart, frame: Rect) -> Vec<Action> {
        if !self.input.is_idle() {
            return Vec::new();
        }
        match part {
            HitPart::Control => Vec::new(),
            HitPart::Body => {
                self.input =
                    InputState::Pressed { source: sample.source, anchor: sample.point, origin: frame.origin };
                Vec::new()
            }
            HitPart::ResizeHandle => {
                let aspect = match self.kind {
                    CardKind::Image => Some(self.locked_aspect.or_else(|| frame.size.aspect()).unwrap_or(1.0)),
                    CardKind::Task | CardKind::Note => None,
                };
                // A drifted image box starts from its width at the locked ratio.
                let origin_size = match aspect {
                    Some(aspect) => Size::new(frame.size.width, frame.size.width / aspect),
                    None => frame.size,
                };
                self.input = InputState::Resizing {
                    source: sample.source,
                    anchor: sample.point,
                    origin_size,
                    aspect,
                    current: origin_size,
                };
                let mut actions = vec![Action::Lift { id: self.id.clone() }, Action::SetCursor(CURSOR_RESIZE)];
                if sample.source == PointerSource::Touch {
                    actions.push(Action::PreventDefault);
                }
                actions
            }
        }
    }

    /// Advance the gesture. `card` is the card's current canonical state, or
    /// `None` if it was deleted mid-gesture; it is only used to measure
    /// content for the overflow snap.
    pub fn on_pointer_move(
        &mut self,
        sample: PointerSample,
        card: Option<&Card>,
        measure: &dyn ContentMeasure,
    ) -> Vec<Action> {
        if self.input.source() != Some(sample.source) {
            return Vec::new();
        }
        let touch = sample.source == PointerSource::Touch;
        let mut actions = Vec::new();

        match self.input {
            InputState::Idle => {}
            InputState::Pressed { source, anchor, origin } => {
                let delta = sample.point.delta_from(anchor);
                // EDGE: jitter inside the threshold is not a drag; touch keeps scrolling.
                if delta.length() <= DRAG_THRESHOLD_PX {
                    return actions;
                }
                let current = origin.offset(delta);
                self.input = InputState::Dragging { source, anchor, origin, current };
                actions.push(Action::Lift { id: self.id.clone() });
                actions.push(Action::SetCursor(CURSOR_GRABBING));
                actions.push(Action::MoveTo { id: self.id.clone(), position: current });
            }
            InputState::Dragging { ref mut current, anchor, origin, .. } => {
                *current = origin.offset(sample.point.delta_from(anchor));
                actions.push(Action::MoveTo { id: self.id.clone(), position: *current });
            }
            InputState::Resizing { ref mut current, anchor, origin_size, aspect, .. } => {
                let delta = sample.point.delta_from(anchor);
                let content = card.map(|c| (c, measure));
                *current = resized(origin_size, aspect, delta, content);
                actions.push(Action::ResizeTo { id: self.id.clone(), size: *current });
            }
        }

        if touch && !actions.is_empty() {
            actions.push(Action::PreventDefault);
        }
        actions
    }

    /// Finish the gesture in whatever state it reached.
    pub fn on_pointer_up(&mut self, sample: PointerSample) -> Vec<Action> {
        if self.input.source() != Some(sample.source) {
            return Vec::new();
        }
        let state = std::mem::take(&mut self.input);
        let id = self.id.clone();
        match state {
            InputState::Idle => Vec::new(),
            InputState::Pressed { .. } => vec![Action::Clicked { id }],
            InputState::Dragging { anchor, origin, .. } => {
                let position = origin.offset(sample.point.delta_from(anchor));
                vec![
                    Action::MoveTo { id: id.clone(), position },
                    Action::Settle { id: id.clone() },
                    Action::SetCursor(CURSOR_GRAB),
                    Action::Commit { id, patch: CardPatch::position(position) },
                ]
            }
            InputState::Resizing { current, .. } => vec![
                Action::Settle { id: id.clone() },
                Action::SetCursor(CURSOR_GRAB),
                Action::Commit { id, patch: CardPatch::size(current) },
            ],
        }
    }
}

/// Size for a resize gesture that has moved `delta` from its anchor.
///
/// Width never drops below the kind minimum. With a locked `aspect` the
/// height follows the width and vertical movement is ignored; otherwise the
/// height tracks the pointer but grows to fit the content so it is never
/// clipped.
#[must_use]
pub fn resized(
    origin: Size,
    aspect: Option<f64>,
    delta: Point,
    content: Option<(&Card, &dyn ContentMeasure)>,
) -> Size {
    if let Some(aspect) = aspect {
        let width = (origin.width + delta.x).max(IMAGE_CARD_MIN_WIDTH);
        return Size::new(width, width / aspect);
    }
    let width = (origin.width + delta.x).max(TEXT_CARD_MIN_WIDTH);
    let mut height = (origin.height + delta.y).max(TEXT_CARD_MIN_HEIGHT);
    if let Some((card, measure)) = content {
        let natural = measure.content_height(card, width);
        if natural > height {
            height = natural;
        }
    }
    Size::new(width, height)
}

/// Transient geometry shown while a gesture runs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LiveFrame {
    pub position: Option<Point>,
    pub size: Option<Size>,
}

/// Routes pointer events to the cards' controllers and keeps the live overlay.
///
/// A controller exists only while its card has a gesture running. It is
/// keyed by id rather than tied to the board, so a card deleted by another
/// window mid-gesture still finishes cleanly; its commit then lands on a
/// missing id, which the store tolerates.
#[derive(Debug, Default)]
pub struct Canvas {
    gestures: BTreeMap<CardId, CardController>,
    overlay: BTreeMap<CardId, LiveFrame>,
}

impl Canvas {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Where a card is on screen right now: the live overlay if a gesture is
    /// running, otherwise its canonical layout.
    #[must_use]
    pub fn displayed_rect(&self, card: &Card, measure: &dyn ContentMeasure) -> Rect {
        let mut rect = rendered_rect(card, measure);
        if let Some(live) = self.overlay.get(&card.id) {
            if let Some(position) = live.position {
                rect.origin = position;
            }
            if let Some(size) = live.size {
                rect.size = size;
            }
        }
        rect
    }

    /// Live overlay entry for a card, if a gesture has moved or sized it.
    #[must_use]
    pub fn live_frame(&self, id: &CardId) -> Option<LiveFrame> {
        self.overlay.get(id).copied()
    }

    /// Whether the card has a gesture in progress.
    #[must_use]
    pub fn is_active(&self, id: &CardId) -> bool {
        self.gestures.contains_key(id)
    }

    /// Number of gestures in progress.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.gestures.len()
    }

    /// Pointer-down on a card; the part is found by hit-testing the
    /// displayed frame. Use [`Canvas::pointer_down_on`] when the host already
    /// knows which element was pressed.
    pub fn pointer_down(
        &mut self,
        board: &Board,
        id: &CardId,
        input: &impl PointerInput,
        measure: &dyn ContentMeasure,
    ) -> Vec<Action> {
        let (Some(sample), Some(card)) = (input.sample(), board.get(id)) else {
            return Vec::new();
        };
        let frame = self.displayed_rect(card, measure);
        let part = hit_test(frame, sample.point).unwrap_or(HitPart::Body);
        self.start(card, sample, part, frame)
    }

    /// Pointer-down on a known part of a card.
    pub fn pointer_down_on(
        &mut self,
        board: &Board,
        id: &CardId,
        part: HitPart,
        input: &impl PointerInput,
        measure: &dyn ContentMeasure,
    ) -> Vec<Action> {
        let (Some(sample), Some(card)) = (input.sample(), board.get(id)) else {
            return Vec::new();
        };
        let frame = self.displayed_rect(card, measure);
        self.start(card, sample, part, frame)
    }

    fn start(&mut self, card: &Card, sample: PointerSample, part: HitPart, frame: Rect) -> Vec<Action> {
        let controller = self
            .gestures
            .entry(card.id.clone())
            .or_insert_with(|| CardController::for_card(card));
        let actions = controller.on_pointer_down(sample, part, frame);
        if controller.input.is_idle() {
            self.gestures.remove(&card.id);
        }
        actions
    }

    /// Window-level pointer move, delivered to every running gesture.
    pub fn pointer_move(
        &mut self,
        board: &Board,
        input: &impl PointerInput,
        measure: &dyn ContentMeasure,
    ) -> Vec<Action> {
        let Some(sample) = input.sample() else {
            return Vec::new();
        };
        let mut actions = Vec::new();
        for (id, controller) in &mut self.gestures {
            actions.extend(controller.on_pointer_move(sample, board.get(id), measure));
        }
        self.record(&actions);
        dedup_prevent_default(actions)
    }

    /// Window-level pointer release, finishing every running gesture of that device.
    pub fn pointer_up(&mut self, input: &impl PointerInput) -> Vec<Action> {
        let Some(sample) = input.sample() else {
            return Vec::new();
        };
        let mut actions = Vec::new();
        for controller in self.gestures.values_mut() {
            actions.extend(controller.on_pointer_up(sample));
        }
        self.gestures.retain(|_, c| !c.input.is_idle());
        for action in &actions {
            if let Action::Commit { id, .. } | Action::Clicked { id } = action {
                self.overlay.remove(id);
            }
        }
        actions
    }

    fn record(&mut self, actions: &[Action]) {
        for action in actions {
            match action {
                Action::MoveTo { id, position } => {
                    self.overlay.entry(id.clone()).or_default().position = Some(*position);
                }
                Action::ResizeTo { id, size } => {
                    self.overlay.entry(id.clone()).or_default().size = Some(*size);
                }
                _ => {}
            }
        }
    }
}

fn dedup_prevent_default(actions: Vec<Action>) -> Vec<Action> {
    let mut seen = false;
    actions
        .into_iter()
        .filter(|a| {
            if *a != Action::PreventDefault {
                return true;
            }
            !std::mem::replace(&mut seen, true)
        })
        .collect()
}
