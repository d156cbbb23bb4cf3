//! One window: a store, its long-lived sync receiver, and the gesture engine.
//!
//! The window is the host the gesture engine talks to. Pointer events go in,
//! visual actions come out for the presentation layer, and each gesture's
//! `Commit` is turned into a store update on the way through.

#[cfg(test)]
#[path = "window_test.rs"]
mod window_test;

use std::sync::Arc;

use canvas::doc::{Board, CardId};
use canvas::engine::{Action, Canvas};
use canvas::geom::Rect;
use canvas::hit::HitPart;
use canvas::input::PointerInput;
use canvas::layout::{ContentMeasure, TextEstimate};
use tracing::debug;

use crate::config::WhiteboardConfig;
use crate::storage::BoardStorage;
use crate::store::Store;
use crate::sync::{SyncChannel, SyncError, SyncReceiver};

pub struct Window {
    store: Store,
    receiver: SyncReceiver,
    canvas: Canvas,
    measure: Box<dyn ContentMeasure + Send + Sync>,
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("store", &self.store)
            .field("canvas", &self.canvas)
            .finish_non_exhaustive()
    }
}

impl Window {
    /// Subscribe to the channel, then load the board.
    ///
    /// Subscribing first means a commit racing with the load is still
    /// delivered afterwards.
    pub fn open(storage: Arc<dyn BoardStorage>, channel: Arc<dyn SyncChannel>, config: &WhiteboardConfig) -> Self {
        let receiver = channel.subscribe();
        let store = Store::open(storage, channel, config);
        Self { store, receiver, canvas: Canvas::new(), measure: Box::new(TextEstimate::default()) }
    }

    /// Use `measure` for content heights instead of the text estimate.
    #[must_use]
    pub fn with_measure(mut self, measure: impl ContentMeasure + Send + Sync + 'static) -> Self {
        self.measure = Box::new(measure);
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.store = self.store.with_seed(seed);
        self
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.store.board()
    }

    #[must_use]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Changes whenever the board shown by this window changes.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    /// Where each card is drawn right now, bottom to top.
    #[must_use]
    pub fn displayed_rects(&self) -> Vec<(CardId, Rect)> {
        self.board()
            .cards()
            .iter()
            .map(|card| (card.id.clone(), self.canvas.displayed_rect(card, self.measure.as_ref())))
            .collect()
    }

    /// Apply every queued remote board in arrival order. Returns how many
    /// were applied.
    pub fn pump(&mut self) -> usize {
        let messages = self.receiver.drain();
        let count = messages.len();
        for message in messages {
            self.store.apply_remote(message.into_board());
        }
        if count > 0 {
            debug!(count, revision = self.store.revision(), "remote boards applied");
        }
        count
    }

    /// Wait for the next remote board and apply it.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Closed`] when the window has no live channel.
    pub async fn recv_remote(&mut self) -> Result<(), SyncError> {
        let message = self.receiver.recv().await?;
        self.store.apply_remote(message.into_board());
        Ok(())
    }

    /// Pointer pressed on a card; the pressed part is hit-tested.
    pub fn pointer_down(&mut self, id: &CardId, input: &impl PointerInput) -> Vec<Action> {
        let actions = self.canvas.pointer_down(self.store.board(), id, input, self.measure.as_ref());
        self.handle(actions)
    }

    /// Pointer pressed on a known part of a card.
    pub fn pointer_down_on(&mut self, id: &CardId, part: HitPart, input: &impl PointerInput) -> Vec<Action> {
        let actions = self.canvas.pointer_down_on(self.store.board(), id, part, input, self.measure.as_ref());
        self.handle(actions)
    }

    /// Window-level pointer move.
    pub fn pointer_move(&mut self, input: &impl PointerInput) -> Vec<Action> {
        let actions = self.canvas.pointer_move(self.store.board(), input, self.measure.as_ref());
        self.handle(actions)
    }

    /// Window-level pointer release.
    pub fn pointer_up(&mut self, input: &impl PointerInput) -> Vec<Action> {
        let actions = self.canvas.pointer_up(input);
        self.handle(actions)
    }

    /// Send each `Commit` to the store and return the remaining actions for
    /// the presentation layer.
    pub fn handle(&mut self, actions: Vec<Action>) -> Vec<Action> {
        let mut visual = Vec::with_capacity(actions.len());
        for action in actions {
            match action {
                Action::Commit { id, patch } => self.store.update_card(&id, &patch),
                other => visual.push(other),
            }
        }
        visual
    }
}
