//! The persistent store: one canonical board per window.
//!
//! DESIGN
//! ======
//! Every mutation builds the next board and hands it to [`Store::commit`],
//! the single choke point. A commit performs exactly one durable write, one
//! local replacement and one broadcast, in that order. Boards arriving from
//! other windows replace the local copy wholesale through
//! [`Store::apply_remote`]; there is no field-level merge, so concurrent
//! writers resolve to whichever board a window received last.
//!
//! ERROR HANDLING
//! ==============
//! No operation returns an error. Unreadable or malformed storage loads as an
//! empty board. A failed write keeps the new board in memory, still
//! broadcasts it, and flips [`Store::persistence`] to
//! [`Persistence::SessionOnly`] so the presentation layer can show a notice.
//! Mutations naming a card that no longer exists leave the board unchanged
//! but still commit.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::Arc;

use canvas::consts::SPAWN_MARGIN_PX;
use canvas::doc::{Board, CardId, CardPatch, NewCard};
use canvas::geom::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::config::{Viewport, WhiteboardConfig};
use crate::import::{ImageImport, ImportError};
use crate::storage::BoardStorage;
use crate::sync::{SyncChannel, SyncMessage};

/// Whether commits are reaching durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Persistence {
    #[default]
    Durable,
    /// The last write failed; changes live only as long as this window.
    SessionOnly,
}

pub struct Store {
    board: Board,
    storage: Arc<dyn BoardStorage>,
    channel: Arc<dyn SyncChannel>,
    key: String,
    viewport: Viewport,
    rng: StdRng,
    persistence: Persistence,
    revision: u64,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("key", &self.key)
            .field("cards", &self.board.len())
            .field("theme", &self.board.theme)
            .field("persistence", &self.persistence)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Open the store and load the durable copy.
    pub fn open(storage: Arc<dyn BoardStorage>, channel: Arc<dyn SyncChannel>, config: &WhiteboardConfig) -> Self {
        let mut store = Self {
            board: Board::new(),
            storage,
            channel,
            key: config.storage_key.clone(),
            viewport: config.viewport,
            rng: StdRng::from_os_rng(),
            persistence: Persistence::Durable,
            revision: 0,
        };
        store.board = store.load();
        info!(key = %store.key, cards = store.board.len(), theme = store.board.theme.as_str(), "board loaded");
        store
    }

    /// Replace the placement RNG with a seeded one for reproducible layouts.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Read the durable copy. Absent, unreadable or malformed data yields an
    /// empty board with the default theme. Repeated ids and undersized cards
    /// are repaired.
    pub fn load(&self) -> Board {
        let raw = match self.storage.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Board::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "board storage unreadable; starting empty");
                return Board::new();
            }
        };
        let (board, dropped) = match Board::from_json_repaired(&raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(key = %self.key, error = %e, "stored board is malformed; starting empty");
                return Board::new();
            }
        };
        if dropped > 0 {
            warn!(key = %self.key, dropped, "stored board repeated card ids; kept first occurrences");
        }
        board
    }

    /// Current canonical board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn persistence(&self) -> Persistence {
        self.persistence
    }

    /// Bumped on every change to the local board; presentation re-renders
    /// when it moves.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Make `board` canonical: write it, adopt it, broadcast it.
    pub fn commit(&mut self, board: Board) -> &Board {
        match board.to_json() {
            Ok(raw) => match self.storage.write(&self.key, &raw) {
                Ok(()) => self.persistence = Persistence::Durable,
                Err(e) => {
                    warn!(key = %self.key, error = %e, "board write failed; keeping changes for this session only");
                    self.persistence = Persistence::SessionOnly;
                }
            },
            Err(e) => {
                warn!(key = %self.key, error = %e, "board could not be serialized; keeping changes for this session only");
                self.persistence = Persistence::SessionOnly;
            }
        }

        self.board = board;
        self.revision += 1;

        if let Err(e) = self.channel.post(&SyncMessage::Update(self.board.clone())) {
            warn!(error = %e, "board update not broadcast");
        }
        debug!(revision = self.revision, cards = self.board.len(), "board committed");
        &self.board
    }

    /// Adopt a board received from another window. Not written or re-broadcast.
    pub fn apply_remote(&mut self, board: Board) {
        self.board = board;
        self.revision += 1;
        debug!(revision = self.revision, cards = self.board.len(), "remote board applied");
    }

    /// Create a card with a fresh id at a random spot in the viewport, on top
    /// of the stack. Returns the new id.
    pub fn add_card(&mut self, new: NewCard) -> CardId {
        let mut id = CardId::generate();
        while self.board.contains(&id) {
            id = CardId::generate();
        }
        let position = self.spawn_position();
        let kind = new.kind;

        let mut next = self.board.clone();
        next.push(new.into_card(id.clone(), position));
        self.commit(next);
        info!(card_id = %id, kind = ?kind, x = position.x, y = position.y, "card added");
        id
    }

    /// Validate an imported image and add it as a card.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError`] for non-images; the board is not touched.
    pub fn add_image(&mut self, import: ImageImport) -> Result<CardId, ImportError> {
        let new = import.into_new_card()?;
        Ok(self.add_card(new))
    }

    /// Merge `patch` into the card. A missing id commits the board unchanged.
    pub fn update_card(&mut self, id: &CardId, patch: &CardPatch) {
        let mut next = self.board.clone();
        if !next.apply_patch(id, patch) {
            debug!(card_id = %id, "update for missing card");
        }
        self.commit(next);
    }

    /// Remove the card. Deleting twice is the same as deleting once.
    pub fn delete_card(&mut self, id: &CardId) {
        let mut next = self.board.clone();
        if next.remove(id).is_some() {
            info!(card_id = %id, "card deleted");
        } else {
            debug!(card_id = %id, "delete for missing card");
        }
        self.commit(next);
    }

    /// Move the card to the top of the stack.
    pub fn bring_to_front(&mut self, id: &CardId) {
        let mut next = self.board.clone();
        if !next.bring_to_front(id) {
            debug!(card_id = %id, "bring-to-front for missing card");
        }
        self.commit(next);
    }

    /// Move the card to the bottom of the stack.
    pub fn send_to_back(&mut self, id: &CardId) {
        let mut next = self.board.clone();
        if !next.send_to_back(id) {
            debug!(card_id = %id, "send-to-back for missing card");
        }
        self.commit(next);
    }

    pub fn toggle_theme(&mut self) {
        let mut next = self.board.clone();
        next.toggle_theme();
        info!(theme = next.theme.as_str(), "theme toggled");
        self.commit(next);
    }

    fn spawn_position(&mut self) -> Point {
        let max_x = (self.viewport.width - SPAWN_MARGIN_PX).max(0.0);
        let max_y = (self.viewport.height - SPAWN_MARGIN_PX).max(0.0);
        Point::new(self.rng.random_range(0.0..=max_x), self.rng.random_range(0.0..=max_y))
    }
}
