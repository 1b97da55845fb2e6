//! Typed views of the remote service's deck state.
//!
//! These are validated projections of Moxfield API payloads; the raw wire
//! shapes live in the client module and fail closed on missing fields.

use serde::{Deserialize, Serialize};

use super::deck::Board;

/// One deck as it appears in the owner's listing query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteDeckSummary {
    /// URL-safe public id (e.g. `296iUZy-SU-dWA6iFuR1Rg`)
    pub public_id: String,
    pub name: String,
    pub format: String,
}

/// One card entry in a remote deck board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCard {
    /// Server-assigned card id; the server is the sole source of this value
    pub card_id: String,
    pub name: String,
    pub quantity: u32,
    pub board: Board,
}

/// The server's current view of a deck.
///
/// Snapshots are created by `create_deck`, grown by `import_cards`, and never
/// deleted by this engine; superseded snapshots are abandoned in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteDeckSnapshot {
    pub public_id: String,
    /// Short internal id (e.g. `JrQQDg`) required by the import endpoint
    pub internal_id: String,
    /// Optimistic-concurrency version; must be echoed on any write that
    /// claims it
    pub version: i64,
    /// Card entries sorted by (board, name) for deterministic output
    pub cards: Vec<RemoteCard>,
}

impl RemoteDeckSnapshot {
    /// Card entries belonging to the given board
    pub fn board(&self, board: Board) -> impl Iterator<Item = &RemoteCard> {
        self.cards.iter().filter(move |card| card.board == board)
    }
}

/// Identifiers returned by a successful deck creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedDeck {
    pub public_id: String,
    pub internal_id: String,
}
