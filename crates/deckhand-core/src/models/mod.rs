//! Data models for Deckhand

mod deck;
mod outcome;
mod remote;

pub use deck::{is_basic_land, Board, CardLine, DeckMetadata, DeckRecord, Visibility};
pub use outcome::SyncOutcome;
pub use remote::{CreatedDeck, RemoteCard, RemoteDeckSnapshot, RemoteDeckSummary};
