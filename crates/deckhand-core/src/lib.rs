//! deckhand-core - Core library for Deckhand
//!
//! This crate contains the local deck model, the deck-file parser, the
//! Moxfield client, and the sync reconciliation engine used by the
//! `deckhand` CLI.

pub mod client;
pub mod diff;
pub mod error;
pub mod models;
pub mod parser;
pub mod sync;

pub use error::{Error, Result};
pub use models::{Board, CardLine, DeckMetadata, DeckRecord, SyncOutcome};
