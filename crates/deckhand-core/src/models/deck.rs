//! Local deck model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Basic-land names that may legally repeat as separate lines in a deck file.
const BASIC_LAND_NAMES: [&str; 12] = [
    "Plains",
    "Island",
    "Swamp",
    "Mountain",
    "Forest",
    "Wastes",
    "Snow-Covered Plains",
    "Snow-Covered Island",
    "Snow-Covered Swamp",
    "Snow-Covered Mountain",
    "Snow-Covered Forest",
    "Snow-Covered Wastes",
];

/// Check whether a card name is a basic land
#[must_use]
pub fn is_basic_land(name: &str) -> bool {
    BASIC_LAND_NAMES
        .iter()
        .any(|basic| basic.eq_ignore_ascii_case(name.trim()))
}

/// Board a card line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Board {
    /// The 99
    Main,
    /// Command zone
    Commander,
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => write!(f, "main"),
            Self::Commander => write!(f, "commander"),
        }
    }
}

/// One entry in a deck: a card name with a quantity, assigned to a board.
///
/// Names are case-preserving; equality for sync purposes is decided by the
/// diff engine, which compares case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardLine {
    /// Card name as written in the deck file
    pub name: String,
    /// Number of copies, always >= 1
    pub quantity: u32,
    /// Board this line belongs to
    pub board: Board,
}

impl CardLine {
    /// Create a mainboard line
    #[must_use]
    pub fn main(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
            board: Board::Main,
        }
    }

    /// Create a command-zone line
    #[must_use]
    pub fn commander(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
            board: Board::Commander,
        }
    }
}

/// Remote deck visibility.
///
/// Only `Public` decks appear in the owner's listing queries, so the sync
/// engine always requests `Public` when creating decks; anything else would
/// orphan the deck from the engine's point of view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Unlisted,
    Private,
}

impl Visibility {
    /// Wire value used by the Moxfield API
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Unlisted => "unlisted",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "unlisted" => Ok(Self::Unlisted),
            "private" => Ok(Self::Private),
            other => Err(format!("unknown visibility: {other}")),
        }
    }
}

/// Local record of a deck's remote linkage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckMetadata {
    /// Moxfield public deck id, absent until the first successful sync.
    ///
    /// Once a deck is superseded this field points at the superseding deck's
    /// id; the old id is never reused.
    pub remote_id: Option<String>,
    /// Deck name shown on Moxfield
    pub display_name: String,
    /// Commander card name, drives `Board::Commander` assignment
    pub commander: Option<String>,
    /// Requested remote visibility
    pub visibility: Visibility,
}

/// One locally-authored deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckRecord {
    pub metadata: DeckMetadata,
    /// Card lines in file order. Never mutated by the sync engine.
    pub cards: Vec<CardLine>,
}

impl DeckRecord {
    /// Total number of physical cards across all lines
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.cards.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Whether this deck has ever been published remotely
    #[must_use]
    pub fn is_linked(&self) -> bool {
        self.metadata.remote_id.is_some()
    }
}
