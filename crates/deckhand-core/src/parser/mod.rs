//! Deck-file parsing and metadata serialization.
//!
//! Deck files are markdown documents: a `# Title` heading, a metadata table
//! of `| **Key** | value |` rows, free-form prose sections, and one fenced
//! code block holding the card list as `N Card Name` lines. Parsing and
//! serialization are pure string transforms; reading and writing files is
//! the caller's responsibility.

use std::collections::HashSet;

use regex::{NoExpand, Regex};
use thiserror::Error;

use crate::models::{
    is_basic_land, Board, CardLine, DeckMetadata, DeckRecord, RemoteDeckSnapshot, Visibility,
};

/// Errors raised when a deck file cannot be turned into a `DeckRecord`
#[derive(Debug, Error)]
pub enum MalformedDeckError {
    #[error("Deck file has no fenced card-list block")]
    MissingCardBlock,

    #[error("Card line cannot be split into quantity and name: {0:?}")]
    BadCardLine(String),

    #[error("Duplicate card on {board} board: {name}")]
    DuplicateCard { name: String, board: Board },

    #[error("Card list is empty")]
    EmptyCardList,

    #[error("Deck is linked to remote id {0} but has no display name; an id without a name is not resyncable")]
    MissingDisplayName(String),
}

fn title_re() -> Regex {
    // Spaces only, not \s: the title must sit on the heading line itself,
    // so a bare `# ` heading never captures text from a later line.
    Regex::new(r"(?m)^#[ \t]+(.+)$").expect("Invalid regex")
}

fn meta_row_re() -> Regex {
    Regex::new(r"(?m)^\|\s*\*\*(.+?)\*\*\s*\|\s*(.*?)\s*\|\s*$").expect("Invalid regex")
}

fn fence_re() -> Regex {
    Regex::new(r"(?s)```[^\n]*\n(.*?)```").expect("Invalid regex")
}

fn card_line_re() -> Regex {
    Regex::new(r"^(\d+)\s+(.+)$").expect("Invalid regex")
}

fn moxfield_id_row_re() -> Regex {
    Regex::new(r"(?m)^\|\s*\*\*Moxfield\s+ID\*\*\s*\|\s*(.*?)\s*\|\s*$").expect("Invalid regex")
}

fn moxfield_name_row_re() -> Regex {
    Regex::new(r"(?m)^\|\s*\*\*Moxfield\s+Name\*\*\s*\|\s*(.*?)\s*\|\s*$").expect("Invalid regex")
}

/// Table values that mean "not set"
fn normalize_meta_value(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "|" {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a deck document into a canonical `DeckRecord`.
///
/// The first fenced code block is the card list; every non-empty line in it
/// must split into `(quantity, name)`. The line matching the `Commander`
/// metadata row is assigned to `Board::Commander`, everything else to
/// `Board::Main`. Non-basic names may not repeat within a board.
pub fn parse(document: &str) -> Result<DeckRecord, MalformedDeckError> {
    let title = title_re()
        .captures(document)
        .and_then(|captures| normalize_meta_value(&captures[1]));

    let mut commander = None;
    let mut remote_id = None;
    let mut moxfield_name = None;
    let mut visibility = Visibility::default();
    for captures in meta_row_re().captures_iter(document) {
        let key = captures[1].trim().to_lowercase();
        let value = normalize_meta_value(&captures[2]);
        match key.as_str() {
            "commander" => commander = value,
            "moxfield id" => remote_id = value,
            "moxfield name" => moxfield_name = value,
            "visibility" => {
                if let Some(raw) = value {
                    visibility = raw.parse().unwrap_or_default();
                }
            }
            _ => {}
        }
    }

    let display_name = match moxfield_name.or(title) {
        Some(name) => name,
        None => match remote_id {
            Some(id) => return Err(MalformedDeckError::MissingDisplayName(id)),
            // Unlinked and unnamed is tolerated; the CLI substitutes the
            // file stem before publishing.
            None => String::new(),
        },
    };

    let cards = parse_card_block(document, commander.as_deref())?;

    Ok(DeckRecord {
        metadata: DeckMetadata {
            remote_id,
            display_name,
            commander,
            visibility,
        },
        cards,
    })
}

fn parse_card_block(
    document: &str,
    commander: Option<&str>,
) -> Result<Vec<CardLine>, MalformedDeckError> {
    let block = fence_re()
        .captures(document)
        .ok_or(MalformedDeckError::MissingCardBlock)?;

    let line_re = card_line_re();
    let mut cards = Vec::new();
    let mut seen: HashSet<(Board, String)> = HashSet::new();

    for raw_line in block[1].lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let captures = line_re
            .captures(line)
            .ok_or_else(|| MalformedDeckError::BadCardLine(line.to_string()))?;
        let quantity: u32 = captures[1]
            .parse()
            .map_err(|_| MalformedDeckError::BadCardLine(line.to_string()))?;
        if quantity == 0 {
            return Err(MalformedDeckError::BadCardLine(line.to_string()));
        }
        let name = captures[2].trim().to_string();

        let board = match commander {
            Some(commander_name) if name.eq_ignore_ascii_case(commander_name) => Board::Commander,
            _ => Board::Main,
        };

        if !seen.insert((board, name.to_lowercase())) && !is_basic_land(&name) {
            return Err(MalformedDeckError::DuplicateCard { name, board });
        }

        cards.push(CardLine {
            name,
            quantity,
            board,
        });
    }

    if cards.is_empty() {
        return Err(MalformedDeckError::EmptyCardList);
    }
    Ok(cards)
}

/// Rewrite the metadata rows this module owns (`Moxfield ID`,
/// `Moxfield Name`) in a deck document, inserting them when absent.
///
/// Prose sections and all other table rows pass through byte-for-byte, so
/// `parse(update_metadata(doc, meta))` reflects exactly `meta`'s linkage
/// fields and nothing else changes.
#[must_use]
pub fn update_metadata(document: &str, metadata: &DeckMetadata) -> String {
    let Some(remote_id) = metadata.remote_id.as_deref() else {
        return document.to_string();
    };

    let id_row = format!("| **Moxfield ID** | {remote_id} |");
    let name_row = format!("| **Moxfield Name** | {} |", metadata.display_name);

    let id_re = moxfield_id_row_re();
    let mut text = if id_re.is_match(document) {
        id_re
            .replace(document, NoExpand(id_row.as_str()))
            .into_owned()
    } else {
        insert_metadata_row(document, &id_row)
    };

    let name_re = moxfield_name_row_re();
    if name_re.is_match(&text) {
        text = name_re
            .replace(&text, NoExpand(name_row.as_str()))
            .into_owned();
    } else {
        // Directly under the id row we just guaranteed exists.
        text = text.replacen(&id_row, &format!("{id_row}\n{name_row}"), 1);
    }

    text
}

/// Insert a row after the last existing metadata row, or synthesize a table
/// under the title when the document has none.
fn insert_metadata_row(document: &str, row: &str) -> String {
    if let Some(last) = meta_row_re().find_iter(document).last() {
        let mut text = String::with_capacity(document.len() + row.len() + 1);
        text.push_str(&document[..last.end()]);
        text.push('\n');
        text.push_str(row);
        text.push_str(&document[last.end()..]);
        return text;
    }

    let table = format!("\n| | |\n|---|---|\n{row}\n");
    if let Some(title) = title_re().find(document) {
        let mut text = String::with_capacity(document.len() + table.len());
        text.push_str(&document[..title.end()]);
        text.push('\n');
        text.push_str(&table);
        text.push_str(&document[title.end()..]);
        text
    } else {
        format!("{table}{document}")
    }
}

/// Render a fetched remote snapshot as a brand-new local deck document.
///
/// Commander lines come first in the card block, matching the hand-authored
/// file convention. `date` is the `YYYY-MM-DD` stamp for the `Date` row.
#[must_use]
pub fn render_document(name: &str, snapshot: &RemoteDeckSnapshot, date: &str) -> String {
    let commander_name = snapshot
        .board(Board::Commander)
        .next()
        .map(|card| card.name.clone())
        .unwrap_or_default();

    let mut lines = vec![
        format!("# {name}"),
        String::new(),
        "| | |".to_string(),
        "|---|---|".to_string(),
        format!("| **Commander** | {commander_name} |"),
        format!("| **Date** | {date} |"),
        format!("| **Moxfield ID** | {} |", snapshot.public_id),
        format!("| **Moxfield Name** | {name} |"),
        String::new(),
        "## Strategy".to_string(),
        String::new(),
        "_Imported from Moxfield - add strategy notes here._".to_string(),
        String::new(),
        "## Decklist".to_string(),
        String::new(),
        "```".to_string(),
    ];
    for card in snapshot.board(Board::Commander) {
        lines.push(format!("{} {}", card.quantity, card.name));
    }
    for card in snapshot.board(Board::Main) {
        lines.push(format!("{} {}", card.quantity, card.name));
    }
    lines.push("```".to_string());
    lines.push(String::new());
    lines.join("\n")
}

/// Convert a deck name into a filename slug
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut previous_dash = true;
    for ch in name.chars() {
        if ch == '\'' || ch == '\u{2019}' {
            continue;
        }
        if ch.is_ascii_alphanumeric() {
            slug.extend(ch.to_lowercase());
            previous_dash = false;
        } else if !previous_dash {
            slug.push('-');
            previous_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::RemoteCard;

    const SAMPLE: &str = "# Hakbal Merfolk\n\
\n\
| | |\n\
|---|---|\n\
| **Commander** | Hakbal of the Surging Soul |\n\
| **Date** | 2026-08-01 |\n\
\n\
## Strategy\n\
\n\
Ramp into merfolk beats.\n\
\n\
## Decklist\n\
\n\
```\n\
1 Hakbal of the Surging Soul\n\
1 Sol Ring\n\
10 Forest\n\
8 Island\n\
```\n";

    #[test]
    fn parse_reads_title_metadata_and_cards() {
        let record = parse(SAMPLE).unwrap();
        assert_eq!(record.metadata.display_name, "Hakbal Merfolk");
        assert_eq!(
            record.metadata.commander.as_deref(),
            Some("Hakbal of the Surging Soul")
        );
        assert_eq!(record.metadata.remote_id, None);
        assert_eq!(record.cards.len(), 4);
        assert_eq!(record.cards[0].board, Board::Commander);
        assert_eq!(record.cards[1].board, Board::Main);
        assert_eq!(record.total_quantity(), 20);
    }

    #[test]
    fn parse_reads_stored_remote_linkage() {
        let document = SAMPLE.replace(
            "| **Date** | 2026-08-01 |",
            "| **Date** | 2026-08-01 |\n| **Moxfield ID** | 296iUZy |\n| **Moxfield Name** | Hakbal v2 |",
        );
        let record = parse(&document).unwrap();
        assert_eq!(record.metadata.remote_id.as_deref(), Some("296iUZy"));
        assert_eq!(record.metadata.display_name, "Hakbal v2");
    }

    #[test]
    fn blank_title_heading_yields_no_name() {
        let record = parse("# \n\n```\n1 Sol Ring\n```\n").unwrap();
        assert_eq!(record.metadata.display_name, "");

        // The heading must not reach across the blank line and claim the
        // fence (or any other later line) as the deck name.
        let record = parse("# \n\nSome prose.\n\n```\n1 Sol Ring\n```\n").unwrap();
        assert_eq!(record.metadata.display_name, "");
    }

    #[test]
    fn parse_rejects_unsplittable_card_line() {
        let document = SAMPLE.replace("1 Sol Ring", "Sol Ring x1");
        let error = parse(&document).unwrap_err();
        assert!(matches!(error, MalformedDeckError::BadCardLine(_)));
    }

    #[test]
    fn parse_rejects_zero_quantity() {
        let document = SAMPLE.replace("1 Sol Ring", "0 Sol Ring");
        assert!(matches!(
            parse(&document).unwrap_err(),
            MalformedDeckError::BadCardLine(_)
        ));
    }

    #[test]
    fn parse_rejects_duplicate_non_basic() {
        let document = SAMPLE.replace("10 Forest", "1 Sol Ring");
        let error = parse(&document).unwrap_err();
        assert!(matches!(
            error,
            MalformedDeckError::DuplicateCard { name, board: Board::Main } if name == "Sol Ring"
        ));
    }

    #[test]
    fn parse_allows_repeated_basic_land_lines() {
        let document = SAMPLE.replace("8 Island", "4 Forest\n4 forest");
        let record = parse(&document).unwrap();
        assert_eq!(record.total_quantity(), 20);
    }

    #[test]
    fn parse_requires_a_card_block() {
        let document = SAMPLE.split("```").next().unwrap().to_string();
        assert!(matches!(
            parse(&document).unwrap_err(),
            MalformedDeckError::MissingCardBlock
        ));
    }

    #[test]
    fn parse_rejects_empty_card_block() {
        let document = "# Empty\n\n```\n\n```\n";
        assert!(matches!(
            parse(document).unwrap_err(),
            MalformedDeckError::EmptyCardList
        ));
    }

    #[test]
    fn parse_rejects_linked_deck_without_name() {
        let document = "| **Moxfield ID** | 296iUZy |\n\n```\n1 Sol Ring\n```\n";
        let error = parse(document).unwrap_err();
        assert!(matches!(
            error,
            MalformedDeckError::MissingDisplayName(id) if id == "296iUZy"
        ));
    }

    #[test]
    fn update_metadata_inserts_rows_after_existing_table() {
        let metadata = DeckMetadata {
            remote_id: Some("X9".to_string()),
            display_name: "Hakbal Merfolk".to_string(),
            commander: None,
            visibility: Visibility::Public,
        };
        let updated = update_metadata(SAMPLE, &metadata);

        assert!(updated.contains("| **Moxfield ID** | X9 |"));
        assert!(updated.contains("| **Moxfield Name** | Hakbal Merfolk |"));
        // Prose untouched
        assert!(updated.contains("Ramp into merfolk beats."));

        let record = parse(&updated).unwrap();
        assert_eq!(record.metadata.remote_id.as_deref(), Some("X9"));
    }

    #[test]
    fn update_metadata_rewrites_existing_rows_in_place() {
        let metadata = DeckMetadata {
            remote_id: Some("X9".to_string()),
            display_name: "Hakbal Merfolk".to_string(),
            commander: None,
            visibility: Visibility::Public,
        };
        let once = update_metadata(SAMPLE, &metadata);

        let superseded = DeckMetadata {
            remote_id: Some("Y2".to_string()),
            ..metadata
        };
        let twice = update_metadata(&once, &superseded);

        assert!(twice.contains("| **Moxfield ID** | Y2 |"));
        assert!(!twice.contains("| **Moxfield ID** | X9 |"));
        assert_eq!(twice.matches("**Moxfield ID**").count(), 1);
        assert_eq!(twice.matches("**Moxfield Name**").count(), 1);
    }

    #[test]
    fn update_metadata_without_remote_id_is_identity() {
        let metadata = DeckMetadata {
            remote_id: None,
            display_name: "Hakbal Merfolk".to_string(),
            commander: None,
            visibility: Visibility::Public,
        };
        assert_eq!(update_metadata(SAMPLE, &metadata), SAMPLE);
    }

    #[test]
    fn rendered_document_parses_back() {
        let snapshot = RemoteDeckSnapshot {
            public_id: "296iUZy".to_string(),
            internal_id: "JrQQDg".to_string(),
            version: 3,
            cards: vec![
                RemoteCard {
                    card_id: "c1".to_string(),
                    name: "Hakbal of the Surging Soul".to_string(),
                    quantity: 1,
                    board: Board::Commander,
                },
                RemoteCard {
                    card_id: "c2".to_string(),
                    name: "Forest".to_string(),
                    quantity: 12,
                    board: Board::Main,
                },
            ],
        };

        let document = render_document("Hakbal Merfolk", &snapshot, "2026-08-25");
        let record = parse(&document).unwrap();

        assert_eq!(record.metadata.remote_id.as_deref(), Some("296iUZy"));
        assert_eq!(record.metadata.display_name, "Hakbal Merfolk");
        assert_eq!(record.cards[0].board, Board::Commander);
        assert_eq!(record.total_quantity(), 13);
    }

    #[test]
    fn slugify_flattens_names() {
        assert_eq!(slugify("Hakbal's Merfolk!"), "hakbals-merfolk");
        assert_eq!(slugify("  Ob Nixilis // Captive "), "ob-nixilis-captive");
        assert_eq!(slugify("ALL CAPS"), "all-caps");
    }
}
