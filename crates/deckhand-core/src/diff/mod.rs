//! Order-independent deck equality.
//!
//! Both sides are projected into a canonical form - quantities summed per
//! (board, lowercased name) - and compared for exact equality. Line order,
//! basic-land line splitting, and the remote-only card ids never affect the
//! result. This is the only signal the orchestrator uses to decide whether a
//! remote write is needed, so it must stay total and deterministic.

use std::collections::BTreeMap;

use crate::models::{Board, DeckRecord, RemoteDeckSnapshot};

/// A card list reduced to one summed quantity per (board, name) pair
pub type CanonicalDeck = BTreeMap<(Board, String), u64>;

/// Whether the local record and the remote snapshot describe the same deck
#[must_use]
pub fn equivalent(local: &DeckRecord, remote: &RemoteDeckSnapshot) -> bool {
    canonicalize_local(local) == canonicalize_remote(remote)
}

/// Canonical form of a local deck record
#[must_use]
pub fn canonicalize_local(record: &DeckRecord) -> CanonicalDeck {
    let mut canonical = CanonicalDeck::new();
    for line in &record.cards {
        *canonical
            .entry((line.board, line.name.to_lowercase()))
            .or_insert(0) += u64::from(line.quantity);
    }
    canonical
}

/// Canonical form of a remote snapshot, ignoring server-side card ids
#[must_use]
pub fn canonicalize_remote(snapshot: &RemoteDeckSnapshot) -> CanonicalDeck {
    let mut canonical = CanonicalDeck::new();
    for card in &snapshot.cards {
        *canonical
            .entry((card.board, card.name.to_lowercase()))
            .or_insert(0) += u64::from(card.quantity);
    }
    canonical
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{CardLine, DeckMetadata, RemoteCard};

    fn local(cards: Vec<CardLine>) -> DeckRecord {
        DeckRecord {
            metadata: DeckMetadata::default(),
            cards,
        }
    }

    fn remote(cards: Vec<(&str, u32, Board)>) -> RemoteDeckSnapshot {
        RemoteDeckSnapshot {
            public_id: "296iUZy".to_string(),
            internal_id: "JrQQDg".to_string(),
            version: 1,
            cards: cards
                .into_iter()
                .enumerate()
                .map(|(index, (name, quantity, board))| RemoteCard {
                    card_id: format!("server-{index}"),
                    name: name.to_string(),
                    quantity,
                    board,
                })
                .collect(),
        }
    }

    #[test]
    fn identical_decks_are_equivalent() {
        let record = local(vec![
            CardLine::commander("Hakbal of the Surging Soul", 1),
            CardLine::main("Sol Ring", 1),
            CardLine::main("Forest", 12),
        ]);
        let snapshot = remote(vec![
            ("Hakbal of the Surging Soul", 1, Board::Commander),
            ("Sol Ring", 1, Board::Main),
            ("Forest", 12, Board::Main),
        ]);
        assert!(equivalent(&record, &snapshot));
    }

    #[test]
    fn line_order_is_ignored() {
        let record = local(vec![
            CardLine::main("Forest", 12),
            CardLine::main("Sol Ring", 1),
        ]);
        let snapshot = remote(vec![
            ("Sol Ring", 1, Board::Main),
            ("Forest", 12, Board::Main),
        ]);
        assert!(equivalent(&record, &snapshot));
    }

    #[test]
    fn split_basic_land_lines_sum_to_the_remote_total() {
        let record = local(vec![
            CardLine::main("Forest", 5),
            CardLine::main("forest", 4),
            CardLine::main("Forest", 3),
        ]);
        let snapshot = remote(vec![("Forest", 12, Board::Main)]);
        assert!(equivalent(&record, &snapshot));
    }

    #[test]
    fn name_comparison_is_case_insensitive() {
        let record = local(vec![CardLine::main("sol ring", 1)]);
        let snapshot = remote(vec![("Sol Ring", 1, Board::Main)]);
        assert!(equivalent(&record, &snapshot));
    }

    #[test]
    fn quantity_difference_breaks_equivalence() {
        let record = local(vec![CardLine::main("Forest", 11)]);
        let snapshot = remote(vec![("Forest", 12, Board::Main)]);
        assert!(!equivalent(&record, &snapshot));
    }

    #[test]
    fn missing_card_breaks_equivalence() {
        let record = local(vec![
            CardLine::main("Forest", 12),
            CardLine::main("Sol Ring", 1),
        ]);
        let snapshot = remote(vec![("Forest", 12, Board::Main)]);
        assert!(!equivalent(&record, &snapshot));
    }

    #[test]
    fn board_placement_matters() {
        let record = local(vec![CardLine::commander("Hakbal of the Surging Soul", 1)]);
        let snapshot = remote(vec![("Hakbal of the Surging Soul", 1, Board::Main)]);
        assert!(!equivalent(&record, &snapshot));
    }

    #[test]
    fn server_card_ids_are_ignored() {
        let record = local(vec![CardLine::main("Sol Ring", 1)]);
        let mut snapshot = remote(vec![("Sol Ring", 1, Board::Main)]);
        snapshot.cards[0].card_id = "a-completely-different-id".to_string();
        assert!(equivalent(&record, &snapshot));
    }

    #[test]
    fn canonical_form_merges_case_variants() {
        let record = local(vec![
            CardLine::main("Forest", 5),
            CardLine::main("FOREST", 7),
        ]);
        let canonical = canonicalize_local(&record);
        assert_eq!(
            canonical.get(&(Board::Main, "forest".to_string())),
            Some(&12)
        );
    }
}
