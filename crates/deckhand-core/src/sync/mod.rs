//! Sync decision policy and orchestration.
//!
//! Per deck the policy is create / skip / supersede: a deck with no recorded
//! remote id is published for the first time; a linked deck whose remote
//! snapshot is equivalent is left alone; a linked deck that drifted gets a
//! brand-new remote deck and the old one is abandoned in place. The remote
//! API cannot replace or delete existing card lines, so in-place correction
//! is not an option - correctness of the linked deck wins over tidiness of
//! the remote account.
//!
//! This module is the only writer to the remote service and the only code
//! that mutates local deck metadata (never card lines).

use crate::client::{ClientError, DeckHost};
use crate::diff;
use crate::models::{DeckRecord, SyncOutcome, Visibility};

/// Deck format requested for every created deck
pub const DECK_FORMAT: &str = "commander";

/// Decision for one deck, computed without performing any writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncPlan {
    /// No remote id recorded; a first-time publish is needed
    Create,
    /// Remote snapshot is equivalent; nothing to do
    Unchanged,
    /// Remote snapshot drifted; a new deck would supersede `orphaned_id`
    Supersede { orphaned_id: String },
}

/// Compute the sync decision for a deck without writing anything.
///
/// Backs `--dry-run`. Errors are surfaced raw so the caller can distinguish
/// batch-fatal auth failures from per-deck ones.
pub async fn plan_deck<H: DeckHost>(
    host: &H,
    record: &DeckRecord,
) -> Result<SyncPlan, ClientError> {
    let Some(remote_id) = record.metadata.remote_id.as_deref() else {
        return Ok(SyncPlan::Create);
    };

    let snapshot = host.fetch_deck(remote_id).await?;
    if diff::equivalent(record, &snapshot) {
        Ok(SyncPlan::Unchanged)
    } else {
        Ok(SyncPlan::Supersede {
            orphaned_id: remote_id.to_string(),
        })
    }
}

/// Reconcile one deck against the remote service.
///
/// Returns `Err` only for `ClientError::Auth`, which must abort the whole
/// batch (every later call would fail identically); all other failures fold
/// into the returned `SyncOutcome` and never poison the rest of a run. Note
/// that an auth failure can strike after creation succeeded, in which case
/// the record's metadata already carries the new remote id and must still be
/// persisted by the caller.
///
/// For a single deck the ordering guarantee is create happens-before import
/// happens-before the metadata update of `record`.
pub async fn sync_deck<H: DeckHost>(
    host: &H,
    record: &mut DeckRecord,
) -> Result<SyncOutcome, ClientError> {
    let Some(remote_id) = record.metadata.remote_id.clone() else {
        return publish_new(host, record, None).await;
    };

    let snapshot = match host.fetch_deck(&remote_id).await {
        Ok(snapshot) => snapshot,
        Err(ClientError::Auth(detail)) => return Err(ClientError::Auth(detail)),
        Err(ClientError::NotFound(_)) => {
            return Ok(SyncOutcome::Failed {
                detail: format!(
                    "remote deck {remote_id} no longer exists; clear the stored Moxfield ID \
                     to publish this deck as a new one"
                ),
            })
        }
        Err(error) => {
            return Ok(SyncOutcome::Failed {
                detail: error.to_string(),
            })
        }
    };

    if diff::equivalent(record, &snapshot) {
        return Ok(SyncOutcome::Unchanged);
    }

    publish_new(host, record, Some(remote_id)).await
}

/// Create a new remote deck and import the full local card list into it.
///
/// When `superseding` names a previously linked deck, that deck is left in
/// place remotely and reported as orphaned; its id is never reused.
async fn publish_new<H: DeckHost>(
    host: &H,
    record: &mut DeckRecord,
    superseding: Option<String>,
) -> Result<SyncOutcome, ClientError> {
    let created = match host
        .create_deck(&record.metadata.display_name, DECK_FORMAT, Visibility::Public)
        .await
    {
        Ok(created) => created,
        Err(ClientError::Auth(detail)) => return Err(ClientError::Auth(detail)),
        Err(error) => {
            return Ok(SyncOutcome::Failed {
                detail: error.to_string(),
            })
        }
    };

    // The remote deck exists from this point on; record the id even if the
    // import below fails, so the deck is never silently orphaned.
    record.metadata.remote_id = Some(created.public_id.clone());

    match host.import_cards(&created.internal_id, &record.cards).await {
        Ok(_) => Ok(match superseding {
            Some(orphaned_id) => SyncOutcome::Superseded {
                remote_id: created.public_id,
                orphaned_id,
            },
            None => SyncOutcome::Created {
                remote_id: created.public_id,
            },
        }),
        Err(ClientError::Auth(detail)) => Err(ClientError::Auth(detail)),
        Err(error) => Ok(SyncOutcome::Partial {
            remote_id: created.public_id,
            detail: error.to_string(),
        }),
    }
}

/// Per-deck outcomes of one batch run
#[derive(Debug, Default)]
pub struct SyncReport {
    entries: Vec<SyncReportEntry>,
}

#[derive(Debug)]
pub struct SyncReportEntry {
    pub deck: String,
    pub outcome: SyncOutcome,
}

impl SyncReport {
    pub fn record(&mut self, deck: impl Into<String>, outcome: SyncOutcome) {
        self.entries.push(SyncReportEntry {
            deck: deck.into(),
            outcome,
        });
    }

    #[must_use]
    pub fn entries(&self) -> &[SyncReportEntry] {
        &self.entries
    }

    /// Whether every processed deck ended in a success state
    #[must_use]
    pub fn all_clean(&self) -> bool {
        self.entries.iter().all(|entry| entry.outcome.is_success())
    }

    /// Remote ids abandoned by supersede outcomes in this run. These decks
    /// still exist remotely; the operator may delete them by hand.
    #[must_use]
    pub fn orphaned_ids(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|entry| match &entry.outcome {
                SyncOutcome::Superseded { orphaned_id, .. } => Some(orphaned_id.as_str()),
                _ => None,
            })
            .collect()
    }
}
