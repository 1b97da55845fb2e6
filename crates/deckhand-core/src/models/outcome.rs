//! Per-deck reconciliation outcome

use serde::Serialize;

/// Result of one reconciliation attempt for one deck.
///
/// Exactly one variant per attempt. `Partial` is the terminal state for
/// "deck created remotely but the card import failed": the new remote id is
/// recorded so the deck is not orphaned, but the attempt still counts as a
/// failure so the operator retries the import instead of re-creating a
/// duplicate empty deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// First-time publish succeeded
    Created { remote_id: String },
    /// Remote already matches the local list; no writes were issued
    Unchanged,
    /// A new remote deck replaced the linked one; the old deck remains on
    /// the remote side, unreferenced
    Superseded {
        remote_id: String,
        orphaned_id: String,
    },
    /// Deck was created remotely but the import failed; `remote_id` is
    /// recorded locally
    Partial { remote_id: String, detail: String },
    /// Nothing was written remotely for this deck
    Failed { detail: String },
}

impl SyncOutcome {
    /// Short state tag for summary output
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Unchanged => "unchanged",
            Self::Superseded { .. } => "superseded",
            Self::Partial { .. } => "partial",
            Self::Failed { .. } => "failed",
        }
    }

    /// Whether this outcome counts toward a clean (exit code 0) run
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(
            self,
            Self::Created { .. } | Self::Unchanged | Self::Superseded { .. }
        )
    }

    /// Remote id recorded by this attempt, if any
    #[must_use]
    pub fn recorded_remote_id(&self) -> Option<&str> {
        match self {
            Self::Created { remote_id }
            | Self::Superseded { remote_id, .. }
            | Self::Partial { remote_id, .. } => Some(remote_id),
            Self::Unchanged | Self::Failed { .. } => None,
        }
    }

    /// Concrete next action for the operator, for non-success outcomes
    #[must_use]
    pub fn next_action(&self) -> Option<String> {
        match self {
            Self::Partial { remote_id, .. } => Some(format!(
                "re-run sync to retry the card import into deck {remote_id}"
            )),
            Self::Failed { detail } => Some(format!("fix and re-run: {detail}")),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_covers_exactly_the_clean_states() {
        assert!(SyncOutcome::Created {
            remote_id: "X9".into()
        }
        .is_success());
        assert!(SyncOutcome::Unchanged.is_success());
        assert!(SyncOutcome::Superseded {
            remote_id: "Y2".into(),
            orphaned_id: "X9".into()
        }
        .is_success());
        assert!(!SyncOutcome::Partial {
            remote_id: "X9".into(),
            detail: "import timed out".into()
        }
        .is_success());
        assert!(!SyncOutcome::Failed {
            detail: "parse error".into()
        }
        .is_success());
    }

    #[test]
    fn partial_keeps_the_recorded_remote_id() {
        let outcome = SyncOutcome::Partial {
            remote_id: "X9".into(),
            detail: "import timed out".into(),
        };
        assert_eq!(outcome.recorded_remote_id(), Some("X9"));
        assert_eq!(outcome.label(), "partial");
    }

    #[test]
    fn failed_carries_no_remote_id() {
        let outcome = SyncOutcome::Failed {
            detail: "boom".into(),
        };
        assert_eq!(outcome.recorded_remote_id(), None);
    }
}
