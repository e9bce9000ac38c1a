//! In-memory draft storage, one wizard per sign-in session.

use dashmap::DashMap;
use std::time::{Duration, Instant};

use super::{WizardConfig, WizardState};

#[derive(Debug, Clone)]
struct DraftEntry {
    state: WizardState,
    touched: Instant,
}

/// Thread-safe wizard drafts keyed by session id
#[derive(Debug, Default)]
pub struct WizardStore {
    drafts: DashMap<String, DraftEntry>,
}

impl WizardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The session's current draft, or a fresh wizard when there is none
    /// (or the stored one was started for a different role).
    pub fn load(&self, session_id: &str, config: &WizardConfig) -> WizardState {
        match self.drafts.get(session_id) {
            Some(entry) if entry.state.config == *config && !entry.state.is_terminal() => {
                entry.state.clone()
            }
            _ => WizardState::new(config.clone()),
        }
    }

    /// Store the state after a transition. Finished wizards are dropped.
    pub fn save(&self, session_id: &str, state: WizardState) {
        if state.is_terminal() {
            self.drafts.remove(session_id);
            return;
        }

        self.drafts.insert(
            session_id.to_string(),
            DraftEntry {
                state,
                touched: Instant::now(),
            },
        );
    }

    /// Drop the session's draft. Returns whether one existed.
    pub fn discard(&self, session_id: &str) -> bool {
        self.drafts.remove(session_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// Remove drafts untouched for longer than `max_idle`
    pub fn cleanup_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let before = self.drafts.len();
        self.drafts
            .retain(|_, entry| now.duration_since(entry.touched) < max_idle);
        before.saturating_sub(self.drafts.len())
    }
}
