//! # AnsweredFlag table
//!
//! `ran_name -> answered` for one procedure kind. Every read-modify-write
//! happens under the single table lock:
//!
//! - `arm` inserts `false` when a request has been sent,
//! - `mark_answered` flips it to `true` and wakes the node's timer,
//! - `resolve` removes the entry. Only the expiry timer calls it, so each
//!   entry is removed exactly once.
//!
//! An answered entry may outlive its procedure until the timer task runs.
//! A new `arm` for the node replaces it; each arm carries a generation so
//! the old timer's `resolve` cannot remove its successor.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tracing::debug;

use crate::error::LifecycleError;

/// What `mark_answered` found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// First answer for an armed entry. The caller owns the state change.
    Marked,
    /// The entry was already answered and its timer has not removed it yet.
    Duplicate,
    /// No entry: the timer already expired or nothing was ever armed.
    Late,
}

impl AnswerOutcome {
    pub fn is_first_answer(self) -> bool {
        self == Self::Marked
    }
}

/// Handle returned by `arm`; the timer waits on `notify` and resolves with
/// `generation`.
#[derive(Debug, Clone)]
pub struct ArmedFlag {
    pub notify: Arc<Notify>,
    pub generation: u64,
}

struct Entry {
    answered: bool,
    generation: u64,
    notify: Arc<Notify>,
}

#[derive(Default)]
struct Entries {
    by_node: HashMap<String, Entry>,
    next_generation: u64,
}

pub struct AnsweredTable {
    label: &'static str,
    entries: Mutex<Entries>,
}

impl AnsweredTable {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            entries: Mutex::new(Entries::default()),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Insert `(ran_name -> false)`.
    ///
    /// Fails if the node has an unanswered entry. An answered entry whose
    /// timer has not resolved yet is replaced.
    pub fn arm(&self, ran_name: &str) -> Result<ArmedFlag, LifecycleError> {
        let mut entries = self.entries.lock();
        if let Some(existing) = entries.by_node.get(ran_name) {
            if !existing.answered {
                return Err(LifecycleError::AlreadyArmed {
                    ran_name: ran_name.to_string(),
                });
            }
            debug!(
                table = self.label,
                ran_name,
                generation = existing.generation,
                "Replacing answered flag not yet resolved by its timer"
            );
        }

        entries.next_generation += 1;
        let generation = entries.next_generation;
        let notify = Arc::new(Notify::new());
        entries.by_node.insert(
            ran_name.to_string(),
            Entry {
                answered: false,
                generation,
                notify: notify.clone(),
            },
        );
        debug!(table = self.label, ran_name, generation, "Answered flag armed");
        Ok(ArmedFlag { notify, generation })
    }

    /// Record that an answer arrived for `ran_name`.
    pub fn mark_answered(&self, ran_name: &str) -> AnswerOutcome {
        let mut entries = self.entries.lock();
        match entries.by_node.get_mut(ran_name) {
            None => AnswerOutcome::Late,
            Some(entry) if entry.answered => AnswerOutcome::Duplicate,
            Some(entry) => {
                entry.answered = true;
                // Stores a permit if the timer is not waiting yet.
                entry.notify.notify_one();
                AnswerOutcome::Marked
            }
        }
    }

    /// Check-and-remove the entry armed as `generation`.
    ///
    /// Returns the flag it held, or `None` if absent. A superseded entry was
    /// answered before it was replaced, so it resolves as `Some(true)` and
    /// the successor stays in place.
    pub fn resolve(&self, ran_name: &str, generation: u64) -> Option<bool> {
        let mut entries = self.entries.lock();
        match entries.by_node.get(ran_name) {
            None => None,
            Some(entry) if entry.generation != generation => Some(true),
            Some(_) => entries.by_node.remove(ran_name).map(|entry| entry.answered),
        }
    }

    pub fn is_armed(&self, ran_name: &str) -> bool {
        self.entries.lock().by_node.contains_key(ran_name)
    }

    pub fn is_answered(&self, ran_name: &str) -> Option<bool> {
        self.entries.lock().by_node.get(ran_name).map(|e| e.answered)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().by_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().by_node.is_empty()
    }
}
