//! Owned patient snapshot.

use crate::{PatientId, Priority};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A patient as seen from outside the queue.
///
/// The queue hands these out by value; mutating a snapshot never affects
/// the queue and later queue updates never show up in an earlier snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub priority: Priority,
    pub label: String,
}

impl Patient {
    #[must_use]
    pub fn new(id: PatientId, priority: Priority, label: impl Into<String>) -> Self {
        Self {
            id,
            priority,
            label: label.into(),
        }
    }
}

/// Renders as `id|priority|label`.
impl fmt::Display for Patient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.id, self.priority, self.label)
    }
}
