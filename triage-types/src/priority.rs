//! Bounded urgency score.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Urgency score in the closed range `[Priority::MIN, Priority::MAX]`.
///
/// Higher means more urgent. A `Priority` can only be built through
/// [`Priority::new`], so holding one is proof the range check passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Priority(u8);

impl Priority {
    /// Lowest accepted score.
    pub const MIN: u8 = 1;
    /// Highest accepted score.
    pub const MAX: u8 = 10;

    /// Validates a raw score.
    pub fn new(value: i64) -> Result<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            // In range, so the narrowing cannot truncate.
            Ok(Self(value as u8))
        } else {
            Err(Error::InvalidPriority(format!(
                "{value} is outside {}..={}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    /// Returns the score.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Priority {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
