//! Dialog session domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumString};

use crate::error::{PathwiseError, Result};

/// Slot requested while waiting for the user's email.
pub const SLOT_EMAIL: &str = "email";
/// Slot requested while waiting for the user's goal.
pub const SLOT_GOAL: &str = "goal";

/// A session's position in the dialog state machine.
///
/// Phases only move forward along `New -> WaitingEmail -> WaitingGoal -> Done`;
/// the single way back is an explicit reset to `New`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    #[default]
    New,
    WaitingEmail,
    WaitingGoal,
    Done,
}

impl Phase {
    /// Position of the phase along the fixed order.
    pub fn rank(self) -> u8 {
        match self {
            Phase::New => 0,
            Phase::WaitingEmail => 1,
            Phase::WaitingGoal => 2,
            Phase::Done => 3,
        }
    }

    /// Returns true if moving from `self` to `next` respects the monotonic order.
    ///
    /// Staying in place is allowed, and so is going back to `New` (reset).
    pub fn can_advance_to(self, next: Phase) -> bool {
        next == Phase::New || next.rank() >= self.rank()
    }

    /// Parses a stored phase name, reporting unknown names as corruption.
    pub fn parse_stored(user_id: &str, raw: &str) -> Result<Phase> {
        Phase::from_str(raw).map_err(|_| {
            PathwiseError::state_corruption(user_id, format!("unknown phase '{}'", raw))
        })
    }
}

/// Per-user dialog state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogSession {
    pub user_id: String,
    pub phase: Phase,
    /// Slots the state machine still needs from the user
    #[serde(default)]
    pub missing_slots: BTreeSet<String>,
    pub updated_at: DateTime<Utc>,
}

impl DialogSession {
    /// Creates a fresh session in the `New` phase with no missing slots.
    pub fn fresh(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            phase: Phase::New,
            missing_slots: BTreeSet::new(),
            updated_at: Utc::now(),
        }
    }

    /// Builds the slot set for a list of slot names.
    pub fn slots<I, S>(names: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().map(Into::into).collect()
    }
}
