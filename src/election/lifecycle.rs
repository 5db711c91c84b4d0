use serde::{Deserialize, Serialize};
use std::fmt;
use crate::utils::{ElectionError, Result};

/// `created --start--> active --end--> ended`. `ended` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElectionState {
    /// Registration open, casting closed.
    Created,
    /// Casting and mining open, candidate list frozen.
    Active,
    /// Read and verify only.
    Ended,
}

impl ElectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Active => "active",
            Self::Ended => "ended",
        }
    }

    pub fn start(self) -> Result<Self> {
        match self {
            Self::Created => Ok(Self::Active),
            from => Err(invalid(from, "start")),
        }
    }

    pub fn end(self) -> Result<Self> {
        match self {
            Self::Active => Ok(Self::Ended),
            from => Err(invalid(from, "end")),
        }
    }

    pub fn require_active(self, what: &str) -> Result<()> {
        if self != Self::Active {
            return Err(ElectionError::InvalidState(format!("{what} requires an active election (election is {self})")));
        }
        Ok(())
    }
}

fn invalid(from: ElectionState, action: &str) -> ElectionError {
    ElectionError::InvalidTransition { from: from.to_string(), action: action.to_string() }
}

impl fmt::Display for ElectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
