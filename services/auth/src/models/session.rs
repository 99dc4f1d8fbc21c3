//! Session lifecycle phase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the application session stands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No identity user
    #[default]
    SignedOut,
    /// Identity user present, backend session not (yet) established
    Pending,
    /// Backend signin succeeded
    Established,
    /// Identity login succeeded but backend signin failed; the user has to
    /// sign in again
    Stranded,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::SignedOut => "signed_out",
            SessionPhase::Pending => "pending",
            SessionPhase::Established => "established",
            SessionPhase::Stranded => "stranded",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
