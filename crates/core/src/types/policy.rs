//! Duplicate-vote policy.

use serde::{Deserialize, Serialize};

/// How repeated votes from the same voter for the same project are treated.
///
/// A deployment runs under exactly one policy; it is never chosen per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VotePolicy {
    /// At most one vote per (project, voter IP); repeats are rejected.
    #[default]
    Strict,
    /// Every vote is recorded; the voter IP is kept for analytics only.
    Permissive,
}

impl std::fmt::Display for VotePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Permissive => write!(f, "permissive"),
        }
    }
}

impl std::str::FromStr for VotePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "permissive" => Ok(Self::Permissive),
            _ => Err(format!("invalid vote policy: {s}")),
        }
    }
}
