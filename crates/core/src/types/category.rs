//! Project categories.

use serde::{Deserialize, Serialize};

/// Error returned when a string is not one of the known categories.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid category: {0}")]
pub struct CategoryError(String);

/// The track a hackathon project is submitted under.
///
/// Serialized with the display spelling used by the voting UI (`AI`, `Web3`,
/// `IoT`, `Other`), which is also what the database stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProjectCategory {
    #[serde(rename = "AI")]
    Ai,
    Web3,
    #[serde(rename = "IoT")]
    Iot,
    Other,
}

impl ProjectCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 4] = [Self::Ai, Self::Web3, Self::Iot, Self::Other];

    /// The stored and displayed spelling of this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ai => "AI",
            Self::Web3 => "Web3",
            Self::Iot => "IoT",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for ProjectCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for ProjectCategory {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| CategoryError(s.to_owned()))
    }
}
