//! Voter identity as seen by the vote acceptance rule.

use serde::{Deserialize, Serialize};

/// The network identity a vote is attributed to.
///
/// Derived from proxy headers: the first entry of `x-forwarded-for`, else
/// `x-real-ip`, else the literal [`VoterIp::UNKNOWN`]. The value is stored
/// verbatim; it is not validated as an IP address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterIp(String);

impl VoterIp {
    /// Recorded when no proxy header identifies the client.
    pub const UNKNOWN: &'static str = "unknown";

    /// Resolve the voter IP from the raw header values.
    #[must_use]
    pub fn from_headers(forwarded_for: Option<&str>, real_ip: Option<&str>) -> Self {
        let forwarded = forwarded_for
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|first| !first.is_empty());

        let real = real_ip.map(str::trim).filter(|ip| !ip.is_empty());

        forwarded
            .or(real)
            .map_or_else(Self::unknown, |ip| Self(ip.to_owned()))
    }

    /// The placeholder identity used when no header is present.
    #[must_use]
    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_owned())
    }

    /// Whether this is the placeholder identity.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }

    /// Returns the IP as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VoterIp {
    fn from(ip: &str) -> Self {
        Self(ip.to_owned())
    }
}

impl std::fmt::Display for VoterIp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
