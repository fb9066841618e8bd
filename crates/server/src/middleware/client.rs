//! Client identity extractor.
//!
//! Votes are attributed to the address reported by the fronting proxy. The
//! first `x-forwarded-for` entry wins, then `x-real-ip`; a request with
//! neither is attributed to `"unknown"`, and all such requests share one
//! voter identity.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{
        HeaderMap,
        header::{self, AsHeaderName},
        request::Parts,
    },
};

use hackvote_core::VoterIp;

/// Header set by proxies with the chain of client addresses.
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Header set by proxies with the single client address.
pub const REAL_IP_HEADER: &str = "x-real-ip";

/// Who sent the request, as far as the proxy headers tell.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(client: ClientInfo) -> impl IntoResponse {
///     format!("hello {}", client.voter_ip)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ClientInfo {
    /// Voter identity derived from proxy headers.
    pub voter_ip: VoterIp,
    /// Raw `User-Agent` header, if present.
    pub user_agent: Option<String>,
}

impl ClientInfo {
    /// Derive client info from request headers.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            voter_ip: VoterIp::from_headers(
                header_str(headers, FORWARDED_FOR_HEADER),
                header_str(headers, REAL_IP_HEADER),
            ),
            user_agent: header_str(headers, header::USER_AGENT)
                .map(str::trim)
                .filter(|ua| !ua.is_empty())
                .map(str::to_owned),
        }
    }
}

fn header_str<K: AsHeaderName>(headers: &HeaderMap, name: K) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(*value));
        }
        map
    }

    #[test]
    fn test_forwarded_for_takes_first_entry() {
        let info = ClientInfo::from_headers(&headers(&[
            ("x-forwarded-for", " 203.0.113.7 , 10.0.0.1"),
            ("x-real-ip", "198.51.100.2"),
        ]));
        assert_eq!(info.voter_ip.as_str(), "203.0.113.7");
    }

    #[test]
    fn test_real_ip_fallback() {
        let info = ClientInfo::from_headers(&headers(&[("x-real-ip", "198.51.100.2")]));
        assert_eq!(info.voter_ip.as_str(), "198.51.100.2");
    }

    #[test]
    fn test_no_proxy_headers_is_unknown() {
        let info = ClientInfo::from_headers(&HeaderMap::new());
        assert!(info.voter_ip.is_unknown());
        assert!(info.user_agent.is_none());
    }

    #[test]
    fn test_user_agent_captured() {
        let info = ClientInfo::from_headers(&headers(&[("user-agent", "Mozilla/5.0")]));
        assert_eq!(info.user_agent.as_deref(), Some("Mozilla/5.0"));
    }
}
