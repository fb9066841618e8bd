//! Coupon email registration types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use hackvote_core::{CouponEmailId, Email};

/// An opt-in contact record for coupon distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CouponEmail {
    pub id: CouponEmailId,
    pub email: Email,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A registration with a normalized email, ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCouponEmail {
    pub email: Email,
    pub name: Option<String>,
}

impl NewCouponEmail {
    /// Materialize the registration with a fresh ID and creation time.
    #[must_use]
    pub fn into_registration(self, created_at: DateTime<Utc>) -> CouponEmail {
        CouponEmail {
            id: CouponEmailId::generate(),
            email: self.email,
            name: self.name,
            created_at,
        }
    }
}
