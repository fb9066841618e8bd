//! Coupon email registration rule.

use thiserror::Error;
use tracing::instrument;

use hackvote_core::{Email, EmailError};

use crate::db::{RepositoryError, VoteStore};
use crate::models::{CouponEmail, NewCouponEmail};

/// Errors that can occur while registering a coupon email.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The request carried no email.
    #[error("Email is required")]
    MissingEmail,

    /// The email failed the shape check.
    #[error("Invalid email format")]
    InvalidEmail(#[from] EmailError),

    /// The normalized email is already registered.
    #[error("This email is already registered")]
    AlreadyRegistered,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// A registration as submitted by a client.
#[derive(Debug, Clone, Default)]
pub struct RegistrationRequest {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Coupon email registration service.
pub struct RegistrationService<'a> {
    store: &'a dyn VoteStore,
}

impl<'a> RegistrationService<'a> {
    /// Create a registration service.
    #[must_use]
    pub const fn new(store: &'a dyn VoteStore) -> Self {
        Self { store }
    }

    /// Validate, normalize and store a coupon registration.
    ///
    /// The email is lower-cased before the uniqueness check; an existing
    /// registration is never updated.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::MissingEmail` if no email was given.
    /// Returns `RegistrationError::InvalidEmail` if the email is malformed.
    /// Returns `RegistrationError::AlreadyRegistered` for a duplicate email.
    /// Returns `RegistrationError::Repository` for storage failures.
    #[instrument(skip_all)]
    pub async fn register(
        &self,
        request: RegistrationRequest,
    ) -> Result<CouponEmail, RegistrationError> {
        let raw = request
            .email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .ok_or(RegistrationError::MissingEmail)?;

        let registration = NewCouponEmail {
            email: Email::parse(raw)?,
            name: request
                .name
                .map(|name| name.trim().to_owned())
                .filter(|name| !name.is_empty()),
        };

        let stored = self
            .store
            .insert_email_if_absent(registration)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => RegistrationError::AlreadyRegistered,
                other => RegistrationError::Repository(other),
            })?
            .ok_or(RegistrationError::AlreadyRegistered)?;

        tracing::info!(registration_id = %stored.id, "Coupon email registered");
        Ok(stored)
    }
}
