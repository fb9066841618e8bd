//! Business rules for the voting service.
//!
//! # Services
//!
//! - `voting` - Vote acceptance under the deployment's duplicate-vote policy
//! - `registration` - Coupon email registration
//! - `projects` - Project creation and vote-count listings
//! - `metrics` - Metrics snapshot aggregation
//! - `coupon` - Coupon codes, coupon letters and CSV export
//!
//! Services borrow a [`VoteStore`](crate::db::VoteStore) and return their own
//! error types; the HTTP layer maps those onto status codes in
//! [`crate::error`].

pub mod coupon;
pub mod metrics;
pub mod projects;
pub mod registration;
pub mod voting;

pub use metrics::MetricsAggregator;
pub use projects::{ProjectDraft, ProjectError, ProjectService};
pub use registration::{RegistrationError, RegistrationRequest, RegistrationService};
pub use voting::{VoteError, VoteRequest, VotingService};
