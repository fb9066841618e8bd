//! Domain models for the voting service.
//!
//! These are validated domain objects, separate from the database row types
//! in [`crate::db`].

pub mod coupon_email;
pub mod project;
pub mod vote;

pub use coupon_email::{CouponEmail, NewCouponEmail};
pub use project::{NewProject, Project, ProjectWithVotes};
pub use vote::{NewVote, Vote};
