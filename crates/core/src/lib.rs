//! Hackvote Core - Shared domain types.
//!
//! This crate provides the types shared by every Hackvote component:
//! - `server` - Voting, registration and metrics HTTP service
//! - `cli` - Command-line tools for migrations, seeding and exports
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, emails, categories, voter identity and vote policy
//! - [`metrics`] - Metrics snapshot shapes and vote ranking

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod metrics;
pub mod types;

pub use metrics::{MetricsSnapshot, ProjectVotes, rank_by_votes};
pub use types::*;
