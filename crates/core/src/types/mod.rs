//! Core types for Hackvote.
//!
//! This module provides type-safe wrappers for the voting domain.

pub mod category;
pub mod email;
pub mod id;
pub mod policy;
pub mod voter;

pub use category::{CategoryError, ProjectCategory};
pub use email::{Email, EmailError};
pub use id::*;
pub use policy::VotePolicy;
pub use voter::VoterIp;
