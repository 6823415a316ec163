//! # Case Model
//!
//! The "Case Bible" crate - holds the ground truth of one murder mystery: who
//! was where and when (the encounter graph), and who the victim, suspects and
//! clues are. This crate is the single source of truth for the case and does
//! not contain any AI logic.
//!
//! Everything here is built once at case-generation time and is read-only
//! afterwards, so a finished case can be shared between sessions behind an
//! `Arc` without locking.

pub mod case;
pub mod encounter;
pub mod entities;
pub mod error;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use case::*;
pub use encounter::*;
pub use entities::*;
pub use error::*;
