//! # Mystery Oracle
//!
//! The truth authority of the murder mystery. This crate holds the full case
//! (murderer, secrets, lies) on one side and a player-facing narrator on the
//! other, and makes sure the narrator only ever receives what the player has
//! earned.
//!
//! ## Core Components
//!
//! - **disclosure**: per-suspect trust/nervousness state and the gates that
//!   decide when hints and secrets come out
//! - **synthesis**: the boundary to the language model that voices suspects
//! - **oracle**: the controlled operations the narrator may call, and the
//!   session contexts they run in
//! - **config**: tunable thresholds, keyword lists and timeouts
//!
//! ## Design Philosophy
//!
//! - **Single Authority**: guilt and secrets are read here and nowhere else
//! - **Typed Signals**: reveals travel as fields, never as markers in text
//! - **All or Nothing Turns**: a turn that fails to produce dialogue changes no state

pub mod config;
pub mod disclosure;
pub mod error;
pub mod oracle;
pub mod synthesis;

pub use config::*;
pub use disclosure::*;
pub use error::*;
pub use oracle::*;
pub use synthesis::*;
