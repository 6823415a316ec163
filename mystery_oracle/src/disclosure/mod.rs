//! Per-suspect disclosure state and the rules that drive it.

mod policy;
mod state;

pub use policy::*;
pub use state::*;
