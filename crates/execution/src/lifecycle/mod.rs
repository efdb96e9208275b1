//! Project lifecycle tracking.
//!
//! Records what each evaluation cycle did to a project and keeps a running
//! summary per project.

mod events;
mod tracker;

pub use events::*;
pub use tracker::*;
