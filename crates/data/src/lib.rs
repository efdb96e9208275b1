//! In-memory persistence for the liquidity position manager.
//!
//! Implements the repository contracts from `lpm-execution` on top of
//! process memory. Nothing survives a restart.

mod repositories;

pub use repositories::{MemoryRepository, MemoryStore};
