//! Decision engine and runtime for liquidity projects.
//!
//! This crate provides:
//! - Collaborator contracts for pools, swaps, liquidity and balances
//! - Repository contracts, one per entity
//! - Entity managers binding repositories to collaborators
//! - The per-project decision engine
//! - A cycle runner with a per-project breaker and lifecycle tracking

/// Prelude module for convenient imports.
pub mod prelude;

/// Runner configuration.
pub mod config;
/// Per-project circuit breaker.
pub mod emergency;
/// Execution errors.
pub mod error;
/// Project lifecycle tracking.
pub mod lifecycle;
/// Entity managers.
pub mod managers;
/// Collaborator contracts.
pub mod ports;
/// Persistence contracts.
pub mod repository;
/// Cycle runner.
pub mod runner;
/// Decision engine.
pub mod strategy;

#[cfg(test)]
mod testing;
