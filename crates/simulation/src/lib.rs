//! Paper trading for the liquidity position manager.
//!
//! A simulated market that implements every collaborator contract of
//! `lpm-execution`, plus a session that runs projects against it.

/// Prelude module for convenient imports.
pub mod prelude;

/// Deterministic address derivation.
pub mod address;
/// Simulation errors.
pub mod error;
/// External liquidity models.
pub mod liquidity;
/// The paper market.
pub mod market;
/// Price path generators.
pub mod price_path;
/// Ready-made markets.
pub mod scenario;
/// Engine wiring over the paper market.
pub mod session;
/// Volume models.
pub mod volume;
