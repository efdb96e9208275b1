//! Per-project circuit breaker.
//!
//! Stops evaluating a project after repeated failed cycles, retries it once
//! the recovery timeout has passed and halts it for good on fatal errors.

mod breaker;

pub use breaker::*;
