//! Price paths driving the paper market.

use crate::error::SimulationError;
use lpm_domain::Price;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use std::collections::VecDeque;

pub trait PricePathGenerator: Send + Sync {
    /// The price one step after `current`.
    fn next_price(&mut self, current: Price) -> Price;
}

/// Geometric Brownian motion stepped one `time_step` at a time.
pub struct GeometricBrownianMotion {
    pub drift: f64,      // annualized drift (mu)
    pub volatility: f64, // annualized volatility (sigma)
    pub time_step: f64,  // time step in years (dt) e.g. 1/365 for daily
    normal: Normal<f64>,
    rng: StdRng,
}

impl GeometricBrownianMotion {
    /// A path seeded from the OS, or reproducible when `seed` is given.
    pub fn new(
        drift: f64,
        volatility: f64,
        time_step: f64,
        seed: Option<u64>,
    ) -> Result<Self, SimulationError> {
        if volatility < 0.0 || time_step <= 0.0 {
            return Err(SimulationError::InvalidParameter(format!(
                "volatility {volatility} and time step {time_step}"
            )));
        }
        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| SimulationError::InvalidParameter(e.to_string()))?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            drift,
            volatility,
            time_step,
            normal,
            rng,
        })
    }
}

impl PricePathGenerator for GeometricBrownianMotion {
    fn next_price(&mut self, current: Price) -> Price {
        let dt = self.time_step;
        let drift_term = (self.drift - 0.5 * self.volatility.powi(2)) * dt;
        let vol_term = self.volatility * dt.sqrt();

        let z = self.normal.sample(&mut self.rng);
        let next = current.value.to_f64().unwrap_or(0.0) * (drift_term + vol_term * z).exp();

        // f64 keeps the path fast; the domain sees a rounded Decimal.
        Decimal::from_f64(next)
            .map(|d| Price::new(d.round_dp(12)))
            .unwrap_or(current)
    }
}

/// Replays a fixed list of prices, then holds the last one.
pub struct DeterministicPricePath {
    prices: VecDeque<Price>,
}

impl DeterministicPricePath {
    pub fn new(prices: impl IntoIterator<Item = Price>) -> Self {
        Self {
            prices: prices.into_iter().collect(),
        }
    }
}

impl PricePathGenerator for DeterministicPricePath {
    fn next_price(&mut self, current: Price) -> Price {
        self.prices.pop_front().unwrap_or(current)
    }
}
