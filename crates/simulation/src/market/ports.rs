//! Collaborator contracts implemented by the paper market.

use super::book::{LIQUIDITY_SCALE, PaperPosition, scaled_liquidity};
use super::{MarketState, PaperMarket};
use crate::address::derive_address;
use crate::error::SimulationError;
use async_trait::async_trait;
use lpm_domain::math::concentrated_liquidity::{amounts_for_liquidity, liquidity_for_amounts};
use lpm_domain::{Amount, PairSide, PoolKey, PositionRange, PositionState, Price, Token, Wallet};
use lpm_execution::ports::{
    AmountsRequest, BalanceProvider, DecreaseLiquidityReceipt, DecreaseLiquidityRequest,
    IncreaseLiquidityReceipt, IncreaseLiquidityRequest, LiquidityManager, LivePosition,
    PoolFactory, PoolState, PositionQuery, RangeRequest, Router, SizedAmounts, SwapFill,
    SwapRequest, WalletAddressGenerator,
};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::info;

/// Largest liquidity `base` and `quote` can fund at `price`, with the
/// amounts it actually takes. Taken amounts never exceed the offered ones.
fn fit(
    base: &Amount,
    quote: &Amount,
    price: Decimal,
    range: &PositionRange,
) -> Result<(Decimal, Amount, Amount), SimulationError> {
    let lower = range.lower_price.value;
    let upper = range.upper_price.value;
    let base_offered = base.human_value()?;
    let quote_offered = quote.human_value()?;

    let liquidity = liquidity_for_amounts(base_offered, quote_offered, price, lower, upper)
        .map_err(SimulationError::Math)?;
    let (base_taken, quote_taken) =
        amounts_for_liquidity(liquidity, price, lower, upper).map_err(SimulationError::Math)?;

    Ok((
        liquidity,
        Amount::from_human(Arc::clone(base.token()), base_taken.min(base_offered))?,
        Amount::from_human(Arc::clone(quote.token()), quote_taken.min(quote_offered))?,
    ))
}

fn min_amount(a: Amount, b: &Amount) -> Result<Amount, SimulationError> {
    Ok(match a.checked_cmp(b)? {
        Ordering::Greater => b.clone(),
        _ => a,
    })
}

fn pool_state(state: &MarketState, listing_index: usize) -> PoolState {
    let listing = &state.pools[listing_index];
    PoolState {
        address: listing.pool.address.clone(),
        last_price: listing.price(),
        liquidity: scaled_liquidity(listing.external_liquidity()),
    }
}

impl PaperMarket {
    async fn find_listed(&self, key: &PoolKey) -> Result<PoolState, SimulationError> {
        let state = self.state.read().await;
        let index = state
            .pools
            .iter()
            .position(|l| l.pool.matches(key))
            .ok_or_else(|| {
                SimulationError::UnknownPool(format!(
                    "[{}] {}: {}/{} {}",
                    key.network, key.protocol, key.base, key.quote, key.fee
                ))
            })?;
        Ok(pool_state(&state, index))
    }

    async fn get_listed(
        &self,
        network: &str,
        protocol: &str,
        address: &str,
    ) -> Result<PoolState, SimulationError> {
        let state = self.state.read().await;
        let index = state
            .pools
            .iter()
            .position(|l| {
                l.pool.network == network && l.pool.protocol == protocol && l.pool.address == address
            })
            .ok_or_else(|| SimulationError::UnknownPool(format!("{network}:{address}")))?;
        Ok(pool_state(&state, index))
    }

    async fn range_around_price(
        &self,
        request: &RangeRequest,
    ) -> Result<PositionRange, SimulationError> {
        let below = request.base_volatility.value();
        let above = request.quote_volatility.value();
        if below <= Decimal::ZERO || below >= Decimal::ONE || above <= Decimal::ZERO {
            return Err(SimulationError::InvalidParameter(format!(
                "range volatility {below}/{above}"
            )));
        }

        let state = self.state.read().await;
        let price = state.pool(&request.network, &request.pool_address)?.price();
        Ok(PositionRange::new(
            price,
            Price::new(price.value * request.base_volatility.complement()),
            Price::new(price.value * (Decimal::ONE + above)),
        ))
    }

    async fn open_position(
        &self,
        request: &IncreaseLiquidityRequest,
    ) -> Result<IncreaseLiquidityReceipt, SimulationError> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let price = state.pool(&request.network, &request.pool_address)?.price();

        let (liquidity, base, quote) = fit(&request.base, &request.quote, price.value, &request.range)?;
        if liquidity <= Decimal::ZERO {
            return Err(SimulationError::InvalidParameter(
                "position would hold no liquidity".to_string(),
            ));
        }

        let gas = state.gas(&request.network, self.config.gas_per_transaction)?;
        state
            .ledger
            .debit_all(&request.owner, &[base.clone(), quote.clone(), gas.clone()])?;

        let address = state.next_address(&request.pool_address);
        state.positions.insert(
            address.clone(),
            PaperPosition {
                address: address.clone(),
                owner: request.owner.clone(),
                pool_address: request.pool_address.clone(),
                lower: request.range.lower_price.value,
                upper: request.range.upper_price.value,
                liquidity,
                base_fees: Decimal::ZERO,
                quote_fees: Decimal::ZERO,
                open: true,
            },
        );

        info!(
            position = %address,
            owner = %request.owner,
            price = %price,
            base = %base,
            quote = %quote,
            "Paper position opened"
        );
        Ok(IncreaseLiquidityReceipt {
            address,
            liquidity: scaled_liquidity(liquidity),
            base,
            quote,
            transaction_fee: gas.raw(),
        })
    }

    async fn withdraw(
        &self,
        request: &DecreaseLiquidityRequest,
    ) -> Result<DecreaseLiquidityReceipt, SimulationError> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let price = state.pool(&request.network, &request.pool_address)?.price();
        let gas = state.gas(&request.network, self.config.gas_per_transaction)?;

        let position = state
            .positions
            .get_mut(&request.position_address)
            .ok_or_else(|| SimulationError::UnknownPosition(request.position_address.clone()))?;
        if !position.open {
            return Err(SimulationError::PositionClosed(position.address.clone()));
        }
        if position.owner != request.owner {
            return Err(SimulationError::NotOwner {
                position: position.address.clone(),
                owner: request.owner.clone(),
            });
        }

        let removed = if request.liquidity >= scaled_liquidity(position.liquidity) {
            position.liquidity
        } else {
            Decimal::from(request.liquidity) / LIQUIDITY_SCALE
        };
        let (base_principal, quote_principal) =
            amounts_for_liquidity(removed, price.value, position.lower, position.upper)
                .map_err(SimulationError::Math)?;

        let base_token = &request.pair.base;
        let quote_token = &request.pair.quote;
        let base = min_amount(
            Amount::from_human(Arc::clone(base_token), base_principal)?,
            &request.base_max,
        )?
        .checked_add(&Amount::from_human(Arc::clone(base_token), position.base_fees)?)?;
        let quote = min_amount(
            Amount::from_human(Arc::clone(quote_token), quote_principal)?,
            &request.quote_max,
        )?
        .checked_add(&Amount::from_human(Arc::clone(quote_token), position.quote_fees)?)?;

        state.ledger.debit_all(&request.owner, &[gas.clone()])?;
        state.ledger.credit(&request.owner, &base)?;
        state.ledger.credit(&request.owner, &quote)?;

        position.liquidity -= removed;
        position.base_fees = Decimal::ZERO;
        position.quote_fees = Decimal::ZERO;
        if position.liquidity <= Decimal::ZERO {
            position.open = false;
        }

        info!(
            position = %request.position_address,
            price = %price,
            base = %base,
            quote = %quote,
            closed = !position.open,
            "Paper liquidity withdrawn"
        );
        Ok(DecreaseLiquidityReceipt {
            address: request.position_address.clone(),
            liquidity: scaled_liquidity(removed),
            base,
            quote,
            transaction_fee: gas.raw(),
        })
    }

    async fn live_position(&self, query: &PositionQuery) -> Result<LivePosition, SimulationError> {
        let state = self.state.read().await;
        let price = state.pool(&query.network, &query.pool_address)?.price();
        let position = state
            .positions
            .get(&query.position_address)
            .ok_or_else(|| SimulationError::UnknownPosition(query.position_address.clone()))?;

        let (base, quote) = position.holdings(price)?;
        let base_token = &query.pair.base;
        let quote_token = &query.pair.quote;
        Ok(LivePosition {
            liquidity: scaled_liquidity(position.liquidity),
            state: PositionState {
                price,
                base: Amount::from_human(Arc::clone(base_token), base)?,
                quote: Amount::from_human(Arc::clone(quote_token), quote)?,
                base_accrued_fees: Amount::from_human(Arc::clone(base_token), position.base_fees)?,
                quote_accrued_fees: Amount::from_human(
                    Arc::clone(quote_token),
                    position.quote_fees,
                )?,
            },
        })
    }

    async fn fill_swap(&self, request: &SwapRequest) -> Result<SwapFill, SimulationError> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let pool = state.pool(&request.network, &request.pool_address)?.pool.clone();
        let price = pool.last_price;
        let fee = pool.fee;

        let (cost, filled_price) = match pool.pair.side_of(request.amount_out.token()) {
            Some(PairSide::Base) => (
                price.quote_for(&request.amount_out, &pool.pair.quote)?,
                Price::new(price.value * (Decimal::ONE + fee.value())),
            ),
            Some(PairSide::Quote) => (
                price.base_for(&request.amount_out, &pool.pair.base)?,
                Price::new(price.value * fee.complement()),
            ),
            None => {
                return Err(SimulationError::InvalidParameter(format!(
                    "{} is not traded in {}",
                    request.amount_out.token().describe(),
                    pool.pair
                )));
            }
        };
        let cost = cost.checked_add(&cost.checked_mul(fee)?)?;
        if cost.checked_cmp(&request.amount_in)? == Ordering::Greater {
            return Err(SimulationError::SlippageExceeded {
                required: cost.to_string(),
                ceiling: request.amount_in.to_string(),
            });
        }

        let gas = state.gas(&request.network, self.config.gas_per_transaction)?;
        state
            .ledger
            .debit_all(&request.owner, &[cost.clone(), gas.clone()])?;
        state.ledger.credit(&request.owner, &request.amount_out)?;
        let address = state.next_address(&request.pool_address);

        info!(
            owner = %request.owner,
            paid = %cost,
            received = %request.amount_out,
            price = %filled_price,
            "Paper swap filled"
        );
        Ok(SwapFill {
            address,
            amount_in: cost,
            amount_out: request.amount_out.clone(),
            filled_price,
            transaction_fee: gas.raw(),
        })
    }
}

#[async_trait]
impl PoolFactory for PaperMarket {
    async fn find_pool(&self, key: &PoolKey) -> anyhow::Result<PoolState> {
        Ok(self.find_listed(key).await?)
    }

    async fn get_pool(
        &self,
        network: &str,
        protocol: &str,
        address: &str,
    ) -> anyhow::Result<PoolState> {
        Ok(self.get_listed(network, protocol, address).await?)
    }

    async fn calculate_range(&self, request: &RangeRequest) -> anyhow::Result<PositionRange> {
        Ok(self.range_around_price(request).await?)
    }

    async fn calculate_amounts(&self, request: &AmountsRequest) -> anyhow::Result<SizedAmounts> {
        let (liquidity, base, quote) = fit(
            &request.base,
            &request.quote,
            request.range.initial_price.value,
            &request.range,
        )?;
        Ok(SizedAmounts {
            liquidity: scaled_liquidity(liquidity),
            base,
            quote,
        })
    }
}

#[async_trait]
impl Router for PaperMarket {
    async fn swap(&self, request: &SwapRequest) -> anyhow::Result<SwapFill> {
        Ok(self.fill_swap(request).await?)
    }
}

#[async_trait]
impl LiquidityManager for PaperMarket {
    async fn increase_liquidity(
        &self,
        request: &IncreaseLiquidityRequest,
    ) -> anyhow::Result<IncreaseLiquidityReceipt> {
        Ok(self.open_position(request).await?)
    }

    async fn decrease_liquidity(
        &self,
        request: &DecreaseLiquidityRequest,
    ) -> anyhow::Result<DecreaseLiquidityReceipt> {
        Ok(self.withdraw(request).await?)
    }

    async fn get_position(&self, query: &PositionQuery) -> anyhow::Result<LivePosition> {
        Ok(self.live_position(query).await?)
    }
}

#[async_trait]
impl BalanceProvider for PaperMarket {
    async fn get(&self, wallet: &Wallet, token: &Arc<Token>) -> anyhow::Result<Amount> {
        Ok(self.balance_of(&wallet.address, token).await)
    }
}

#[async_trait]
impl WalletAddressGenerator for PaperMarket {
    async fn generate(&self, network: &str, private_key: &str) -> anyhow::Result<String> {
        if private_key.is_empty() {
            anyhow::bail!("private key is empty");
        }
        Ok(derive_address(network, private_key))
    }
}
