//! Ready-made paper markets.

use crate::liquidity::ConstantLiquidity;
use crate::market::{PaperMarket, PoolListing};
use crate::price_path::PricePathGenerator;
use crate::volume::ConstantVolume;
use lpm_domain::{Pair, Percent, Pool, Price, Token};
use rust_decimal::Decimal;
use std::sync::Arc;

pub const PAPER_NETWORK: &str = "paper";
pub const PAPER_PROTOCOL: &str = "uniswap-v3";

/// An ETH/USDC market: ETH pays gas, WETH/USDC is the traded pair.
#[derive(Debug, Clone)]
pub struct EthUsdc {
    pub eth: Arc<Token>,
    pub weth: Arc<Token>,
    pub usdc: Arc<Token>,
    pub pool: Pool,
}

impl EthUsdc {
    pub fn new(price: Decimal, fee: Percent) -> Self {
        let eth = Arc::new(Token::new(
            PAPER_NETWORK,
            "0x0000000000000000000000000000000000000000",
            "ETH",
            18,
        ));
        let weth = Arc::new(Token::new(
            PAPER_NETWORK,
            "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
            "WETH",
            18,
        ));
        let usdc = Arc::new(Token::new(
            PAPER_NETWORK,
            "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
            "USDC",
            6,
        ));
        let pool = Pool::new(
            PAPER_NETWORK,
            PAPER_PROTOCOL,
            "0x88e6a0c2ddd26feeb64f039a2c41296fcb3f5640",
            fee,
            Pair::new(Arc::clone(&weth), Arc::clone(&usdc)),
            Price::new(price),
        );
        Self {
            eth,
            weth,
            usdc,
            pool,
        }
    }

    /// Registers ETH as the gas token and lists the pool.
    ///
    /// `external_liquidity` is the other providers' liquidity the
    /// positions share fees with; `volume` is quote volume per step.
    pub async fn install(
        &self,
        market: &PaperMarket,
        path: Box<dyn PricePathGenerator>,
        external_liquidity: Decimal,
        volume: Decimal,
    ) {
        market.register_native(Arc::clone(&self.eth)).await;
        market
            .list_pool(PoolListing::new(
                self.pool.clone(),
                path,
                Box::new(ConstantLiquidity::new(external_liquidity)),
                Box::new(ConstantVolume::new(volume)),
            ))
            .await;
    }
}
