pub mod concentrated_liquidity;
