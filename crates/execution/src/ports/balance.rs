use async_trait::async_trait;
use lpm_domain::{Amount, Token, Wallet};
use std::sync::Arc;

/// Token balances of wallets.
#[async_trait]
pub trait BalanceProvider: Send + Sync {
    /// Balance of `wallet` in `token`.
    async fn get(&self, wallet: &Wallet, token: &Arc<Token>) -> anyhow::Result<Amount>;
}

/// Address derivation from private keys.
#[async_trait]
pub trait WalletAddressGenerator: Send + Sync {
    /// Derives the wallet address for `private_key` on `network`.
    async fn generate(&self, network: &str, private_key: &str) -> anyhow::Result<String>;
}
