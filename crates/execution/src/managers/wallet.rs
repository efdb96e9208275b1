use crate::error::{CollaboratorResultExt, ExecutionError, RepositoryResultExt};
use crate::ports::WalletAddressGenerator;
use crate::repository::{WalletFilter, WalletRepository};
use lpm_domain::{Token, Wallet};
use std::sync::Arc;

/// Input to [`WalletManager::new_wallet`].
pub struct NewWallet {
    /// Display name.
    pub name: String,
    /// Network the wallet lives on.
    pub network: String,
    /// Hex private key; the address is derived from it.
    pub private_key: String,
    /// Token used to pay transaction fees.
    pub native_token: Arc<Token>,
}

/// Creates and looks up wallets.
pub struct WalletManager {
    repo: Arc<WalletRepository>,
    generator: Arc<dyn WalletAddressGenerator>,
}

impl WalletManager {
    /// Creates a manager over the wallet store and address generator.
    pub fn new(repo: Arc<WalletRepository>, generator: Arc<dyn WalletAddressGenerator>) -> Self {
        Self { repo, generator }
    }

    /// Derives the address for the key and stores the wallet.
    pub async fn new_wallet(&self, input: NewWallet) -> Result<Wallet, ExecutionError> {
        let address = self
            .generator
            .generate(&input.network, &input.private_key)
            .await
            .collaborator("generate wallet address")?;
        let wallet = Wallet::new(
            input.name,
            input.network,
            address,
            input.private_key,
            input.native_token,
        );
        self.repo
            .save(&wallet)
            .await
            .storage("save wallet after create")?;
        Ok(wallet)
    }

    /// Wallet stored under `network` and `address`.
    pub async fn get(&self, network: &str, address: &str) -> Result<Wallet, ExecutionError> {
        self.repo
            .find_one(&WalletFilter {
                networks: vec![network.to_string()],
                addresses: vec![address.to_string()],
            })
            .await
            .storage("find wallet")?
            .ok_or(ExecutionError::NotFound("wallet"))
    }
}
