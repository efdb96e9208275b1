use crate::entities::token::Token;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use zeroize::Zeroizing;

/// A signing identity on one network. The private key is never serialized
/// or printed.
#[derive(Clone, Serialize)]
pub struct Wallet {
    pub name: String,
    pub network: String,
    pub address: String,
    #[serde(skip_serializing)]
    private_key: Zeroizing<String>,
    pub native_token: Arc<Token>,
    pub created_at: DateTime<Utc>,
}

impl Wallet {
    pub fn new(
        name: impl Into<String>,
        network: impl Into<String>,
        address: impl Into<String>,
        private_key: impl Into<String>,
        native_token: Arc<Token>,
    ) -> Self {
        Self {
            name: name.into(),
            network: network.into(),
            address: address.into(),
            private_key: Zeroizing::new(private_key.into()),
            native_token,
            created_at: Utc::now(),
        }
    }

    pub fn private_key(&self) -> &str {
        self.private_key.as_str()
    }
}

impl PartialEq for Wallet {
    fn eq(&self, other: &Self) -> bool {
        self.network == other.network && self.address == other.address
    }
}

impl Eq for Wallet {}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("name", &self.name)
            .field("network", &self.network)
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .field("native_token", &self.native_token.ticker)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet() -> Wallet {
        let eth = Arc::new(Token::new("ethereum", "0xeeee", "ETH", 18));
        Wallet::new("main", "ethereum", "0xabc", "s3cr3t-key", eth)
    }

    #[test]
    fn test_private_key_is_not_leaked() {
        let wallet = wallet();
        assert_eq!(wallet.private_key(), "s3cr3t-key");
        assert!(!format!("{wallet:?}").contains("s3cr3t-key"));
        let json = serde_json::to_string(&wallet).unwrap();
        assert!(!json.contains("s3cr3t-key"));
        assert!(json.contains("0xabc"));
    }
}
