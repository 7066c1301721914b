//! Wallet Provider Seam
//!
//! What the session needs from an injected wallet: account access, the
//! active chain, personal-message signing and a stream of provider events.

use crate::error::WalletError;
use tokio::sync::broadcast;

/// Events a wallet emits on its own
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// New account list; empty means the wallet was locked or disconnected
    AccountsChanged(Vec<String>),
    /// New chain id as `0x`-prefixed hex
    ChainChanged(String),
    Disconnect,
}

#[trait_variant::make(WalletProvider: Send)]
pub trait LocalWalletProvider {
    /// Ask the user for account access; the first account is the active one
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError>;

    async fn chain_id(&self) -> Result<u64, WalletError>;

    /// EIP-191 personal message signature, `0x`-prefixed hex
    async fn sign_message(&self, address: &str, message: &str) -> Result<String, WalletError>;

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent>;
}

/// Parse a `0x` hex chain id as sent in `chainChanged`
pub fn parse_chain_id(hex_id: &str) -> Option<u64> {
    let digits = hex_id
        .strip_prefix("0x")
        .or_else(|| hex_id.strip_prefix("0X"))?;
    u64::from_str_radix(digits, 16).ok()
}
