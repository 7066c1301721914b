//! Local Development Wallet
//!
//! A provider backed by an in-process secp256k1 key. It behaves like a
//! browser wallet from the session's point of view: it can refuse requests,
//! lock (empty account list), switch chains and disconnect.

use crate::error::WalletError;
use crate::wallet::provider::{ProviderEvent, WalletProvider};
use k256::ecdsa::SigningKey;
use platform::crypto::{address_of, random_signing_key, sign_personal_message, signing_key_from_hex};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 16;

pub struct LocalKeyWallet {
    key: SigningKey,
    address: String,
    chain_id: AtomicU64,
    rejecting: AtomicBool,
    events: broadcast::Sender<ProviderEvent>,
}

impl LocalKeyWallet {
    pub fn new(key: SigningKey, chain_id: u64) -> Self {
        let address = address_of(key.verifying_key());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            key,
            address,
            chain_id: AtomicU64::new(chain_id),
            rejecting: AtomicBool::new(false),
            events,
        }
    }

    pub fn random(chain_id: u64) -> Self {
        Self::new(random_signing_key(), chain_id)
    }

    pub fn from_private_key(private_key_hex: &str, chain_id: u64) -> Result<Self, WalletError> {
        let key = signing_key_from_hex(private_key_hex)
            .map_err(|e| WalletError::Provider(e.to_string()))?;
        Ok(Self::new(key, chain_id))
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Make the "user" refuse account and signing requests
    pub fn set_rejecting(&self, rejecting: bool) {
        self.rejecting.store(rejecting, Ordering::SeqCst);
    }

    /// Lock the wallet: subscribers see an empty account list
    pub fn lock(&self) {
        self.emit(ProviderEvent::AccountsChanged(Vec::new()));
    }

    /// Announce a different active account
    pub fn announce_account(&self, address: impl Into<String>) {
        self.emit(ProviderEvent::AccountsChanged(vec![address.into()]));
    }

    pub fn switch_chain(&self, chain_id: u64) {
        self.chain_id.store(chain_id, Ordering::SeqCst);
        self.emit(ProviderEvent::ChainChanged(format!("0x{chain_id:x}")));
    }

    pub fn disconnect(&self) {
        self.emit(ProviderEvent::Disconnect);
    }

    /// Number of live event subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    fn emit(&self, event: ProviderEvent) {
        // No subscribers is not an error for a wallet
        let _ = self.events.send(event);
    }

    fn check_consent(&self) -> Result<(), WalletError> {
        if self.rejecting.load(Ordering::SeqCst) {
            Err(WalletError::UserRejected)
        } else {
            Ok(())
        }
    }
}

impl WalletProvider for LocalKeyWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        self.check_consent()?;
        Ok(vec![self.address.clone()])
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        Ok(self.chain_id.load(Ordering::SeqCst))
    }

    async fn sign_message(&self, address: &str, message: &str) -> Result<String, WalletError> {
        self.check_consent()?;
        if !address.eq_ignore_ascii_case(&self.address) {
            return Err(WalletError::Provider(format!("unknown account {address}")));
        }
        sign_personal_message(&self.key, message).map_err(|e| WalletError::Provider(e.to_string()))
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}
