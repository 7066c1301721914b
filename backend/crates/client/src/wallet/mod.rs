//! Wallet Session
//!
//! One explicit session object per page tree. It owns the state, the
//! subscriber channel and the task listening to provider events.
//!
//! `disconnected` --connect()--> `connected`
//! `connected` --disconnect() | empty accounts | provider disconnect--> `disconnected`

pub mod local;
pub mod provider;

pub use local::LocalKeyWallet;
pub use provider::{ProviderEvent, WalletProvider};

use crate::error::WalletError;
use provider::parse_chain_id;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;

/// Observable session state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletState {
    pub address: Option<String>,
    pub chain_id: Option<u64>,
    pub connected: bool,
    pub error: Option<String>,
}

impl WalletState {
    fn connected(address: String, chain_id: u64) -> Self {
        Self {
            address: Some(address),
            chain_id: Some(chain_id),
            connected: true,
            error: None,
        }
    }

    fn failed(error: &WalletError) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::default()
        }
    }
}

pub struct WalletSession<P>
where
    P: WalletProvider + Sync + 'static,
{
    provider: Option<Arc<P>>,
    state: Arc<watch::Sender<WalletState>>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl<P> WalletSession<P>
where
    P: WalletProvider + Sync + 'static,
{
    /// Session over an injected provider; `None` when no wallet is installed
    pub fn new(provider: Option<Arc<P>>) -> Self {
        let (state, _) = watch::channel(WalletState::default());
        Self {
            provider,
            state: Arc::new(state),
            listener: Mutex::new(None),
        }
    }

    pub fn state(&self) -> WalletState {
        self.state.borrow().clone()
    }

    pub fn is_connected(&self) -> bool {
        self.state.borrow().connected
    }

    pub fn address(&self) -> Option<String> {
        self.state.borrow().address.clone()
    }

    /// Receive every state change
    pub fn subscribe(&self) -> watch::Receiver<WalletState> {
        self.state.subscribe()
    }

    /// True while a provider event listener is running
    pub async fn has_listener(&self) -> bool {
        self.listener
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Request account access and start listening to provider events
    pub async fn connect(&self) -> Result<WalletState, WalletError> {
        let Some(provider) = self.provider.clone() else {
            let err = WalletError::NoWalletFound;
            self.state.send_replace(WalletState::failed(&err));
            return Err(err);
        };

        // Held until the new listener is stored, so overlapping connects
        // run one after the other and never leave a listener behind
        let mut listener = self.listener.lock().await;
        if let Some(previous) = listener.take() {
            stop(previous).await;
        }

        // Subscribe first so no event between grant and listener start is lost
        let events = provider.subscribe();

        match Self::request_access(provider.as_ref()).await {
            Ok((address, chain_id)) => {
                let state = WalletState::connected(address, chain_id);
                self.state.send_replace(state.clone());
                tracing::debug!(address = ?state.address, chain_id, "Wallet connected");

                *listener = Some(tokio::spawn(listen(self.state.clone(), events)));
                Ok(state)
            }
            Err(err) => {
                tracing::debug!(error = %err, "Wallet connection failed");
                self.state.send_replace(WalletState::failed(&err));
                Err(err)
            }
        }
    }

    async fn request_access(provider: &P) -> Result<(String, u64), WalletError> {
        let accounts = provider.request_accounts().await?;
        let address = accounts
            .into_iter()
            .next()
            .ok_or_else(|| WalletError::Provider("no accounts available".to_string()))?;
        let chain_id = provider.chain_id().await?;
        Ok((address, chain_id))
    }

    /// Forget the connection and stop listening
    pub async fn disconnect(&self) {
        self.stop_listener().await;
        self.state.send_replace(WalletState::default());
        tracing::debug!("Wallet disconnected");
    }

    /// Sign with the connected account. Never connects on its own.
    pub async fn sign_message(&self, message: &str) -> Result<String, WalletError> {
        let address = {
            let state = self.state.borrow();
            match (&state.address, state.connected) {
                (Some(address), true) => address.clone(),
                _ => return Err(WalletError::NotConnected),
            }
        };
        let provider = self.provider.as_ref().ok_or(WalletError::NoWalletFound)?;
        provider.sign_message(&address, message).await
    }

    async fn stop_listener(&self) {
        let handle = self.listener.lock().await.take();
        if let Some(handle) = handle {
            stop(handle).await;
        }
    }
}

async fn stop(handle: JoinHandle<()>) {
    handle.abort();
    // Wait for the task to drop its event subscription
    let _ = handle.await;
}

impl<P> Drop for WalletSession<P>
where
    P: WalletProvider + Sync + 'static,
{
    fn drop(&mut self) {
        if let Some(handle) = self.listener.get_mut().take() {
            handle.abort();
        }
    }
}

/// Apply provider events until the wallet goes away
async fn listen(
    state: Arc<watch::Sender<WalletState>>,
    mut events: broadcast::Receiver<ProviderEvent>,
) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if !apply_event(&state, event) {
                    break;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Wallet listener lagged behind provider events");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// Returns false once the session is disconnected.
///
/// Events reaching a disconnected session are dropped.
fn apply_event(state: &watch::Sender<WalletState>, event: ProviderEvent) -> bool {
    if !state.borrow().connected {
        tracing::debug!(?event, "Ignoring wallet event while disconnected");
        return false;
    }
    match event {
        ProviderEvent::AccountsChanged(accounts) => match accounts.into_iter().next() {
            Some(address) => {
                tracing::debug!(address = %address, "Wallet account changed");
                state.send_modify(|s| s.address = Some(address));
                true
            }
            None => {
                tracing::debug!("Wallet locked");
                state.send_replace(WalletState::default());
                false
            }
        },
        ProviderEvent::ChainChanged(hex_id) => {
            match parse_chain_id(&hex_id) {
                Some(chain_id) => {
                    tracing::debug!(chain_id, "Wallet chain changed");
                    state.send_modify(|s| s.chain_id = Some(chain_id));
                }
                None => tracing::warn!(chain_id = %hex_id, "Ignoring malformed chain id"),
            }
            true
        }
        ProviderEvent::Disconnect => {
            tracing::debug!("Wallet provider disconnected");
            state.send_replace(WalletState::default());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_event_transitions() {
        let (state, _rx) = watch::channel(WalletState::connected("0xaaa".to_string(), 1));

        assert!(apply_event(
            &state,
            ProviderEvent::AccountsChanged(vec!["0xbbb".to_string(), "0xccc".to_string()])
        ));
        assert_eq!(state.borrow().address.as_deref(), Some("0xbbb"));
        assert!(state.borrow().connected);

        assert!(apply_event(&state, ProviderEvent::ChainChanged("0x38".to_string())));
        assert_eq!(state.borrow().chain_id, Some(56));

        assert!(apply_event(&state, ProviderEvent::ChainChanged("bogus".to_string())));
        assert_eq!(state.borrow().chain_id, Some(56));

        assert!(!apply_event(&state, ProviderEvent::AccountsChanged(Vec::new())));
        assert_eq!(*state.borrow(), WalletState::default());
    }

    #[test]
    fn test_events_ignored_while_disconnected() {
        let (state, _rx) = watch::channel(WalletState::default());

        assert!(!apply_event(
            &state,
            ProviderEvent::AccountsChanged(vec!["0xbbb".to_string()])
        ));
        assert!(!apply_event(&state, ProviderEvent::ChainChanged("0x1".to_string())));
        assert_eq!(*state.borrow(), WalletState::default());
    }

    #[test]
    fn test_disconnect_event_clears_state() {
        let (state, _rx) = watch::channel(WalletState::connected("0xaaa".to_string(), 1));
        assert!(!apply_event(&state, ProviderEvent::Disconnect));
        assert!(!state.borrow().connected);
        assert!(state.borrow().address.is_none());
    }
}
