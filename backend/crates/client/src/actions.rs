//! Signed Submissions
//!
//! Reviews, boosts and engagement events carry an EIP-191 signature over a
//! fixed message. The signature travels in the body and in `X-Signature`.
//! Every action checks the module flag and the wallet before asking the
//! user to sign anything.

use crate::api::HubClient;
use crate::config::Module;
use crate::error::{ClientError, ClientResult, WalletError};
use crate::models::{AdminCredentials, Boost, EngagementEvent, NewBoost, NewReview, Review};
use crate::wallet::{WalletProvider, WalletSession};
use kernel::id::AppId;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

pub fn review_message(app_id: AppId, rating: u8) -> String {
    format!("Review app {app_id} with rating {rating}")
}

pub fn boost_message(app_id: AppId, amount: &str, token_symbol: &str) -> String {
    format!("Boost app {app_id} with {amount} {token_symbol}")
}

pub fn engage_message(app_id: AppId, action: &str) -> String {
    format!("Engage with app {app_id} with action {action}")
}

/// Review form input
#[derive(Debug, Clone)]
pub struct ReviewInput {
    pub app_id: AppId,
    pub rating: u8,
    pub comment: String,
}

/// Boost form input; `tx_hash` is the on-chain transfer backing the boost
#[derive(Debug, Clone)]
pub struct BoostInput {
    pub app_id: AppId,
    pub amount: String,
    pub token_symbol: String,
    pub tx_hash: String,
}

fn require_module(client: &HubClient, module: Module) -> ClientResult<()> {
    if client.modules().is_enabled(module) {
        Ok(())
    } else {
        Err(ClientError::ModuleDisabled(module))
    }
}

fn connected_address<P>(session: &WalletSession<P>) -> ClientResult<String>
where
    P: WalletProvider + Sync + 'static,
{
    match session.address() {
        Some(address) if session.is_connected() => Ok(address),
        _ => Err(WalletError::NotConnected.into()),
    }
}

pub async fn submit_review<P>(
    client: &HubClient,
    session: &WalletSession<P>,
    input: ReviewInput,
) -> ClientResult<Review>
where
    P: WalletProvider + Sync + 'static,
{
    require_module(client, Module::Reviews)?;
    if !(MIN_RATING..=MAX_RATING).contains(&input.rating) {
        return Err(ClientError::InvalidRequest(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    let user_address = connected_address(session)?;

    let signature = session
        .sign_message(&review_message(input.app_id, input.rating))
        .await?;

    let review = NewReview {
        app_id: input.app_id,
        user_address,
        rating: input.rating,
        comment: input.comment,
        signature,
    };
    client.create_review(&review).await
}

pub async fn submit_boost<P>(
    client: &HubClient,
    session: &WalletSession<P>,
    input: BoostInput,
) -> ClientResult<Boost>
where
    P: WalletProvider + Sync + 'static,
{
    require_module(client, Module::Boosting)?;
    if input.amount.trim().is_empty() || input.tx_hash.trim().is_empty() {
        return Err(ClientError::InvalidRequest(
            "boost amount and transaction hash are required".to_string(),
        ));
    }
    let user_address = connected_address(session)?;

    let signature = session
        .sign_message(&boost_message(
            input.app_id,
            &input.amount,
            &input.token_symbol,
        ))
        .await?;

    let boost = NewBoost {
        app_id: input.app_id,
        user_address,
        amount: input.amount,
        token_symbol: input.token_symbol,
        tx_hash: input.tx_hash,
        signature,
    };
    client.create_boost(&boost).await
}

/// Record an engagement such as `visit` or `mint`
pub async fn log_engagement<P>(
    client: &HubClient,
    session: &WalletSession<P>,
    app_id: AppId,
    action: &str,
    tx_hash: Option<String>,
) -> ClientResult<serde_json::Value>
where
    P: WalletProvider + Sync + 'static,
{
    require_module(client, Module::Poe)?;
    if action.is_empty() {
        return Err(ClientError::InvalidRequest(
            "engagement action is required".to_string(),
        ));
    }
    let user_address = connected_address(session)?;

    let signature = session
        .sign_message(&engage_message(app_id, action))
        .await?;

    let event = EngagementEvent {
        app_id,
        user_address,
        action: action.to_string(),
        signature,
        tx_hash,
    };
    client.log_engagement(&event).await
}

/// Fetch an admin challenge for the connected wallet and sign it.
///
/// The credentials are good for exactly one admin call.
pub async fn authorize_admin<P>(
    client: &HubClient,
    session: &WalletSession<P>,
) -> ClientResult<AdminCredentials>
where
    P: WalletProvider + Sync + 'static,
{
    let address = connected_address(session)?;
    let challenge = client.admin_challenge(&address).await?;
    let signature = session.sign_message(&challenge.message).await?;

    Ok(AdminCredentials {
        address,
        challenge_id: challenge.challenge_id,
        signature,
    })
}
