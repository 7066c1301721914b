//! Wire Models
//!
//! JSON shapes exchanged with the hub API. Field names follow the backend
//! (camelCase, with the record id exposed as `ID` on apps).

use kernel::id::{AppId, AppImageId, BoostId, ReviewId};
use serde::{Deserialize, Serialize};

/// Listed application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppListing {
    #[serde(rename = "ID")]
    pub id: AppId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo_path: String,
    #[serde(default)]
    pub contract_addresses: Vec<String>,
    #[serde(default)]
    pub developer_address: String,
    #[serde(default)]
    pub repo_url: String,
    #[serde(default)]
    pub website_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub tx_hash: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mockup_images: Option<Vec<AppImage>>,
}

impl AppListing {
    /// Mockups in display order
    pub fn ordered_mockups(&self) -> Vec<&AppImage> {
        let mut images: Vec<&AppImage> = self.mockup_images.iter().flatten().collect();
        images.sort_by_key(|image| image.order);
        images
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppImage {
    pub id: AppImageId,
    pub filename: String,
    pub image_path: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub order: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub pages: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppListResponse {
    pub apps: Vec<AppListing>,
    pub pagination: Pagination,
}

/// App fields sent as the `appData` part of a submission
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApp {
    pub name: String,
    pub description: String,
    pub contract_addresses: Vec<String>,
    pub developer_address: String,
    pub repo_url: String,
    pub website_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discord_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    pub tags: Vec<String>,
    pub tx_hash: String,
}

/// File attached to a submission
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// Mockup screenshot with its caption
#[derive(Debug, Clone)]
pub struct Mockup {
    pub file: FileUpload,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub app_id: AppId,
    pub user_address: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsResponse {
    pub reviews: Vec<Review>,
    pub count: u64,
    pub avg_rating: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub app_id: AppId,
    pub user_address: String,
    pub rating: u8,
    pub comment: String,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Boost {
    pub id: BoostId,
    pub app_id: AppId,
    pub user_address: String,
    pub amount: String,
    pub token_symbol: String,
    #[serde(default)]
    pub tx_hash: String,
    #[serde(default)]
    pub expires_at: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBoost {
    pub app_id: AppId,
    pub user_address: String,
    pub amount: String,
    pub token_symbol: String,
    pub tx_hash: String,
    pub signature: String,
}

/// App with its summed active boosts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoostedApp {
    #[serde(flatten)]
    pub app: AppListing,
    #[serde(default)]
    pub boost_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostedAppsResponse {
    pub apps: Vec<BoostedApp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub user_address: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppContribution {
    pub user_address: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppContributionsResponse {
    pub app_id: AppId,
    pub app_name: String,
    pub contributions: Vec<AppContribution>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementEvent {
    pub app_id: AppId,
    pub user_address: String,
    pub action: String,
    pub signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
}

/// Challenge an admin signs before calling admin endpoints
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminChallenge {
    pub challenge_id: String,
    pub message: String,
    pub expires_at_ms: i64,
}

/// Signed proof attached to one admin call
#[derive(Debug, Clone, PartialEq)]
pub struct AdminCredentials {
    pub address: String,
    pub challenge_id: String,
    pub signature: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AdminVerification {
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
}
