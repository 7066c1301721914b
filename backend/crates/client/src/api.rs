//! Hub API Client
//!
//! One method per backend endpoint. Calls that belong to an optional module
//! check the module flags first and fail with `ModuleDisabled` without
//! touching the network.

use crate::config::{EnabledModules, Module, RuntimeConfig};
use crate::error::{ClientError, ClientResult};
use crate::models::{
    AdminChallenge, AdminCredentials, AdminVerification, AppContributionsResponse, AppListResponse,
    AppListing, Boost, BoostedAppsResponse, EngagementEvent, FileUpload, LeaderboardResponse,
    Mockup, NewApp, NewBoost, NewReview, Review, ReviewsResponse,
};
use kernel::error::wire::message_from_body;
use kernel::id::AppId;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

const X_SIGNATURE: &str = "x-signature";
const WALLET_ADDRESS: &str = "wallet-address";
const X_ADMIN_CHALLENGE: &str = "x-admin-challenge";
const X_ADMIN_SIGNATURE: &str = "x-admin-signature";

/// Where API calls go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiBase {
    /// Through the site's proxy routes: `{site}/api/...`
    Proxied(Url),
    /// Straight to the backend: `{backend}/...`
    Direct(Url),
}

impl ApiBase {
    /// Absolute URL for an endpoint given as path segments
    pub fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let (base, prefix): (&Url, &[&str]) = match self {
            ApiBase::Proxied(site) => (site, &["api"]),
            ApiBase::Direct(backend) => (backend, &[]),
        };

        let mut url = base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ClientError::InvalidBaseUrl(base.to_string()))?;
            path.pop_if_empty();
            path.extend(prefix);
            path.extend(segments);
        }
        url.set_query(None);
        Ok(url)
    }
}

/// Listing filters as the backend understands them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppsParams {
    pub page: u32,
    pub page_size: u32,
    pub featured: bool,
    pub category: Option<String>,
}

impl Default for AppsParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            featured: false,
            category: None,
        }
    }
}

impl AppsParams {
    /// Query pairs; `featured` only when set, `category` only when present
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];
        if self.featured {
            query.push(("featured", "true".to_string()));
        }
        if let Some(category) = self.category.as_ref().filter(|c| !c.is_empty()) {
            query.push(("category", category.clone()));
        }
        query
    }
}

/// Typed hub API client
#[derive(Debug, Clone)]
pub struct HubClient {
    http: reqwest::Client,
    base: ApiBase,
    modules: EnabledModules,
}

impl HubClient {
    /// Client with every optional module disabled until a config is applied
    pub fn new(base: ApiBase) -> Self {
        Self::with_http(reqwest::Client::new(), base)
    }

    pub fn with_http(http: reqwest::Client, base: ApiBase) -> Self {
        Self {
            http,
            base,
            modules: EnabledModules::default(),
        }
    }

    /// Take module flags from a loaded configuration
    pub fn with_config(mut self, config: &RuntimeConfig) -> Self {
        self.modules = config.enable_modules;
        self
    }

    pub fn with_modules(mut self, modules: EnabledModules) -> Self {
        self.modules = modules;
        self
    }

    pub fn base(&self) -> &ApiBase {
        &self.base
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn modules(&self) -> EnabledModules {
        self.modules
    }

    fn require(&self, module: Module) -> ClientResult<()> {
        if self.modules.is_enabled(module) {
            Ok(())
        } else {
            tracing::debug!(module = %module, "Skipping call to disabled module");
            Err(ClientError::ModuleDisabled(module))
        }
    }

    fn request(&self, method: Method, segments: &[&str]) -> ClientResult<RequestBuilder> {
        let url = self.base.endpoint(segments)?;
        Ok(self.http.request(method, url))
    }

    // ------------------------------------------------------------------
    // Core
    // ------------------------------------------------------------------

    pub async fn config(&self) -> ClientResult<RuntimeConfig> {
        send_json(self.request(Method::GET, &["config"])?).await
    }

    pub async fn list_apps(&self, params: &AppsParams) -> ClientResult<AppListResponse> {
        let request = self
            .request(Method::GET, &["apps"])?
            .query(&params.to_query());
        send_json(request).await
    }

    pub async fn get_app(&self, id: AppId) -> ClientResult<AppListing> {
        let id = id.to_string();
        send_json(self.request(Method::GET, &["apps", &id])?).await
    }

    /// Multipart submission: `appData` JSON, `logo`, `mockups[i]` and
    /// `descriptions[i]` for each mockup
    pub async fn create_app(
        &self,
        app: &NewApp,
        logo: FileUpload,
        mockups: Vec<Mockup>,
    ) -> ClientResult<AppListing> {
        let mut form = Form::new()
            .text("appData", serde_json::to_string(app)?)
            .part("logo", file_part(logo)?);

        for (index, mockup) in mockups.into_iter().enumerate() {
            form = form
                .part(format!("mockups[{index}]"), file_part(mockup.file)?)
                .text(format!("descriptions[{index}]"), mockup.description);
        }

        let request = self.request(Method::POST, &["apps"])?.multipart(form);
        send_json(request).await
    }

    pub async fn update_app<P>(
        &self,
        id: AppId,
        patch: &P,
        authorization: Option<&str>,
    ) -> ClientResult<AppListing>
    where
        P: Serialize + ?Sized,
    {
        let id = id.to_string();
        let mut request = self.request(Method::PUT, &["apps", &id])?.json(patch);
        if let Some(token) = authorization {
            request = request.header(AUTHORIZATION, token);
        }
        send_json(request).await
    }

    // ------------------------------------------------------------------
    // Reviews module
    // ------------------------------------------------------------------

    pub async fn reviews(&self, app_id: AppId) -> ClientResult<ReviewsResponse> {
        self.require(Module::Reviews)?;
        let id = app_id.to_string();
        send_json(self.request(Method::GET, &["reviews", &id])?).await
    }

    pub async fn create_review(&self, review: &NewReview) -> ClientResult<Review> {
        self.require(Module::Reviews)?;
        let request = self
            .request(Method::POST, &["review"])?
            .header(X_SIGNATURE, &review.signature)
            .json(review);
        send_json(request).await
    }

    // ------------------------------------------------------------------
    // Boosting module
    // ------------------------------------------------------------------

    pub async fn boosted_apps(&self) -> ClientResult<BoostedAppsResponse> {
        self.require(Module::Boosting)?;
        send_json(self.request(Method::GET, &["boosted"])?).await
    }

    pub async fn create_boost(&self, boost: &NewBoost) -> ClientResult<Boost> {
        self.require(Module::Boosting)?;
        let request = self
            .request(Method::POST, &["boost"])?
            .header(X_SIGNATURE, &boost.signature)
            .json(boost);
        send_json(request).await
    }

    // ------------------------------------------------------------------
    // Proof of engagement module
    // ------------------------------------------------------------------

    pub async fn leaderboard(&self) -> ClientResult<LeaderboardResponse> {
        self.require(Module::Poe)?;
        send_json(self.request(Method::GET, &["leaderboard"])?).await
    }

    pub async fn contributions(&self, app_id: AppId) -> ClientResult<AppContributionsResponse> {
        self.require(Module::Poe)?;
        let id = app_id.to_string();
        send_json(self.request(Method::GET, &["contributions", &id])?).await
    }

    pub async fn log_engagement(&self, event: &EngagementEvent) -> ClientResult<serde_json::Value> {
        self.require(Module::Poe)?;
        let request = self
            .request(Method::POST, &["engage"])?
            .header(X_SIGNATURE, &event.signature)
            .json(event);
        send_json(request).await
    }

    // ------------------------------------------------------------------
    // Admin
    // ------------------------------------------------------------------

    pub async fn admin_challenge(&self, address: &str) -> ClientResult<AdminChallenge> {
        let request = self
            .request(Method::GET, &["admin", "challenge"])?
            .query(&[("address", address)]);
        send_json(request).await
    }

    pub async fn verify_admin(&self, credentials: &AdminCredentials) -> ClientResult<bool> {
        let request = self
            .request(Method::GET, &["admin", "verify"])?
            .headers(admin_headers(credentials)?);
        let verification: AdminVerification = send_json(request).await?;
        Ok(verification.is_admin)
    }

    pub async fn feature_app(
        &self,
        app_id: AppId,
        featured: bool,
        credentials: &AdminCredentials,
    ) -> ClientResult<serde_json::Value> {
        let request = self
            .request(Method::POST, &["admin", "feature"])?
            .headers(admin_headers(credentials)?)
            .json(&serde_json::json!({ "appId": app_id, "featured": featured }));
        send_json(request).await
    }

    pub async fn hide_app(
        &self,
        app_id: AppId,
        credentials: &AdminCredentials,
    ) -> ClientResult<serde_json::Value> {
        let request = self
            .request(Method::POST, &["admin", "hide"])?
            .headers(admin_headers(credentials)?)
            .json(&serde_json::json!({ "appId": app_id }));
        send_json(request).await
    }
}

fn file_part(file: FileUpload) -> ClientResult<Part> {
    Part::bytes(file.bytes)
        .file_name(file.file_name)
        .mime_str(&file.mime_type)
        .map_err(|e| ClientError::InvalidRequest(e.to_string()))
}

fn admin_headers(credentials: &AdminCredentials) -> ClientResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in [
        (WALLET_ADDRESS, &credentials.address),
        (X_ADMIN_CHALLENGE, &credentials.challenge_id),
        (X_ADMIN_SIGNATURE, &credentials.signature),
    ] {
        let value = HeaderValue::from_str(value)
            .map_err(|_| ClientError::InvalidRequest(format!("invalid {name} header")))?;
        headers.insert(HeaderName::from_static(name), value);
    }
    Ok(headers)
}

/// Send and decode a JSON answer; non-2xx becomes `ClientError::Http`
async fn send_json<T>(request: RequestBuilder) -> ClientResult<T>
where
    T: DeserializeOwned,
{
    let response = request.send().await?;
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let message = message_from_body(&body)
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
        tracing::debug!(status = status.as_u16(), message = %message, "API call failed");
        return Err(ClientError::Http {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_slice(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_proxied() {
        let base = ApiBase::Proxied(Url::parse("https://hub.example").unwrap());
        assert_eq!(
            base.endpoint(&["apps", "3"]).unwrap().as_str(),
            "https://hub.example/api/apps/3"
        );
    }

    #[test]
    fn test_endpoint_direct_keeps_base_path() {
        let base = ApiBase::Direct(Url::parse("http://backend:8080/v1/").unwrap());
        assert_eq!(
            base.endpoint(&["config"]).unwrap().as_str(),
            "http://backend:8080/v1/config"
        );
    }

    #[test]
    fn test_endpoint_rejects_opaque_base() {
        let base = ApiBase::Direct(Url::parse("mailto:admin@hub.example").unwrap());
        assert!(matches!(
            base.endpoint(&["config"]),
            Err(ClientError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_apps_params_query() {
        let params = AppsParams {
            page: 2,
            page_size: 12,
            featured: false,
            category: Some("DeFi".to_string()),
        };
        assert_eq!(
            params.to_query(),
            vec![
                ("page", "2".to_string()),
                ("pageSize", "12".to_string()),
                ("category", "DeFi".to_string()),
            ]
        );

        let params = AppsParams {
            featured: true,
            category: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            params.to_query(),
            vec![
                ("page", "1".to_string()),
                ("pageSize", "20".to_string()),
                ("featured", "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_admin_headers() {
        let credentials = AdminCredentials {
            address: "0xabc".to_string(),
            challenge_id: "c-1".to_string(),
            signature: "0xsig".to_string(),
        };
        let headers = admin_headers(&credentials).unwrap();
        assert_eq!(headers.get("wallet-address").unwrap(), "0xabc");
        assert_eq!(headers.get("x-admin-challenge").unwrap(), "c-1");
        assert_eq!(headers.get("x-admin-signature").unwrap(), "0xsig");
    }
}
