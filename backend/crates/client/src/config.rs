//! Runtime Configuration
//!
//! The hub's public configuration is fetched once per provider from
//! `{api}/config`. If that fails the static `/config.json` on the site is
//! tried. Concurrent first callers share the single in-flight load.

use crate::api::ApiBase;
use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;
use url::Url;

/// Error reported when neither source yields a configuration
pub const CONFIG_LOAD_ERROR: &str = "Failed to load configuration";
/// Hub name without a configuration
pub const DEFAULT_HUB_NAME: &str = "Chain App Hub";
/// Chain label without a configuration
pub const DEFAULT_CHAIN_LABEL: &str = "blockchain";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logos {
    #[serde(default)]
    pub light: String,
    #[serde(default)]
    pub dark: String,
}

/// Optional feature modules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Module {
    /// Proof of engagement leaderboard
    Poe,
    Boosting,
    Reviews,
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Module::Poe => "poe",
            Module::Boosting => "boosting",
            Module::Reviews => "reviews",
        };
        f.write_str(name)
    }
}

/// Module switches. Absent flags read as disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledModules {
    #[serde(default)]
    pub poe: bool,
    #[serde(default)]
    pub boosting: bool,
    #[serde(default)]
    pub reviews: bool,
}

impl EnabledModules {
    pub fn all() -> Self {
        Self {
            poe: true,
            boosting: true,
            reviews: true,
        }
    }

    pub fn is_enabled(&self, module: Module) -> bool {
        match module {
            Module::Poe => self.poe,
            Module::Boosting => self.boosting,
            Module::Reviews => self.reviews,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingFee {
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub token: String,
}

/// Public hub configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    #[serde(default)]
    pub chain_name: String,
    #[serde(default)]
    pub primary_token: String,
    #[serde(default)]
    pub rpc_url: String,
    #[serde(default)]
    pub explorer_url: String,
    #[serde(default)]
    pub logos: Logos,
    #[serde(default)]
    pub enable_modules: EnabledModules,
    #[serde(default)]
    pub listing_fee: ListingFee,
    /// Backend address for direct calls; only the static document has it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,
}

impl RuntimeConfig {
    pub fn is_enabled(&self, module: Module) -> bool {
        self.enable_modules.is_enabled(module)
    }
}

/// Display strings derived from the configuration, with defaults when absent
#[derive(Debug, Clone, Copy)]
pub struct Branding<'a> {
    config: Option<&'a RuntimeConfig>,
}

impl<'a> Branding<'a> {
    pub fn new(config: Option<&'a RuntimeConfig>) -> Self {
        Self { config }
    }

    fn chain_name(&self) -> Option<&'a str> {
        self.config
            .map(|c| c.chain_name.as_str())
            .filter(|name| !name.is_empty())
    }

    pub fn hub_name(&self) -> &'a str {
        self.chain_name().unwrap_or(DEFAULT_HUB_NAME)
    }

    /// Chain name used in running text ("Browse apps on ...")
    pub fn chain_label(&self) -> &'a str {
        self.chain_name().unwrap_or(DEFAULT_CHAIN_LABEL)
    }

    /// `"{page} | {hub}"`, e.g. `"Apps | Chain App Hub"`
    pub fn page_title(&self, page: &str) -> String {
        format!("{} | {}", page, self.hub_name())
    }

    /// Symbol shown next to boost totals
    pub fn token_symbol(&self) -> &'a str {
        self.config
            .map(|c| c.primary_token.as_str())
            .filter(|token| !token.is_empty())
            .unwrap_or("tokens")
    }

    /// `"{amount} {token}"`, absent when no fee is configured
    pub fn listing_fee_label(&self) -> Option<String> {
        let fee = &self.config?.listing_fee;
        if fee.amount.is_empty() {
            return None;
        }
        Some(format!("{} {}", fee.amount, fee.token).trim_end().to_string())
    }

    pub fn logo(&self, dark: bool) -> Option<&'a str> {
        let logos = &self.config?.logos;
        let path = if dark { &logos.dark } else { &logos.light };
        Some(path.as_str()).filter(|p| !p.is_empty())
    }
}

/// Outcome of the one-time load
#[derive(Debug, Clone)]
struct ConfigLoad {
    config: Option<Arc<RuntimeConfig>>,
    error: Option<String>,
}

/// What a page sees while rendering
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSnapshot {
    pub loading: bool,
    pub config: Option<Arc<RuntimeConfig>>,
    pub error: Option<String>,
}

impl ConfigSnapshot {
    pub fn is_enabled(&self, module: Module) -> bool {
        self.config.as_ref().is_some_and(|c| c.is_enabled(module))
    }

    pub fn branding(&self) -> Branding<'_> {
        Branding::new(self.config.as_deref())
    }
}

/// Fetches the runtime configuration once and caches it
#[derive(Debug)]
pub struct ConfigProvider {
    http: reqwest::Client,
    config_url: Url,
    fallback_url: Url,
    state: OnceCell<ConfigLoad>,
}

impl ConfigProvider {
    pub fn new(http: reqwest::Client, config_url: Url, fallback_url: Url) -> Self {
        Self {
            http,
            config_url,
            fallback_url,
            state: OnceCell::new(),
        }
    }

    /// Provider for a site: `{api}/config`, then `{site}/config.json`
    pub fn for_site(http: reqwest::Client, api: &ApiBase, site: &Url) -> ClientResult<Self> {
        let config_url = api.endpoint(&["config"])?;
        let fallback_url = site
            .join("/config.json")
            .map_err(|e| ClientError::InvalidBaseUrl(e.to_string()))?;
        Ok(Self::new(http, config_url, fallback_url))
    }

    /// Load on first call; later calls return the cached outcome
    pub async fn load(&self) -> ConfigSnapshot {
        let load = self.state.get_or_init(|| self.fetch()).await;
        ConfigSnapshot {
            loading: false,
            config: load.config.clone(),
            error: load.error.clone(),
        }
    }

    /// Current state without triggering a load
    pub fn snapshot(&self) -> ConfigSnapshot {
        match self.state.get() {
            Some(load) => ConfigSnapshot {
                loading: false,
                config: load.config.clone(),
                error: load.error.clone(),
            },
            None => ConfigSnapshot {
                loading: true,
                config: None,
                error: None,
            },
        }
    }

    pub async fn config(&self) -> Option<Arc<RuntimeConfig>> {
        self.load().await.config
    }

    /// Disabled when the module is off or no configuration could be loaded
    pub async fn is_enabled(&self, module: Module) -> bool {
        self.load().await.is_enabled(module)
    }

    async fn fetch(&self) -> ConfigLoad {
        match self.fetch_from(&self.config_url).await {
            Ok(config) => {
                tracing::debug!(url = %self.config_url, "Loaded runtime config");
                return ConfigLoad {
                    config: Some(Arc::new(config)),
                    error: None,
                };
            }
            Err(e) => {
                tracing::warn!(url = %self.config_url, error = %e, "Config endpoint failed, trying static fallback");
            }
        }

        match self.fetch_from(&self.fallback_url).await {
            Ok(config) => {
                tracing::debug!(url = %self.fallback_url, "Loaded static runtime config");
                ConfigLoad {
                    config: Some(Arc::new(config)),
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!(url = %self.fallback_url, error = %e, "Error fetching config");
                ConfigLoad {
                    config: None,
                    error: Some(CONFIG_LOAD_ERROR.to_string()),
                }
            }
        }
    }

    async fn fetch_from(&self, url: &Url) -> ClientResult<RuntimeConfig> {
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Http {
                status: status.as_u16(),
                message: format!("config fetch failed with status {status}"),
            });
        }
        Ok(response.json::<RuntimeConfig>().await?)
    }
}
