//! Data Transfer Objects

use serde::{Deserialize, Serialize};

/// Body of `POST /admin/feature` and `POST /admin/hide`.
///
/// Only `appId` is inspected; the body is forwarded unchanged.
#[derive(Debug, Deserialize)]
pub struct AdminAppRequest {
    #[serde(rename = "appId", default)]
    pub app_id: Option<serde_json::Value>,
}

impl AdminAppRequest {
    pub fn has_app_id(&self) -> bool {
        match &self.app_id {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }
}

/// Backend answer for `GET /admin/verify`
#[derive(Debug, Default, Deserialize)]
pub struct VerifyBackendResponse {
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
}

/// Response for `GET /admin/verify`
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}
