//! Backend Trait
//!
//! The service every proxied request ends up at. Implementation is in the
//! infra layer.

use crate::domain::entities::{BackendResponse, ForwardRequest};
use crate::error::ProxyResult;

#[trait_variant::make(Backend: Send)]
pub trait LocalBackend {
    /// Send the request. Any HTTP answer, including 4xx/5xx, is `Ok`;
    /// `Err` means the backend was not reached.
    async fn send(&self, request: ForwardRequest) -> ProxyResult<BackendResponse>;
}
