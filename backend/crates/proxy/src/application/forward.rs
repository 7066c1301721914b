//! Forward Use Case
//!
//! The single forwarding function every route goes through.

use crate::domain::backend::Backend;
use crate::domain::entities::{BackendResponse, ForwardRequest};
use crate::domain::services::upstream_error_message;
use crate::domain::value_objects::FailurePolicy;
use crate::error::{ProxyError, ProxyResult};
use std::sync::Arc;

pub struct ForwardUseCase<B>
where
    B: Backend,
{
    backend: Arc<B>,
}

impl<B> ForwardUseCase<B>
where
    B: Backend,
{
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Forward `request` and classify the outcome.
    ///
    /// `Ok` only for 2xx answers. Failures follow `policy`.
    pub async fn execute(
        &self,
        request: ForwardRequest,
        policy: FailurePolicy,
    ) -> ProxyResult<BackendResponse> {
        let method = request.method.clone();
        let path = request.path.to_string();

        tracing::debug!(method = %method, path = %path, "Forwarding request");

        let result = match self.backend.send(request).await {
            Ok(response) if response.is_success() => Ok(response),
            Ok(response) => Err(ProxyError::Upstream {
                status: response.status,
                message: upstream_error_message(&response.body),
            }),
            Err(e) => Err(e),
        };

        match (result, policy) {
            (Ok(response), _) => {
                tracing::debug!(
                    method = %method,
                    path = %path,
                    status = response.status.as_u16(),
                    "Backend responded"
                );
                Ok(response)
            }
            (Err(e), FailurePolicy::Collapse(message)) => {
                tracing::warn!(method = %method, path = %path, error = %e, "Collapsing backend failure");
                Err(ProxyError::Collapsed(message))
            }
            (Err(e), FailurePolicy::Passthrough) => Err(e),
        }
    }
}
