//! Status checking and decoding for provider calls

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use super::caller::AsyncCaller;
use super::transport::{HttpRequest, HttpTransport, RawResponse};
use crate::llm::core::config::CallOptions;
use crate::llm::core::error::AdapterError;

/// Issues one logical request per invocation through the shared caller
#[derive(Clone)]
pub struct CallExecutor {
    /// Human-readable provider name used in error messages
    provider: &'static str,
    caller: AsyncCaller,
    transport: Arc<dyn HttpTransport>,
}

impl CallExecutor {
    pub fn new(provider: &'static str, caller: AsyncCaller, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            provider,
            caller,
            transport,
        }
    }

    pub fn provider(&self) -> &'static str {
        self.provider
    }

    pub fn caller(&self) -> &AsyncCaller {
        &self.caller
    }

    /// POST `request` and return the successful raw response
    ///
    /// # Errors
    ///
    /// - `HttpStatus` carrying the original response on any non-2xx status
    /// - `Transport` when no response was received
    /// - `Cancelled` / `Timeout` per `options`
    pub async fn send(&self, request: HttpRequest, options: &CallOptions) -> Result<RawResponse, AdapterError> {
        let provider = self.provider;
        debug!(provider, url = %request.url, "sending provider request");

        self.caller
            .call(options, || {
                let transport = Arc::clone(&self.transport);
                let request = request.clone();
                async move {
                    let response = transport.post_json(request).await?;
                    check_status(provider, response)
                }
            })
            .await
    }

    /// POST `request` and decode the successful body as `T`
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
        options: &CallOptions,
    ) -> Result<T, AdapterError> {
        self.send(request, options).await?.json()
    }
}

fn check_status(provider: &str, response: RawResponse) -> Result<RawResponse, AdapterError> {
    if response.is_success() {
        return Ok(response);
    }

    Err(AdapterError::HttpStatus {
        provider: provider.to_string(),
        status: response.status,
        url: response.url.clone(),
        response,
    })
}
