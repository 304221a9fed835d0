//! Call-time options and adapter construction options

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::error::AdapterError;
use crate::llm::auth::{
    resolve_credentials, CredentialResolver, CredentialSpec, EnvCredentials, ExplicitCredentials,
    ResolvedCredentials,
};
use crate::llm::http::{AsyncCaller, CallExecutor, HttpTransport, ReqwestTransport, RetryPolicy};

/// Options supplied with a single call
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Stop sequences for this call only
    pub stop: Option<Vec<String>>,
    /// Cancelling this token aborts the in-flight request
    pub signal: Option<CancellationToken>,
    /// Upper bound for the whole call, retries included
    pub timeout: Option<Duration>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set stop sequences
    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Attach a cancellation token
    pub fn with_signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Combine configured and call-time stop sequences
///
/// Returns whichever side is non-empty, or an empty list when neither is set.
///
/// # Errors
///
/// Returns `ConflictingParameter` when both sides are non-empty.
pub fn merge_stop_sequences(
    configured: Option<&[String]>,
    call_time: Option<&[String]>,
) -> Result<Vec<String>, AdapterError> {
    let configured = configured.unwrap_or_default();
    let call_time = call_time.unwrap_or_default();

    match (configured.is_empty(), call_time.is_empty()) {
        (false, false) => Err(AdapterError::ConflictingParameter {
            name: "stop".to_string(),
            reason: "stop sequences were set both in the adapter configuration and in the call options"
                .to_string(),
        }),
        (false, true) => Ok(configured.to_vec()),
        _ => Ok(call_time.to_vec()),
    }
}

/// How an adapter authenticates and talks to its provider
///
/// Everything is optional: credentials fall back to the resolver (the process
/// environment by default), the transport to a fresh `ReqwestTransport`.
#[derive(Clone, Default)]
pub struct ClientOptions {
    /// API key; wins over the resolver
    pub api_key: Option<String>,
    /// Organization/account id; wins over the resolver
    pub organization: Option<String>,
    /// Base URL override; wins over the resolver and the provider default
    pub base_url: Option<String>,
    /// Retry policy for the shared caller
    pub retry: RetryPolicy,
    /// Maximum in-flight requests for this adapter
    pub max_concurrency: Option<usize>,
    /// Credential lookup used for fallback values
    pub resolver: Option<Arc<dyn CredentialResolver>>,
    /// Transport override
    pub transport: Option<Arc<dyn HttpTransport>>,
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = Some(max);
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn CredentialResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Resolve credentials for a provider
    pub fn resolve_credentials(&self, spec: &CredentialSpec) -> Result<ResolvedCredentials, AdapterError> {
        let explicit = ExplicitCredentials {
            api_key: self.api_key.as_deref(),
            organization: self.organization.as_deref(),
            base_url: self.base_url.as_deref(),
        };

        match &self.resolver {
            Some(resolver) => resolve_credentials(spec, explicit, resolver.as_ref()),
            None => resolve_credentials(spec, explicit, &EnvCredentials),
        }
    }

    /// Build the call executor an adapter sends through
    pub fn build_executor(&self, provider: &'static str) -> Result<CallExecutor, AdapterError> {
        let transport: Arc<dyn HttpTransport> = match &self.transport {
            Some(transport) => Arc::clone(transport),
            None => Arc::new(ReqwestTransport::new()?),
        };

        let mut caller = AsyncCaller::new(self.retry.clone());
        if let Some(max) = self.max_concurrency {
            caller = caller.with_max_concurrency(max);
        }

        Ok(CallExecutor::new(provider, caller, transport))
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("organization", &self.organization)
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .field("max_concurrency", &self.max_concurrency)
            .field("resolver", &self.resolver.is_some())
            .field("transport", &self.transport.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::auth::StaticCredentials;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_call_options_builder() {
        let token = CancellationToken::new();
        let options = CallOptions::new()
            .with_stop(strings(&["\n"]))
            .with_signal(token)
            .with_timeout(Duration::from_secs(3));

        assert_eq!(options.stop, Some(strings(&["\n"])));
        assert!(options.signal.is_some());
        assert_eq!(options.timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_merge_stop_conflict() {
        let configured = strings(&["###"]);
        let call_time = strings(&["\n"]);
        let err = merge_stop_sequences(Some(configured.as_slice()), Some(call_time.as_slice())).unwrap_err();
        assert!(matches!(err, AdapterError::ConflictingParameter { ref name, .. } if name == "stop"));
    }

    #[test]
    fn test_merge_stop_prefers_non_empty_side() {
        let configured = strings(&["###"]);
        let call_time = strings(&["\n"]);

        let empty: &[String] = &[];

        assert_eq!(merge_stop_sequences(Some(configured.as_slice()), None).unwrap(), configured);
        assert_eq!(merge_stop_sequences(Some(configured.as_slice()), Some(empty)).unwrap(), configured);
        assert_eq!(merge_stop_sequences(Some(empty), Some(call_time.as_slice())).unwrap(), call_time);
        assert_eq!(merge_stop_sequences(None, Some(call_time.as_slice())).unwrap(), call_time);
        assert!(merge_stop_sequences(None, None).unwrap().is_empty());
    }

    #[test]
    fn test_client_options_debug_redacts_key() {
        let options = ClientOptions::new().with_api_key("sk-123456");
        let debug = format!("{:?}", options);
        assert!(!debug.contains("sk-123456"));
    }

    #[test]
    fn test_client_options_uses_injected_resolver() {
        let options = ClientOptions::new()
            .with_resolver(Arc::new(StaticCredentials::empty().with("SOME_KEY", "abc")));
        let spec = CredentialSpec {
            api_key_var: "SOME_KEY",
            organization_var: None,
            base_url_var: None,
            default_base_url: "https://example.com/".to_string(),
        };

        let resolved = options.resolve_credentials(&spec).unwrap();
        assert_eq!(resolved.base_url, "https://example.com");
    }
}
