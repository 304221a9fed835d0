//! Credential and endpoint resolution
//!
//! Adapters never read the process environment directly. They ask a
//! `CredentialResolver`, which is `EnvCredentials` in production and usually
//! `StaticCredentials` in tests.

use std::collections::HashMap;
use std::fmt;

use secrecy::SecretString;

use crate::llm::core::error::AdapterError;

/// Looks up credential values by environment variable name
pub trait CredentialResolver: Send + Sync {
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Reads the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialResolver for EnvCredentials {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A fixed in-memory set of values
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    values: HashMap<String, String>,
}

impl StaticCredentials {
    /// A resolver that knows nothing
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl CredentialResolver for StaticCredentials {
    fn lookup(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Where a provider looks for its credentials
#[derive(Debug, Clone)]
pub struct CredentialSpec {
    /// Variable holding the API key
    pub api_key_var: &'static str,
    /// Variable holding the organization/account id, if the provider has one
    pub organization_var: Option<&'static str>,
    /// Variable holding a base URL override, if the provider honors one
    pub base_url_var: Option<&'static str>,
    /// Base URL used when nothing overrides it
    pub default_base_url: String,
}

/// Validated credentials for one adapter instance
#[derive(Clone)]
pub struct ResolvedCredentials {
    pub api_key: SecretString,
    pub organization: Option<String>,
    /// Base URL without a trailing slash
    pub base_url: String,
}

impl fmt::Debug for ResolvedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedCredentials")
            .field("api_key", &"[REDACTED]")
            .field("organization", &self.organization)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Explicit values supplied by the caller
#[derive(Default, Clone, Copy)]
pub struct ExplicitCredentials<'a> {
    pub api_key: Option<&'a str>,
    pub organization: Option<&'a str>,
    pub base_url: Option<&'a str>,
}

/// Resolve credentials, preferring explicit values over the resolver
///
/// Empty strings count as absent on both sides.
///
/// # Errors
///
/// Returns `MissingCredential` naming `api_key` and the consulted variable
/// when no API key can be found.
pub fn resolve_credentials(
    spec: &CredentialSpec,
    explicit: ExplicitCredentials<'_>,
    resolver: &dyn CredentialResolver,
) -> Result<ResolvedCredentials, AdapterError> {
    let api_key = pick(explicit.api_key, Some(spec.api_key_var), resolver).ok_or_else(|| {
        AdapterError::MissingCredential {
            field: "api_key".to_string(),
            env_var: spec.api_key_var.to_string(),
        }
    })?;

    let organization = pick(explicit.organization, spec.organization_var, resolver);

    let base_url = pick(explicit.base_url, spec.base_url_var, resolver)
        .unwrap_or_else(|| spec.default_base_url.clone())
        .trim_end_matches('/')
        .to_string();

    Ok(ResolvedCredentials {
        api_key: SecretString::from(api_key),
        organization,
        base_url,
    })
}

fn pick(
    explicit: Option<&str>,
    env_var: Option<&str>,
    resolver: &dyn CredentialResolver,
) -> Option<String> {
    explicit
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| env_var.and_then(|var| resolver.lookup(var)).filter(|v| !v.is_empty()))
}
