//! OpenAI moderation and embeddings adapters
//!
//! Both endpoints share credential resolution: `OPENAI_API_KEY`,
//! `OPENAI_ORGANIZATION` and `OPENAI_BASE_URL`.

pub mod embeddings;
pub mod moderation;
pub mod types;

pub use embeddings::{OpenAiEmbeddings, OpenAiEmbeddingsConfig};
pub use moderation::{OpenAiModeration, OpenAiModerationConfig};

use crate::llm::auth::{CredentialSpec, ResolvedCredentials};
use crate::llm::http::HttpRequest;

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const OPENAI_ORGANIZATION_VAR: &str = "OPENAI_ORGANIZATION";
pub const OPENAI_BASE_URL_VAR: &str = "OPENAI_BASE_URL";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

fn credential_spec() -> CredentialSpec {
    CredentialSpec {
        api_key_var: OPENAI_API_KEY_VAR,
        organization_var: Some(OPENAI_ORGANIZATION_VAR),
        base_url_var: Some(OPENAI_BASE_URL_VAR),
        default_base_url: DEFAULT_BASE_URL.to_string(),
    }
}

/// POST `body` to `{base_url}/{path}` with bearer and organization headers
fn build_request(credentials: &ResolvedCredentials, path: &str, body: serde_json::Value) -> HttpRequest {
    let request = HttpRequest::post_json(format!("{}/{}", credentials.base_url, path), body)
        .bearer_auth(&credentials.api_key);

    match &credentials.organization {
        Some(organization) => request.header("OpenAI-Organization", organization.as_str()),
        None => request,
    }
}
