//! Credential resolution for provider adapters

pub mod credentials;

pub use credentials::{
    resolve_credentials, CredentialResolver, CredentialSpec, EnvCredentials, ExplicitCredentials,
    ResolvedCredentials, StaticCredentials,
};
