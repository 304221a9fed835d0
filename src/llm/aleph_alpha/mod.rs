//! Aleph Alpha provider implementation

pub mod client;
pub mod config;
pub mod types;

pub use client::{AlephAlpha, ALEPH_ALPHA_API_KEY_VAR};
pub use config::AlephAlphaConfig;
pub use types::SamplingParams;
