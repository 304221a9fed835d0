//! AI21 Studio provider implementation
//!
//! Completion adapter for the Jurassic model family. Unlike most providers,
//! AI21 takes structured penalty descriptors for presence, count and frequency
//! penalties.

pub mod client;
pub mod config;
pub mod mapper;
pub mod types;

// Re-export commonly used types
pub use client::{Ai21, AI21_API_KEY_VAR};
pub use config::Ai21Config;
pub use types::PenaltyDescriptor;
