//! Core abstractions for the adapter layer

pub mod config;
pub mod error;
pub mod provider;
pub mod types;
