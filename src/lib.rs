//! Provider adapters for hosted language model services
//!
//! See [`llm`] for the adapter layer.

pub mod llm;
