//! Provider adapter layer
//!
//! Uniform completion, moderation and embedding interfaces over AI21 Studio,
//! Aleph Alpha and OpenAI. Every adapter is built the same way: credentials are
//! resolved from explicit options or the environment, the request is assembled
//! from per-instance defaults and per-call options, and the call goes through a
//! shared executor that handles retries, cancellation and concurrency limits.

pub mod ai21;
pub mod aleph_alpha;
pub mod auth;
pub mod chains;
pub mod core;
pub mod http;
pub mod openai;
pub mod tools;
pub mod vectorstores;

// Re-export commonly used types
pub use self::core::{
    config::{merge_stop_sequences, CallOptions, ClientOptions},
    error::AdapterError,
    provider::{create_llm, Embeddings, Llm},
    types::{Generation, LlmResult, Model, ModerationVerdict, ToolDeclaration},
};

pub use ai21::{Ai21, Ai21Config, PenaltyDescriptor};
pub use aleph_alpha::{AlephAlpha, AlephAlphaConfig};
pub use auth::{CredentialResolver, EnvCredentials, StaticCredentials};
pub use chains::{Chain, ChainValues, ModerationChain};
pub use http::{AsyncCaller, HttpTransport, MockTransport, RetryPolicy};
pub use openai::{OpenAiEmbeddings, OpenAiEmbeddingsConfig, OpenAiModeration, OpenAiModerationConfig};
pub use tools::{StructuredTool, ToolExecutor, ToolRegistry};
pub use vectorstores::{Document, MemoryVectorStore, VectorStore};
