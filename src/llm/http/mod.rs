//! Outbound HTTP plumbing shared by every adapter
//!
//! - `transport`: the single JSON POST seam (`HttpTransport`) and its reqwest implementation
//! - `caller`: retry/backoff, cancellation and concurrency limiting (`AsyncCaller`)
//! - `executor`: status checking and JSON decoding on top of the two (`CallExecutor`)
//! - `mock`: a scripted transport for tests

pub mod caller;
pub mod executor;
pub mod mock;
pub mod transport;

pub use caller::{AsyncCaller, RetryPolicy};
pub use executor::CallExecutor;
pub use mock::{MockReply, MockTransport};
pub use transport::{HttpRequest, HttpTransport, RawResponse, ReqwestTransport};
