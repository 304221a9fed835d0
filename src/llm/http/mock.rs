//! Scripted transport for exercising adapters without a network

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::transport::{HttpRequest, HttpTransport, RawResponse};
use crate::llm::core::error::AdapterError;

/// One scripted outcome
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Answer with this response (an empty `url` is filled in from the request)
    Response(RawResponse),
    /// Fail as if no response was received
    Failure(String),
}

/// An `HttpTransport` that replays scripted replies in order
///
/// The last scripted reply is repeated once the queue is down to one entry,
/// so retried calls keep seeing the same outcome.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<HttpRequest>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response
    pub fn with_json(self, status: u16, body: serde_json::Value) -> Self {
        self.with_reply(MockReply::Response(RawResponse::json_body(status, "", &body)))
    }

    /// Queue a transport failure
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.with_reply(MockReply::Failure(message.into()))
    }

    /// Queue an arbitrary reply
    pub fn with_reply(self, reply: MockReply) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply);
        self
    }

    /// Wait this long before answering each request
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of requests that reached the transport
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// The most recent request
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }

    fn next_reply(&self) -> Option<MockReply> {
        let mut replies = self.replies.lock().unwrap_or_else(|e| e.into_inner());
        if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        }
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn post_json(&self, request: HttpRequest) -> Result<RawResponse, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.next_reply() {
            Some(MockReply::Response(mut response)) => {
                if response.url.is_empty() {
                    response.url = request.url;
                }
                Ok(response)
            }
            Some(MockReply::Failure(message)) => Err(AdapterError::Transport {
                url: request.url,
                message,
            }),
            None => Err(AdapterError::Transport {
                url: request.url,
                message: "no scripted reply".to_string(),
            }),
        }
    }
}
