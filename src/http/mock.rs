//! In-memory transport for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{HttpRequest, HttpResponse, Transport};
use crate::error::{ElasticEmailError, ElasticEmailResult};

enum Reply {
    Response(HttpResponse),
    Failure(String),
}

/// Mock transport that records requests and replays queued replies in order.
///
/// When the queue is empty every request fails with a transport error.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    /// Create a mock with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn queue_response(&self, response: HttpResponse) -> &Self {
        self.lock_replies().push_back(Reply::Response(response));
        self
    }

    /// Queue a JSON response.
    pub fn queue_json_response(&self, status: u16, body: &serde_json::Value) -> &Self {
        let mut response = HttpResponse::new(status, body.to_string());
        response
            .headers
            .insert("content-type".to_string(), "application/json".to_string());
        self.queue_response(response)
    }

    /// Queue a transport failure carrying `message`.
    pub fn queue_failure(&self, message: impl Into<String>) -> &Self {
        self.lock_replies().push_back(Reply::Failure(message.into()));
        self
    }

    /// Every request sent so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock_requests().clone()
    }

    /// The most recent request.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.lock_requests().last().cloned()
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, VecDeque<Reply>> {
        self.replies.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, Vec<HttpRequest>> {
        self.requests.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> ElasticEmailResult<HttpResponse> {
        self.lock_requests().push(request);

        match self.lock_replies().pop_front() {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Failure(message)) => Err(ElasticEmailError::transport(message, true)),
            None => Err(ElasticEmailError::transport(
                "No mock response available",
                false,
            )),
        }
    }
}
