//! Deterministic client that replays queued replies.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::client::{CompletionRequest, LlmClient, LlmError};

/// Replays replies in order and records every request it saw.
///
/// Once the queue is empty the last reply repeats if `repeat_last` is set,
/// otherwise `complete` fails with [`LlmError::Exhausted`].
pub struct ScriptedClient {
    model: String,
    replies: Mutex<VecDeque<Result<String, String>>>,
    last: Mutex<Option<Result<String, String>>>,
    repeat_last: bool,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    /// Create an empty script.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            replies: Mutex::new(VecDeque::new()),
            last: Mutex::new(None),
            repeat_last: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply.
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()));
        self
    }

    /// Queue a failure.
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.push(Err(message.into()));
        self
    }

    /// Keep answering with the last reply once the queue runs dry.
    pub fn repeat_last(mut self) -> Self {
        self.repeat_last = true;
        self
    }

    fn push(&self, item: Result<String, String>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(item);
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let next = self.replies.lock().ok().and_then(|mut r| r.pop_front());
        let item = match next {
            Some(item) => {
                if let Ok(mut last) = self.last.lock() {
                    *last = Some(item.clone());
                }
                item
            }
            None if self.repeat_last => self
                .last
                .lock()
                .ok()
                .and_then(|l| l.clone())
                .ok_or_else(|| LlmError::Exhausted(self.model.clone()))?,
            None => return Err(LlmError::Exhausted(self.model.clone())),
        };

        item.map_err(LlmError::InvalidResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order() {
        let client = ScriptedClient::new("m").reply("one").fail("boom").reply("two");
        let req = CompletionRequest::new("p");
        assert_eq!(client.complete(&req).await.unwrap(), "one");
        assert!(client.complete(&req).await.is_err());
        assert_eq!(client.complete(&req).await.unwrap(), "two");
        assert!(matches!(client.complete(&req).await, Err(LlmError::Exhausted(_))));
        assert_eq!(client.call_count(), 4);
    }

    #[tokio::test]
    async fn test_repeat_last() {
        let client = ScriptedClient::new("m").reply("same").repeat_last();
        let req = CompletionRequest::new("p");
        for _ in 0..3 {
            assert_eq!(client.complete(&req).await.unwrap(), "same");
        }
        assert_eq!(client.requests()[2].prompt, "p");
    }
}
