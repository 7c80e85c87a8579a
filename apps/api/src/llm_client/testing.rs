//! In-memory completion services for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{CompletionRequest, CompletionService, LlmError};

type Responder = dyn Fn(&CompletionRequest) -> Result<String, LlmError> + Send + Sync;

enum Mode {
    Queue(Mutex<VecDeque<Result<String, LlmError>>>),
    Respond(Box<Responder>),
    Hang,
}

/// Completion service fed by a script. Records every request it receives.
pub struct ScriptedCompletion {
    mode: Mode,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    /// Replies in order; once the queue runs dry every call fails.
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self::with_mode(Mode::Queue(Mutex::new(replies.into())))
    }

    /// Every call fails with an API error.
    pub fn failing() -> Self {
        Self::new(vec![])
    }

    /// Replies computed from the request, for order-independent concurrent callers.
    pub fn responding<F>(responder: F) -> Self
    where
        F: Fn(&CompletionRequest) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Self::with_mode(Mode::Respond(Box::new(responder)))
    }

    /// Never replies.
    pub fn hanging() -> Self {
        Self::with_mode(Mode::Hang)
    }

    fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

pub fn unavailable() -> LlmError {
    LlmError::Api {
        status: 503,
        message: "service unavailable".to_string(),
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Mode::Hang = self.mode {
            return std::future::pending().await;
        }
        match &self.mode {
            Mode::Queue(queue) => {
                let next = queue.lock().unwrap().pop_front();
                next.unwrap_or_else(|| Err(unavailable()))
            }
            Mode::Respond(responder) => responder(request),
            Mode::Hang => unreachable!(),
        }
    }
}
