//! Dialogue Orchestrator: runs the fixed state machine for one user turn and
//! keeps the session's rolling history.
//!
//! Flow: Start → ClassifyIntent → (ExtractFilters | HelpResponse) →
//!       GenerateResponse → Done. See `state::next_step`.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error};

use crate::assistant::filters::{extract_filters, FilterDelta};
use crate::assistant::generator::{generate_reply, help_reply, CONTEXT_WINDOW};
use crate::assistant::intent::{classify_intent, Intent};
use crate::assistant::prompts::{APOLOGY_REPLY, DEFAULT_REPLY};
use crate::assistant::state::{next_step, ConversationState, StateUpdate, Step};
use crate::llm_client::{ChatMessage, CompletionService, LlmError};

/// Max messages kept in a session's history. Oldest are dropped first.
pub const HISTORY_LIMIT: usize = 10;

/// Result of one chat turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub intent: Intent,
    pub filters: FilterDelta,
}

impl ChatReply {
    fn apology() -> Self {
        Self {
            response: APOLOGY_REPLY.to_string(),
            intent: Intent::General,
            filters: FilterDelta::default(),
        }
    }
}

/// One session's assistant. Turns must run one at a time (`chat` takes `&mut self`).
pub struct Assistant {
    llm: Arc<dyn CompletionService>,
    call_timeout: Duration,
    history: Vec<ChatMessage>,
}

impl Assistant {
    pub fn new(llm: Arc<dyn CompletionService>, call_timeout: Duration) -> Self {
        Self {
            llm,
            call_timeout,
            history: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Handles one user message. Never fails: if the reply cannot be
    /// generated the turn answers with a fixed apology, GENERAL, no filters.
    pub async fn chat(&mut self, message: &str) -> ChatReply {
        let message = message.trim();
        let window_start = self.history.len().saturating_sub(CONTEXT_WINDOW);
        let context = self.history[window_start..].to_vec();
        self.history.push(ChatMessage::user(message));

        let reply = match self.run_turn(message, &context).await {
            Ok(state) => {
                let response = if state.response.trim().is_empty() {
                    DEFAULT_REPLY.to_string()
                } else {
                    state.response
                };
                self.history.push(ChatMessage::assistant(response.clone()));
                ChatReply {
                    response,
                    intent: state.intent.unwrap_or(Intent::General),
                    filters: state.filters,
                }
            }
            Err(e) => {
                error!("Assistant turn failed: {e}");
                ChatReply::apology()
            }
        };

        self.trim_history();
        reply
    }

    async fn run_turn(
        &self,
        message: &str,
        context: &[ChatMessage],
    ) -> Result<ConversationState, LlmError> {
        let llm = self.llm.as_ref();
        let mut state = ConversationState::new(ChatMessage::user(message));
        let mut step = Step::Start;

        while step != Step::Done {
            let update = match step {
                Step::Start | Step::Done => StateUpdate::default(),
                Step::ClassifyIntent => {
                    StateUpdate::intent(classify_intent(message, llm, self.call_timeout).await)
                }
                Step::ExtractFilters => {
                    StateUpdate::filters(extract_filters(message, llm, self.call_timeout).await)
                }
                Step::HelpResponse => StateUpdate::reply(help_reply(message).to_string()),
                Step::GenerateResponse => {
                    let intent = state.intent.unwrap_or(Intent::General);
                    let reply = generate_reply(
                        message,
                        intent,
                        &state.filters,
                        context,
                        llm,
                        self.call_timeout,
                    )
                    .await?;
                    StateUpdate::reply(reply)
                }
            };

            state.apply(update);
            let next = next_step(step, state.intent);
            debug!("Dialogue step {step:?} -> {next:?}");
            step = next;
        }

        debug!("Turn finished with {} messages", state.messages.len());
        Ok(state)
    }

    fn trim_history(&mut self) {
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
    }
}
