//! Per-turn dialogue state and the fixed transition table.

use crate::assistant::filters::FilterDelta;
use crate::assistant::intent::Intent;
use crate::llm_client::ChatMessage;

/// Steps of a single chat turn. `Start` is initial, `Done` terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Start,
    ClassifyIntent,
    ExtractFilters,
    HelpResponse,
    GenerateResponse,
    Done,
}

/// Transition table. `intent` is only consulted when leaving `ClassifyIntent`;
/// a missing intent there routes like GENERAL.
pub fn next_step(step: Step, intent: Option<Intent>) -> Step {
    match step {
        Step::Start => Step::ClassifyIntent,
        Step::ClassifyIntent => match intent.unwrap_or(Intent::General) {
            Intent::Help => Step::HelpResponse,
            Intent::Search | Intent::Filter => Step::ExtractFilters,
            Intent::Clear | Intent::General => Step::GenerateResponse,
        },
        Step::ExtractFilters => Step::GenerateResponse,
        Step::HelpResponse | Step::GenerateResponse | Step::Done => Step::Done,
    }
}

/// Transient state for one turn, discarded once the reply is produced.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    pub messages: Vec<ChatMessage>,
    pub intent: Option<Intent>,
    pub filters: FilterDelta,
    pub response: String,
}

/// Partial output of one step, folded into the state by `ConversationState::apply`.
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub messages: Vec<ChatMessage>,
    pub intent: Option<Intent>,
    pub filters: Option<FilterDelta>,
    pub response: Option<String>,
}

impl StateUpdate {
    pub fn intent(intent: Intent) -> Self {
        Self {
            intent: Some(intent),
            ..Default::default()
        }
    }

    pub fn filters(filters: FilterDelta) -> Self {
        Self {
            filters: Some(filters),
            ..Default::default()
        }
    }

    /// Sets the response and records it as an assistant message.
    pub fn reply(text: String) -> Self {
        Self {
            messages: vec![ChatMessage::assistant(text.clone())],
            response: Some(text),
            ..Default::default()
        }
    }
}

impl ConversationState {
    pub fn new(message: ChatMessage) -> Self {
        Self {
            messages: vec![message],
            ..Default::default()
        }
    }

    /// Per-field reducers: messages append, intent and response take the
    /// latest value, filters shallow-merge.
    pub fn apply(&mut self, update: StateUpdate) {
        self.messages.extend(update.messages);
        if let Some(intent) = update.intent {
            self.intent = Some(intent);
        }
        if let Some(filters) = update.filters {
            self.filters.merge(filters);
        }
        if let Some(response) = update.response {
            self.response = response;
        }
    }
}
