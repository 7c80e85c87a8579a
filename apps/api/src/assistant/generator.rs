//! Response Generator: reply text conditioned on intent, filters and recent history.

use std::time::Duration;

use crate::assistant::filters::FilterDelta;
use crate::assistant::intent::Intent;
use crate::assistant::prompts::{
    HELP_APPLICATIONS, HELP_DEFAULT, HELP_MATCH_SCORE, HELP_RESUME, REPLY_CLEAR_INSTRUCTION,
    REPLY_FILTERS_TEMPLATE, REPLY_SYSTEM_BASE, REPLY_TEMPERATURE,
};
use crate::llm_client::prompts::fill_template;
use crate::llm_client::{
    complete_within, ChatMessage, CompletionRequest, CompletionService, LlmError,
};

/// History entries sent as context: the last two exchanges.
pub const CONTEXT_WINDOW: usize = 4;

/// Builds the system instructions for a reply.
///
/// HELP never reaches the model: the dialogue routes it to `help_reply`, so it
/// shares the plain persona with GENERAL here.
pub fn reply_system_prompt(intent: Intent, filters: &FilterDelta) -> String {
    let mut system = REPLY_SYSTEM_BASE.to_string();

    match intent {
        Intent::Search | Intent::Filter => {
            let action = if intent == Intent::Search {
                "search for jobs"
            } else {
                "apply filters"
            };
            let applied = if filters.is_empty() {
                "none".to_string()
            } else {
                serde_json::to_string_pretty(filters).unwrap_or_else(|_| "none".to_string())
            };
            system.push_str(
                &fill_template(
                    REPLY_FILTERS_TEMPLATE,
                    &[("action", action), ("filters", applied.as_str())],
                ),
            );
        }
        Intent::Clear => system.push_str(REPLY_CLEAR_INSTRUCTION),
        Intent::Help | Intent::General => {}
    }

    system
}

/// Generates the assistant reply with one completion call.
///
/// This is the one dialogue step whose failure is returned to the caller.
pub async fn generate_reply(
    message: &str,
    intent: Intent,
    filters: &FilterDelta,
    history: &[ChatMessage],
    llm: &dyn CompletionService,
    call_timeout: Duration,
) -> Result<String, LlmError> {
    let window_start = history.len().saturating_sub(CONTEXT_WINDOW);
    let mut messages: Vec<ChatMessage> = history[window_start..].to_vec();
    messages.push(ChatMessage::user(message));

    let request = CompletionRequest {
        system: reply_system_prompt(intent, filters),
        messages,
        temperature: REPLY_TEMPERATURE,
    };

    let reply = complete_within(llm, &request, call_timeout).await?;
    Ok(reply.trim().to_string())
}

/// Canned answer for HELP requests, chosen by keyword. No completion call.
pub fn help_reply(message: &str) -> &'static str {
    let message = message.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| message.contains(w));

    if mentions(&["application", "track"]) {
        HELP_APPLICATIONS
    } else if mentions(&["resume", "upload"]) {
        HELP_RESUME
    } else if mentions(&["match", "score"]) {
        HELP_MATCH_SCORE
    } else {
        HELP_DEFAULT
    }
}
