//! Intent Classifier: one constrained-choice completion call per user message.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::assistant::prompts::{INTENT_PROMPT_TEMPLATE, INTENT_TEMPERATURE};
use crate::llm_client::prompts::SINGLE_WORD_SYSTEM;
use crate::llm_client::{complete_within, CompletionRequest, CompletionService, LlmError};

/// Purpose of a user utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Intent {
    Search,
    Filter,
    Help,
    Clear,
    General,
}

impl Intent {
    pub const ALL: [Intent; 5] = [
        Intent::Search,
        Intent::Filter,
        Intent::Help,
        Intent::Clear,
        Intent::General,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Search => "SEARCH",
            Intent::Filter => "FILTER",
            Intent::Help => "HELP",
            Intent::Clear => "CLEAR",
            Intent::General => "GENERAL",
        }
    }

    /// Normalizes raw model output: trimmed, uppercased, exact member match.
    pub fn parse(raw: &str) -> Option<Intent> {
        let normalized = raw.trim().to_uppercase();
        Intent::ALL
            .into_iter()
            .find(|intent| intent.as_str() == normalized)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a message. Never fails: call errors and unrecognized output
/// both degrade to `Intent::General`.
pub async fn classify_intent(
    message: &str,
    llm: &dyn CompletionService,
    call_timeout: Duration,
) -> Intent {
    match request_intent(message, llm, call_timeout).await {
        Ok(intent) => intent,
        Err(e) => {
            warn!("Intent classification failed, defaulting to GENERAL: {e}");
            Intent::General
        }
    }
}

async fn request_intent(
    message: &str,
    llm: &dyn CompletionService,
    call_timeout: Duration,
) -> Result<Intent, LlmError> {
    let prompt = INTENT_PROMPT_TEMPLATE.replace("{message}", message);
    let request = CompletionRequest::prompt(SINGLE_WORD_SYSTEM, prompt, INTENT_TEMPERATURE);
    let raw = complete_within(llm, &request, call_timeout).await?;

    let intent = Intent::parse(&raw)
        .ok_or_else(|| LlmError::InvalidOutput(format!("unknown intent '{}'", raw.trim())))?;
    debug!("Classified intent: {intent}");
    Ok(intent)
}
