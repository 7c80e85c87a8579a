// Chat assistant: intent classification, filter extraction, reply generation,
// the per-turn state machine and per-session history.
// All LLM calls go through llm_client::CompletionService.

pub mod filters;
pub mod generator;
pub mod handlers;
pub mod intent;
pub mod orchestrator;
pub mod prompts;
pub mod session;
pub mod state;
