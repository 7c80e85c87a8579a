// Résumé-to-job matching: per-pair scoring, bounded batch ranking and
// list selection.
// All LLM calls go through llm_client::CompletionService.

pub mod handlers;
pub mod models;
pub mod prompts;
pub mod ranking;
pub mod scorer;
pub mod selection;
