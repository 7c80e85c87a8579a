// All LLM prompt constants for the assistant module.
// Templates use `{placeholder}` markers. Single-marker templates use
// `str::replace`; the rest go through `llm_client::prompts::fill_template`,
// which never re-scans substituted text.

pub const INTENT_TEMPERATURE: f32 = 0.0;
pub const EXTRACTION_TEMPERATURE: f32 = 0.0;
pub const REPLY_TEMPERATURE: f32 = 0.7;

/// Intent classification prompt. Replace `{message}` before sending.
pub const INTENT_PROMPT_TEMPLATE: &str = r#"Classify the user's intent. User message: "{message}"

Return ONLY ONE of these intents as a single word:
- SEARCH (searching for specific jobs)
- FILTER (applying/changing filters)
- HELP (asking for help/information)
- CLEAR (clearing filters)
- GENERAL (general conversation)

Intent:"#;

/// Filter extraction prompt. Replace `{message}` before sending.
pub const FILTER_PROMPT_TEMPLATE: &str = r#"Extract job search filters from: "{message}"

Return ONLY valid JSON with these exact fields (use null if not mentioned):
{
  "role": string or null,
  "skills": array of strings or null,
  "datePosted": "24h" or "week" or "month" or "any" or null,
  "jobType": "full-time" or "part-time" or "contract" or "internship" or null,
  "workMode": "remote" or "hybrid" or "on-site" or null,
  "location": string or null,
  "matchScore": "high" or "medium" or "all" or null
}

Examples:
"Show me React developer jobs" -> {"role": "React developer", "skills": ["React"], "datePosted": null, "jobType": null, "workMode": null, "location": null, "matchScore": null}
"Remote frontend jobs" -> {"role": "frontend", "skills": null, "datePosted": null, "jobType": null, "workMode": "remote", "location": null, "matchScore": null}
"Only full-time roles in Bangalore" -> {"role": null, "skills": null, "datePosted": null, "jobType": "full-time", "workMode": null, "location": "Bangalore", "matchScore": null}

JSON:"#;

/// Base persona shared by every reply template.
pub const REPLY_SYSTEM_BASE: &str =
    "You are a helpful AI assistant for a job tracking application. Be concise and friendly.";

/// Search/filter confirmation. Replace `{action}` and `{filters}`.
pub const REPLY_FILTERS_TEMPLATE: &str = r#"

The user wants to {action}.
Filters being applied: {filters}

Respond naturally confirming what filters you're applying. Be brief (1-2 sentences)."#;

pub const REPLY_CLEAR_INSTRUCTION: &str = "\n\nConfirm that you're clearing all filters. Be brief.";

/// Used when the model returns a blank reply.
pub const DEFAULT_REPLY: &str =
    "I can help you find jobs! Try asking me to search or filter jobs.";

/// Returned by `chat` when the turn could not produce a reply.
pub const APOLOGY_REPLY: &str = "Sorry, I encountered an error. Please try again.";

pub const HELP_APPLICATIONS: &str = "Your applications are in the \"Applications\" tab. Click \"Apply\" on any job, and I'll help you track it!";
pub const HELP_RESUME: &str = "Go to your Profile (top right) to upload or update your resume. This helps me match jobs to your skills!";
pub const HELP_MATCH_SCORE: &str = "Match scores show how well jobs fit your resume. Green (>70%) = Great match, Yellow (40-70%) = Good match, Gray (<40%) = Lower match.";
pub const HELP_DEFAULT: &str = "I can help you search jobs, apply filters, or answer questions. Try: \"Show me React jobs\" or \"Remote roles only\"!";
