// All LLM prompt constants for the matching module.

pub const MATCH_TEMPERATURE: f32 = 0.3;

/// Job match prompt. Filled with `fill_template`: `{resume}`, `{title}`,
/// `{company}`, `{description}`, `{skills}`, `{location}`, `{job_type}`.
pub const MATCH_PROMPT_TEMPLATE: &str = r#"You are an expert job matching AI. Analyze how well this candidate's resume matches the job posting.

Resume:
{resume}

Job Posting:
Title: {title}
Company: {company}
Description: {description}
Required Skills: {skills}
Location: {location}
Job Type: {job_type}

Provide your analysis in this EXACT JSON format (no other text):
{
  "score": <number 0-100>,
  "matchingSkills": ["skill1", "skill2"],
  "relevantExperience": ["experience1", "experience2"],
  "keywordAlignment": ["keyword1", "keyword2"],
  "reasoning": "Brief explanation of the match"
}

Focus on:
1. Direct skill matches (highest weight)
2. Relevant experience and projects
3. Education and certifications
4. Keywords from job description appearing in resume
5. Years of experience alignment

Be precise and realistic with scoring."#;

/// Reasoning attached to results produced by the keyword fallback.
pub const FALLBACK_REASONING: &str = "Basic keyword matching applied";
