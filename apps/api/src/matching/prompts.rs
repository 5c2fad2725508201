// All LLM prompt templates for the matching module.
// Placeholders are replaced with `str::replace` before sending.

/// Keyword extraction prompt. Replace `{text}` before sending.
pub const KEYWORD_PROMPT_TEMPLATE: &str = r#"Task: Extract the most important keywords and skills from the following text.
Prioritize: Specific technical skills, Software/Tools, Key job titles, Methodologies, Action verbs for accomplishments.
Exclude: Generic terms, Locations, company names, people's names, dates, numbers, contact info, general soft skills.
Format: Return ONLY a comma-separated list of the top 30-40 keywords/skills, all in lowercase. Normalize similar terms. No intro text.
Text to Analyze: "{text}"
Keywords:"#;

/// Career-coach advice prompt.
///
/// Placeholders: `{jd_text}`, `{final}`, `{content}`, `{similarity}`,
/// `{format}`, `{missing_keywords}`.
pub const ADVICE_PROMPT_TEMPLATE: &str = r#"You are an expert career coach. A user analyzed their resume against a job description.
Data:
Job Description: "{jd_text}"
Score Breakdown:
- Final Score: {final}%
- Content Match: {content}% (Semantic keyword match)
- Context Match: {similarity}% (Full text meaning match)
- Format Score: {format}%
Missing Skills (Exact Match): "{missing_keywords}"

Task: Provide friendly, actionable advice using markdown.
1. Summarize their overall score encouragingly.
2. Explain the score breakdown (good/bad parts).
3. Identify 3-5 critical missing skills and explain why they matter for this job.
4. Suggest 1-2 simple projects/courses to learn these.
5. Give a resume-ready bullet point example."#;
