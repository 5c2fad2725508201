//! Advice generation: career-coach guidance from the language model.
//!
//! Advice never fails the request: every failure becomes a readable
//! message that replaces the advice text.

use async_trait::async_trait;
use tracing::warn;

use crate::llm_client::{LlmClient, LlmError};
use crate::matching::aggregate::ScoreBreakdown;
use crate::matching::normalize::truncate_chars;
use crate::matching::prompts::ADVICE_PROMPT_TEMPLATE;

pub const ADVICE_JD_CHARS: usize = 1000;
pub const ADVICE_MAX_MISSING_KEYWORDS: usize = 20;

pub const MISSING_KEY_MESSAGE: &str =
    "Error: Add your language-model API key (x-llm-api-key header or LLM_API_KEY).";
pub const BLOCKED_MESSAGE: &str = "AI response blocked (maybe safety settings?).";

/// External advice generator.
#[async_trait]
pub trait AdviceService: Send + Sync {
    async fn advise(
        &self,
        api_key: &str,
        missing_keywords: &[String],
        jd_text: &str,
        scores: &ScoreBreakdown,
    ) -> Result<String, LlmError>;
}

/// Advice through the language model.
pub struct LlmAdviceService(pub LlmClient);

#[async_trait]
impl AdviceService for LlmAdviceService {
    async fn advise(
        &self,
        api_key: &str,
        missing_keywords: &[String],
        jd_text: &str,
        scores: &ScoreBreakdown,
    ) -> Result<String, LlmError> {
        let prompt = build_advice_prompt(missing_keywords, jd_text, scores);
        self.0.generate(api_key, &prompt).await
    }
}

/// Fills the advice template. The JD is cut to its first 1000 characters and
/// the missing list to its first 20 entries.
pub fn build_advice_prompt(
    missing_keywords: &[String],
    jd_text: &str,
    scores: &ScoreBreakdown,
) -> String {
    let missing = missing_keywords
        .iter()
        .take(ADVICE_MAX_MISSING_KEYWORDS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    // JD text last so braces inside it are never treated as placeholders.
    ADVICE_PROMPT_TEMPLATE
        .replace("{final}", &scores.final_score.to_string())
        .replace("{content}", &scores.content.to_string())
        .replace("{similarity}", &scores.similarity.to_string())
        .replace("{format}", &scores.format.to_string())
        .replace("{missing_keywords}", &missing)
        .replace("{jd_text}", truncate_chars(jd_text, ADVICE_JD_CHARS))
}

/// Result of the advice step.
#[derive(Debug, Clone, PartialEq)]
pub enum Advice {
    Generated(String),
    /// Human-readable reason shown in place of the advice.
    Unavailable(String),
}

impl Advice {
    pub fn text(&self) -> &str {
        match self {
            Advice::Generated(text) | Advice::Unavailable(text) => text,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Advice::Unavailable(_))
    }
}

/// Advice that never errors. Missing key, blocked response and call errors
/// come back as `Advice::Unavailable` with a readable message.
pub async fn generate_advice(
    service: &dyn AdviceService,
    api_key: Option<&str>,
    missing_keywords: &[String],
    jd_text: &str,
    scores: &ScoreBreakdown,
) -> Advice {
    let Some(api_key) = api_key.filter(|k| !k.trim().is_empty()) else {
        return Advice::Unavailable(MISSING_KEY_MESSAGE.to_string());
    };

    match service
        .advise(api_key, missing_keywords, jd_text, scores)
        .await
    {
        Ok(text) => Advice::Generated(text),
        Err(LlmError::Blocked(reason)) => {
            warn!("Advice response blocked: {reason}");
            Advice::Unavailable(BLOCKED_MESSAGE.to_string())
        }
        Err(e) => {
            warn!("Advice call failed: {e}");
            Advice::Unavailable(format!("Error calling LLM API: {e}"))
        }
    }
}
