//! Keyword extraction (language model) and the semantic keyword scorer.
//!
//! The numeric score compares the *joined* keyword strings semantically, so
//! "ml" and "machine learning" still count toward it. The matched/missing
//! lists are exact string matches only and feed display and advice.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::llm_client::{LlmClient, LlmError};
use crate::matching::embedding::{Embedder, EmbeddingError};
use crate::matching::normalize::truncate_chars;
use crate::matching::prompts::KEYWORD_PROMPT_TEMPLATE;
use crate::matching::similarity::cosine_to_percent;

/// Only this many leading characters of a document are sent for extraction.
pub const KEYWORD_INPUT_CHARS: usize = 3500;

/// External keyword/skill extractor.
#[async_trait]
pub trait KeywordService: Send + Sync {
    async fn extract(&self, api_key: &str, text: &str) -> Result<Vec<String>, LlmError>;
}

/// Keyword extraction through the language model.
pub struct LlmKeywordService(pub LlmClient);

#[async_trait]
impl KeywordService for LlmKeywordService {
    async fn extract(&self, api_key: &str, text: &str) -> Result<Vec<String>, LlmError> {
        let prompt =
            KEYWORD_PROMPT_TEMPLATE.replace("{text}", truncate_chars(text, KEYWORD_INPUT_CHARS));
        let response = self.0.generate(api_key, &prompt).await?;
        Ok(parse_keyword_list(&response))
    }
}

/// Splits a comma-separated model response into lowercase, trimmed,
/// non-empty keywords, keeping the model's order.
pub fn parse_keyword_list(response: &str) -> Vec<String> {
    response
        .split(',')
        .map(|kw| kw.trim().to_lowercase())
        .filter(|kw| !kw.is_empty())
        .collect()
}

/// Keyword extraction that never fails: a missing key, a blocked response
/// or a call error all yield an empty list. Callers treat empty as failure.
pub async fn extract_keywords(
    service: &dyn KeywordService,
    api_key: Option<&str>,
    text: &str,
) -> Vec<String> {
    let Some(api_key) = api_key.filter(|k| !k.trim().is_empty()) else {
        warn!("Keyword extraction skipped: no API key");
        return Vec::new();
    };

    match service.extract(api_key, text).await {
        Ok(keywords) => {
            debug!("Extracted {} keywords", keywords.len());
            keywords
        }
        Err(LlmError::Blocked(reason)) => {
            warn!("Keyword extraction blocked ({reason}). Returning empty list.");
            Vec::new()
        }
        Err(e) => {
            warn!("Error calling LLM for keywords: {e}");
            Vec::new()
        }
    }
}

/// Exact-match comparison of the JD keywords against the resume keywords.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// JD keywords also present in the resume.
    pub matched: Vec<String>,
    /// JD keywords absent from the resume.
    pub missing: Vec<String>,
}

/// `matched = jd ∩ resume`, `missing = jd − resume`.
///
/// Comparison is on lowercase, trimmed keys. Each output list is
/// de-duplicated and follows the JD's first-occurrence order.
pub fn reconcile(resume_keywords: &[String], jd_keywords: &[String]) -> Reconciliation {
    let resume_set: HashSet<String> = resume_keywords.iter().map(|k| keyword_key(k)).collect();
    let mut seen = HashSet::new();
    let mut result = Reconciliation::default();

    for keyword in jd_keywords {
        let key = keyword_key(keyword);
        if key.is_empty() || !seen.insert(key.clone()) {
            continue;
        }
        if resume_set.contains(&key) {
            result.matched.push(key);
        } else {
            result.missing.push(key);
        }
    }

    result
}

fn keyword_key(keyword: &str) -> String {
    keyword.trim().to_lowercase()
}

/// Output of the semantic keyword scorer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordMatch {
    /// Semantic overlap of the joined keyword lists, 0–100.
    pub score: f64,
    pub reconciliation: Reconciliation,
}

/// Semantic keyword overlap plus exact-match reconciliation.
///
/// Either list empty → score 0 with empty lists, and no embedding call.
pub async fn semantic_keyword_score(
    embedder: &dyn Embedder,
    resume_keywords: &[String],
    jd_keywords: &[String],
) -> Result<KeywordMatch, EmbeddingError> {
    if resume_keywords.is_empty() || jd_keywords.is_empty() {
        return Ok(KeywordMatch::default());
    }

    let resume_joined = resume_keywords.join(" ");
    let jd_joined = jd_keywords.join(" ");
    let cosine = embedder.similarity(&resume_joined, &jd_joined).await?;

    Ok(KeywordMatch {
        score: cosine_to_percent(cosine),
        reconciliation: reconcile(resume_keywords, jd_keywords),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::testing::{FixedEmbedder, StubKeywords};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_string_contains, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn kws(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_keyword_list_normalizes_entries() {
        let parsed = parse_keyword_list(" Python, SQL ,, machine learning,\n  Docker ,");
        assert_eq!(parsed, kws(&["python", "sql", "machine learning", "docker"]));
    }

    #[test]
    fn test_parse_keyword_list_empty_response() {
        assert!(parse_keyword_list("").is_empty());
        assert!(parse_keyword_list(" , ,").is_empty());
    }

    #[test]
    fn test_reconcile_intersection_and_difference() {
        let resume = kws(&["python", "docker", "sql"]);
        let jd = kws(&["python", "kubernetes", "sql", "aws"]);
        let result = reconcile(&resume, &jd);
        assert_eq!(result.matched, kws(&["python", "sql"]));
        assert_eq!(result.missing, kws(&["kubernetes", "aws"]));
    }

    #[test]
    fn test_reconcile_sets_are_disjoint_and_cover_jd() {
        let resume = kws(&["rust", "go", "ml"]);
        let jd = kws(&["machine learning", "rust", "rust", "c++", "go"]);
        let result = reconcile(&resume, &jd);

        let matched: HashSet<_> = result.matched.iter().collect();
        let missing: HashSet<_> = result.missing.iter().collect();
        assert!(matched.is_disjoint(&missing));
        for keyword in &jd {
            assert!(matched.contains(keyword) || missing.contains(keyword));
        }
        // duplicates in the JD appear once
        assert_eq!(result.matched, kws(&["rust", "go"]));
        // semantic near-miss stays missing
        assert_eq!(result.missing, kws(&["machine learning", "c++"]));
    }

    #[test]
    fn test_reconcile_is_case_normalized() {
        let result = reconcile(&kws(&["Python "]), &kws(&["python"]));
        assert_eq!(result.matched, kws(&["python"]));
        assert!(result.missing.is_empty());
    }

    #[tokio::test]
    async fn test_empty_resume_keywords_short_circuits() {
        let embedder = FixedEmbedder::new();
        let result = semantic_keyword_score(&embedder, &[], &kws(&["python"]))
            .await
            .unwrap();
        assert_eq!(result.score, 0.0);
        assert!(result.reconciliation.matched.is_empty());
        assert!(result.reconciliation.missing.is_empty());
        assert_eq!(embedder.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_jd_keywords_short_circuits() {
        let embedder = FixedEmbedder::new();
        let result = semantic_keyword_score(&embedder, &kws(&["python"]), &[])
            .await
            .unwrap();
        assert_eq!(result, KeywordMatch::default());
        assert_eq!(embedder.calls(), 0);
    }

    #[tokio::test]
    async fn test_embeds_joined_keyword_strings() {
        let embedder = FixedEmbedder::new()
            .with("ml python", vec![1.0, 0.0])
            .with("machine learning python", vec![0.6, 0.8]);
        let result = semantic_keyword_score(
            &embedder,
            &kws(&["ml", "python"]),
            &kws(&["machine learning", "python"]),
        )
        .await
        .unwrap();

        assert_eq!(result.score, 60.0);
        assert_eq!(result.reconciliation.matched, kws(&["python"]));
        assert_eq!(result.reconciliation.missing, kws(&["machine learning"]));
        assert_eq!(embedder.calls(), 2);
    }

    #[tokio::test]
    async fn test_negative_keyword_similarity_scores_zero() {
        let embedder = FixedEmbedder::new()
            .with("a", vec![1.0, 1.0])
            .with("b", vec![-1.0, -0.2]);
        let result = semantic_keyword_score(&embedder, &kws(&["a"]), &kws(&["b"]))
            .await
            .unwrap();
        assert_eq!(result.score, 0.0);
        assert_eq!(result.reconciliation.missing, kws(&["b"]));
    }

    #[tokio::test]
    async fn test_extract_keywords_without_key_skips_service() {
        let service = StubKeywords::new().with("text", &["rust"]);
        assert!(extract_keywords(&service, None, "text").await.is_empty());
        assert!(extract_keywords(&service, Some("  "), "text").await.is_empty());
        assert!(service.seen().is_empty());
    }

    #[tokio::test]
    async fn test_extract_keywords_failure_becomes_empty() {
        let service = StubKeywords::failing();
        assert!(extract_keywords(&service, Some("key"), "text").await.is_empty());
        assert_eq!(service.seen(), vec!["text".to_string()]);
    }

    #[tokio::test]
    async fn test_llm_keyword_service_truncates_and_parses() {
        let server = MockServer::start().await;
        let long_text = format!("{}{}", "a".repeat(KEYWORD_INPUT_CHARS), "TAIL_MARKER");
        Mock::given(method("POST"))
            .and(body_string_contains("Text to Analyze"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "Rust, Tokio , ,axum"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = LlmClient::new(&server.uri(), "gemini-test", Duration::from_secs(5)).unwrap();
        let service = LlmKeywordService(client);
        let keywords = service.extract("key", &long_text).await.unwrap();
        assert_eq!(keywords, kws(&["rust", "tokio", "axum"]));

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(!body.contains("TAIL_MARKER"));
    }

    #[tokio::test]
    async fn test_llm_keyword_service_blocked_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&server)
            .await;

        let client = LlmClient::new(&server.uri(), "gemini-test", Duration::from_secs(5)).unwrap();
        let service = LlmKeywordService(client);
        assert!(extract_keywords(&service, Some("key"), "resume").await.is_empty());
    }
}
