//! Analysis pipeline: orchestrates one scoring pass.
//!
//! Flow: normalize → extract keywords (both documents, concurrently) →
//!       {similarity, semantic keywords, format} → aggregate → `AnalysisResult`.
//!
//! Keyword extraction failure for either document aborts before any score
//! is computed. The result is a plain value: the advice step receives it
//! back explicitly instead of reading session state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::advice::{generate_advice, Advice, AdviceService};
use crate::matching::aggregate::{FitTier, ScoreBreakdown};
use crate::matching::embedding::Embedder;
use crate::matching::format::format_score;
use crate::matching::keywords::{extract_keywords, semantic_keyword_score, KeywordService};
use crate::matching::normalize::normalize;
use crate::matching::similarity::similarity_score;

/// The external collaborators a scoring pass depends on.
#[derive(Clone)]
pub struct MatchingServices {
    pub embedder: Arc<dyn Embedder>,
    pub keywords: Arc<dyn KeywordService>,
    pub advisor: Arc<dyn AdviceService>,
}

/// Everything one analysis produces; handed back by the client for advice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub scores: ScoreBreakdown,
    pub tier: FitTier,
    /// JD keywords found verbatim in the resume keywords.
    pub matched_keywords: Vec<String>,
    /// JD keywords with no verbatim resume counterpart.
    pub missing_keywords: Vec<String>,
    pub resume_keyword_count: usize,
    pub jd_keyword_count: usize,
    /// Normalized JD text, kept for the advice prompt.
    pub jd_text: String,
}

/// Runs a full scoring pass over raw resume and JD text.
pub async fn analyze(
    services: &MatchingServices,
    api_key: Option<&str>,
    resume_raw: &str,
    jd_raw: &str,
) -> Result<AnalysisResult, AppError> {
    let resume_text = normalize(resume_raw);
    let jd_text = normalize(jd_raw);
    if resume_text.is_empty() {
        return Err(AppError::Validation(
            "Resume contains no extractable text".to_string(),
        ));
    }
    if jd_text.is_empty() {
        return Err(AppError::Validation("jd_text cannot be empty".to_string()));
    }

    let api_key = api_key
        .filter(|k| !k.trim().is_empty())
        .ok_or(AppError::MissingCredential)?;

    // Step 1: keywords for both documents; both must finish before scoring
    let (resume_keywords, jd_keywords) = tokio::join!(
        extract_keywords(services.keywords.as_ref(), Some(api_key), &resume_text),
        extract_keywords(services.keywords.as_ref(), Some(api_key), &jd_text),
    );
    info!(
        "Resume keywords: {}, JD keywords: {}",
        resume_keywords.len(),
        jd_keywords.len()
    );

    if resume_keywords.is_empty() || jd_keywords.is_empty() {
        let which = match (resume_keywords.is_empty(), jd_keywords.is_empty()) {
            (true, true) => "resume and job description",
            (true, false) => "resume",
            _ => "job description",
        };
        return Err(AppError::KeywordExtraction(format!(
            "No keywords extracted from the {which}"
        )));
    }

    // Step 2: sub-scores
    let embedder = services.embedder.as_ref();
    let (similarity, keyword_match) = tokio::try_join!(
        similarity_score(embedder, &resume_text, &jd_text),
        semantic_keyword_score(embedder, &resume_keywords, &jd_keywords),
    )?;
    let format = format_score(&resume_text);

    // Step 3: aggregate
    let scores = ScoreBreakdown::new(keyword_match.score, similarity, format);
    let tier = scores.tier();
    info!(
        "Final score {} ({}): content={}, similarity={}, format={}",
        scores.final_score,
        tier.label(),
        scores.content,
        scores.similarity,
        scores.format
    );

    Ok(AnalysisResult {
        analysis_id: Uuid::new_v4(),
        analyzed_at: Utc::now(),
        scores,
        tier,
        matched_keywords: keyword_match.reconciliation.matched,
        missing_keywords: keyword_match.reconciliation.missing,
        resume_keyword_count: resume_keywords.len(),
        jd_keyword_count: jd_keywords.len(),
        jd_text,
    })
}

/// The optional second step: advice for a completed analysis.
pub async fn advise(
    services: &MatchingServices,
    api_key: Option<&str>,
    analysis: &AnalysisResult,
) -> Advice {
    generate_advice(
        services.advisor.as_ref(),
        api_key,
        &analysis.missing_keywords,
        &analysis.jd_text,
        &analysis.scores,
    )
    .await
}
