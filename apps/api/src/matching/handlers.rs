//! Axum route handlers for the Matching API.

use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::matching::pipeline::{advise, analyze, AnalysisResult};
use crate::pdf::extract_pdf_text;
use crate::state::AppState;

/// Request header carrying the caller's language-model key.
pub const API_KEY_HEADER: &str = "x-llm-api-key";

const NO_MATCHES_MESSAGE: &str = "No exact matches found.";
const NO_MISSING_MESSAGE: &str = "None (based on exact match).";
const MISSING_INPUT_MESSAGE: &str = "Upload resume and paste job description to begin.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub resume_text: String,
    pub jd_text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: AnalysisResult,
    pub tier_label: String,
    pub tier_message: String,
    /// Comma-joined matched keywords, or a placeholder when there are none.
    pub matched_display: String,
    pub missing_display: String,
}

impl From<AnalysisResult> for AnalyzeResponse {
    fn from(analysis: AnalysisResult) -> Self {
        Self {
            tier_label: analysis.tier.label().to_string(),
            tier_message: analysis.tier.message().to_string(),
            matched_display: display_keywords(&analysis.matched_keywords, NO_MATCHES_MESSAGE),
            missing_display: display_keywords(&analysis.missing_keywords, NO_MISSING_MESSAGE),
            analysis,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AdviceRequest {
    pub analysis: AnalysisResult,
}

#[derive(Debug, Serialize)]
pub struct AdviceResponse {
    /// Markdown advice, or the reason advice is unavailable.
    pub advice: String,
    pub failed: bool,
}

fn display_keywords(keywords: &[String], empty_message: &str) -> String {
    if keywords.is_empty() {
        empty_message.to_string()
    } else {
        keywords.join(", ")
    }
}

fn header_api_key(headers: &HeaderMap) -> Option<&str> {
    headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Multipart upload: a `resume` PDF part and a `jd_text` text part.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut resume_pdf: Option<Bytes> = None;
    let mut jd_text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("resume") => {
                resume_pdf = Some(field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("failed to read resume upload: {e}"))
                })?);
            }
            Some("jd_text") => {
                jd_text = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("failed to read jd_text: {e}"))
                })?);
            }
            _ => {}
        }
    }

    let (Some(resume_pdf), Some(jd_text)) = (resume_pdf, jd_text.filter(|t| !t.trim().is_empty()))
    else {
        return Err(AppError::Validation(MISSING_INPUT_MESSAGE.to_string()));
    };

    info!("Analyzing uploaded resume ({} bytes)", resume_pdf.len());
    let resume_text = extract_pdf_text(resume_pdf).await?;

    let api_key = state.resolve_api_key(header_api_key(&headers));
    let analysis = analyze(&state.services, api_key, &resume_text, &jd_text).await?;

    Ok(Json(analysis.into()))
}

/// POST /api/v1/analyze/text
///
/// Same analysis for a pasted resume.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    if request.resume_text.trim().is_empty() || request.jd_text.trim().is_empty() {
        return Err(AppError::Validation(MISSING_INPUT_MESSAGE.to_string()));
    }

    let api_key = state.resolve_api_key(header_api_key(&headers));
    let analysis = analyze(
        &state.services,
        api_key,
        &request.resume_text,
        &request.jd_text,
    )
    .await?;

    Ok(Json(analysis.into()))
}

/// POST /api/v1/advice
///
/// Advice for a previously returned analysis. Always 200: failures are
/// reported inline and never invalidate the scores.
pub async fn handle_advice(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AdviceRequest>,
) -> Json<AdviceResponse> {
    let api_key = state.resolve_api_key(header_api_key(&headers));
    let advice = advise(&state.services, api_key, &request.analysis).await;

    Json(AdviceResponse {
        failed: advice.is_unavailable(),
        advice: advice.text().to_string(),
    })
}
