//! Full-text semantic similarity between resume and JD.

use crate::matching::aggregate::round2;
use crate::matching::embedding::{Embedder, EmbeddingError};

/// Maps a cosine similarity onto a 0–100 score: negatives clamp to 0,
/// scaled by 100, rounded to 2 decimals.
pub fn cosine_to_percent(cosine: f64) -> f64 {
    round2(cosine.clamp(0.0, 1.0) * 100.0)
}

/// Semantic similarity of two whole documents as a 0–100 score.
///
/// Texts go to the embedder unmodified, including empty strings.
pub async fn similarity_score(
    embedder: &dyn Embedder,
    text_a: &str,
    text_b: &str,
) -> Result<f64, EmbeddingError> {
    let cosine = embedder.similarity(text_a, text_b).await?;
    Ok(cosine_to_percent(cosine))
}
