//! Deterministic stand-ins for the external services, shared by unit tests.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::LlmError;
use crate::matching::advice::AdviceService;
use crate::matching::aggregate::ScoreBreakdown;
use crate::matching::embedding::{Embedder, EmbeddingError};
use crate::matching::keywords::KeywordService;

const BAG_DIMENSIONS: usize = 64;

/// Returns registered vectors for known texts and a bag-of-words hash
/// vector for everything else. Counts every `embed` call.
#[derive(Default)]
pub struct FixedEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    calls: AtomicUsize,
}

impl FixedEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for FixedEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(vector) = self.vectors.get(text) {
            return Ok(vector.clone());
        }

        let mut vector = vec![0.0_f32; BAG_DIMENSIONS];
        for token in text.split_whitespace() {
            let mut hasher = DefaultHasher::new();
            token.to_lowercase().hash(&mut hasher);
            vector[(hasher.finish() as usize) % BAG_DIMENSIONS] += 1.0;
        }
        Ok(vector)
    }
}

/// Answers keyword extraction from a text → keywords table; unknown texts
/// get an empty list. Records the texts it was asked about.
#[derive(Default)]
pub struct StubKeywords {
    responses: HashMap<String, Vec<String>>,
    fail_all: bool,
    seen: Mutex<Vec<String>>,
}

impl StubKeywords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, text: &str, keywords: &[&str]) -> Self {
        self.responses.insert(
            text.to_string(),
            keywords.iter().map(|k| k.to_string()).collect(),
        );
        self
    }

    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl KeywordService for StubKeywords {
    async fn extract(&self, _api_key: &str, text: &str) -> Result<Vec<String>, LlmError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(text.to_string());
        }
        if self.fail_all {
            return Err(LlmError::Blocked("SAFETY".to_string()));
        }
        Ok(self.responses.get(text).cloned().unwrap_or_default())
    }
}

/// Echoes a short summary of its inputs, or fails with the configured error.
#[derive(Default)]
pub struct StubAdvisor {
    blocked: bool,
}

impl StubAdvisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocked() -> Self {
        Self { blocked: true }
    }
}

#[async_trait]
impl AdviceService for StubAdvisor {
    async fn advise(
        &self,
        _api_key: &str,
        missing_keywords: &[String],
        _jd_text: &str,
        scores: &ScoreBreakdown,
    ) -> Result<String, LlmError> {
        if self.blocked {
            return Err(LlmError::Blocked("SAFETY".to_string()));
        }
        Ok(format!(
            "## Score {}\nLearn: {}",
            scores.final_score,
            missing_keywords.join(", ")
        ))
    }
}
