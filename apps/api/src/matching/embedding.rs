//! Embedding provider: turns text into sentence-embedding vectors.
//!
//! `FastEmbedder` wraps a local fastembed ONNX model. The model is the
//! dominant latency cost, so it is loaded at most once per process and
//! shared read-only by every request afterwards.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

pub const DEFAULT_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("failed to load embedding model '{model}': {message}")]
    Load { model: String, message: String },

    #[error("embedding inference failed: {0}")]
    Inference(String),

    #[error("embedding worker failed: {0}")]
    Worker(String),

    #[error("no embedding generated")]
    EmptyOutput,
}

/// Narrow capability over the embedding model so scoring can run against stubs.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Cosine similarity of the embeddings of `a` and `b`, in [-1, 1].
    async fn similarity(&self, a: &str, b: &str) -> Result<f64, EmbeddingError> {
        let va = self.embed(a).await?;
        let vb = self.embed(b).await?;
        Ok(cosine_similarity(&va, &vb))
    }
}

/// Dot product over the product of magnitudes.
///
/// Mismatched lengths, empty vectors and zero vectors yield 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let (dot, norm_a, norm_b) = a.iter().zip(b).fold(
        (0.0_f64, 0.0_f64, 0.0_f64),
        |(dot, na, nb), (&x, &y)| {
            let (x, y) = (f64::from(x), f64::from(y));
            (dot + x * y, na + x * x, nb + y * y)
        },
    );

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Local sentence-embedding model with lazy, initialize-once loading.
pub struct FastEmbedder {
    model_name: String,
    cache_dir: PathBuf,
    model: OnceCell<Arc<Mutex<TextEmbedding>>>,
}

impl FastEmbedder {
    pub fn new(model_name: &str, cache_dir: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            cache_dir: PathBuf::from(cache_dir),
            model: OnceCell::new(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Forces the model load now instead of on the first embedding.
    pub async fn warm_up(&self) -> Result<(), EmbeddingError> {
        self.model().await.map(|_| ())
    }

    async fn model(&self) -> Result<Arc<Mutex<TextEmbedding>>, EmbeddingError> {
        let model = self
            .model
            .get_or_try_init(|| async {
                let model_name = self.model_name.clone();
                let cache_dir = self.cache_dir.clone();
                info!("Loading embedding model {model_name}...");
                let loaded = tokio::task::spawn_blocking(move || {
                    build_model(&model_name, cache_dir)
                })
                .await
                .map_err(|e| EmbeddingError::Worker(e.to_string()))??;
                info!("Embedding model {} loaded", self.model_name);
                Ok::<_, EmbeddingError>(Arc::new(Mutex::new(loaded)))
            })
            .await?;
        Ok(Arc::clone(model))
    }
}

#[async_trait]
impl Embedder for FastEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let model = self.model().await?;
        let texts = vec![text.to_string()];

        let embeddings = tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|e| EmbeddingError::Worker(format!("model lock poisoned: {e}")))?;
            model
                .embed(texts, None)
                .map_err(|e| EmbeddingError::Inference(e.to_string()))
        })
        .await
        .map_err(|e| EmbeddingError::Worker(e.to_string()))??;

        embeddings
            .into_iter()
            .next()
            .filter(|v| !v.is_empty())
            .ok_or(EmbeddingError::EmptyOutput)
    }
}

fn build_model(model_name: &str, cache_dir: PathBuf) -> Result<TextEmbedding, EmbeddingError> {
    let options = InitOptions::new(resolve_embedding_model(model_name))
        .with_cache_dir(cache_dir)
        .with_show_download_progress(true);

    TextEmbedding::try_new(options).map_err(|e| EmbeddingError::Load {
        model: model_name.to_string(),
        message: e.to_string(),
    })
}

fn resolve_embedding_model(model_name: &str) -> EmbeddingModel {
    match model_name {
        "all-MiniLM-L12-v2" | "sentence-transformers/all-MiniLM-L12-v2" => {
            EmbeddingModel::AllMiniLML12V2
        }
        "BAAI/bge-small-en-v1.5" | "bge-small-en-v1.5" => EmbeddingModel::BGESmallENV15,
        "BAAI/bge-base-en-v1.5" | "bge-base-en-v1.5" => EmbeddingModel::BGEBaseENV15,
        _ => EmbeddingModel::AllMiniLML6V2,
    }
}
