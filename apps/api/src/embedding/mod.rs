//! Embedding — the single point of entry for sentence-embedding inference.
//!
//! The model is loaded once at startup by `FastEmbedEncoder::new` and shared through
//! `AppState` as an `Arc<dyn TextEncoder>`. No other module loads a model.
//!
//! The E5 family uses role-prefixed inputs:
//! - Resume text: "passage: {text}"
//! - Job description: "query: {text}"

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("model initialization failed: {0}")]
    Init(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("model returned no embedding")]
    EmptyResult,

    #[error("unknown embedding model '{0}'")]
    UnknownModel(String),
}

/// Which side of the comparison a text sits on. Selects the E5 prompt prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingRole {
    Passage,
    Query,
}

impl EncodingRole {
    pub fn prefix(self) -> &'static str {
        match self {
            EncodingRole::Passage => "passage: ",
            EncodingRole::Query => "query: ",
        }
    }

    pub fn apply(self, text: &str) -> String {
        format!("{}{}", self.prefix(), text)
    }
}

/// Supported embedding models. All follow the passage/query prompt convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EncoderModel {
    #[default]
    MultilingualE5Large,
    MultilingualE5Base,
    MultilingualE5Small,
}

impl EncoderModel {
    pub fn name(self) -> &'static str {
        match self {
            EncoderModel::MultilingualE5Large => "multilingual-e5-large",
            EncoderModel::MultilingualE5Base => "multilingual-e5-base",
            EncoderModel::MultilingualE5Small => "multilingual-e5-small",
        }
    }

    fn fastembed_model(self) -> fastembed::EmbeddingModel {
        match self {
            EncoderModel::MultilingualE5Large => fastembed::EmbeddingModel::MultilingualE5Large,
            EncoderModel::MultilingualE5Base => fastembed::EmbeddingModel::MultilingualE5Base,
            EncoderModel::MultilingualE5Small => fastembed::EmbeddingModel::MultilingualE5Small,
        }
    }
}

impl FromStr for EncoderModel {
    type Err = EmbeddingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "multilingual-e5-large" | "e5-large" => Ok(EncoderModel::MultilingualE5Large),
            "multilingual-e5-base" | "e5-base" => Ok(EncoderModel::MultilingualE5Base),
            "multilingual-e5-small" | "e5-small" => Ok(EncoderModel::MultilingualE5Small),
            other => Err(EmbeddingError::UnknownModel(other.to_string())),
        }
    }
}

/// Turns text into a fixed-length vector. Implement this to swap backends
/// without touching the scoring pipeline.
#[async_trait]
pub trait TextEncoder: Send + Sync {
    async fn encode(&self, role: EncodingRole, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// fastembed-backed encoder. Inference is synchronous and CPU-bound, so every
/// call is dispatched to a blocking thread.
pub struct FastEmbedEncoder {
    model: Arc<fastembed::TextEmbedding>,
    kind: EncoderModel,
}

impl FastEmbedEncoder {
    /// Loads the model, downloading it on first run.
    pub async fn new(kind: EncoderModel, cache_dir: Option<String>) -> Result<Self, EmbeddingError> {
        info!("Loading embedding model {}...", kind.name());

        let model = tokio::task::spawn_blocking(move || {
            let mut options = fastembed::InitOptions::new(kind.fastembed_model())
                .with_show_download_progress(true);
            if let Some(dir) = cache_dir {
                options = options.with_cache_dir(PathBuf::from(dir));
            }
            fastembed::TextEmbedding::try_new(options)
        })
        .await?
        .map_err(|e| EmbeddingError::Init(e.to_string()))?;

        info!("Embedding model {} ready", kind.name());
        Ok(Self {
            model: Arc::new(model),
            kind,
        })
    }

    pub fn kind(&self) -> EncoderModel {
        self.kind
    }
}

#[async_trait]
impl TextEncoder for FastEmbedEncoder {
    async fn encode(&self, role: EncodingRole, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let input = vec![role.apply(text)];
        let model = Arc::clone(&self.model);
        let mut results = tokio::task::spawn_blocking(move || model.embed(input, None))
            .await?
            .map_err(|e| EmbeddingError::Inference(e.to_string()))?;
        results.pop().ok_or(EmbeddingError::EmptyResult)
    }
}
