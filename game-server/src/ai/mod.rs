//! AI seat players.
//!
//! Providers turn a role-restricted context into a proposed move. The orchestrator
//! validates what comes back and commits it through the same path human moves take.

pub mod llm;
pub mod orchestrator;
pub mod prompts;

use async_trait::async_trait;
use game_types::{ModelProvider, OperativeContext, SpymasterContext};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use llm::LlmProvider;
pub use orchestrator::AiOrchestrator;

/// A spymaster's proposed clue. Counts arrive unchecked from the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpymasterHint {
    pub word: String,
    #[serde(alias = "number")]
    pub count: i64,
    #[serde(default)]
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperativeGuess {
    #[serde(rename = "cardIndex", alias = "card_index")]
    pub card_index: i64,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no API key configured for {0:?}")]
    MissingApiKey(ModelProvider),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("reply did not contain a JSON object")]
    NoJson,
    #[error("reply JSON did not match the expected shape: {0}")]
    Json(#[from] serde_json::Error),
}

/// An AI seat failed to produce a usable move. Nothing was committed.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("clue generation failed: {0}")]
    ClueGenerationFailed(String),
    #[error("guess generation failed: {0}")]
    GuessGenerationFailed(String),
    #[error("model {model_id} did not answer within {seconds}s")]
    Timeout { model_id: String, seconds: u64 },
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[async_trait]
pub trait HintProvider: Send + Sync {
    async fn generate_hint(
        &self,
        model_id: &str,
        context: &SpymasterContext,
    ) -> Result<SpymasterHint, ProviderError>;
}

#[async_trait]
pub trait GuessProvider: Send + Sync {
    async fn generate_guess(
        &self,
        model_id: &str,
        context: &OperativeContext,
    ) -> Result<OperativeGuess, ProviderError>;
}
