//! Scoring Oracle Adapter — packages one resume + the batch context into an
//! LLM request and parses the structured score breakdown that comes back.
//!
//! The oracle is external and possibly non-deterministic; repeated calls with
//! identical input carry no reproducibility guarantee. Transport retries live
//! in `LlmClient`; a response that arrives but cannot be parsed is a per-file
//! failure and is not retried.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm_client::{LlmClient, LlmError};
use crate::ranking::prompts::{RESUME_SCORE_PROMPT_TEMPLATE, RESUME_SCORE_SYSTEM};
use crate::ranking::weights::ScoringWeights;

/// Request-scoped inputs shared by every scoring call in one batch.
#[derive(Debug, Clone)]
pub struct ScoringContext {
    pub jd_text: String,
    pub tech_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub weights: ScoringWeights,
}

/// Per-criterion sub-scores plus the combined score, as returned by the
/// oracle. Every field defaults to 0 so a parseable-but-sparse response still
/// yields a usable record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    #[serde(default)]
    pub skills: f64,
    #[serde(default)]
    pub experience: f64,
    #[serde(default)]
    pub education: f64,
    #[serde(default)]
    pub projects: f64,
    #[serde(default)]
    pub achievements: f64,
    #[serde(default)]
    pub final_score: f64,
}

#[derive(Debug, Error)]
pub enum OracleError {
    /// The scoring call itself failed (network, timeout, API error).
    #[error("scoring oracle unavailable: {0}")]
    Unavailable(String),

    /// The oracle answered, but the body could not be parsed even after repair.
    #[error("scoring response malformed: {0}")]
    Malformed(String),
}

/// Swap point for the scoring backend. Production uses `LlmScoringOracle`;
/// orchestrator tests substitute a scripted implementation.
///
/// Carried in `AppState` as `Arc<dyn ScoringOracle>`.
#[async_trait]
pub trait ScoringOracle: Send + Sync {
    async fn score(
        &self,
        resume_text: &str,
        context: &ScoringContext,
    ) -> Result<ScoreBreakdown, OracleError>;
}

/// LLM-backed oracle: builds the scoring prompt and parses the JSON breakdown.
pub struct LlmScoringOracle {
    llm: LlmClient,
}

impl LlmScoringOracle {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ScoringOracle for LlmScoringOracle {
    async fn score(
        &self,
        resume_text: &str,
        context: &ScoringContext,
    ) -> Result<ScoreBreakdown, OracleError> {
        let prompt = build_score_prompt(resume_text, context);
        self.llm
            .call_json::<ScoreBreakdown>(&prompt, RESUME_SCORE_SYSTEM)
            .await
            .map_err(|e| match e {
                LlmError::Parse(_) | LlmError::EmptyContent => OracleError::Malformed(e.to_string()),
                other => OracleError::Unavailable(other.to_string()),
            })
    }
}

fn build_score_prompt(resume_text: &str, context: &ScoringContext) -> String {
    RESUME_SCORE_PROMPT_TEMPLATE
        .replace("{resume_text}", resume_text)
        .replace("{jd_text}", &context.jd_text)
        .replace("{tech_skills}", &context.tech_skills.join(", "))
        .replace("{soft_skills}", &context.soft_skills.join(", "))
        .replace("{weights}", &context.weights.describe())
}
