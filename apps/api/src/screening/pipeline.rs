//! Pipeline orchestrator — the fixed linear chain behind every screening:
//! defaults → job context → loader → extractor → scorer.
//!
//! Each stage is a function of explicit inputs returning its own output; the
//! orchestrator threads the accumulated results forward. No branching, no
//! loops, no checkpointing: a failure at any stage aborts the rest of that
//! resume's evaluation.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::loader::load_document;
use crate::screening::extractor::{ResumeExtract, ResumeExtractor};
use crate::screening::scorer::{DecisionScorer, HRDecision, ScoringInput};
use crate::session::store::{SessionRegistry, DEFAULT_TOP_K};

/// Fixed query used to pull job context out of the session index.
const JOB_CONTEXT_QUERY: &str =
    "key requirements, qualifications and responsibilities for evaluating a candidate against this job";

fn default_min_years() -> f64 {
    1.0
}

fn default_threshold() -> u32 {
    70
}

fn default_must_have() -> Vec<String> {
    vec!["python".to_string(), "sql".to_string()]
}

fn default_nice_to_have() -> Vec<String> {
    vec!["pandas".to_string(), "fastapi".to_string()]
}

/// Scoring configuration. Every field has a fallback, applied field-wise at
/// deserialization, so callers may override any subset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningConfig {
    #[serde(default = "default_min_years")]
    pub min_years: f64,
    #[serde(default = "default_must_have")]
    pub must_have_skills: Vec<String>,
    #[serde(default = "default_nice_to_have")]
    pub nice_to_have_skills: Vec<String>,
    #[serde(default = "default_threshold")]
    pub threshold: u32,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            min_years: default_min_years(),
            must_have_skills: default_must_have(),
            nice_to_have_skills: default_nice_to_have(),
            threshold: default_threshold(),
        }
    }
}

/// One screening run's input.
#[derive(Debug, Clone)]
pub struct ScreeningRequest {
    pub session_id: String,
    pub resume_path: PathBuf,
    pub config: ScreeningConfig,
}

/// Accumulated output of one full pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningOutcome {
    pub job_description: String,
    pub extracted: ResumeExtract,
    pub decision: HRDecision,
}

pub struct ScreeningPipeline {
    registry: Arc<SessionRegistry>,
    extractor: Arc<dyn ResumeExtractor>,
    scorer: Arc<dyn DecisionScorer>,
}

impl ScreeningPipeline {
    pub fn new(
        registry: Arc<SessionRegistry>,
        extractor: Arc<dyn ResumeExtractor>,
        scorer: Arc<dyn DecisionScorer>,
    ) -> Self {
        Self {
            registry,
            extractor,
            scorer,
        }
    }

    /// Evaluates exactly one resume end-to-end against the session's job
    /// context.
    pub async fn evaluate(&self, request: &ScreeningRequest) -> Result<ScreeningOutcome, AppError> {
        let job_description = self.fetch_job_context(&request.session_id).await?;

        let resume_text = load_document(&request.resume_path)?;
        debug!(
            session_id = %request.session_id,
            resume = %request.resume_path.display(),
            chars = resume_text.len(),
            "resume loaded"
        );

        let extracted = self.extractor.extract(&resume_text).await?;

        let decision = self
            .scorer
            .score(ScoringInput {
                job_description: &job_description,
                config: &request.config,
                extracted: &extracted,
            })
            .await?;

        Ok(ScreeningOutcome {
            job_description,
            extracted,
            decision,
        })
    }

    /// A missing session identifier is fatal: without it there is no notion
    /// of which job the candidate is screened against. A session that exists
    /// but has no context degrades to the store's fallback sentence instead.
    async fn fetch_job_context(&self, session_id: &str) -> Result<String, AppError> {
        if session_id.trim().is_empty() {
            return Err(AppError::Validation("session_id is required".to_string()));
        }
        Ok(self
            .registry
            .retrieve(session_id, JOB_CONTEXT_QUERY, DEFAULT_TOP_K)
            .await)
    }
}
