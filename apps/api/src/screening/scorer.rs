//! Scorer / decision maker — one structured-output LLM call compares the
//! extracted resume against the job context and configured requirements.
//!
//! The PASS threshold and must-have verification live in the prompt: the
//! model performs both checks and this module preserves its answer verbatim.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::screening::extractor::ResumeExtract;
use crate::screening::pipeline::ScreeningConfig;
use crate::screening::prompts::{SCORER_PROMPT_TEMPLATE, SCORER_SYSTEM};

/// Per-category score breakdown, each value intended to lie in [0, 100].
/// All fields are required: a response missing any of them fails at
/// deserialization rather than at display time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub skill_match: u32,
    pub experience_match: u32,
    pub education_match: u32,
    pub total: u32,
}

/// Final screening verdict for one (session, resume) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HRDecision {
    /// "PASS" or "REJECT" as asserted by the model; not re-verified in code.
    pub decision: String,
    pub reasons: Vec<String>,
    pub improvements: Vec<String>,
    pub score: ScoreBreakdown,
}

/// Everything one scoring call needs, borrowed from the pipeline run.
pub struct ScoringInput<'a> {
    pub job_description: &'a str,
    pub config: &'a ScreeningConfig,
    pub extracted: &'a ResumeExtract,
}

/// Scoring seam. The production implementation calls the LLM; tests swap in
/// deterministic stubs.
#[async_trait]
pub trait DecisionScorer: Send + Sync {
    async fn score(&self, input: ScoringInput<'_>) -> Result<HRDecision, AppError>;
}

/// Production scorer backed by the LLM client. Generation failures are not
/// caught here; they propagate to the caller per resume.
pub struct LlmScorer(pub LlmClient);

#[async_trait]
impl DecisionScorer for LlmScorer {
    async fn score(&self, input: ScoringInput<'_>) -> Result<HRDecision, AppError> {
        let extracted_json = serde_json::to_string_pretty(input.extracted)
            .map_err(|e| AppError::Internal(e.into()))?;

        let prompt = SCORER_PROMPT_TEMPLATE
            .replace("{job_description}", input.job_description)
            .replace("{min_years}", &input.config.min_years.to_string())
            .replace(
                "{must_have_skills}",
                &input.config.must_have_skills.join(", "),
            )
            .replace(
                "{nice_to_have_skills}",
                &input.config.nice_to_have_skills.join(", "),
            )
            .replace("{threshold}", &input.config.threshold.to_string())
            .replace("{extracted_json}", &extracted_json);

        self.0
            .call_json::<HRDecision>(&prompt, SCORER_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("resume scoring failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_deserializes() {
        let json = r#"{
            "decision": "PASS",
            "reasons": ["Strong skill coverage"],
            "improvements": ["Quantify project impact"],
            "score": {
                "skill_match": 85,
                "experience_match": 75,
                "education_match": 70,
                "total": 78
            }
        }"#;

        let decision: HRDecision = serde_json::from_str(json).unwrap();
        assert_eq!(decision.decision, "PASS");
        assert_eq!(decision.score.total, 78);
        assert_eq!(decision.reasons.len(), 1);
    }

    #[test]
    fn test_breakdown_missing_total_fails_to_parse() {
        let json = r#"{
            "skill_match": 85,
            "experience_match": 75,
            "education_match": 70
        }"#;

        assert!(serde_json::from_str::<ScoreBreakdown>(json).is_err());
    }

    #[test]
    fn test_decision_missing_score_fails_to_parse() {
        let json = r#"{
            "decision": "REJECT",
            "reasons": [],
            "improvements": []
        }"#;

        assert!(serde_json::from_str::<HRDecision>(json).is_err());
    }

    #[test]
    fn test_scorer_prompt_fills_all_placeholders() {
        let config = ScreeningConfig::default();
        let prompt = SCORER_PROMPT_TEMPLATE
            .replace("{job_description}", "a job")
            .replace("{min_years}", &config.min_years.to_string())
            .replace("{must_have_skills}", &config.must_have_skills.join(", "))
            .replace(
                "{nice_to_have_skills}",
                &config.nice_to_have_skills.join(", "),
            )
            .replace("{threshold}", &config.threshold.to_string())
            .replace("{extracted_json}", "{}");

        for placeholder in [
            "{job_description}",
            "{min_years}",
            "{must_have_skills}",
            "{nice_to_have_skills}",
            "{threshold}",
            "{extracted_json}",
        ] {
            assert!(!prompt.contains(placeholder), "unfilled {placeholder}");
        }
    }
}
