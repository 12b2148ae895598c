//! Field extractor — one structured-output LLM call turns raw resume text
//! into a `ResumeExtract`. Correctness of the extraction is delegated to the
//! model; this module owns prompt construction and schema enforcement.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::screening::prompts::{EXTRACT_PROMPT_TEMPLATE, EXTRACT_SYSTEM};

/// Structured snapshot of one resume. Produced once per resume, immutable
/// thereafter, consumed only by the scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeExtract {
    pub name: Option<String>,
    pub summary: Option<String>,
    pub years_experience: Option<f64>,
    /// Normalized (lower-cased) skill strings.
    #[serde(default)]
    pub skills: Vec<String>,
    pub education: Option<String>,
    #[serde(default)]
    pub recent_companies: Vec<String>,
    #[serde(default)]
    pub projects: Vec<String>,
}

/// Extraction seam. The production implementation calls the LLM; tests swap
/// in deterministic stubs.
#[async_trait]
pub trait ResumeExtractor: Send + Sync {
    async fn extract(&self, resume_text: &str) -> Result<ResumeExtract, AppError>;
}

/// Production extractor backed by the LLM client. Generation failures are not
/// caught here; they propagate to the caller per resume.
pub struct LlmExtractor(pub LlmClient);

#[async_trait]
impl ResumeExtractor for LlmExtractor {
    async fn extract(&self, resume_text: &str) -> Result<ResumeExtract, AppError> {
        let prompt = EXTRACT_PROMPT_TEMPLATE.replace("{resume_text}", resume_text);
        self.0
            .call_json::<ResumeExtract>(&prompt, EXTRACT_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("resume field extraction failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_extract_deserializes() {
        let json = r#"{
            "name": "Jane Doe",
            "summary": "Data engineer",
            "years_experience": 3.0,
            "skills": ["python", "sql", "pandas"],
            "education": "BSc Computer Science",
            "recent_companies": ["Acme Corp"],
            "projects": ["Built an ETL pipeline"]
        }"#;

        let extract: ResumeExtract = serde_json::from_str(json).unwrap();
        assert_eq!(extract.name.as_deref(), Some("Jane Doe"));
        assert_eq!(extract.years_experience, Some(3.0));
        assert_eq!(extract.skills, vec!["python", "sql", "pandas"]);
    }

    #[test]
    fn test_sparse_extract_defaults_lists_and_nulls() {
        // A thin resume may yield almost nothing; missing lists become empty.
        let json = r#"{"name": null, "summary": null, "years_experience": null,
                       "education": null}"#;

        let extract: ResumeExtract = serde_json::from_str(json).unwrap();
        assert!(extract.name.is_none());
        assert!(extract.years_experience.is_none());
        assert!(extract.skills.is_empty());
        assert!(extract.recent_companies.is_empty());
        assert!(extract.projects.is_empty());
    }

    #[test]
    fn test_prompt_template_embeds_resume_text() {
        let prompt = EXTRACT_PROMPT_TEMPLATE.replace("{resume_text}", "MY RESUME BODY");
        assert!(prompt.contains("MY RESUME BODY"));
        assert!(!prompt.contains("{resume_text}"));
    }
}
