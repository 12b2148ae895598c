// All LLM prompt constants for the screening module.

/// System prompt for resume field extraction — enforces JSON-only output.
pub const EXTRACT_SYSTEM: &str =
    "You are an HR expert extracting structured information from resume text. \
    Extract fields accurately; never invent facts not present in the resume. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Extraction prompt template. Replace `{resume_text}` before sending.
pub const EXTRACT_PROMPT_TEMPLATE: &str = r#"Extract structured fields from the following resume text.

Return a JSON object with this EXACT schema (no extra fields):
{
  "name": "Jane Doe",
  "summary": "Backend engineer focused on data platforms",
  "years_experience": 4.5,
  "skills": ["python", "sql", "docker"],
  "education": "BSc Computer Science, 2018",
  "recent_companies": ["Acme Corp", "Globex"],
  "projects": ["Rebuilt the billing pipeline", "Internal search service"]
}

Rules:
- "name", "summary" and "education" may be null when the resume does not state them
- "years_experience" is total professional experience in years, as a number (null if unclear)
- "skills" is a list of lower-cased, normalized skill strings
- "recent_companies" lists the most recent employers, newest first
- "projects" lists short one-line project descriptions

RESUME TEXT:
'''{resume_text}'''"#;

/// System prompt for scoring. The threshold comparison and must-have
/// verification are performed by the model, not re-checked in code.
pub const SCORER_SYSTEM: &str =
    "You are an HR screening assistant. Compare the candidate's extracted resume \
    against the job requirements. Score skill, experience and education match \
    each from 0 to 100 and produce an overall 'total' score. Judge must-have \
    skill coverage strictly, and answer PASS only when total >= threshold AND \
    the must-have skills are sufficiently covered. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Scoring prompt template. Replace `{job_description}`, `{min_years}`,
/// `{must_have_skills}`, `{nice_to_have_skills}`, `{threshold}` and
/// `{extracted_json}` before sending.
pub const SCORER_PROMPT_TEMPLATE: &str = r#"JOB POSTING:
```
{job_description}
```

Minimum years of experience: {min_years}
Must-have skills: {must_have_skills}
Nice-to-have skills: {nice_to_have_skills}
PASS threshold (total score): {threshold}

EXTRACTED RESUME (JSON):
{extracted_json}

Return a JSON object with this EXACT schema (no extra fields):
{
  "decision": "PASS",
  "reasons": ["Covers both must-have skills", "3 years of experience against a 2 year minimum"],
  "improvements": ["Add measurable outcomes to project descriptions"],
  "score": {
    "skill_match": 85,
    "experience_match": 75,
    "education_match": 70,
    "total": 78
  }
}

Rules:
- "decision" is exactly "PASS" or "REJECT"
- every score is an integer from 0 to 100
- "reasons" states the concrete grounds for the decision
- "improvements" suggests what the candidate could add or clarify
- treat must-have skills as a near-hard gate and nice-to-have skills as a soft bonus"#;
