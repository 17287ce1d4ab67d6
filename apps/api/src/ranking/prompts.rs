// All LLM prompt constants for the ranking module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for resume scoring — recruiter persona plus JSON-only output.
pub const RESUME_SCORE_SYSTEM: &str =
    "You are a senior technical recruiter with deep engineering expertise. \
    You evaluate one resume against one job description and return a numeric \
    score breakdown. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT add comments or trailing commas.";

/// Scoring prompt template. Replace `{resume_text}`, `{jd_text}`,
/// `{tech_skills}`, `{soft_skills}`, and `{weights}` before sending.
pub const RESUME_SCORE_PROMPT_TEMPLATE: &str = r#"Evaluate the following resume against the job description.

RESUME:
{resume_text}

JOB DESCRIPTION:
{jd_text}

REQUIRED TECHNICAL SKILLS: {tech_skills}
DESIRED SOFT SKILLS: {soft_skills}

CRITERION WEIGHTS (higher weight means the criterion matters more to the
final score): {weights}

Score each criterion from 0 to 100 based on how well the resume supports it:
- "skills": overlap with the required technical and soft skills
- "experience": relevance and seniority of work history for this role
- "education": relevance of degrees and certifications
- "projects": depth and relevance of described projects
- "achievements": concrete, measurable outcomes

Then compute "final_score" (0-100) as the weight-adjusted combination of the
criterion scores.

Return a JSON object with this EXACT schema (no extra fields):
{
  "skills": 80,
  "experience": 70,
  "education": 60,
  "projects": 50,
  "achievements": 40,
  "final_score": 67.5
}"#;

/// System prompt for resume enhancement — plain-text rewrite, not JSON.
pub const RESUME_ENHANCE_SYSTEM: &str =
    "You are an expert resume writer. You rewrite resume text to be clearer, \
    more concrete, and better aligned with a target role while staying \
    strictly truthful to the original content. Never invent employers, \
    titles, dates, or accomplishments. Respond with the rewritten resume \
    text only, no preamble and no commentary.";

/// Enhancement prompt template. Replace `{resume_text}` and `{jd_text}`
/// before sending. `{jd_text}` may be empty for a role-agnostic rewrite.
pub const RESUME_ENHANCE_PROMPT_TEMPLATE: &str = r#"Rewrite the following resume text. Tighten wording, lead with impact, and quantify outcomes where the original already states them.

RESUME:
{resume_text}

TARGET JOB DESCRIPTION (may be empty):
{jd_text}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_template_has_all_placeholders() {
        for placeholder in [
            "{resume_text}",
            "{jd_text}",
            "{tech_skills}",
            "{soft_skills}",
            "{weights}",
        ] {
            assert!(
                RESUME_SCORE_PROMPT_TEMPLATE.contains(placeholder),
                "missing {placeholder}"
            );
        }
    }

    #[test]
    fn test_score_template_names_every_criterion() {
        for criterion in crate::ranking::weights::CRITERIA {
            assert!(RESUME_SCORE_PROMPT_TEMPLATE.contains(criterion));
        }
        assert!(RESUME_SCORE_PROMPT_TEMPLATE.contains("final_score"));
    }

    #[test]
    fn test_enhance_template_has_placeholders() {
        assert!(RESUME_ENHANCE_PROMPT_TEMPLATE.contains("{resume_text}"));
        assert!(RESUME_ENHANCE_PROMPT_TEMPLATE.contains("{jd_text}"));
    }
}
