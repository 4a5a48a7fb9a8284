// LLM prompt templates for the scoring service.
// Placeholders in `{braces}` are filled by `fill` before sending.

/// Candidate scoring prompt. Replace `{title}`, `{company}`, `{content}`,
/// `{requirements}` and `{resumes}`.
pub const SCORE_PROMPT_TEMPLATE: &str = r#"You are an experienced technical recruiter. Evaluate every resume below against the job description and score each candidate.

JOB TITLE: {title}
COMPANY: {company}
JOB DESCRIPTION:
{content}
REQUIREMENTS: {requirements}

SCORING DIMENSIONS (each 0-100):
- technicalScore: skills alignment with the requirements, technical depth and breadth, certifications, problem-solving evidence
- experienceScore: relevant work experience, career progression, leadership and measurable impact, industry relevance
- culturalScore: communication style, collaboration signals, adaptability, alignment with the company
- overallScore: your overall judgement of the candidate for this role
- matchPercentage: how much of the job description the candidate covers

TIERS (by overallScore):
- 90-100: Legendary (immediate hire)
- 80-89: Elite (strong hire)
- 70-79: Solid (consider)
- 60-69: Average (potential with development)
- 0-59: Rejected (not suitable)

Return a JSON object with this EXACT schema, one entry per resume, using each resume's ID verbatim:
{
  "candidates": [
    {
      "resumeId": "resume id",
      "fileName": "file name",
      "overallScore": 85,
      "technicalScore": 90,
      "experienceScore": 80,
      "culturalScore": 85,
      "matchPercentage": 85,
      "reasoning": "Specific, evidence-based explanation of the scores",
      "keyStrengths": ["strength"],
      "keyWeaknesses": ["weakness"],
      "recommendations": ["next step"]
    }
  ]
}

Be rigorous and fair. Cite concrete evidence from each resume.

RESUMES TO ANALYZE:
{resumes}"#;

/// One resume block inside `{resumes}`. Replace `{index}`, `{id}`, `{file_name}`, `{content}`.
pub const RESUME_BLOCK_TEMPLATE: &str = r#"
RESUME {index}:
ID: {id}
FILENAME: {file_name}
CONTENT: {content}
"#;

/// Job description enhancement prompt. Replace `{title}`, `{company}`, `{description}`.
pub const ENHANCE_PROMPT_TEMPLATE: &str = r#"Rewrite this basic job description into a compelling, complete job posting that attracts strong candidates.

Title: {title}
Company: {company}
Basic Description: {description}

Return a JSON object with this EXACT schema:
{
  "enhancedContent": "Full enhanced job description",
  "requirements": ["requirement 1", "requirement 2", "requirement 3"],
  "benefits": ["benefit 1", "benefit 2", "benefit 3"],
  "culture": "Company culture description"
}"#;


/// Fills `{name}` placeholders in a single pass over `template`.
///
/// Substituted values are copied verbatim and never scanned again, so user
/// text containing `{title}` or similar stays as written. Braces that do not
/// name a placeholder (the JSON schemas above) are left untouched.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let hit = values.iter().find(|(name, _)| {
            after.starts_with(name) && after[name.len()..].starts_with('}')
        });
        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &after[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_replaces_every_occurrence() {
        let filled = fill("{a}-{b}-{a}", &[("a", "x"), ("b", "y")]);
        assert_eq!(filled, "x-y-x");
    }

    #[test]
    fn test_fill_does_not_rescan_substituted_values() {
        let filled = fill("{a} / {b}", &[("a", "{b}"), ("b", "{a}")]);
        assert_eq!(filled, "{b} / {a}");
    }

    #[test]
    fn test_fill_keeps_unknown_braces() {
        let filled = fill(r#"{ "k": "{v}" } {other}"#, &[("v", "1")]);
        assert_eq!(filled, r#"{ "k": "1" } {other}"#);
    }
}
