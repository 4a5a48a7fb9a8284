//! Model reply parsing — locates the JSON object in free text and validates it
//! field by field before any record is built.

use std::collections::HashSet;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::analysis::CandidateScore;

#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("no JSON object found in model response")]
    NoJson,

    #[error("model response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("model response is missing required field `{0}`")]
    MissingField(String),

    #[error("model response field `{field}` is invalid: {reason}")]
    InvalidField { field: String, reason: String },
}

/// Fields of a job-description enhancement reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Enhancement {
    pub enhanced_content: String,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub culture: String,
}

/// Returns the span from the first `{` to the last `}` of `text`.
pub fn extract_json_object(text: &str) -> Result<&str, ResponseError> {
    let start = text.find('{').ok_or(ResponseError::NoJson)?;
    let end = text.rfind('}').ok_or(ResponseError::NoJson)?;
    if end < start {
        return Err(ResponseError::NoJson);
    }
    Ok(&text[start..=end])
}

fn parse_object(text: &str) -> Result<Map<String, Value>, ResponseError> {
    let value: Value = serde_json::from_str(extract_json_object(text)?)?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ResponseError::NoJson),
    }
}

/// Parses a scoring reply into candidate scores.
///
/// Every candidate must reference one of `known_resume_ids`.
pub fn parse_candidates(
    text: &str,
    known_resume_ids: &HashSet<&str>,
) -> Result<Vec<CandidateScore>, ResponseError> {
    let root = parse_object(text)?;
    let candidates = root
        .get("candidates")
        .ok_or_else(|| ResponseError::MissingField("candidates".to_string()))?
        .as_array()
        .ok_or_else(|| invalid("candidates", "expected an array"))?;

    candidates
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let path = format!("candidates[{i}]");
            let fields = value
                .as_object()
                .ok_or_else(|| invalid(&path, "expected an object"))?;
            let candidate = FieldReader::new(fields, &path).candidate()?;
            if !known_resume_ids.contains(candidate.resume_id.as_str()) {
                return Err(invalid(
                    &format!("{path}.resumeId"),
                    &format!("unknown resume id '{}'", candidate.resume_id),
                ));
            }
            Ok(candidate)
        })
        .collect()
}

/// Parses an enhancement reply.
pub fn parse_enhancement(text: &str) -> Result<Enhancement, ResponseError> {
    let root = parse_object(text)?;
    let reader = FieldReader::new(&root, "");
    Ok(Enhancement {
        enhanced_content: reader.string("enhancedContent")?,
        requirements: reader.string_list("requirements")?,
        benefits: reader.string_list("benefits")?,
        culture: reader.string("culture")?,
    })
}

fn invalid(field: &str, reason: &str) -> ResponseError {
    ResponseError::InvalidField {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Typed accessors over one JSON object that report errors by full field path.
struct FieldReader<'a> {
    fields: &'a Map<String, Value>,
    prefix: &'a str,
}

impl<'a> FieldReader<'a> {
    fn new(fields: &'a Map<String, Value>, prefix: &'a str) -> Self {
        Self { fields, prefix }
    }

    fn path(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{name}", self.prefix)
        }
    }

    fn required(&self, name: &str) -> Result<&'a Value, ResponseError> {
        match self.fields.get(name) {
            Some(Value::Null) | None => Err(ResponseError::MissingField(self.path(name))),
            Some(value) => Ok(value),
        }
    }

    fn string(&self, name: &str) -> Result<String, ResponseError> {
        let value = self.required(name)?;
        let s = value
            .as_str()
            .ok_or_else(|| invalid(&self.path(name), "expected a string"))?;
        if s.trim().is_empty() {
            return Err(invalid(&self.path(name), "must not be empty"));
        }
        Ok(s.to_string())
    }

    fn score(&self, name: &str) -> Result<f64, ResponseError> {
        let n = self
            .required(name)?
            .as_f64()
            .ok_or_else(|| invalid(&self.path(name), "expected a number"))?;
        if !(0.0..=100.0).contains(&n) {
            return Err(invalid(
                &self.path(name),
                &format!("{n} is outside 0-100"),
            ));
        }
        Ok(n)
    }

    fn string_list(&self, name: &str) -> Result<Vec<String>, ResponseError> {
        let items = self
            .required(name)?
            .as_array()
            .ok_or_else(|| invalid(&self.path(name), "expected an array of strings"))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| invalid(&format!("{}[{i}]", self.path(name)), "expected a string"))
            })
            .collect()
    }

    fn candidate(&self) -> Result<CandidateScore, ResponseError> {
        Ok(CandidateScore {
            resume_id: self.string("resumeId")?,
            file_name: self.string("fileName")?,
            overall_score: self.score("overallScore")?,
            technical_score: self.score("technicalScore")?,
            experience_score: self.score("experienceScore")?,
            cultural_score: self.score("culturalScore")?,
            match_percentage: self.score("matchPercentage")?,
            reasoning: self.string("reasoning")?,
            key_strengths: self.string_list("keyStrengths")?,
            key_weaknesses: self.string_list("keyWeaknesses")?,
            recommendations: self.string_list("recommendations")?,
        })
    }
}
