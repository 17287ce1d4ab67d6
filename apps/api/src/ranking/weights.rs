//! Weight Normalization — raw per-criterion form values into a consistent
//! `ScoringWeights` the oracle adapter can embed in its prompt.
//!
//! Total function: any input map, including an empty one, produces exactly the
//! five fixed criteria with finite non-negative values. Invalid entries
//! degrade to 0.0 instead of rejecting the request.

use std::collections::HashMap;

use serde::Serialize;

/// The fixed criterion set. Extra keys in client input are ignored.
pub const CRITERIA: [&str; 5] = [
    "skills",
    "experience",
    "education",
    "projects",
    "achievements",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringWeights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub projects: f64,
    pub achievements: f64,
}

impl ScoringWeights {
    pub fn normalize(raw: &HashMap<String, String>) -> Self {
        let get = |key: &str| parse_weight(raw.get(key).map(String::as_str));
        Self {
            skills: get("skills"),
            experience: get("experience"),
            education: get("education"),
            projects: get("projects"),
            achievements: get("achievements"),
        }
    }

    /// Prompt-friendly rendering, e.g. `skills=2, experience=1, ...`.
    pub fn describe(&self) -> String {
        format!(
            "skills={}, experience={}, education={}, projects={}, achievements={}",
            self.skills, self.experience, self.education, self.projects, self.achievements
        )
    }
}

/// Missing, unparseable, non-finite, or negative values all normalize to 0.0.
fn parse_weight(raw: Option<&str>) -> f64 {
    match raw.and_then(|s| s.trim().parse::<f64>().ok()) {
        Some(value) if value.is_finite() && value >= 0.0 => value,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_input_yields_all_zeroes() {
        let weights = ScoringWeights::normalize(&HashMap::new());
        assert_eq!(
            weights,
            ScoringWeights {
                skills: 0.0,
                experience: 0.0,
                education: 0.0,
                projects: 0.0,
                achievements: 0.0,
            }
        );
    }

    #[test]
    fn test_valid_values_pass_through() {
        let weights = ScoringWeights::normalize(&raw(&[
            ("skills", "2.5"),
            ("experience", "1"),
            ("education", "0.5"),
        ]));
        assert_eq!(weights.skills, 2.5);
        assert_eq!(weights.experience, 1.0);
        assert_eq!(weights.education, 0.5);
        assert_eq!(weights.projects, 0.0);
        assert_eq!(weights.achievements, 0.0);
    }

    #[test]
    fn test_unparseable_values_normalize_to_zero() {
        let weights =
            ScoringWeights::normalize(&raw(&[("skills", "heavy"), ("experience", "")]));
        assert_eq!(weights.skills, 0.0);
        assert_eq!(weights.experience, 0.0);
    }

    #[test]
    fn test_negative_and_non_finite_normalize_to_zero() {
        let weights = ScoringWeights::normalize(&raw(&[
            ("skills", "-3"),
            ("experience", "NaN"),
            ("education", "inf"),
        ]));
        assert_eq!(weights.skills, 0.0);
        assert_eq!(weights.experience, 0.0);
        assert_eq!(weights.education, 0.0);
    }

    #[test]
    fn test_extra_keys_ignored() {
        let weights =
            ScoringWeights::normalize(&raw(&[("charisma", "99"), ("skills", "1")]));
        assert_eq!(weights.skills, 1.0);
        // Output shape is exactly the five fixed criteria; "charisma" has nowhere to go.
    }

    #[test]
    fn test_whitespace_tolerated() {
        let weights = ScoringWeights::normalize(&raw(&[("projects", " 4.0 ")]));
        assert_eq!(weights.projects, 4.0);
    }

    #[test]
    fn test_describe_lists_every_criterion() {
        let weights = ScoringWeights::normalize(&raw(&[("skills", "2")]));
        let description = weights.describe();
        for criterion in CRITERIA {
            assert!(description.contains(criterion), "missing {criterion}");
        }
    }
}
