// src/features.rs
//! Feature extraction over free-form resume and job-description text.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Closed skill vocabulary. Extraction only ever reports members of this
/// list, so downstream set arithmetic stays well-defined.
pub const SKILL_VOCABULARY: &[&str] = &[
    "python",
    "java",
    "machine learning",
    "ml",
    "data science",
    "sql",
    "react",
    "javascript",
    "node",
    "c++",
    "c#",
    "aws",
    "docker",
    "tensorflow",
    "pytorch",
    "nlp",
    "excel",
    "tableau",
];

/// Coarse features derived from a piece of text. Recomputed on every call,
/// never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub skills: BTreeSet<String>,
    pub experience_years: u32,
}

fn experience_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\+?\s*(?:years?|yrs?)").expect("experience regex"))
}

/// Extract skills and years of experience from raw text.
///
/// Skills match case-insensitively on whole words only: "reactive" must not
/// count as "react". The boundary check is explicit rather than regex `\b`
/// because tokens ending in `+` or `#` ("c++", "c#") have no word boundary
/// after their last character.
///
/// Experience is the maximum over every "N years"/"N+ yrs" occurrence, 0 when
/// none. Implausible values ("9999 years") are accepted as-is.
pub fn extract_features(text: &str) -> FeatureSet {
    let lowered = text.to_lowercase();

    let skills = SKILL_VOCABULARY
        .iter()
        .filter(|skill| contains_whole_word(&lowered, skill))
        .map(|skill| skill.to_string())
        .collect();

    let experience_years = experience_re()
        .captures_iter(&lowered)
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    FeatureSet {
        skills,
        experience_years,
    }
}

/// True when `needle` occurs in `haystack` with no alphanumeric character
/// directly before or after the occurrence.
fn contains_whole_word(haystack: &str, needle: &str) -> bool {
    let mut from = 0;
    while let Some(offset) = haystack[from..].find(needle) {
        let begin = from + offset;
        let end = begin + needle.len();

        let clear_before = haystack[..begin]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let clear_after = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());

        if clear_before && clear_after {
            return true;
        }
        // Vocabulary entries start with an ASCII byte, so begin + 1 is a
        // valid char boundary.
        from = begin + 1;
    }
    false
}
