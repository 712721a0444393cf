// src/scoring.rs
//! Candidate/job fit scoring from extracted feature sets.

use crate::features::FeatureSet;
use serde::Serialize;
use std::collections::BTreeSet;

/// Skill overlap carries most of the weight; raw tenure is a weaker signal.
pub const SKILL_WEIGHT: f64 = 70.0;
pub const EXPERIENCE_WEIGHT: f64 = 30.0;

/// Deterministic part of a fit analysis: percentage plus skill-gap sets.
#[derive(Debug, Clone, Serialize)]
pub struct FitScore {
    pub fit_percent: u8,
    pub matched_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
}

/// Score how well a candidate's features cover a job's features.
///
/// Skill coverage contributes up to 70 points, the experience ratio up to 30.
/// The experience ratio is capped at 1.0 so exceeding the requirement earns no
/// bonus, and a job declaring zero required years (or zero skills) uses a
/// denominator of 1 instead of dividing by zero.
pub fn score_fit(resume: &FeatureSet, job: &FeatureSet) -> FitScore {
    let matched: BTreeSet<String> = resume.skills.intersection(&job.skills).cloned().collect();
    let missing: BTreeSet<String> = job.skills.difference(&resume.skills).cloned().collect();

    let required_skills = job.skills.len().max(1) as f64;
    let skill_score = matched.len() as f64 / required_skills * SKILL_WEIGHT;

    let required_years = job.experience_years.max(1) as f64;
    let experience_ratio = (resume.experience_years as f64 / required_years).min(1.0);

    let fit_percent = (skill_score + experience_ratio * EXPERIENCE_WEIGHT).floor() as u8;

    FitScore {
        fit_percent,
        matched_skills: matched,
        missing_skills: missing,
    }
}
