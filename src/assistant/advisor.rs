// src/assistant/advisor.rs
use super::model_client::ModelClient;
use crate::features::{extract_features, FeatureSet};
use crate::scoring::{score_fit, FitScore};
use crate::utils::truncate_chars;
use std::collections::BTreeSet;
use tracing::warn;

/// Resumes are cut to this many characters before prompting, so a pasted
/// 40-page document cannot blow up the prompt.
pub const MAX_RESUME_CHARS: usize = 4_000;

const TECHNICAL_QUESTION_COUNT: usize = 5;
const BEHAVIORAL_QUESTION_COUNT: usize = 3;

/// Fit score plus the narrative produced for it.
#[derive(Debug, Clone)]
pub struct FitReport {
    pub score: FitScore,
    pub narrative: String,
}

/// Stateless orchestrator over the local model. Each call receives its full
/// input explicitly; the only configuration is the injected client.
pub struct Assistant {
    model: ModelClient,
}

impl Assistant {
    pub fn new(model: ModelClient) -> Self {
        Self { model }
    }

    pub fn model_available(&self) -> bool {
        self.model.available()
    }

    /// Extract features from both texts, score them, and narrate the result.
    ///
    /// Offline, the narrative falls back to a generic text-similarity ratio.
    /// That ratio is NOT the skill-based fit_percent and the two can disagree;
    /// both numbers are reported side by side rather than unified.
    pub async fn analyze_fit(&self, resume_text: &str, job_text: &str) -> FitReport {
        let resume = extract_features(resume_text);
        let job = extract_features(job_text);
        let score = score_fit(&resume, &job);

        let narrative = if self.model.available() {
            self.complete(fit_prompt(&resume, &job, &score)).await
        } else {
            offline_fit_narrative(resume_text, job_text, &score)
        };

        FitReport { score, narrative }
    }

    /// Ask the model to rewrite a resume for a target role.
    pub async fn enhance_resume(&self, resume_text: &str, target_role: &str) -> String {
        if !self.model.available() {
            return offline_placeholder(self.model.model());
        }
        self.complete(enhance_prompt(resume_text, target_role)).await
    }

    /// Generate technical and behavioral interview questions for a role.
    pub async fn interview_questions(&self, role: &str, skills: &[String]) -> String {
        if !self.model.available() {
            return offline_placeholder(self.model.model());
        }
        self.complete(questions_prompt(role, skills)).await
    }

    async fn complete(&self, prompt: String) -> String {
        match self.model.chat(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Local model call failed: {:#}", e);
                format!(
                    "Local model call failed: {:#}. Check that Ollama is running and `ollama pull {}` has completed.",
                    e,
                    self.model.model()
                )
            }
        }
    }
}

fn fit_prompt(resume: &FeatureSet, job: &FeatureSet, score: &FitScore) -> String {
    format!(
        r#"You are a technical recruiter AI. Compare a candidate's resume and a job description.

Candidate skills: {resume_skills}
Job skills: {job_skills}
Candidate experience: {resume_years} years
Job experience: {job_years} years

The computed fit score is {fit}%. Provide a professional summary with:
- Skills matched
- Missing skills
- Fit percentage ({fit}%)
- A short recommendation (2-3 sentences)"#,
        resume_skills = join_skills(&resume.skills),
        job_skills = join_skills(&job.skills),
        resume_years = resume.experience_years,
        job_years = job.experience_years.max(1),
        fit = score.fit_percent,
    )
}

fn enhance_prompt(resume_text: &str, target_role: &str) -> String {
    format!(
        r#"You are a professional resume writer.
Optimize this resume for a {target_role} role.

- Keep existing experience details but rewrite bullet points for stronger impact.
- Add relevant modern industry keywords.
- Improve structure and phrasing to ATS standards.
- Keep the tone concise and professional.

Resume:
{resume}"#,
        target_role = target_role,
        resume = truncate_chars(resume_text, MAX_RESUME_CHARS),
    )
}

fn questions_prompt(role: &str, skills: &[String]) -> String {
    let skill_str = if skills.is_empty() {
        "general technical and behavioral skills".to_string()
    } else {
        skills.join(", ")
    };

    format!(
        r#"You are an experienced interviewer hiring for a {role}.

Generate:
- {technical} technical questions focusing on these skills: {skills}
- {behavioral} behavioral questions assessing teamwork, communication, and adaptability.

Format the output clearly in Markdown with a "Technical Questions" section and a "Behavioral Questions" section."#,
        role = role,
        technical = TECHNICAL_QUESTION_COUNT,
        behavioral = BEHAVIORAL_QUESTION_COUNT,
        skills = skill_str,
    )
}

fn offline_fit_narrative(resume_text: &str, job_text: &str, score: &FitScore) -> String {
    let ratio = strsim::normalized_levenshtein(
        &resume_text.to_lowercase(),
        &job_text.to_lowercase(),
    );

    format!(
        "(offline fallback)\nText similarity: {}%\nSkills matched: {}\nMissing skills: {}",
        (ratio * 100.0) as u32,
        join_skills(&score.matched_skills),
        join_skills(&score.missing_skills),
    )
}

fn offline_placeholder(model: &str) -> String {
    format!(
        "No local model available. Start Ollama and pull '{}' to enable this feature.",
        model
    )
}

fn join_skills(skills: &BTreeSet<String>) -> String {
    if skills.is_empty() {
        "none".to_string()
    } else {
        skills.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_assistant() -> Assistant {
        Assistant::new(ModelClient::offline("llama3.2"))
    }

    #[tokio::test]
    async fn test_analyze_fit_offline_keeps_computed_score() {
        let assistant = offline_assistant();
        let report = assistant
            .analyze_fit(
                "5 years of experience in Python, SQL, and React.",
                "Looking for a Data Scientist with Python, ML, SQL, and 3+ years experience.",
            )
            .await;

        // The skill-based score is computed even though the offline narrative
        // reports a different similarity-based number.
        assert!(report.score.fit_percent > 0);
        assert!(report.score.matched_skills.contains("python"));
        assert!(report.score.matched_skills.contains("sql"));
        assert!(report.score.missing_skills.contains("ml"));
        assert!(report.narrative.starts_with("(offline fallback)"));
        assert!(report.narrative.contains("Text similarity:"));
    }

    #[tokio::test]
    async fn test_enhance_resume_offline_placeholder() {
        let assistant = offline_assistant();
        let out = assistant.enhance_resume("Some resume", "Data Scientist").await;
        assert!(out.contains("No local model available"));
        assert!(out.contains("llama3.2"));
    }

    #[tokio::test]
    async fn test_interview_questions_offline_placeholder() {
        let assistant = offline_assistant();
        let out = assistant.interview_questions("Data Scientist", &[]).await;
        assert!(out.contains("No local model available"));
    }

    #[test]
    fn test_fit_prompt_embeds_score_and_skills() {
        let resume = extract_features("4 years of Python and SQL");
        let job = extract_features("Python, SQL, AWS role, 2 years required");
        let score = score_fit(&resume, &job);

        let prompt = fit_prompt(&resume, &job, &score);
        assert!(prompt.contains(&format!("{}%", score.fit_percent)));
        assert!(prompt.contains("python"));
        assert!(prompt.contains("aws"));
    }

    #[test]
    fn test_enhance_prompt_truncates_resume() {
        let long_resume = "x".repeat(MAX_RESUME_CHARS + 500);
        let prompt = enhance_prompt(&long_resume, "Engineer");
        assert!(prompt.chars().count() < long_resume.chars().count());
        assert!(prompt.contains("Engineer"));
    }

    #[test]
    fn test_questions_prompt_defaults_skill_phrase() {
        let prompt = questions_prompt("Data Scientist", &[]);
        assert!(prompt.contains("general technical and behavioral skills"));

        let prompt = questions_prompt(
            "Data Scientist",
            &["Python".to_string(), "ML".to_string()],
        );
        assert!(prompt.contains("Python, ML"));
    }
}
