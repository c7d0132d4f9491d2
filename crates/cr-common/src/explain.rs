use std::fmt::Write as _;

use serde::Serialize;

use crate::{Job, matching::education::DegreeLevel, matching::ranking::ScoreResult};

/// 学歴スコアはキーワード推定なので、表示時は必ず近似である旨を添える
pub const EDUCATION_APPROXIMATION_NOTE: &str =
    "education score is inferred from degree keywords and is approximate";

const KEY_SKILL_PREVIEW: usize = 5;

/// 会話層へそのまま渡す構造化された説明
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub job: JobHeader,
    pub candidates: Vec<CandidateExplanation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobHeader {
    pub job_id: i64,
    pub title: String,
    pub company: String,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub min_experience: f64,
    pub education_requirements: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateExplanation {
    pub rank: usize,
    pub candidate_id: i64,
    pub name: String,
    pub email: String,
    pub overall_score: f64,
    pub skills: SkillsNote,
    pub experience: ExperienceNote,
    pub education: EducationNote,
    pub role_relevance: RoleNote,
    pub key_skills: Vec<String>,
    pub more_skills: usize,
    pub previous_roles: Vec<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillsNote {
    pub score: f64,
    pub matched_required: usize,
    pub total_required: usize,
    pub matched_preferred: usize,
    pub total_preferred: usize,
    pub matched_skills: Vec<String>,
    pub missing_required_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperienceNote {
    pub score: f64,
    pub candidate_years: f64,
    pub required_years: f64,
    pub meets_requirement: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EducationNote {
    pub score: f64,
    pub education: String,
    pub candidate_level: DegreeLevel,
    pub required_level: DegreeLevel,
    pub field_relevance: f64,
    pub matched_field_tokens: Vec<String>,
    pub approximate: bool,
    pub note: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleNote {
    pub score: f64,
    pub matching_roles: usize,
    pub total_roles: usize,
    pub matched_roles: Vec<String>,
}

/// 並び順どおりに整形するだけで、スコアの再計算はしない
pub fn explain(job: &Job, results: &[ScoreResult]) -> Explanation {
    Explanation {
        job: JobHeader {
            job_id: job.id,
            title: job.title.clone(),
            company: job.company.clone(),
            required_skills: job.required_skills.clone(),
            preferred_skills: job.preferred_skills.clone(),
            min_experience: job.min_experience,
            education_requirements: job.education_requirements.clone(),
        },
        candidates: results.iter().map(explain_result).collect(),
    }
}

fn explain_result(result: &ScoreResult) -> CandidateExplanation {
    let candidate = &result.candidate;
    let mut matched_skills = result.skills.matched_required_skills.clone();
    matched_skills.extend(result.skills.matched_preferred_skills.iter().cloned());

    CandidateExplanation {
        rank: result.rank,
        candidate_id: result.candidate_id,
        name: candidate.name.clone(),
        email: candidate.email.clone(),
        overall_score: result.overall_score,
        skills: SkillsNote {
            score: result.skills.score,
            matched_required: result.skills.matched_required,
            total_required: result.skills.total_required,
            matched_preferred: result.skills.matched_preferred,
            total_preferred: result.skills.total_preferred,
            matched_skills,
            missing_required_skills: result.skills.missing_required_skills.clone(),
        },
        experience: ExperienceNote {
            score: result.experience.score,
            candidate_years: result.experience.candidate_years,
            required_years: result.experience.required_years,
            meets_requirement: result.experience.meets_requirement,
        },
        education: EducationNote {
            score: result.education.score,
            education: candidate.education.clone(),
            candidate_level: result.education.candidate_level,
            required_level: result.education.required_level,
            field_relevance: result.education.field_relevance,
            matched_field_tokens: result.education.matched_field_tokens.clone(),
            approximate: true,
            note: EDUCATION_APPROXIMATION_NOTE,
        },
        role_relevance: RoleNote {
            score: result.role_relevance.score,
            matching_roles: result.role_relevance.matching_roles,
            total_roles: result.role_relevance.total_roles,
            matched_roles: result.role_relevance.matched_roles.clone(),
        },
        key_skills: candidate
            .skills
            .iter()
            .take(KEY_SKILL_PREVIEW)
            .cloned()
            .collect(),
        more_skills: candidate.skills.len().saturating_sub(KEY_SKILL_PREVIEW),
        previous_roles: candidate.previous_roles.clone(),
        summary: candidate.summary.clone(),
    }
}

impl Explanation {
    /// 端末表示用のテキスト（会話層が独自整形する場合は構造体をそのまま使う）
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let job = &self.job;

        let _ = writeln!(out, "Job: {} at {}", job.title, job.company);
        let _ = writeln!(out, "Required Skills: {}", job.required_skills.join(", "));
        let _ = writeln!(out, "Minimum Experience: {} years", job.min_experience);
        let _ = writeln!(out);
        let _ = writeln!(out, "Top {} Candidates:", self.candidates.len());
        let _ = writeln!(out, "{}", "=".repeat(50));

        for (index, candidate) in self.candidates.iter().enumerate() {
            if index > 0 {
                let _ = writeln!(out, "{}", "-".repeat(50));
            }
            candidate.write_text(&mut out);
        }

        out
    }
}

impl CandidateExplanation {
    fn write_text(&self, out: &mut String) {
        let _ = writeln!(out, "Rank #{}: {}", self.rank, self.name);
        let _ = writeln!(out, "Email: {}", self.email);
        let _ = writeln!(out, "Overall Score: {:.2}/1.00", self.overall_score);
        let _ = writeln!(out);
        let _ = writeln!(out, "Score Breakdown:");
        let _ = writeln!(
            out,
            "• Skills Match: {:.2}/1.00 ({}/{} required, {}/{} preferred)",
            self.skills.score,
            self.skills.matched_required,
            self.skills.total_required,
            self.skills.matched_preferred,
            self.skills.total_preferred
        );
        let _ = writeln!(
            out,
            "• Experience: {:.2}/1.00 ({} years vs {} required)",
            self.experience.score, self.experience.candidate_years, self.experience.required_years
        );
        let _ = writeln!(
            out,
            "• Education: {:.2}/1.00 ({}; level {} vs {} required, approximate)",
            self.education.score,
            self.education.education,
            self.education.candidate_level.as_str(),
            self.education.required_level.as_str()
        );
        let _ = writeln!(
            out,
            "• Role Relevance: {:.2}/1.00 ({} matching roles)",
            self.role_relevance.score, self.role_relevance.matching_roles
        );
        let _ = writeln!(out);

        let ellipsis = if self.more_skills > 0 { "..." } else { "" };
        let _ = writeln!(out, "Key Skills: {}{}", self.key_skills.join(", "), ellipsis);
        let _ = writeln!(out, "Previous Roles: {}", self.previous_roles.join(", "));
        if let Some(summary) = &self.summary {
            let _ = writeln!(out, "Summary: {summary}");
        }
    }
}
