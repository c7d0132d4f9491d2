use std::fmt::Write as _;

use serde::Serialize;

use crate::{
    Candidate, Job,
    error::MatchError,
    matching::ranking::{RankingEngine, ScoreResult},
};

/// 案件一覧（一覧表示・詳細表示・ID 解決）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobCatalog {
    jobs: Vec<Job>,
}

/// 一覧表示用の要約
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSummary {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub required_skills: Vec<String>,
    pub min_experience: f64,
}

impl JobCatalog {
    pub fn new(jobs: Vec<Job>) -> Self {
        Self { jobs }
    }

    /// JSON 配列から案件を読み込む
    pub fn from_json(json: &str) -> Result<Self, MatchError> {
        let jobs: Vec<Job> = serde_json::from_str(json)?;
        Ok(Self::new(jobs))
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// 見つからない場合は JobNotFound（呼び出し側でメッセージ表示する想定）
    pub fn find(&self, job_id: i64) -> Result<&Job, MatchError> {
        self.jobs
            .iter()
            .find(|job| job.id == job_id)
            .ok_or(MatchError::JobNotFound { job_id })
    }

    pub fn summaries(&self) -> Vec<JobSummary> {
        self.jobs
            .iter()
            .map(|job| JobSummary {
                id: job.id,
                title: job.title.clone(),
                company: job.company.clone(),
                required_skills: job.required_skills.clone(),
                min_experience: job.min_experience,
            })
            .collect()
    }

    /// ID で案件を解決してからランキングする
    pub fn rank_for(
        &self,
        job_id: i64,
        candidates: &[Candidate],
        engine: &RankingEngine,
        top_n: i64,
    ) -> Result<(&Job, Vec<ScoreResult>), MatchError> {
        let job = self.find(job_id)?;
        let results = engine.rank_candidates(job, candidates, top_n)?;
        Ok((job, results))
    }
}

/// 案件一覧の端末表示用テキスト
pub fn render_job_list(summaries: &[JobSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Available Jobs:");
    let _ = writeln!(out, "{}", "=".repeat(30));
    for summary in summaries {
        let _ = writeln!(out, "{}. {} at {}", summary.id, summary.title, summary.company);
        let _ = writeln!(out, "   Required Skills: {}", summary.required_skills.join(", "));
        let _ = writeln!(out, "   Min Experience: {} years", summary.min_experience);
        let _ = writeln!(out);
    }
    out
}

/// 案件詳細の端末表示用テキスト
pub fn render_job_details(job: &Job) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Job Details:");
    let _ = writeln!(out, "Title: {}", job.title);
    let _ = writeln!(out, "Company: {}", job.company);
    let _ = writeln!(out, "Description: {}", job.description);
    let _ = writeln!(out);
    let _ = writeln!(out, "Required Skills: {}", job.required_skills.join(", "));
    let _ = writeln!(out, "Preferred Skills: {}", job.preferred_skills.join(", "));
    let _ = writeln!(out, "Minimum Experience: {} years", job.min_experience);
    let _ = writeln!(out, "Education Requirements: {}", job.education_requirements);
    let _ = writeln!(out);
    let _ = writeln!(out, "Responsibilities:");
    for responsibility in &job.responsibilities {
        let _ = writeln!(out, "• {responsibility}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatchingConfig;

    fn catalog() -> JobCatalog {
        JobCatalog::from_json(
            r#"[
                {"id": 1, "title": "Python Developer", "company": "StartupTech",
                 "required_skills": ["Python", "REST APIs"], "min_experience": 3,
                 "responsibilities": ["Design and implement REST APIs"]},
                {"id": 2, "title": "DevOps Engineer", "company": "CloudFirst"}
            ]"#,
        )
        .expect("valid json")
    }

    #[test]
    fn finds_job_by_id() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.find(2).expect("present").company, "CloudFirst");
    }

    #[test]
    fn unknown_job_is_reported() {
        assert_eq!(
            catalog().find(42),
            Err(MatchError::JobNotFound { job_id: 42 })
        );
    }

    #[test]
    fn rank_for_surfaces_job_not_found() {
        let engine = RankingEngine::new(MatchingConfig::default()).expect("valid");
        let catalog = catalog();
        let result = catalog.rank_for(99, &[], &engine, 3);
        assert!(matches!(result, Err(MatchError::JobNotFound { job_id: 99 })));
    }

    #[test]
    fn renders_list_and_details() {
        let catalog = catalog();
        let list = render_job_list(&catalog.summaries());
        assert!(list.contains("1. Python Developer at StartupTech"));
        assert!(list.contains("Min Experience: 3 years"));

        let details = render_job_details(catalog.find(1).expect("present"));
        assert!(details.contains("Required Skills: Python, REST APIs"));
        assert!(details.contains("• Design and implement REST APIs"));
    }
}
