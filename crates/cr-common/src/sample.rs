//! Bundled sample data (eight candidates, five jobs) used by the CLI when no
//! data files are given, and by the integration tests.

use crate::{
    Candidate, Job, JobCatalog,
    error::MatchError,
    records::{self, CandidateRecord},
};

pub const SAMPLE_CANDIDATES_JSON: &str = include_str!("../data/sample_candidates.json");
pub const SAMPLE_JOBS_JSON: &str = include_str!("../data/sample_jobs.json");

pub fn candidate_records() -> Result<Vec<CandidateRecord>, MatchError> {
    records::load_candidate_records(SAMPLE_CANDIDATES_JSON)
}

pub fn candidates() -> Result<Vec<Candidate>, MatchError> {
    Ok(serde_json::from_str(SAMPLE_CANDIDATES_JSON)?)
}

pub fn jobs() -> Result<JobCatalog, MatchError> {
    JobCatalog::from_json(SAMPLE_JOBS_JSON)
}

pub fn job(job_id: i64) -> Result<Job, MatchError> {
    jobs()?.find(job_id).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_data_parses() {
        assert_eq!(candidates().expect("sample candidates").len(), 8);
        assert_eq!(jobs().expect("sample jobs").len(), 5);
        assert!(
            candidate_records()
                .expect("sample records")
                .iter()
                .enumerate()
                .all(|(index, record)| record.to_candidate(index).is_ok())
        );
    }

    #[test]
    fn missing_sample_job_is_reported() {
        assert_eq!(job(6), Err(MatchError::JobNotFound { job_id: 6 }));
    }
}
