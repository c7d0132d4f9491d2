use thiserror::Error;

/// コア全体のエラー種別。どれも呼び出し側で回復可能。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("job {job_id} not found")]
    JobNotFound { job_id: i64 },
    #[error("top_n must be a positive integer, got {0}")]
    InvalidTopN(i64),
    #[error("weights must be non-negative and sum to 1.0, got sum {sum:.6}")]
    InvalidWeights { sum: f64 },
    #[error("invalid weight specification: {0}")]
    InvalidWeightSpec(String),
    #[error("malformed candidate record at index {index} (id: {}): {reason}", display_id(.candidate_id))]
    MalformedCandidateRecord {
        index: usize,
        candidate_id: Option<i64>,
        reason: String,
    },
    #[error("failed to load data: {0}")]
    DataLoad(String),
}

fn display_id(id: &Option<i64>) -> String {
    id.map(|v| v.to_string()).unwrap_or_else(|| "unknown".into())
}

impl From<serde_json::Error> for MatchError {
    fn from(err: serde_json::Error) -> Self {
        MatchError::DataLoad(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_descriptive() {
        assert_eq!(
            MatchError::JobNotFound { job_id: 9 }.to_string(),
            "job 9 not found"
        );
        assert!(MatchError::InvalidTopN(0).to_string().contains("got 0"));

        let malformed = MatchError::MalformedCandidateRecord {
            index: 2,
            candidate_id: None,
            reason: "missing skills".into(),
        };
        assert_eq!(
            malformed.to_string(),
            "malformed candidate record at index 2 (id: unknown): missing skills"
        );
    }
}
