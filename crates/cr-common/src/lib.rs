pub mod catalog;
pub mod error;
pub mod explain;
pub mod logging;
pub mod matching;
pub mod normalize;
pub mod records;
pub mod sample;
pub mod search;

use serde::{Deserialize, Serialize};

pub use catalog::JobCatalog;
pub use error::MatchError;
pub use explain::{Explanation, explain};
pub use matching::ranking::{RankingEngine, RankingOutcome, ScoreResult, rank_candidates};
pub use matching::scoring::MatchingConfig;
pub use matching::weights::{DEFAULT_WEIGHTS, Weights};
pub use records::CandidateRecord;
pub use search::{SkillSearchHit, search_by_skill};

// マッチング関数で共通利用するデータモデル。
// どちらも外部のデータ読み込み層が所有し、コアは読むだけ。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub skills: Vec<String>,
    pub experience_years: f64,
    pub education: String,
    pub previous_roles: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    #[serde(default)]
    pub min_experience: f64,
    #[serde(default)]
    pub education_requirements: String,
    #[serde(default)]
    pub responsibilities: Vec<String>,
}
