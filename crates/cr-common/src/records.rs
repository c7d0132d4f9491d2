use serde::{Deserialize, Serialize};

use crate::{Candidate, error::MatchError};

/// 外部データ源（サンプルデータ・履歴書パース結果など）から受け取る生レコード
///
/// 全項目を Option で受け、`to_candidate` で必須項目を検証してから Candidate にする。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience_years: Option<f64>,
    pub education: Option<String>,
    pub previous_roles: Option<Vec<String>>,
    pub certifications: Option<Vec<String>>,
    pub summary: Option<String>,
}

impl CandidateRecord {
    /// 必須項目（id / name / skills / experience_years）を検証する。
    /// `index` は入力コレクション内の位置で、警告メッセージに使う。
    pub fn to_candidate(&self, index: usize) -> Result<Candidate, MatchError> {
        let malformed = |reason: &str| MatchError::MalformedCandidateRecord {
            index,
            candidate_id: self.id,
            reason: reason.to_string(),
        };

        let id = self.id.ok_or_else(|| malformed("missing id"))?;
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| malformed("missing name"))?;
        let skills = self
            .skills
            .clone()
            .ok_or_else(|| malformed("missing skills"))?;
        let experience_years = self
            .experience_years
            .ok_or_else(|| malformed("missing experience_years"))?;
        if !experience_years.is_finite() || experience_years < 0.0 {
            return Err(malformed("experience_years must be a non-negative number"));
        }

        Ok(Candidate {
            id,
            name: name.to_string(),
            email: self.email.clone().unwrap_or_default(),
            skills,
            experience_years,
            education: self.education.clone().unwrap_or_default(),
            previous_roles: self.previous_roles.clone().unwrap_or_default(),
            certifications: self.certifications.clone().unwrap_or_default(),
            summary: self.summary.clone(),
        })
    }
}

impl From<&Candidate> for CandidateRecord {
    fn from(candidate: &Candidate) -> Self {
        Self {
            id: Some(candidate.id),
            name: Some(candidate.name.clone()),
            email: Some(candidate.email.clone()),
            skills: Some(candidate.skills.clone()),
            experience_years: Some(candidate.experience_years),
            education: Some(candidate.education.clone()),
            previous_roles: Some(candidate.previous_roles.clone()),
            certifications: Some(candidate.certifications.clone()),
            summary: candidate.summary.clone(),
        }
    }
}

/// JSON 配列から生レコードを読み込む
pub fn load_candidate_records(json: &str) -> Result<Vec<CandidateRecord>, MatchError> {
    Ok(serde_json::from_str(json)?)
}

/// 生レコードを検証し、正常なものと不正なものに振り分ける
pub fn partition_records(records: &[CandidateRecord]) -> (Vec<Candidate>, Vec<MatchError>) {
    let mut candidates = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match record.to_candidate(index) {
            Ok(candidate) => candidates.push(candidate),
            Err(err) => rejected.push(err),
        }
    }

    (candidates, rejected)
}
