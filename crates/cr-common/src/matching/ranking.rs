use std::{cmp::Ordering, sync::Arc};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use super::{
    education::{EducationBreakdown, EducationVocabulary},
    experience::ExperienceBreakdown,
    role::RoleBreakdown,
    scoring::{MatchingConfig, ScoringEngine},
    skills::SkillsBreakdown,
    weights::Weights,
};
use crate::{
    Candidate, Job,
    error::MatchError,
    records::{CandidateRecord, partition_records},
};

/// 1 回のランキング呼び出しごとに作り直す結果（キャッシュ・永続化しない）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub rank: usize,
    pub candidate_id: i64,
    pub overall_score: f64,
    pub skills: SkillsBreakdown,
    pub experience: ExperienceBreakdown,
    pub education: EducationBreakdown,
    pub role_relevance: RoleBreakdown,
    pub candidate: Candidate,
}

/// 不正レコードをスキップした上でのランキング結果
#[derive(Debug, Clone, PartialEq)]
pub struct RankingOutcome {
    pub results: Vec<ScoreResult>,
    pub skipped: Vec<MatchError>,
}

/// 重みを検証済みの状態でしか構築できないランキングエンジン
#[derive(Debug, Clone)]
pub struct RankingEngine {
    scorer: ScoringEngine,
}

impl RankingEngine {
    /// 設定の検証はここで一度だけ行う（スコアリング時には再検証しない）
    pub fn new(config: MatchingConfig) -> Result<Self, MatchError> {
        config.weights.validate()?;
        Ok(Self {
            scorer: ScoringEngine::new(config),
        })
    }

    pub fn with_vocabulary(
        config: MatchingConfig,
        vocabulary: Arc<dyn EducationVocabulary>,
    ) -> Result<Self, MatchError> {
        config.weights.validate()?;
        Ok(Self {
            scorer: ScoringEngine::with_vocabulary(config, vocabulary),
        })
    }

    pub fn config(&self) -> &MatchingConfig {
        self.scorer.config()
    }

    /// 全人材を並列にスコアリングし、総合スコア順に並べて上位 top_n 件を返す
    ///
    /// - top_n <= 0 は InvalidTopN
    /// - top_n > 人材数 は人材数に切り詰め
    /// - 同点は experience → skills → candidate.id 昇順で決定的に並べる
    pub fn rank_candidates(
        &self,
        job: &Job,
        candidates: &[Candidate],
        top_n: i64,
    ) -> Result<Vec<ScoreResult>, MatchError> {
        let limit = validate_top_n(top_n)?;

        // collect が全件スコアリングの完了を待つ（ソート前のバリア）
        let mut results: Vec<ScoreResult> = candidates
            .par_iter()
            .map(|candidate| self.score_candidate(job, candidate))
            .collect();

        results.sort_by(compare_results);
        results.truncate(limit);
        for (index, result) in results.iter_mut().enumerate() {
            result.rank = index + 1;
        }

        debug!(
            job_id = job.id,
            candidates = candidates.len(),
            returned = results.len(),
            "ranked candidates"
        );

        Ok(results)
    }

    /// 生レコードから変換してランキングする。不正レコードは警告を残してスキップし、
    /// 残りの人材のランキングは継続する。
    pub fn rank_records(
        &self,
        job: &Job,
        records: &[CandidateRecord],
        top_n: i64,
    ) -> Result<RankingOutcome, MatchError> {
        validate_top_n(top_n)?;

        let (candidates, skipped) = partition_records(records);
        for err in &skipped {
            warn!(job_id = job.id, error = %err, "skipping malformed candidate record");
        }

        let results = self.rank_candidates(job, &candidates, top_n)?;
        Ok(RankingOutcome { results, skipped })
    }

    fn score_candidate(&self, job: &Job, candidate: &Candidate) -> ScoreResult {
        let score = self.scorer.calculate_match_score(job, candidate);

        ScoreResult {
            rank: 0,
            candidate_id: candidate.id,
            overall_score: score.overall,
            skills: score.skills,
            experience: score.experience,
            education: score.education,
            role_relevance: score.role_relevance,
            candidate: candidate.clone(),
        }
    }
}

/// 呼び出し単位のエントリポイント。weights を渡した場合はその場で検証する。
pub fn rank_candidates(
    job: &Job,
    candidates: &[Candidate],
    top_n: i64,
    weights: Option<Weights>,
) -> Result<Vec<ScoreResult>, MatchError> {
    validate_top_n(top_n)?;
    let config = weights
        .map(MatchingConfig::with_weights)
        .unwrap_or_default();
    RankingEngine::new(config)?.rank_candidates(job, candidates, top_n)
}

fn validate_top_n(top_n: i64) -> Result<usize, MatchError> {
    if top_n <= 0 {
        return Err(MatchError::InvalidTopN(top_n));
    }
    Ok(usize::try_from(top_n).unwrap_or(usize::MAX))
}

fn compare_results(a: &ScoreResult, b: &ScoreResult) -> Ordering {
    b.overall_score
        .total_cmp(&a.overall_score)
        .then_with(|| b.experience.score.total_cmp(&a.experience.score))
        .then_with(|| b.skills.score.total_cmp(&a.skills.score))
        .then_with(|| a.candidate_id.cmp(&b.candidate_id))
}
