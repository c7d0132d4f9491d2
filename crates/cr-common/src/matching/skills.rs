use serde::Serialize;

use crate::normalize::{normalize_skill_set, skills_match};

/// 必須スキルの既定配分（残りが歓迎スキル）
pub const DEFAULT_REQUIRED_SKILL_SHARE: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillsBreakdown {
    pub score: f64,
    pub required_ratio: f64,
    pub preferred_ratio: f64,
    pub matched_required: usize,
    pub total_required: usize,
    pub matched_preferred: usize,
    pub total_preferred: usize,
    pub matched_required_skills: Vec<String>,
    pub missing_required_skills: Vec<String>,
    pub matched_preferred_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct RatioMatch {
    ratio: f64,
    total: usize,
    matched: Vec<String>,
    missing: Vec<String>,
}

/// 案件スキル群のうち、人材スキルのいずれかと一致したものを数える。
/// 要件が空なら満点（要件なし＝制約なし）。
fn match_ratio(job_skills: &[String], candidate_skills: &[String]) -> RatioMatch {
    let wanted = normalize_skill_set(job_skills);
    if wanted.is_empty() {
        return RatioMatch {
            ratio: 1.0,
            total: 0,
            matched: vec![],
            missing: vec![],
        };
    }

    let possessed = normalize_skill_set(candidate_skills);
    let (matched, missing): (Vec<String>, Vec<String>) = wanted
        .iter()
        .cloned()
        .partition(|skill| possessed.iter().any(|owned| skills_match(skill, owned)));

    RatioMatch {
        ratio: matched.len() as f64 / wanted.len() as f64,
        total: wanted.len(),
        matched,
        missing,
    }
}

/// スキルスコア = share × 必須一致率 + (1 - share) × 歓迎一致率
pub fn score_skills(
    candidate_skills: &[String],
    required_skills: &[String],
    preferred_skills: &[String],
    required_share: f64,
) -> SkillsBreakdown {
    let required = match_ratio(required_skills, candidate_skills);
    let preferred = match_ratio(preferred_skills, candidate_skills);

    let share = required_share.clamp(0.0, 1.0);
    let score = (share * required.ratio + (1.0 - share) * preferred.ratio).clamp(0.0, 1.0);

    SkillsBreakdown {
        score,
        required_ratio: required.ratio,
        preferred_ratio: preferred.ratio,
        matched_required: required.matched.len(),
        total_required: required.total,
        matched_preferred: preferred.matched.len(),
        total_preferred: preferred.total,
        matched_required_skills: required.matched,
        missing_required_skills: required.missing,
        matched_preferred_skills: preferred.matched,
    }
}
