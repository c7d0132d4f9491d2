use std::sync::Arc;

use serde::Serialize;

use super::{
    education::{
        DEFAULT_LEVEL_SHARE, EducationBreakdown, EducationVocabulary, KeywordVocabulary,
        score_education,
    },
    experience::{ExperienceBreakdown, score_experience},
    role::{DEFAULT_ROLE_MATCH_TARGET, RoleBreakdown, score_role_relevance},
    skills::{DEFAULT_REQUIRED_SKILL_SHARE, SkillsBreakdown, score_skills},
    weights::{DEFAULT_WEIGHTS, Weights},
};
use crate::{Candidate, Job};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchingConfig {
    pub weights: Weights,
    /// スキルスコア内の必須スキル配分
    pub required_skill_share: f64,
    /// 学歴スコア内の学位レベル配分
    pub level_share: f64,
    /// 職歴関連度が満点になる一致職歴数
    pub role_match_target: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights: DEFAULT_WEIGHTS,
            required_skill_share: DEFAULT_REQUIRED_SKILL_SHARE,
            level_share: DEFAULT_LEVEL_SHARE,
            role_match_target: DEFAULT_ROLE_MATCH_TARGET,
        }
    }
}

impl MatchingConfig {
    pub fn with_weights(weights: Weights) -> Self {
        Self {
            weights,
            ..Self::default()
        }
    }
}

/// 1 人材 × 1 案件のスコア内訳
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchScore {
    pub overall: f64,
    pub skills: SkillsBreakdown,
    pub experience: ExperienceBreakdown,
    pub education: EducationBreakdown,
    pub role_relevance: RoleBreakdown,
}

/// 4 観点のスコアを計算して重み付き合算する。状態を持たず、入力を変更しない。
#[derive(Clone)]
pub struct ScoringEngine {
    config: MatchingConfig,
    vocabulary: Arc<dyn EducationVocabulary>,
}

impl std::fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ScoringEngine {
    pub fn new(config: MatchingConfig) -> Self {
        Self::with_vocabulary(config, Arc::new(KeywordVocabulary))
    }

    pub fn with_vocabulary(
        config: MatchingConfig,
        vocabulary: Arc<dyn EducationVocabulary>,
    ) -> Self {
        Self { config, vocabulary }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// 総合スコア計算
    pub fn calculate_match_score(&self, job: &Job, candidate: &Candidate) -> MatchScore {
        let skills = self.score_skills(job, candidate);
        let experience = self.score_experience(job, candidate);
        let education = self.score_education(job, candidate);
        let role_relevance = self.score_role_relevance(job, candidate);

        let weights = self.config.weights;
        let overall = (skills.score * weights.skills
            + experience.score * weights.experience
            + education.score * weights.education
            + role_relevance.score * weights.role_relevance)
            .clamp(0.0, 1.0);

        MatchScore {
            overall,
            skills,
            experience,
            education,
            role_relevance,
        }
    }

    fn score_skills(&self, job: &Job, candidate: &Candidate) -> SkillsBreakdown {
        score_skills(
            &candidate.skills,
            &job.required_skills,
            &job.preferred_skills,
            self.config.required_skill_share,
        )
    }

    fn score_experience(&self, job: &Job, candidate: &Candidate) -> ExperienceBreakdown {
        score_experience(candidate.experience_years, job.min_experience)
    }

    fn score_education(&self, job: &Job, candidate: &Candidate) -> EducationBreakdown {
        score_education(
            self.vocabulary.as_ref(),
            &candidate.education,
            &job.education_requirements,
            self.config.level_share,
        )
    }

    fn score_role_relevance(&self, job: &Job, candidate: &Candidate) -> RoleBreakdown {
        score_role_relevance(
            &candidate.previous_roles,
            &job.title,
            self.config.role_match_target,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_scientist_job() -> Job {
        Job {
            id: 1,
            title: "Senior Data Scientist".into(),
            company: "TechCorp".into(),
            required_skills: vec![
                "Python".into(),
                "Machine Learning".into(),
                "Statistics".into(),
                "TensorFlow".into(),
                "Data Analysis".into(),
            ],
            preferred_skills: vec![
                "Deep Learning".into(),
                "NLP".into(),
                "Computer Vision".into(),
                "AWS".into(),
                "MLOps".into(),
            ],
            min_experience: 4.0,
            education_requirements: "MS in Computer Science, Statistics, or related field".into(),
            ..Job::default()
        }
    }

    fn alice() -> Candidate {
        Candidate {
            id: 1,
            name: "Alice Johnson".into(),
            skills: vec![
                "Python".into(),
                "Machine Learning".into(),
                "Data Science".into(),
                "SQL".into(),
                "TensorFlow".into(),
            ],
            experience_years: 5.0,
            education: "MS Computer Science".into(),
            previous_roles: vec!["Data Scientist".into(), "ML Engineer".into()],
            ..Candidate::default()
        }
    }

    #[test]
    fn calculates_weighted_scores() {
        let engine = ScoringEngine::new(MatchingConfig::default());
        let score = engine.calculate_match_score(&data_scientist_job(), &alice());

        assert!((score.skills.score - 0.42).abs() < 1e-9);
        assert_eq!(score.experience.score, 1.0);
        assert_eq!(score.education.score, 1.0);
        assert_eq!(score.role_relevance.score, 0.5);

        let expected = 0.40 * 0.42 + 0.25 + 0.20 + 0.15 * 0.5;
        assert!((score.overall - expected).abs() < 1e-9);
    }

    #[test]
    fn custom_weights_change_aggregate_only() {
        let weights = Weights {
            skills: 1.0,
            experience: 0.0,
            education: 0.0,
            role_relevance: 0.0,
        };
        let engine = ScoringEngine::new(MatchingConfig::with_weights(weights));
        let score = engine.calculate_match_score(&data_scientist_job(), &alice());

        assert!((score.overall - score.skills.score).abs() < 1e-12);
        assert_eq!(score.experience.score, 1.0);
    }

    #[test]
    fn tunable_shares_are_applied() {
        let config = MatchingConfig {
            required_skill_share: 1.0,
            role_match_target: 1,
            ..MatchingConfig::default()
        };
        let engine = ScoringEngine::new(config);
        let score = engine.calculate_match_score(&data_scientist_job(), &alice());

        assert!((score.skills.score - 0.6).abs() < 1e-9);
        assert_eq!(score.role_relevance.score, 1.0);
    }
}
