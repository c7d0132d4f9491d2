use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperienceBreakdown {
    pub score: f64,
    pub candidate_years: f64,
    pub required_years: f64,
    pub meets_requirement: bool,
}

/// 経験年数スコア（要件に対する比率、1.0 で頭打ち）
///
/// 要件が 0 以下なら制約なしとして満点。超過分の加点はしない。
pub fn score_experience(candidate_years: f64, required_years: f64) -> ExperienceBreakdown {
    let years = if candidate_years.is_finite() {
        candidate_years.max(0.0)
    } else {
        0.0
    };

    if !required_years.is_finite() || required_years <= 0.0 {
        return ExperienceBreakdown {
            score: 1.0,
            candidate_years: years,
            required_years: required_years.max(0.0),
            meets_requirement: true,
        };
    }

    ExperienceBreakdown {
        score: (years / required_years).clamp(0.0, 1.0),
        candidate_years: years,
        required_years,
        meets_requirement: years >= required_years,
    }
}
