use serde::{Deserialize, Serialize};

use tracing::warn;

use crate::error::MatchError;

/// 重みの合計に許容する誤差
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// ランキング用の既定重み
/// → スキル重視、次いで経験年数・学歴・職歴の関連度
pub const DEFAULT_WEIGHTS: Weights = Weights {
    skills: 0.40,
    experience: 0.25,
    education: 0.20,
    role_relevance: 0.15,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub role_relevance: f64,
}

impl Default for Weights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.skills + self.experience + self.education + self.role_relevance
    }

    fn values(&self) -> [f64; 4] {
        [self.skills, self.experience, self.education, self.role_relevance]
    }

    /// 各重みが非負かつ有限で、合計が 1.0（誤差 1e-6 以内）であることを確認する
    pub fn validate(&self) -> Result<(), MatchError> {
        let sum = self.sum();
        let each_valid = self.values().iter().all(|w| w.is_finite() && *w >= 0.0);
        if !each_valid || !sum.is_finite() || (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(MatchError::InvalidWeights { sum });
        }
        Ok(())
    }

    /// "skills,experience,education,role_relevance" 形式の文字列を読む（例: "0.4,0.25,0.2,0.15"）
    ///
    /// ここでは書式だけを確認し、合計のチェックは `validate` に任せる。
    pub fn parse(spec: &str) -> Result<Self, MatchError> {
        let parts: Vec<&str> = spec.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(MatchError::InvalidWeightSpec(format!(
                "expected 4 comma separated values, got {}",
                parts.len()
            )));
        }

        let mut values = [0.0_f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| MatchError::InvalidWeightSpec(format!("not a number: {part:?}")))?;
        }

        Ok(Self {
            skills: values[0],
            experience: values[1],
            education: values[2],
            role_relevance: values[3],
        })
    }

    /// 環境変数で個別に上書きする（未設定・パース不可の項目は既定値）
    pub fn from_env() -> Self {
        Self {
            skills: env_weight("CR_WEIGHT_SKILLS", DEFAULT_WEIGHTS.skills),
            experience: env_weight("CR_WEIGHT_EXPERIENCE", DEFAULT_WEIGHTS.experience),
            education: env_weight("CR_WEIGHT_EDUCATION", DEFAULT_WEIGHTS.education),
            role_relevance: env_weight("CR_WEIGHT_ROLE_RELEVANCE", DEFAULT_WEIGHTS.role_relevance),
        }
    }
}

fn env_weight(key: &str, default: f64) -> f64 {
    weight_override(key, std::env::var(key).ok().as_deref(), default)
}

/// 読めない値は警告を残して既定値に戻す（黙って捨てない）
fn weight_override(key: &str, raw: Option<&str>, default: f64) -> f64 {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(
                key,
                value = raw,
                default,
                "ignoring unparsable weight override"
            );
            default
        }
    }
}
