use std::collections::BTreeSet;

use serde::Serialize;

use crate::normalize::word_tokens;

/// 関連職歴がこの件数あれば満点
pub const DEFAULT_ROLE_MATCH_TARGET: usize = 2;

/// 職種を区別しない汎用語（タイトルに固有語が 2 つ以上あるときだけ除外）
const GENERIC_ROLE_TOKENS: &[&str] = &[
    "engineer", "developer", "senior", "junior", "lead", "principal", "staff", "sr", "jr", "i",
    "ii", "iii",
];

/// 照合に使わない機能語
const FILLER_TOKENS: &[&str] = &["a", "an", "and", "at", "for", "in", "of", "the", "to"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleBreakdown {
    pub score: f64,
    pub matching_roles: usize,
    pub total_roles: usize,
    pub matched_roles: Vec<String>,
    /// 照合に使った案件タイトル側のトークン
    pub title_tokens: Vec<String>,
}

/// 案件タイトルから照合用トークンを決める
///
/// "Senior Data Scientist" → {data, scientist}（固有語が 2 つあるので汎用語を除外）
/// "Python Developer"      → {python, developer}（固有語が 1 つなので汎用語も残す）
pub fn title_match_tokens(job_title: &str) -> BTreeSet<String> {
    let tokens: BTreeSet<String> = word_tokens(job_title)
        .into_iter()
        .filter(|t| !FILLER_TOKENS.contains(&t.as_str()))
        .collect();

    let distinguishing: BTreeSet<String> = tokens
        .iter()
        .filter(|t| !GENERIC_ROLE_TOKENS.contains(&t.as_str()))
        .cloned()
        .collect();

    if distinguishing.len() > 1 {
        distinguishing
    } else {
        tokens
    }
}

/// 職歴関連度 = min(1.0, 一致職歴数 / target)。職歴なしは 0.0。
pub fn score_role_relevance(
    previous_roles: &[String],
    job_title: &str,
    match_target: usize,
) -> RoleBreakdown {
    let title_tokens = title_match_tokens(job_title);

    let matched_roles: Vec<String> = previous_roles
        .iter()
        .filter(|role| {
            word_tokens(role)
                .iter()
                .any(|token| title_tokens.contains(token))
        })
        .cloned()
        .collect();

    let target = match_target.max(1) as f64;
    let score = if previous_roles.is_empty() {
        0.0
    } else {
        (matched_roles.len() as f64 / target).min(1.0)
    };

    RoleBreakdown {
        score,
        matching_roles: matched_roles.len(),
        total_roles: previous_roles.len(),
        matched_roles,
        title_tokens: title_tokens.into_iter().collect(),
    }
}
