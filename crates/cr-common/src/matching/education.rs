use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::LazyLock;

use serde::Serialize;

use crate::normalize::word_tokens;

/// 学位レベルの既定配分（残りが専攻分野の関連度）
pub const DEFAULT_LEVEL_SHARE: f64 = 0.6;

/// 学位の序列（associate < bachelor < master < doctorate）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DegreeLevel {
    #[default]
    None,
    Associate,
    Bachelor,
    Master,
    Doctorate,
}

impl DegreeLevel {
    pub fn rank(self) -> u8 {
        match self {
            DegreeLevel::None => 0,
            DegreeLevel::Associate => 1,
            DegreeLevel::Bachelor => 2,
            DegreeLevel::Master => 3,
            DegreeLevel::Doctorate => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DegreeLevel::None => "none",
            DegreeLevel::Associate => "associate",
            DegreeLevel::Bachelor => "bachelor",
            DegreeLevel::Master => "master",
            DegreeLevel::Doctorate => "doctorate",
        }
    }
}

/// 学歴テキストから学位・専攻を推定するための語彙
///
/// 実装例:
/// - KeywordVocabulary: キーワード走査（既定、近似）
///
/// 推定ロジックを差し替えても集計側（ScoringEngine）は変更不要。
pub trait EducationVocabulary: Send + Sync {
    /// テキスト中で最も高い学位レベル（該当なしは None）
    fn infer_level(&self, text: &str) -> DegreeLevel;

    /// 学位キーワード・ストップワードを除いた専攻トークン
    fn field_tokens(&self, text: &str) -> BTreeSet<String>;

    /// 要件テキストを「いずれかを満たせばよい」専攻候補に分割する。
    /// 既定実装は分割せず、全トークンを 1 候補として返す。
    fn field_alternatives(&self, text: &str) -> Vec<BTreeSet<String>> {
        let tokens = self.field_tokens(text);
        if tokens.is_empty() {
            vec![]
        } else {
            vec![tokens]
        }
    }
}

/// 学位キーワード → レベル（ピリオド・アポストロフィ除去後のトークンで照合）
static LEVEL_KEYWORDS: LazyLock<HashMap<&'static str, DegreeLevel>> = LazyLock::new(|| {
    let table: &[(DegreeLevel, &[&str])] = &[
        (
            DegreeLevel::Doctorate,
            &["phd", "doctorate", "doctoral", "dphil"],
        ),
        (
            DegreeLevel::Master,
            &["ms", "msc", "master", "masters", "ma", "mba", "meng"],
        ),
        (
            DegreeLevel::Bachelor,
            &["bs", "bsc", "bachelor", "bachelors", "ba", "bfa", "beng"],
        ),
        (
            DegreeLevel::Associate,
            &["associate", "associates", "diploma"],
        ),
    ];

    table
        .iter()
        .flat_map(|(level, words)| words.iter().map(move |w| (*w, *level)))
        .collect()
});

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "an", "and", "any", "area", "areas", "at", "degree", "degrees", "discipline",
        "equivalent", "experience", "field", "fields", "for", "from", "in", "major", "of", "on",
        "or", "other", "plus", "preferred", "related", "relevant", "required", "similar", "the",
        "to", "with",
    ]
    .into_iter()
    .collect()
});

/// 専攻候補の区切りとして扱う接続詞。
/// "and" は "Computer Science and Engineering" のように 1 つの専攻をつなぐので区切らない。
const ALTERNATIVE_CONJUNCTIONS: &[&str] = &["or"];

/// キーワード走査による既定の推定。文法解析ではなく近似。
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordVocabulary;

impl KeywordVocabulary {
    /// "Ph.D." → "phd", "Master's" → "masters" のように略記を潰してから分割する
    fn tokens(text: &str) -> Vec<String> {
        let collapsed: String = text
            .chars()
            .filter(|c| !matches!(c, '.' | '\'' | '’'))
            .collect();
        word_tokens(&collapsed)
    }

    fn is_field_token(token: &str) -> bool {
        !LEVEL_KEYWORDS.contains_key(token) && !STOP_WORDS.contains(token)
    }
}

impl EducationVocabulary for KeywordVocabulary {
    fn infer_level(&self, text: &str) -> DegreeLevel {
        Self::tokens(text)
            .iter()
            .filter_map(|token| LEVEL_KEYWORDS.get(token.as_str()).copied())
            .max()
            .unwrap_or_default()
    }

    fn field_tokens(&self, text: &str) -> BTreeSet<String> {
        Self::tokens(text)
            .into_iter()
            .filter(|token| Self::is_field_token(token))
            .collect()
    }

    /// "MS in Computer Science, Statistics, or related field"
    /// → [{computer, science}, {statistics}]
    /// "MS in Computer Science and Engineering"
    /// → [{computer, engineering, science}]
    fn field_alternatives(&self, text: &str) -> Vec<BTreeSet<String>> {
        let mut alternatives = Vec::new();

        for clause in text.split([',', ';', '/', '|']) {
            let mut current = BTreeSet::new();
            for token in Self::tokens(clause) {
                if ALTERNATIVE_CONJUNCTIONS.contains(&token.as_str()) {
                    if !current.is_empty() {
                        alternatives.push(std::mem::take(&mut current));
                    }
                } else if Self::is_field_token(&token) {
                    current.insert(token);
                }
            }
            if !current.is_empty() {
                alternatives.push(current);
            }
        }

        alternatives
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EducationBreakdown {
    pub score: f64,
    pub level_score: f64,
    pub field_relevance: f64,
    pub candidate_level: DegreeLevel,
    pub required_level: DegreeLevel,
    /// 最も一致した専攻候補のトークン（要件に専攻がなければ空）
    pub required_field_tokens: Vec<String>,
    pub matched_field_tokens: Vec<String>,
}

/// 要求レベル以上なら満点、未満なら比率。要求なし（None）は満点。
pub fn level_score(candidate: DegreeLevel, required: DegreeLevel) -> f64 {
    if candidate >= required {
        1.0
    } else {
        f64::from(candidate.rank()) / f64::from(required.rank())
    }
}

/// 学歴スコア = share × レベルスコア + (1 - share) × 専攻関連度
///
/// 専攻関連度は要件の専攻候補ごとに「候補トークンのうち人材側にも現れる割合」を求め、
/// その最大値を採る。要件に専攻が見つからなければ 1.0。
pub fn score_education(
    vocabulary: &dyn EducationVocabulary,
    candidate_education: &str,
    education_requirements: &str,
    level_share: f64,
) -> EducationBreakdown {
    let candidate_level = vocabulary.infer_level(candidate_education);
    let required_level = vocabulary.infer_level(education_requirements);
    let level = level_score(candidate_level, required_level);

    let candidate_fields = vocabulary.field_tokens(candidate_education);
    let alternatives = vocabulary.field_alternatives(education_requirements);

    let mut best: Option<(f64, &BTreeSet<String>, Vec<String>)> = None;
    for alternative in alternatives.iter().filter(|a| !a.is_empty()) {
        let matched: Vec<String> = alternative
            .intersection(&candidate_fields)
            .cloned()
            .collect();
        let relevance = matched.len() as f64 / alternative.len() as f64;
        if best.as_ref().is_none_or(|(current, _, _)| relevance > *current) {
            best = Some((relevance, alternative, matched));
        }
    }

    let (field_relevance, required_field_tokens, matched_field_tokens) = match best {
        Some((relevance, alternative, matched)) => {
            (relevance, alternative.iter().cloned().collect(), matched)
        }
        None => (1.0, vec![], vec![]),
    };

    let share = level_share.clamp(0.0, 1.0);
    let score = (share * level + (1.0 - share) * field_relevance).clamp(0.0, 1.0);

    EducationBreakdown {
        score,
        level_score: level,
        field_relevance,
        candidate_level,
        required_level,
        required_field_tokens,
        matched_field_tokens,
    }
}
