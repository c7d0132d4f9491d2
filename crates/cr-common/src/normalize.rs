use std::collections::BTreeSet;

use unicode_normalization::UnicodeNormalization;

/// スキル文字列の正規化（NFKC → 小文字化 → 空白の畳み込み）
///
/// 全角英数や連続空白の揺れを吸収する。意味的な同義語展開は行わない
/// （"ML" と "Machine Learning" は別物として扱う）。
pub fn normalize_skill(raw: &str) -> String {
    raw.nfkc()
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// 正規化済みスキル集合。空文字は除外し、順序は決定的（BTreeSet）。
pub fn normalize_skill_set(skills: &[String]) -> BTreeSet<String> {
    skills
        .iter()
        .map(|s| normalize_skill(s))
        .filter(|s| !s.is_empty())
        .collect()
}

/// スキル用トークン分割。
///
/// `+` と `#` は語の一部として残す（"c++" と "c#" を "c" に潰さない）。
/// それ以外の英数字以外の文字は区切りとして扱う（"node.js" → ["node", "js"]）。
pub fn skill_tokens(skill: &str) -> Vec<String> {
    normalize_skill(skill)
        .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// 一般テキスト用トークン分割（役職名・学歴など）。英数字以外はすべて区切り。
pub fn word_tokens(text: &str) -> Vec<String> {
    text.nfkc()
        .collect::<String>()
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// `needle` のトークン列が `haystack` 内に連続した部分列として現れるか
pub fn contains_token_run(haystack: &[String], needle: &[String]) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|window| window == needle)
}

/// スキル一致判定
///
/// 正規化後に完全一致するか、片方がもう片方をトークン単位の部分列として含めば一致。
/// "python" は "python 3" と一致するが、"java" は "javascript" と一致しない。
pub fn skills_match(a: &str, b: &str) -> bool {
    let left = normalize_skill(a);
    let right = normalize_skill(b);
    if left.is_empty() || right.is_empty() {
        return false;
    }
    if left == right {
        return true;
    }

    let left_tokens = skill_tokens(&left);
    let right_tokens = skill_tokens(&right);
    contains_token_run(&left_tokens, &right_tokens)
        || contains_token_run(&right_tokens, &left_tokens)
}
