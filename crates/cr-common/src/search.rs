use std::collections::HashSet;
use std::fmt::Write as _;

use crate::{
    Candidate,
    normalize::{normalize_skill, skills_match},
};

#[derive(Debug, Clone, PartialEq)]
pub struct SkillSearchHit<'a> {
    pub candidate: &'a Candidate,
    /// クエリに一致した人材側スキル（重複除去済み、元の表記）
    pub matched_skills: Vec<String>,
}

/// スキルで人材を横断検索する（ランキングとは独立）
///
/// 一致判定はスキルスコアと同じトークン単位の包含。
/// 並び順: 一致スキル数の多い順 → 氏名昇順 → id 昇順
pub fn search_by_skill<'a>(
    skill_token: &str,
    candidates: &'a [Candidate],
) -> Vec<SkillSearchHit<'a>> {
    if normalize_skill(skill_token).is_empty() {
        return vec![];
    }

    let mut hits: Vec<SkillSearchHit<'a>> = candidates
        .iter()
        .filter_map(|candidate| {
            let mut seen = HashSet::new();
            let matched_skills: Vec<String> = candidate
                .skills
                .iter()
                .filter(|skill| skills_match(skill_token, skill))
                .filter(|skill| seen.insert(normalize_skill(skill)))
                .cloned()
                .collect();

            (!matched_skills.is_empty()).then_some(SkillSearchHit {
                candidate,
                matched_skills,
            })
        })
        .collect();

    hits.sort_by(|a, b| {
        b.matched_skills
            .len()
            .cmp(&a.matched_skills.len())
            .then_with(|| a.candidate.name.cmp(&b.candidate.name))
            .then_with(|| a.candidate.id.cmp(&b.candidate.id))
    });

    hits
}

/// 検索結果の端末表示用テキスト
pub fn render_search_results(skill_token: &str, hits: &[SkillSearchHit<'_>]) -> String {
    if hits.is_empty() {
        return format!("No candidates found with skill: {skill_token}");
    }

    let mut out = String::new();
    let _ = writeln!(out, "Candidates with skill '{skill_token}':");
    let _ = writeln!(out, "{}", "=".repeat(40));
    for hit in hits {
        let candidate = hit.candidate;
        let _ = writeln!(
            out,
            "• {} ({} years experience)",
            candidate.name, candidate.experience_years
        );
        let _ = writeln!(out, "  Skills: {}", candidate.skills.join(", "));
        let _ = writeln!(out, "  Previous Roles: {}", candidate.previous_roles.join(", "));
        let _ = writeln!(out);
    }
    out
}
