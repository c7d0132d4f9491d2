use cr_common::{
    MatchError, MatchingConfig, RankingEngine, explain,
    records::load_candidate_records,
    sample,
    search::{render_search_results, search_by_skill},
};

fn engine() -> RankingEngine {
    RankingEngine::new(MatchingConfig::default()).expect("default weights are valid")
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn data_scientist_job_prefers_emma_then_alice() {
    let catalog = sample::jobs().unwrap();
    let candidates = sample::candidates().unwrap();

    let (job, results) = catalog.rank_for(1, &candidates, &engine(), 2).unwrap();

    assert_eq!(job.title, "Senior Data Scientist");
    assert_eq!(
        results.iter().map(|r| r.candidate_id).collect::<Vec<_>>(),
        vec![5, 1]
    );

    let emma = &results[0];
    assert!(approx(emma.skills.score, 0.56));
    assert!(approx(emma.overall_score, 0.749));

    let alice = &results[1];
    assert!(approx(alice.skills.score, 0.42));
    assert_eq!(alice.experience.score, 1.0);
    assert_eq!(alice.education.score, 1.0);
    assert_eq!(alice.role_relevance.matching_roles, 1);
    assert!(approx(alice.overall_score, 0.693));
}

#[test]
fn devops_job_gives_henry_full_role_relevance() {
    let catalog = sample::jobs().unwrap();
    let candidates = sample::candidates().unwrap();

    let (_, results) = catalog.rank_for(5, &candidates, &engine(), 8).unwrap();
    let henry = results
        .iter()
        .find(|r| r.candidate_id == 8)
        .expect("henry is ranked");

    assert_eq!(results.len(), 8);
    assert_eq!(henry.role_relevance.matching_roles, 2);
    assert_eq!(henry.role_relevance.score, 1.0);
}

#[test]
fn unknown_job_id_is_reported() {
    let catalog = sample::jobs().unwrap();
    let candidates = sample::candidates().unwrap();

    let err = catalog.rank_for(99, &candidates, &engine(), 3).unwrap_err();
    assert_eq!(err, MatchError::JobNotFound { job_id: 99 });
    assert_eq!(err.to_string(), "job 99 not found");
}

#[test]
fn malformed_records_are_skipped() {
    let records = load_candidate_records(
        r#"[
            {"id": 1, "name": "Ok", "skills": ["Python"], "experience_years": 5,
             "education": "MS Statistics", "previous_roles": ["Data Scientist"]},
            {"id": 2, "name": "No Skills", "experience_years": 3},
            {"name": "No Id", "skills": ["Python"], "experience_years": 1},
            {"id": 4, "name": "Negative", "skills": ["SQL"], "experience_years": -2}
        ]"#,
    )
    .unwrap();
    let job = sample::job(1).unwrap();

    let outcome = engine().rank_records(&job, &records, 10).unwrap();

    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].candidate_id, 1);
    assert_eq!(outcome.skipped.len(), 3);
    assert!(outcome.skipped.iter().all(|err| matches!(
        err,
        MatchError::MalformedCandidateRecord { .. }
    )));
}

#[test]
fn explanation_text_lists_ranked_candidates() {
    let job = sample::job(1).unwrap();
    let candidates = sample::candidates().unwrap();
    let results = engine().rank_candidates(&job, &candidates, 3).unwrap();

    let text = explain(&job, &results).render_text();

    assert!(text.starts_with("Job: Senior Data Scientist at TechCorp"));
    assert!(text.contains("Top 3 Candidates:"));
    assert!(text.contains("Rank #1: Emma Brown"));
    assert!(text.contains("Rank #2: Alice Johnson"));
    assert!(text.contains("(3/5 required, 0/5 preferred)"));
}

#[test]
fn python_search_orders_by_name() {
    let candidates = sample::candidates().unwrap();
    let hits = search_by_skill("python", &candidates);

    assert_eq!(
        hits.iter()
            .map(|h| h.candidate.name.as_str())
            .collect::<Vec<_>>(),
        vec!["Alice Johnson", "David Wilson", "Emma Brown"]
    );

    let text = render_search_results("python", &hits);
    assert!(text.contains("• David Wilson (4 years experience)"));
}
