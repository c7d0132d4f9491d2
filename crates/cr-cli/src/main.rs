use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use cr_common::{
    CandidateRecord, JobCatalog, MatchError, MatchingConfig, RankingEngine, Weights,
    catalog::{render_job_details, render_job_list},
    explain,
    logging::{LoggingConfig, init_tracing_subscriber, install_tracing_panic_hook},
    records::{load_candidate_records, partition_records},
    sample,
    search::{render_search_results, search_by_skill},
};
use dotenvy::dotenv;
use serde_json::json;
use tracing::{debug, info, warn};

#[derive(Debug, Parser)]
#[command(
    name = "cr-match",
    about = "Rank candidates against job postings with weighted multi-criteria scoring"
)]
struct Cli {
    /// JSON array of candidate records (bundled sample data when omitted)
    #[arg(long, env = "CR_CANDIDATES_FILE", global = true)]
    candidates: Option<PathBuf>,

    /// JSON array of jobs (bundled sample data when omitted)
    #[arg(long, env = "CR_JOBS_FILE", global = true)]
    jobs: Option<PathBuf>,

    /// Weight override as skills,experience,education,role_relevance
    #[arg(long, env = "CR_WEIGHTS", global = true)]
    weights: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, PartialEq, Subcommand)]
enum Command {
    /// List available jobs
    Jobs,
    /// Show one job in detail
    Job { id: i64 },
    /// Rank candidates for a job
    Rank {
        job_id: i64,

        /// Number of candidates to return
        #[arg(long, short = 'n', default_value_t = 3, allow_negative_numbers = true)]
        top: i64,
    },
    /// Find candidates that list a skill
    Search { skill: String },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Match(#[from] MatchError),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

/// --weights が指定されていればそれを、なければ CR_WEIGHT_* 環境変数を使う
fn resolve_weights(spec: Option<&str>) -> Result<Weights, MatchError> {
    match spec {
        Some(spec) => Weights::parse(spec),
        None => Ok(Weights::from_env()),
    }
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn load_jobs(path: Option<&Path>) -> Result<JobCatalog, CliError> {
    let catalog = match path {
        Some(path) => JobCatalog::from_json(&read_file(path)?)?,
        None => sample::jobs()?,
    };
    debug!(jobs = catalog.len(), "loaded jobs");
    Ok(catalog)
}

fn load_records(path: Option<&Path>) -> Result<Vec<CandidateRecord>, CliError> {
    let records = match path {
        Some(path) => load_candidate_records(&read_file(path)?)?,
        None => sample::candidate_records()?,
    };
    debug!(records = records.len(), "loaded candidate records");
    Ok(records)
}

fn print_json(value: &impl serde::Serialize) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// 結果表示を埋もれさせないよう、RUST_LOG 未指定時は warn 以上だけを出す
fn logging_config() -> LoggingConfig {
    LoggingConfig::from_env("cr-match").with_default_filter("warn")
}

fn run() -> Result<(), CliError> {
    dotenv().ok();
    let logging = logging_config();
    init_tracing_subscriber(&logging);
    install_tracing_panic_hook(&logging);

    let cli = Cli::parse();

    // 重みは起動時に一度だけ検証する
    let weights = resolve_weights(cli.weights.as_deref())?;
    let engine = RankingEngine::new(MatchingConfig::with_weights(weights))?;
    info!(?weights, "ranking engine ready");

    match &cli.command {
        Command::Jobs => {
            let summaries = load_jobs(cli.jobs.as_deref())?.summaries();
            match cli.format {
                OutputFormat::Text => print!("{}", render_job_list(&summaries)),
                OutputFormat::Json => print_json(&summaries)?,
            }
        }
        Command::Job { id } => {
            let catalog = load_jobs(cli.jobs.as_deref())?;
            let job = catalog.find(*id)?;
            match cli.format {
                OutputFormat::Text => print!("{}", render_job_details(job)),
                OutputFormat::Json => print_json(job)?,
            }
        }
        Command::Rank { job_id, top } => {
            let catalog = load_jobs(cli.jobs.as_deref())?;
            let job = catalog.find(*job_id)?;
            let records = load_records(cli.candidates.as_deref())?;

            let outcome = engine.rank_records(job, &records, *top)?;
            let explanation = explain(job, &outcome.results);
            let skipped: Vec<String> = outcome.skipped.iter().map(ToString::to_string).collect();

            match cli.format {
                OutputFormat::Text => {
                    print!("{}", explanation.render_text());
                    if !skipped.is_empty() {
                        eprintln!("skipped {} malformed candidate record(s)", skipped.len());
                    }
                }
                OutputFormat::Json => print_json(&json!({
                    "explanation": explanation,
                    "skipped": skipped,
                }))?,
            }
        }
        Command::Search { skill } => {
            let records = load_records(cli.candidates.as_deref())?;
            let (candidates, skipped) = partition_records(&records);
            for err in &skipped {
                warn!(error = %err, "skipping malformed candidate record");
            }

            let hits = search_by_skill(skill, &candidates);
            match cli.format {
                OutputFormat::Text => print!("{}", render_search_results(skill, &hits)),
                OutputFormat::Json => {
                    let hits: Vec<_> = hits
                        .iter()
                        .map(|hit| {
                            json!({
                                "candidate": hit.candidate,
                                "matched_skills": hit.matched_skills,
                            })
                        })
                        .collect();
                    print_json(&json!({ "skill": skill, "hits": hits }))?;
                }
            }
        }
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        tracing::error!(error = %err, "cr-match failed");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn logs_only_warnings_by_default() {
        let config = logging_config();
        assert_eq!(config.app_name, "cr-match");
        assert_eq!(config.default_filter, "warn");
    }

    #[test]
    fn parses_rank_with_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "cr-match", "rank", "1", "--top", "5", "--format", "json", "--weights",
            "0.5,0.2,0.2,0.1",
        ])
        .unwrap();

        assert_eq!(cli.command, Command::Rank { job_id: 1, top: 5 });
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.weights.as_deref(), Some("0.5,0.2,0.2,0.1"));
    }

    #[test]
    fn rank_defaults_to_top_three() {
        let cli = Cli::try_parse_from(["cr-match", "rank", "2"]).unwrap();
        assert_eq!(cli.command, Command::Rank { job_id: 2, top: 3 });
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn negative_top_reaches_the_engine() {
        let cli = Cli::try_parse_from(["cr-match", "rank", "2", "--top", "-1"]).unwrap();
        assert_eq!(cli.command, Command::Rank { job_id: 2, top: -1 });
    }

    #[test]
    fn parses_search_and_file_paths() {
        let cli = Cli::try_parse_from([
            "cr-match",
            "--candidates",
            "people.json",
            "search",
            "python",
        ])
        .unwrap();
        assert_eq!(cli.candidates, Some(PathBuf::from("people.json")));
        assert_eq!(
            cli.command,
            Command::Search {
                skill: "python".into()
            }
        );
    }

    #[test]
    fn weight_override_is_parsed_and_checked() {
        let weights = resolve_weights(Some("0.5,0.2,0.2,0.1")).unwrap();
        assert_eq!(weights.skills, 0.5);
        assert!(RankingEngine::new(MatchingConfig::with_weights(weights)).is_ok());

        let lopsided = resolve_weights(Some("0.9,0.2,0.2,0.1")).unwrap();
        assert!(matches!(
            RankingEngine::new(MatchingConfig::with_weights(lopsided)),
            Err(MatchError::InvalidWeights { .. })
        ));

        assert!(matches!(
            resolve_weights(Some("heavy")),
            Err(MatchError::InvalidWeightSpec(_))
        ));
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let err = load_jobs(Some(Path::new("/nonexistent/jobs.json"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/jobs.json"));
    }

    #[test]
    fn bundled_data_is_used_without_paths() {
        assert_eq!(load_jobs(None).unwrap().len(), 5);
        assert_eq!(load_records(None).unwrap().len(), 8);
    }
}
