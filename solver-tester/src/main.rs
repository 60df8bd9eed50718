mod common;
mod logic;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use common::{CatalogSource, parse_seeds, split_csv};
use logic::{AnswerStrategy, LogicTester, ScenarioResult};
use solver_game::{Track, TrainingEngine, scenarios_for_track};

#[derive(Debug, Parser)]
#[command(name = "solver-tester", version)]
#[command(about = "Automated playthrough QA for the Tech Scenario Solver training core")]
struct Args {
    /// Tracks to play (comma-separated: ai,servicenow,salesforce or all)
    #[arg(long, default_value = "all")]
    tracks: String,

    /// Answer strategies to run (comma-separated: best,worst,first,coach,random or all)
    #[arg(long, default_value = "best")]
    strategies: String,

    /// List all tracks in the catalog and exit
    #[arg(long)]
    list_tracks: bool,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of playthroughs per track, strategy and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Scenario catalog JSON to load instead of the bundled one
    #[arg(long)]
    catalog: Option<PathBuf>,
}

type Engine = TrainingEngine<CatalogSource>;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let source = CatalogSource::from_arg(args.catalog.clone());
    let label = source.describe();
    let engine = TrainingEngine::new(source)
        .with_context(|| format!("failed to load scenarios from {label}"))?;

    if maybe_list_tracks(&args, &engine)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let tracks = expand_tracks(&args.tracks);
    let strategies = expand_strategies(&args.strategies);
    let seeds = parse_seeds(&args.seeds)?;

    let all_results = run_playthroughs(&args, &engine, &tracks, &strategies, &seeds);

    write_reports(&args, &all_results, start_time)?;

    if all_results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_tracks(args: &Args, engine: &Engine) -> Result<bool> {
    if !args.list_tracks {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available tracks:")?;
    for track in Track::ALL {
        let count = scenarios_for_track(engine.catalog(), track).count();
        writeln!(
            output_target.writer(),
            "  {:12} - {} ({count} scenario(s))",
            track.key(),
            track.title()
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🧭 Tech Scenario Solver Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn expand_tracks(tracks_arg: &str) -> Vec<Track> {
    let mut tracks = Vec::new();
    for token in split_csv(tracks_arg) {
        if token == "all" {
            tracks.extend(Track::ALL);
            continue;
        }
        match token.parse::<Track>() {
            Ok(track) => tracks.push(track),
            Err(e) => eprintln!("⚠️  {}", e.to_string().yellow()),
        }
    }
    dedup_in_order(tracks)
}

fn expand_strategies(strategies_arg: &str) -> Vec<AnswerStrategy> {
    let mut strategies = Vec::new();
    for token in split_csv(strategies_arg) {
        if token == "all" {
            strategies.extend(AnswerStrategy::ALL);
            continue;
        }
        match token.parse::<AnswerStrategy>() {
            Ok(strategy) => strategies.push(strategy),
            Err(e) => eprintln!("⚠️  {}", e.to_string().yellow()),
        }
    }
    dedup_in_order(strategies)
}

fn dedup_in_order<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut unique = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

fn run_playthroughs(
    args: &Args,
    engine: &Engine,
    tracks: &[Track],
    strategies: &[AnswerStrategy],
    seeds: &[u64],
) -> Vec<ScenarioResult> {
    println!("{}", "🧠 Running Playthroughs".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let tester = LogicTester::new(engine, args.verbose);
    let mut results = Vec::new();
    for &track in tracks {
        for &strategy in strategies {
            results.extend(tester.run_track(track, strategy, seeds, args.iterations));
        }
    }
    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => {
            logic::reports::generate_json_report(&mut output_target, results)?;
        }
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Tech Scenario Solver Playthrough Results\n\n_No playthroughs executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results, Utc::now())?;
            }
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
        _ => {
            let duration = start_time.elapsed();
            if results.is_empty() {
                writeln!(&mut output_target, "No playthroughs executed.")?;
            } else {
                logic::reports::generate_console_report(&mut output_target, results, duration)?;
            }
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solver_game::PerformanceTier;
    use std::io::Write;

    fn base_args() -> Args {
        Args {
            tracks: "all".to_string(),
            strategies: "best".to_string(),
            list_tracks: false,
            seeds: "1337".to_string(),
            iterations: 1,
            report: "json".to_string(),
            verbose: false,
            output: None,
            catalog: None,
        }
    }

    fn engine() -> Engine {
        TrainingEngine::new(CatalogSource::Bundled).unwrap()
    }

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "solver-tester-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn expands_all_tracks_keyword_without_duplicates() {
        assert_eq!(expand_tracks("ai,all"), Track::ALL.to_vec());
        assert_eq!(
            expand_tracks("salesforce, ai"),
            vec![Track::Salesforce, Track::Ai]
        );
    }

    #[test]
    fn unknown_tracks_and_strategies_are_skipped() {
        assert_eq!(expand_tracks("ai,quantum"), vec![Track::Ai]);
        assert_eq!(
            expand_strategies("coach,greedy,coach"),
            vec![AnswerStrategy::Coach]
        );
        assert_eq!(expand_strategies("all").len(), AnswerStrategy::ALL.len());
    }

    #[test]
    fn run_playthroughs_covers_track_strategy_seed_grid() {
        let engine = engine();
        let args = base_args();
        let results = run_playthroughs(
            &args,
            &engine,
            &[Track::Ai, Track::ServiceNow],
            &[AnswerStrategy::Best, AnswerStrategy::Random],
            &[1, 2, 3],
        );
        assert_eq!(results.len(), 12);
        assert!(results.iter().all(|r| r.passed));
        assert_eq!(results[0].final_tier, Some(PerformanceTier::Excellent));
    }

    #[test]
    fn write_reports_emits_json_array() {
        let temp = temp_path("report.json");
        let args = Args {
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, serde_json::json!([]));
    }

    #[test]
    fn write_reports_markdown_empty_results() {
        let temp = temp_path("report.md");
        let args = Args {
            report: "markdown".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("No playthroughs executed"));
        assert!(content.contains("Total time"));
    }

    #[test]
    fn write_reports_console_with_results() {
        let engine = engine();
        let temp = temp_path("report.txt");
        let args = Args {
            report: "console".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        let results = run_playthroughs(
            &args,
            &engine,
            &[Track::Salesforce],
            &[AnswerStrategy::Worst],
            &[9],
        );
        write_reports(&args, &results, Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Playthrough Results Summary"));
        assert!(content.contains("Salesforce / Worst Answer"));
    }

    #[test]
    fn maybe_list_tracks_writes_counts() {
        let temp = temp_path("tracks.txt");
        let args = Args {
            list_tracks: true,
            output: Some(temp.clone()),
            ..base_args()
        };
        assert!(maybe_list_tracks(&args, &engine()).unwrap());
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Available tracks"));
        assert!(content.contains("servicenow"));
        assert!(content.contains("(1 scenario(s))"));
    }

    #[test]
    fn maybe_list_tracks_returns_false_when_disabled() {
        assert!(!maybe_list_tracks(&base_args(), &engine()).unwrap());
    }

    #[test]
    fn output_target_stdout_writes() {
        let mut target = OutputTarget::new(None).unwrap();
        target.write_all(b"ok").unwrap();
        target.flush().unwrap();
    }

    #[test]
    fn output_target_reports_unwritable_path() {
        let err = OutputTarget::new(Some(PathBuf::from("/nonexistent/dir/out.txt")))
            .err()
            .expect("create should fail");
        assert!(err.to_string().contains("failed to create"));
    }
}
