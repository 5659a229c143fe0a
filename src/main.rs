use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use score_whatif::config::{self, Config, StudentConfig};
use score_whatif::pipeline::{self, Analysis, RunSettings};
use score_whatif::scoring::SubjectTable;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_SCORING: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print per-student score reports (default if no subcommand)
    Report,
    /// Write reports to CSV and/or JSON files
    Export {
        /// CSV output path (defaults to export.csv from config)
        #[arg(long)]
        csv: Option<PathBuf>,
        /// JSON output path (defaults to export.json from config)
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Check the config and score table without scoring anything
    Validate,
    /// Write a starter config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "score-whatif")]
#[command(about = "Adaptive test scoring with what-if projections", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/score-whatif/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Score table JSON (overrides score_table from config)
    #[arg(long, global = true)]
    table: Option<PathBuf>,

    /// Glob of attempt files, one student per file named by file stem
    /// (replaces students from config)
    #[arg(long, global = true)]
    attempts: Option<String>,

    /// Hard-module performance threshold (overrides config)
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// What-if fix count to simulate; repeatable (overrides config)
    #[arg(long = "fix", global = true, allow_negative_numbers = true)]
    fix_counts: Vec<i64>,

    /// Subject to score; repeatable (overrides config)
    #[arg(long = "subject", global = true)]
    subjects: Vec<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Load the config file when one is given or present at the default path.
/// Without one, command-line flags must supply the table and attempts.
fn load_base_config(cli: &Cli) -> anyhow::Result<Config> {
    if cli.config.is_some() {
        return config::load_config(cli.config.clone());
    }
    match config::get_config_path() {
        Ok(path) if path.exists() => config::load_config(Some(path)),
        _ => Ok(Config::default()),
    }
}

fn apply_overrides(cli: &Cli, config: &mut Config) -> anyhow::Result<()> {
    if let Some(ref table) = cli.table {
        config.score_table = Some(table.clone());
    }
    if let Some(threshold) = cli.threshold {
        config.threshold = Some(threshold);
    }
    if !cli.fix_counts.is_empty() {
        config.fix_counts = Some(cli.fix_counts.clone());
    }
    if !cli.subjects.is_empty() {
        config.subjects = Some(cli.subjects.clone());
    }
    if let Some(ref pattern) = cli.attempts {
        config.students = score_whatif::data::discover_attempt_files(pattern)?
            .into_iter()
            .map(|(name, attempts)| StudentConfig { name, attempts })
            .collect();
    }
    Ok(())
}

/// Load, override and validate the config, then load the score tables.
/// Exits the process on any failure.
fn prepare(cli: &Cli) -> (Config, RunSettings, Vec<SubjectTable>) {
    let mut config = match load_base_config(cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    if let Err(e) = apply_overrides(cli, &mut config) {
        eprintln!("Config error: {:#}", e);
        std::process::exit(EXIT_CONFIG);
    }

    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let settings = RunSettings::from_config(&config);
    tracing::debug!(
        students = config.students.len(),
        subjects = ?settings.subjects,
        threshold = settings.threshold,
        fix_counts = ?settings.fix_counts,
        "effective settings"
    );

    // validate_config rejects a missing table path
    let Some(ref table_path) = config.score_table else {
        std::process::exit(EXIT_CONFIG);
    };
    let tables = match score_whatif::data::load_score_tables(table_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    };

    (config, settings, tables)
}

/// Load every student and score all subjects. Exits if nothing could be scored.
fn score_all(config: &Config, settings: &RunSettings, tables: &[SubjectTable]) -> Analysis {
    let loaded = match pipeline::load_students(&config.students) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    };
    for failure in &loaded.failures {
        eprintln!("Skipping {}: {}", failure.student, failure.error);
    }

    let analysis = pipeline::analyze(&loaded.students, tables, settings);

    if !analysis.failures.is_empty() {
        eprintln!("Some subjects could not be scored:");
        eprintln!("{}", score_whatif::output::format_failures(&analysis.failures));
    }
    if analysis.reports.is_empty() {
        eprintln!("No subject could be scored. Check the score table and subjects.");
        std::process::exit(EXIT_SCORING);
    }
    analysis
}

fn main() {
    let mut cli = Cli::parse();
    init_logging(cli.verbose);
    let start_time = Instant::now();
    let command = cli.command.take().unwrap_or(Commands::Report);

    match command {
        Commands::Init { force } => {
            let path = match cli.config.clone() {
                Some(p) => p,
                None => match config::get_config_path() {
                    Ok(p) => p,
                    Err(e) => {
                        eprintln!("Config error: {:#}", e);
                        std::process::exit(EXIT_CONFIG);
                    }
                },
            };
            if let Err(e) = config::write_starter_config(&path, force) {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
            println!("Config written to {}", path.display());
            println!("Edit the score_table and students paths, then run `score-whatif`.");
        }
        Commands::Validate => {
            let (config, settings, tables) = prepare(&cli);
            if let Err(errors) = score_whatif::scoring::validate_tables(&tables, &settings.subjects) {
                eprintln!("Score table problems:");
                for error in errors {
                    eprintln!("  - {}", error);
                }
                std::process::exit(EXIT_INPUT);
            }
            println!(
                "OK: {} subject table(s), {} student(s)",
                tables.len(),
                config.students.len()
            );
        }
        Commands::Report => {
            let (config, settings, tables) = prepare(&cli);
            let analysis = score_all(&config, &settings, &tables);
            let use_colors = score_whatif::output::should_use_colors();
            println!(
                "{}",
                score_whatif::output::format_reports(&analysis.reports, use_colors)
            );
            tracing::debug!(reports = analysis.reports.len(), elapsed = ?start_time.elapsed(), "done");
        }
        Commands::Export { csv, json } => {
            let (config, settings, tables) = prepare(&cli);
            let export = config.export.clone().unwrap_or_default();
            let csv_path = csv.or(export.csv);
            let json_path = json.or(export.json);

            if csv_path.is_none() && json_path.is_none() {
                eprintln!("Nothing to export. Pass --csv/--json or set export paths in config.");
                std::process::exit(EXIT_CONFIG);
            }

            let analysis = score_all(&config, &settings, &tables);
            if let Some(path) = csv_path {
                if let Err(e) = score_whatif::output::export_csv(&path, &analysis.reports) {
                    eprintln!("Export error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
                println!("CSV exported: {}", path.display());
            }
            if let Some(path) = json_path {
                if let Err(e) =
                    score_whatif::output::export_json(&path, &analysis.reports, settings.threshold)
                {
                    eprintln!("Export error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
                println!("JSON exported: {}", path.display());
            }
            tracing::debug!(reports = analysis.reports.len(), elapsed = ?start_time.elapsed(), "done");
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
