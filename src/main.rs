mod cli;

use clap::Parser;
use filmpulse::batch;
use filmpulse::config;
use filmpulse::error::FilmPulseError;
use filmpulse::manifest;
use filmpulse::report::{self, OutputFormat, ScoreReport};
use filmpulse::score::Engine;
use filmpulse::signals::{MarketSignals, StaticSignals};
use filmpulse::store::memory::MemoryScoreStore;
use filmpulse::store::sqlite::SqliteScoreStore;
use filmpulse::store::ScoreStore;
use filmpulse::types::config::{FilmPulseConfig, StoreBackend};
use filmpulse::types::film::FilmId;
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const NOT_FOUND: i32 = 1;
    pub const INVALID_INPUT: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
    pub const PARTIAL_FAILURE: i32 = 4;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn open_store(
    root: &Path,
    cfg: &FilmPulseConfig,
    over: Option<&Path>,
) -> Result<Box<dyn ScoreStore>, FilmPulseError> {
    if over.is_none() && cfg.store_backend() == StoreBackend::Memory {
        return Ok(Box::new(MemoryScoreStore::new()));
    }
    let path = config::resolve_store_path(root, cfg, over);
    Ok(Box::new(SqliteScoreStore::open(path)?))
}

fn output_format(format: cli::ReportFormat) -> OutputFormat {
    match format {
        cli::ReportFormat::Json => OutputFormat::Json,
        cli::ReportFormat::Md => OutputFormat::Md,
    }
}

fn run(cli: cli::Cli) -> Result<i32, FilmPulseError> {
    let loaded = config::load_config(&cli.root)?;
    let store_override = cli.store.as_deref();

    match cli.command {
        cli::Commands::Analyze(cmd) => {
            let flags = MarketSignals {
                hype_score: cmd.hype,
                genre_affinity: cmd.genre_affinity,
                market_crowding: cmd.crowding,
                release_fit: cmd.release_fit,
            };
            let (film, own_signals) = manifest::load_manifest(&cmd.manifest)?.register();
            let signals = flags
                .or(own_signals)
                .or(MarketSignals::from(loaded.signal_defaults()));
            signals.validate()?;

            let store: Box<dyn ScoreStore> = if cmd.dry_run {
                Box::new(MemoryScoreStore::new())
            } else {
                open_store(&cli.root, &loaded, store_override)?
            };
            let engine = Engine::new(StaticSignals(signals), store, loaded.scoring_policy()?)?;
            let record = if cmd.dry_run {
                engine.preview(&film)?
            } else {
                engine.analyze(&film)?
            };

            let rendered = report::render(
                &ScoreReport::new(&record, Some(&film)),
                output_format(cmd.format),
            )?;
            println!("{rendered}");
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Show(cmd) => {
            let id: FilmId = cmd.film_id.parse()?;
            let store = open_store(&cli.root, &loaded, store_override)?;
            let record = store.get(&id)?;
            let rendered =
                report::render(&ScoreReport::new(&record, None), output_format(cmd.format))?;
            println!("{rendered}");
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::List => {
            let store = open_store(&cli.root, &loaded, store_override)?;
            let records = store.list()?;
            if records.is_empty() {
                println!("list: no analyzed films");
                return Ok(exit_code::SUCCESS);
            }
            for record in &records {
                println!(
                    "{}  {:>3}  {}  {}",
                    record.film_id,
                    record.result.score,
                    record.result.grade,
                    record.analyzed_at.to_rfc3339()
                );
            }
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Remove(cmd) => {
            let id: FilmId = cmd.film_id.parse()?;
            let store = open_store(&cli.root, &loaded, store_override)?;
            store.remove(&id)?;
            println!("removed {id}");
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Batch(cmd) => {
            let store = open_store(&cli.root, &loaded, store_override)?;
            let outcome = batch::run_batch(
                &cmd.dir,
                store,
                MarketSignals::from(loaded.signal_defaults()),
                loaded.scoring_policy()?,
            )?;
            for (path, record) in &outcome.analyzed {
                println!(
                    "{}  {:>3}  {}  {}",
                    record.film_id,
                    record.result.score,
                    record.result.grade,
                    path.display()
                );
            }
            for failure in &outcome.failures {
                println!("[FAILED] {}: {}", failure.path.display(), failure.error);
            }
            println!(
                "batch: analyzed={} failed={}",
                outcome.analyzed.len(),
                outcome.failures.len()
            );

            if outcome.failures.is_empty() {
                Ok(exit_code::SUCCESS)
            } else {
                Ok(exit_code::PARTIAL_FAILURE)
            }
        }
    }
}

fn error_exit_code(err: &FilmPulseError) -> i32 {
    match err {
        FilmPulseError::NotFound(_) => exit_code::NOT_FOUND,
        FilmPulseError::InvalidInput(_)
        | FilmPulseError::InvalidFilmId(_)
        | FilmPulseError::PathNotFound(_) => exit_code::INVALID_INPUT,
        _ => exit_code::RUNTIME_FAILURE,
    }
}

fn main() {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match run(cli) {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(error_exit_code(&e));
        }
    }
}
