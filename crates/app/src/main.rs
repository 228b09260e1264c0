use std::fmt;
use std::sync::Arc;

use practice_core::{ExerciseId, Namespace};
use services::{GlobalProgressService, ProgressService};
use storage::repository::Storage;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingPhase,
    MissingExercise,
    InvalidValue { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingPhase => write!(f, "--phase is required"),
            ArgsError::MissingExercise => write!(f, "--exercise is required"),
            ArgsError::InvalidValue { raw } => {
                write!(f, "invalid --value (expected true or false): {raw}")
            }
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- show   --phase <ns> [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- toggle --phase <ns> --exercise <id> [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- mark   --exercise <id> [--value <bool>] [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:progress.sqlite3");
    eprintln!("  --value true");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PRACTICE_DB_URL");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Show,
    Toggle,
    Mark,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "show" => Some(Self::Show),
            "toggle" => Some(Self::Toggle),
            "mark" => Some(Self::Mark),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    phase: Option<Namespace>,
    exercise: Option<ExerciseId>,
    value: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("PRACTICE_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://progress.sqlite3".into(), normalize_sqlite_url);
        let mut phase = None;
        let mut exercise = None;
        let mut value = true;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let raw = require_value(args, "--db")?;
                    if raw.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw });
                    }
                    db_url = normalize_sqlite_url(raw);
                }
                "--phase" => {
                    let raw = require_value(args, "--phase")?;
                    phase = Some(Namespace::new(raw));
                }
                "--exercise" => {
                    let raw = require_value(args, "--exercise")?;
                    exercise = Some(ExerciseId::new(raw));
                }
                "--value" => {
                    let raw = require_value(args, "--value")?;
                    value = match raw.as_str() {
                        "true" => true,
                        "false" => false,
                        _ => return Err(ArgsError::InvalidValue { raw }),
                    };
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            phase,
            exercise,
            value,
        })
    }

    fn phase(&self) -> Result<&Namespace, ArgsError> {
        self.phase.as_ref().ok_or(ArgsError::MissingPhase)
    }

    fn exercise(&self) -> Result<&ExerciseId, ArgsError> {
        self.exercise.as_ref().ok_or(ArgsError::MissingExercise)
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);

    let cmd = match argv.next().as_deref() {
        None | Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so
    // core/services stay pure.
    prepare_sqlite_file(&args.db_url)?;
    let storage = Storage::sqlite(&args.db_url).await?;

    match cmd {
        Command::Show => {
            let phase = args.phase()?;
            let progress = ProgressService::new(Arc::clone(&storage.progress));
            let record = progress.load(phase).await;
            let mut completed = record.completed_ids();
            completed.sort();
            if completed.is_empty() {
                println!("{phase}: no exercises completed");
            } else {
                println!("{phase}: {} completed", completed.len());
                for id in completed {
                    println!("  {id}");
                }
            }
        }
        Command::Toggle => {
            let phase = args.phase()?;
            let exercise = args.exercise()?;
            let progress = ProgressService::new(Arc::clone(&storage.progress));
            let value = progress.toggle_complete(phase, exercise).await;
            println!(
                "{phase}/{exercise}: {}",
                if value { "complete" } else { "incomplete" }
            );
        }
        Command::Mark => {
            let exercise = args.exercise()?;
            let global = GlobalProgressService::new(Arc::clone(&storage.progress));
            global.mark_complete(exercise, args.value).await;
            println!(
                "{exercise}: {}",
                if args.value { "complete" } else { "incomplete" }
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
