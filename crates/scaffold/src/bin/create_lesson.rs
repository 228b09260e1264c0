use std::fmt;
use std::process::ExitCode;

use practice_core::{LessonName, LessonNameError};
use scaffold::{RegistrationStatus, ScaffoldPaths, Scaffolder};

#[derive(Debug, Clone)]
struct Args {
    name: String,
    title: Option<String>,
    app_root: String,
}

#[derive(Debug)]
enum ArgsError {
    MissingName,
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidName(LessonNameError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingName => write!(f, "missing <LessonName>"),
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidName(err) => write!(f, "invalid lesson name: {err}"),
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

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut app_root = std::env::var("PRACTICE_APP_ROOT").unwrap_or_else(|_| "app".into());
        let mut positional: Vec<String> = Vec::new();

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--root" => {
                    app_root = require_value(&mut args, "--root")?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if arg.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let name = positional.next().ok_or(ArgsError::MissingName)?;
        let title = positional.next();
        if let Some(extra) = positional.next() {
            return Err(ArgsError::UnknownArg(extra));
        }

        Ok(Self {
            name,
            title,
            app_root,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  create-lesson <LessonName> [\"Title\"] [--root <app_dir>]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --root <app_dir>          Web app root directory (default: app)");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  PRACTICE_APP_ROOT");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let name = LessonName::new(args.name.clone()).map_err(ArgsError::InvalidName)?;
    let scaffolder = Scaffolder::new(ScaffoldPaths::from_app_root(&args.app_root));

    let report = scaffolder.scaffold(&name, args.title.as_deref())?;

    println!(
        "Created {} and {}",
        report.lesson_file.display(),
        report.stylesheet_file.display()
    );
    match report.index {
        RegistrationStatus::Updated => {
            println!("Updated lessons index exports with {name}");
        }
        RegistrationStatus::AlreadyPresent => {
            println!("{name} already exported in lessons index");
        }
        RegistrationStatus::Skipped => {}
    }
    match report.import {
        RegistrationStatus::Updated => println!("Added {name} to lessons import"),
        RegistrationStatus::AlreadyPresent => println!("{name} already present in imports"),
        RegistrationStatus::Skipped => {}
    }
    match report.route {
        RegistrationStatus::Updated => {
            println!("Wired route {} -> component {name}", report.route_path);
        }
        RegistrationStatus::AlreadyPresent => println!("{name} already wired in routes"),
        RegistrationStatus::Skipped => {}
    }
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = match Args::parse() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            return ExitCode::from(1);
        }
    };

    if let Err(err) = run(&args) {
        if err.downcast_ref::<ArgsError>().is_some() {
            eprintln!("{err}");
            print_usage();
            return ExitCode::from(1);
        }
        eprintln!("{err}");
        return ExitCode::from(2);
    }
    ExitCode::SUCCESS
}
