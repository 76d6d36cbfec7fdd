//! random-validator - run the statistical battery against the generator
//!
//! Usage:
//!   random-validator                    Run every check with default sizes
//!   random-validator --config <json>    Override sizes/margins from a JSON file
//!   random-validator --seed <n>         Seed every check (reproducible run)
//!   random-validator --check <name>     Run one check only (repeatable)
//!   random-validator --json             Print the report as JSON
//!
//! Diagnostics for failed assertions go to stderr, the report to stdout.
//! Exit status: 0 all checks passed, 1 some checks failed, 2 fatal error.
//! Log level follows RUST_LOG (default: info).

use std::env;
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use seeded_random_core::{Check, ValidationError, Validator, ValidatorConfig, WriterSink};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Options {
    config_path: Option<String>,
    seed: Option<i64>,
    checks: Vec<Check>,
    json: bool,
}

fn print_usage() {
    eprintln!("Usage: random-validator [--config <file.json>] [--seed <n>] [--check <name>]... [--json]");
    eprintln!();
    eprintln!("Checks:");
    for check in Check::ALL {
        eprintln!("  {}", check);
    }
}

fn parse_args(args: &[String]) -> Result<Option<Options>, String> {
    let mut options = Options::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(None),
            "--json" => options.json = true,
            "--config" | "-c" => {
                i += 1;
                let path = args.get(i).ok_or("--config requires a path")?;
                options.config_path = Some(path.clone());
            }
            "--seed" | "-s" => {
                i += 1;
                let raw = args.get(i).ok_or("--seed requires a value")?;
                let seed = raw
                    .parse::<i64>()
                    .map_err(|e| format!("invalid seed '{}': {}", raw, e))?;
                options.seed = Some(seed);
            }
            "--check" => {
                i += 1;
                let name = args.get(i).ok_or("--check requires a check name")?;
                let check =
                    Check::from_name(name).ok_or_else(|| format!("unknown check '{}'", name))?;
                options.checks.push(check);
            }
            other => return Err(format!("unknown argument '{}'", other)),
        }
        i += 1;
    }
    Ok(Some(options))
}

fn load_config(options: &Options) -> Result<ValidatorConfig, ValidationError> {
    let mut config = match &options.config_path {
        Some(path) => ValidatorConfig::from_json_str(&fs::read_to_string(path)?)?,
        None => ValidatorConfig::default(),
    };
    if options.seed.is_some() {
        config.seed = options.seed;
    }
    Ok(config)
}

fn run(options: &Options) -> Result<bool, ValidationError> {
    let config = load_config(options)?;
    let mut validator = Validator::new(config, WriterSink::new(io::stderr()))?;

    if options.checks.is_empty() {
        validator.run_all()?;
    } else {
        for &check in &options.checks {
            validator.run(check)?;
        }
    }

    let report = validator.report();
    let mut stdout = io::stdout().lock();
    if options.json {
        writeln!(stdout, "{}", report.to_json()?)?;
    } else {
        report.write_to(&mut stdout)?;
    }
    Ok(report.passed())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(Some(options)) => options,
        Ok(None) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("error: {}", message);
            print_usage();
            return ExitCode::from(2);
        }
    };

    match run(&options) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(2)
        }
    }
}
