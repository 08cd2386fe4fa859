use clap::{value_parser, Arg, ArgAction, Command};
use monkey::evaluator::Evaluator;
use monkey::runner::{self, Options};
use monkey::repl;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let matches = Command::new("monkey")
        .about("A tree-walking interpreter for the Monkey language")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("file")
                .help("The script file to execute")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start in interactive REPL mode")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("tokens")
                .long("tokens")
                .help("Print the tokens of each input")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ast")
                .long("ast")
                .help("Print the parsed program in canonical form")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-result")
                .long("no-result")
                .help("Do not print evaluated values")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .value_name("N")
                .help("Maximum number of nested function calls [default: 256]")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (-v, -vv, -vvv); RUST_LOG overrides")
                .action(ArgAction::Count),
        )
        .get_matches();

    init_tracing(matches.get_count("verbose"));

    let options = Options {
        show_tokens: matches.get_flag("tokens"),
        show_ast: matches.get_flag("ast"),
        show_result: !matches.get_flag("no-result"),
        max_depth: matches
            .get_one::<usize>("max-depth")
            .copied()
            .unwrap_or(Evaluator::DEFAULT_MAX_DEPTH),
    };

    match matches.get_one::<String>("file") {
        Some(file_path) if !matches.get_flag("interactive") => run_file(file_path, &options),
        _ => {
            repl::start(&options);
            ExitCode::SUCCESS
        }
    }
}

fn run_file(path: &str, options: &Options) -> ExitCode {
    let path = Path::new(path);

    if !path.exists() {
        eprintln!("Error: File '{}' not found", path.display());
        return ExitCode::FAILURE;
    }

    match fs::read_to_string(path) {
        Ok(source) => {
            let filename = path.display().to_string();
            tracing::info!(file = %filename, "running script");
            match runner::run(&source, Some(&filename), options) {
                Ok(outcome) if outcome.is_success() => ExitCode::SUCCESS,
                Ok(_) => ExitCode::FAILURE,
                Err(e) => {
                    eprintln!("Error writing output: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr. `RUST_LOG` takes precedence over the `-v` count.
fn init_tracing(verbosity: u8) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("monkey={default_level}")));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .init();
}
