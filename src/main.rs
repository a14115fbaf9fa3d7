use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use instant::Duration;

use crossgen::errors::LoadError;
use crossgen::logging::{init_logger, DEBUG_ENV_VAR};
use crossgen::{
    find_fill, generate_grid_config_from_template_string, render_grid, FillFailure, SolverOptions,
};

/// Fill a crossword grid with words from a word list
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Grid structure file: '#' for blocks, '_' or '.' for open cells
    structure: PathBuf,

    /// Word list file, one word per line
    words: PathBuf,

    /// Write the filled grid to this file as well as printing it
    output: Option<PathBuf>,

    /// Give up after this many seconds
    #[arg(long, value_parser = parse_time_limit)]
    time_limit: Option<Duration>,

    /// Give up after visiting this many search states
    #[arg(long)]
    state_limit: Option<u64>,
}

/// Parse a non-negative, finite number of seconds.
fn parse_time_limit(arg: &str) -> Result<Duration, String> {
    let secs: f64 = arg.parse().map_err(|_| format!("`{}` isn't a number of seconds", arg))?;
    Duration::try_from_secs_f64(secs)
        .map_err(|e| format!("`{}` isn't a valid time limit: {}", arg, e))
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })
}

/// Load a word list: one word per line, trimmed and uppercased, blank lines skipped.
fn load_words(path: &Path) -> Result<Vec<String>, LoadError> {
    Ok(read_file(path)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_uppercase)
        .collect())
}

fn main() -> ExitCode {
    init_logger(std::env::var(DEBUG_ENV_VAR).is_ok());

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e.display_detailed());
            ExitCode::FAILURE
        }
    }
}

/// Load the grid and word list, fill the grid, and print the result. Not finding a fill is
/// reported on stdout and isn't an error.
fn try_main() -> Result<(), LoadError> {
    let cli = Cli::parse();

    let words = load_words(&cli.words)?;
    let structure = read_file(&cli.structure)?;
    let grid_config = generate_grid_config_from_template_string(&words, &structure)?;

    let options = SolverOptions { time_limit: cli.time_limit, state_limit: cli.state_limit };

    match find_fill(&grid_config, &options) {
        Ok(result) => {
            let display_grid = render_grid(&grid_config, &result.assignment);
            println!("{}", display_grid);
            eprintln!("{:?}", result.statistics);

            if let Some(output) = &cli.output {
                fs::write(output, display_grid + "\n")
                    .map_err(|source| LoadError::Io { path: output.clone(), source })?;
                log::info!("Wrote {}", output.display());
            }
        }
        Err(failure) => {
            match failure {
                FillFailure::Unsolvable { .. } => println!("No solution."),
                FillFailure::BudgetExhausted { .. } => {
                    println!("No solution found within the limit.")
                }
            }
            eprintln!("{:?}", failure.statistics());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use instant::Duration;

    use crate::parse_time_limit;

    #[test]
    fn test_parse_time_limit() {
        assert_eq!(parse_time_limit("2.5"), Ok(Duration::from_millis(2500)));
        assert_eq!(parse_time_limit("0"), Ok(Duration::ZERO));
    }

    #[test]
    fn test_parse_time_limit_rejects_invalid_seconds() {
        assert!(parse_time_limit("-1").is_err());
        assert!(parse_time_limit("NaN").is_err());
        assert!(parse_time_limit("inf").is_err());
        assert!(parse_time_limit("soon").is_err());
    }
}
