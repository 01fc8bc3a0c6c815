//! smith-cli - prints the Smith normal form reduction of an integer matrix
//!
//! Reads a matrix as JSON (inline, from a file, or generated from a seed), pulls the
//! decomposition step by step and prints the trace either as the indented text log or
//! as one JSON object per step.

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use env_logger::Env;
use itertools::Itertools;
use log::{LevelFilter, debug, info};
use smith_trace::matrix::{Matrix, random_matrix};
use smith_trace::render::render_trace;
use smith_trace::smith::Decomposition;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "smith-cli",
    version,
    about = "Smith normal form of an integer matrix, with every elementary operation traced",
    after_help = r#"
Examples:
  smith-cli "[[2,4],[6,8]]"
  smith-cli --file matrix.json --format json
  smith-cli --random 4x5 --seed 7 --bound 20

Environment Variables:
  SMITH_SEED=42        Seed for --random
  SMITH_FORMAT=text    Output format (text, json)
  RUST_LOG=debug       Log filter
"#
)]
struct Cli {
    /// Matrix as JSON rows, e.g. "[[2,4],[6,8]]"
    #[arg(conflicts_with_all = ["file", "random"])]
    matrix: Option<String>,

    /// Read the JSON matrix from a file
    #[arg(short, long, conflicts_with = "random")]
    file: Option<PathBuf>,

    /// Generate a random ROWSxCOLS matrix instead
    #[arg(long, value_name = "RxC", value_parser = parse_shape)]
    random: Option<(usize, usize)>,

    /// Seed for --random
    #[arg(long, env = "SMITH_SEED", default_value = "42")]
    seed: u64,

    /// Entries of --random lie in [-bound, bound]
    #[arg(long, default_value = "100")]
    bound: u32,

    /// Output format
    #[arg(long, value_enum, env = "SMITH_FORMAT", default_value = "text")]
    format: Format,

    /// Cell width of matrix snapshots in text output
    #[arg(long, default_value = "6")]
    width: usize,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn parse_shape(s: &str) -> Result<(usize, usize), String> {
    let (rows, cols) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected ROWSxCOLS, got `{s}`"))?;
    let rows = rows.trim().parse().map_err(|e| format!("bad row count: {e}"))?;
    let cols = cols.trim().parse().map_err(|e| format!("bad column count: {e}"))?;
    Ok((rows, cols))
}

impl Cli {
    fn load_matrix(&self) -> Result<Matrix> {
        if let Some((rows, cols)) = self.random {
            info!("generating a {}x{} matrix with seed {}", rows, cols, self.seed);
            return random_matrix(rows, cols, self.bound, self.seed)
                .context("Failed to generate random matrix");
        }

        let text = match (&self.matrix, &self.file) {
            (Some(inline), _) => inline.clone(),
            (None, Some(path)) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read matrix file: {}", path.display()))?,
            (None, None) => bail!("No matrix given: pass MATRIX, --file or --random"),
        };

        serde_json::from_str(&text).context("Failed to parse matrix")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    if cli.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    let mut matrix = cli.load_matrix()?;
    debug!("input matrix:\n{}", matrix);

    match cli.format {
        Format::Text => {
            let log = render_trace(&mut matrix, cli.width).context("Decomposition failed")?;
            print!("{log}");
            println!(
                "Invariant factors: [{}]",
                matrix.invariant_factors().iter().join(", ")
            );
        }
        Format::Json => {
            let mut run = Decomposition::new(&mut matrix);
            while let Some(step) = run.next() {
                let step = step.context("Decomposition failed")?;
                println!("{}", serde_json::to_string(&step)?);
            }
            println!("{}", serde_json::to_string(&matrix)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shape() {
        assert_eq!(parse_shape("3x4"), Ok((3, 4)));
        assert_eq!(parse_shape("2X2"), Ok((2, 2)));
        assert!(parse_shape("3").is_err());
        assert!(parse_shape("ax2").is_err());
    }

    #[test]
    fn test_inline_matrix() {
        let cli = Cli::parse_from(["smith-cli", "[[2,4],[6,8]]"]);
        let m = cli.load_matrix().unwrap();
        assert_eq!(m.rows(), 2);
        assert!(matches!(cli.format, Format::Text));
    }

    #[test]
    fn test_random_matrix_is_seeded() {
        let a = Cli::parse_from(["smith-cli", "--random", "3x2", "--seed", "9"]);
        let b = Cli::parse_from(["smith-cli", "--random", "3x2", "--seed", "9"]);
        assert_eq!(a.load_matrix().unwrap(), b.load_matrix().unwrap());
        assert_eq!(a.load_matrix().unwrap().cols(), 2);
    }

    #[test]
    fn test_verbose_debug_logging_is_compiled_in() {
        let cli = Cli::parse_from(["smith-cli", "-v", "[[1]]"]);
        assert!(cli.verbose);
        assert!(log::STATIC_MAX_LEVEL >= LevelFilter::Debug);
    }

    #[test]
    fn test_missing_matrix_is_an_error() {
        let cli = Cli::parse_from(["smith-cli"]);
        assert!(cli.load_matrix().is_err());
    }

    #[test]
    fn test_ragged_matrix_is_an_error() {
        let cli = Cli::parse_from(["smith-cli", "[[1,2],[3]]"]);
        assert!(cli.load_matrix().is_err());
    }
}
