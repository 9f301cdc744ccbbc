//! CLI for the conjgrad dense Conjugate Gradient solver

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;
use conjgrad::{CgConfig, ConjugateGradientSolver, DenseMatrix, SolveReport, SolverEngine};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Significant digits used when printing solution vectors.
const DISPLAY_DIGITS: usize = 6;

#[derive(Parser)]
#[command(name = "conjgrad")]
#[command(about = "Solve symmetric positive-definite systems with Conjugate Gradient", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the built-in 2x2 example A = [[4,1],[1,3]], b = [1,2]
    Demo,

    /// Solve a system read from a JSON file
    Solve {
        /// Path to a JSON file with `matrix`, `rhs` and optional
        /// `initial_guess` / `config`
        #[arg(short, long)]
        system: PathBuf,

        /// Absolute residual tolerance (overrides the file's config)
        #[arg(short, long)]
        tolerance: Option<f64>,

        /// Iteration cap (overrides the file's config)
        #[arg(short = 'n', long)]
        max_iterations: Option<usize>,

        /// Skip the symmetry precheck
        #[arg(long)]
        no_symmetry_check: bool,

        /// Record and print the residual after every iteration
        #[arg(long)]
        history: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

/// On-disk description of a linear system.
#[derive(Debug, Deserialize)]
struct SystemFile {
    matrix: Vec<Vec<f64>>,
    rhs: Vec<f64>,
    #[serde(default)]
    initial_guess: Option<Vec<f64>>,
    #[serde(default)]
    config: CgConfig,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    solver: &'static str,
    solution: &'a [f64],
    report: &'a SolveReport,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("conjgrad=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Format `value` with `digits` significant digits, `%g` style: trailing
/// zeros are dropped and exponent notation is used below `1e-4` or at
/// `10^digits` and above.
fn format_significant(value: f64, digits: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }
    let digits = digits.max(1);

    // Round once in scientific form so the exponent reflects carries (9.9999995 -> 1e1).
    let sci = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => return sci,
    };

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            trim_fraction(mantissa),
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

fn format_vector(v: &[f64]) -> String {
    v.iter()
        .map(|&x| format_significant(x, DISPLAY_DIGITS))
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_report(solution: &[f64], report: &SolveReport) {
    println!(
        "{} Converged in {} iterations",
        "✓".green().bold(),
        report.iterations
    );
    println!("  Solution: {}", format_vector(solution).cyan());
    println!("  Residual: {:.3e}", report.residual_norm);
    println!("  Initial residual: {:.3e}", report.initial_residual_norm);
    println!("  Time: {:?}", report.wall_time);

    if !report.convergence_history.is_empty() {
        println!();
        for info in &report.convergence_history {
            println!("  iter {:>4}  ||r|| = {:.6e}", info.iteration, info.residual_norm);
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Demo => {
            let a = DenseMatrix::from_rows(vec![vec![4.0, 1.0], vec![1.0, 3.0]])?;
            let b = [1.0, 2.0];
            let mut x = [0.0, 0.0];

            let solver = ConjugateGradientSolver::default();
            debug!("solving built-in 2x2 demo system");
            let report = solver.solve(&a, &b, &mut x)?;

            println!("Solution: {}", format_vector(&x));
            println!("  Iterations: {}", report.iterations);
            println!("  Residual: {:.3e}", report.residual_norm);
        }

        Commands::Solve {
            system,
            tolerance,
            max_iterations,
            no_symmetry_check,
            history,
            json,
        } => {
            let raw = std::fs::read_to_string(&system)
                .with_context(|| format!("failed to read {}", system.display()))?;
            let file: SystemFile = serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse {}", system.display()))?;
            debug!(
                "loaded {}: {} rows, rhs length {}, initial guess: {}",
                system.display(),
                file.matrix.len(),
                file.rhs.len(),
                file.initial_guess.is_some()
            );

            let mut config = file.config;
            if let Some(tol) = tolerance {
                config = config.with_tolerance(tol);
            }
            if let Some(cap) = max_iterations {
                config = config.with_max_iterations(cap);
            }
            if no_symmetry_check {
                config = config.with_symmetry_check(false);
            }
            if history {
                config = config.with_history(true);
            }

            let matrix = DenseMatrix::from_rows(file.matrix)?;
            let mut x = file
                .initial_guess
                .unwrap_or_else(|| vec![0.0f64; matrix.cols()]);

            let solver: Box<dyn SolverEngine> = Box::new(ConjugateGradientSolver::new(config));
            if !json {
                println!(
                    "{} Solving {}x{} system with {}...",
                    "→".green().bold(),
                    matrix.rows(),
                    matrix.cols(),
                    solver.name()
                );
            }

            let report = solver
                .solve(&matrix, &file.rhs, &mut x)
                .with_context(|| format!("solve failed for {}", system.display()))?;

            if json {
                let out = JsonOutput {
                    solver: solver.name(),
                    solution: &x,
                    report: &report,
                };
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print_report(&x, &report);
            }
        }
    }

    Ok(())
}
