//! Shared helpers for CLI commands.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::ValueEnum;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use qrelay_hal::{Backend, ExecutionResult};
use qrelay_ir::Circuit;

/// How a command reports its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Pretty-printed JSON on stdout
    Json,
}

/// Run `circuit` on `backend` behind a spinner.
pub fn run_with_spinner(
    backend: &dyn Backend,
    circuit: &Circuit,
    shots: u32,
) -> Result<ExecutionResult> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(format!(
        "Simulating {} ({} qubits, {} shots)...",
        circuit.name(),
        circuit.num_qubits(),
        shots
    ));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = backend.run(circuit, shots);
    spinner.finish_and_clear();

    result.with_context(|| format!("Failed to run '{}' on {}", circuit.name(), backend.name()))
}

/// Print `value` as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print execution results in a table format.
pub fn print_results(result: &ExecutionResult) {
    println!(
        "\n{} Results ({} shots):",
        style("✓").green().bold(),
        result.shots
    );

    let sorted = result.counts.sorted();
    let total = result.counts.total_shots() as f64;

    for (bitstring, count) in sorted.iter().take(16) {
        let prob = **count as f64 / total * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > 16 {
        println!("  ... and {} more outcomes", sorted.len() - 16);
    }

    if let Some((bitstring, count)) = result.counts.most_frequent() {
        println!(
            "\n  Most frequent: {} ({} times)",
            style(bitstring).cyan(),
            count
        );
    }

    if let Some(time_ms) = result.execution_time_ms {
        println!("\n  Execution time: {} ms", style(time_ms).yellow());
    }
}

/// Print one `label: P(0)` line with a bar.
pub fn print_probability(label: &str, zero: f64) {
    let bar: String = "█".repeat((zero * 50.0).round() as usize);
    println!(
        "  {:<8} P(0) = {:.4} {}",
        style(label).cyan(),
        zero,
        style(bar).green()
    );
}
