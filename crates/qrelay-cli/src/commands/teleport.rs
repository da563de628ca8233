//! Teleport command implementation.

use anyhow::Result;
use console::style;
use serde::Serialize;

use qrelay_hal::ExecutionResult;
use qrelay_teleport::{TransferReport, swapped_transfer_circuit, transfer_circuit};

use super::common::{OutputFormat, print_json, print_probability, print_results, run_with_spinner};
use crate::config::Config;

/// Deviation above which a transfer is reported as failed.
const TOLERANCE: f64 = 0.05;

#[derive(Serialize)]
struct TeleportOutput<'a> {
    circuit: &'a str,
    seed: Option<u64>,
    report: TransferReport,
    deviation: f64,
    faithful: bool,
    result: &'a ExecutionResult,
}

/// Execute the teleport command.
pub fn execute(config: &Config, swapped: bool, format: OutputFormat) -> Result<()> {
    let circuit = if swapped {
        swapped_transfer_circuit(config.theta)?
    } else {
        transfer_circuit(config.theta)?
    };

    if format == OutputFormat::Table {
        println!(
            "{} Relaying rx({:.4})|0⟩ through {} ({} shots)",
            style("→").cyan().bold(),
            config.theta,
            style(circuit.name()).green(),
            config.shots
        );
        println!(
            "  Circuit: {} qubits, {} clbits, depth {}",
            circuit.num_qubits(),
            circuit.num_clbits(),
            circuit.depth()
        );
    }

    let backend = config.backend();
    let result = run_with_spinner(&backend, &circuit, config.shots)?;
    let report = TransferReport::from_result(config.theta, &result)?;

    if format == OutputFormat::Json {
        return print_json(&TeleportOutput {
            circuit: circuit.name(),
            seed: config.seed,
            report,
            deviation: report.deviation(),
            faithful: report.within(TOLERANCE),
            result: &result,
        });
    }

    print_results(&result);

    println!("\n  Target register:");
    print_probability("expected", report.expected_zero);
    print_probability("measured", report.measured_zero);

    if report.within(TOLERANCE) {
        println!(
            "\n{} State transferred (deviation {:.4})",
            style("✓").green().bold(),
            report.deviation()
        );
    } else {
        println!(
            "\n{} Target does not carry the source state (deviation {:.4})",
            style("✗").red().bold(),
            report.deviation()
        );
    }

    Ok(())
}
