//! Broadcast command implementation.

use anyhow::Result;
use clap::ValueEnum;
use console::style;
use serde::Serialize;

use qrelay_hal::ExecutionResult;
use qrelay_teleport::{
    NodeProbability, broadcast_probabilities, collective_broadcast, expected_zero_probability,
    relay_broadcast,
};

use super::common::{OutputFormat, print_json, print_probability, print_results, run_with_spinner};
use crate::config::Config;

/// Which broadcast topology to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Chained EPR pairs joined by direct CNOTs
    Collective,
    /// The same broadcast with every CNOT replaced by a relay
    #[default]
    Relay,
}

#[derive(Serialize)]
struct BroadcastOutput<'a> {
    variant: Variant,
    theta: f64,
    seed: Option<u64>,
    expected_zero: f64,
    nodes: &'a [NodeProbability],
    result: &'a ExecutionResult,
}

/// Execute the broadcast command.
pub fn execute(config: &Config, variant: Variant, format: OutputFormat) -> Result<()> {
    let circuit = match variant {
        Variant::Collective => collective_broadcast(config.theta)?,
        Variant::Relay => relay_broadcast(config.theta)?,
    };

    if format == OutputFormat::Table {
        println!(
            "{} Broadcasting rx({:.4})|0⟩ with {} ({} shots)",
            style("→").cyan().bold(),
            config.theta,
            style(circuit.name()).green(),
            config.shots
        );
        println!(
            "  Circuit: {} qubits, {} clbits, depth {}, {} conditional",
            circuit.num_qubits(),
            circuit.num_clbits(),
            circuit.depth(),
            circuit.num_conditional()
        );
    }

    let backend = config.backend();
    let result = run_with_spinner(&backend, &circuit, config.shots)?;
    let nodes = broadcast_probabilities(&result)?;
    let expected_zero = expected_zero_probability(config.theta);

    if format == OutputFormat::Json {
        return print_json(&BroadcastOutput {
            variant,
            theta: config.theta,
            seed: config.seed,
            expected_zero,
            nodes: &nodes,
            result: &result,
        });
    }

    print_results(&result);

    println!("\n  Per-node readout (source P(0) = {expected_zero:.4}):");
    for node in &nodes {
        print_probability(&node.node, node.zero);
    }

    Ok(())
}
