//! Compare command implementation.

use anyhow::Result;
use console::style;

use qrelay_ir::{Circuit, Instruction};
use qrelay_teleport::{CircuitMetrics, Comparison, cnot_circuit, compare_circuits, teleportation_circuit};

use super::common::{OutputFormat, print_json};

/// Execute the compare command.
pub fn execute(show_instructions: bool, format: OutputFormat) -> Result<()> {
    let cnot = cnot_circuit()?;
    let relay = teleportation_circuit()?;
    let comparison = compare_circuits(&cnot, &relay);

    if format == OutputFormat::Json {
        return print_json(&comparison);
    }

    println!(
        "{} CNOT vs teleportation relay\n",
        style("→").cyan().bold()
    );
    print_metrics_table(&comparison);
    print_overhead(&comparison);
    print_tradeoffs();

    if show_instructions {
        print_instructions(&cnot);
        print_instructions(&relay);
    }

    Ok(())
}

fn print_metrics_table(comparison: &Comparison) {
    println!(
        "  {:<14} {:>6} {:>7} {:>6} {:>6} {:>6} {:>11}",
        style("circuit").bold(),
        style("qubits").bold(),
        style("clbits").bold(),
        style("depth").bold(),
        style("ops").bold(),
        style("gates").bold(),
        style("conditional").bold()
    );
    for row in [&comparison.baseline, &comparison.candidate] {
        print_metrics_row(row);
    }
}

fn print_metrics_row(m: &CircuitMetrics) {
    println!(
        "  {:<14} {:>6} {:>7} {:>6} {:>6} {:>6} {:>11}",
        style(&m.name).cyan(),
        m.qubits,
        m.clbits,
        m.depth,
        m.instructions,
        m.gates,
        m.conditional
    );
}

fn print_overhead(comparison: &Comparison) {
    let o = comparison.overhead;
    println!("\n  Overhead of the relay:");
    println!("    qubits  {}", style(format!("{:+}", o.qubits)).yellow());
    println!("    clbits  {}", style(format!("{:+}", o.clbits)).yellow());
    println!("    depth   {}", style(format!("{:+}", o.depth)).yellow());
    println!("    gates   {}", style(format!("{:+}", o.gates)).yellow());
}

fn print_tradeoffs() {
    println!("\n{}", style("CNOT gate").bold());
    println!("  {}", style("pros").green());
    println!("    - few resources (2 qubits)");
    println!("    - fast (a single gate)");
    println!("    - easy to follow");
    println!("  {}", style("cons").red());
    println!("    - no quantum-level security");
    println!("    - cannot detect eavesdropping");

    println!("\n{}", style("Teleportation relay").bold());
    println!("  {}", style("pros").green());
    println!("    - quantum-level security");
    println!("    - eavesdropping can be detected");
    println!("    - fits quantum networks");
    println!("    - supports distributed quantum computing");
    println!("  {}", style("cons").red());
    println!("    - more resources (3 qubits + 2 classical bits)");
    println!("    - more operations");
    println!("    - needs classical communication");
}

fn print_instructions(circuit: &Circuit) {
    println!("\n{}:", style(circuit.name()).cyan().bold());
    for (i, inst) in circuit.instructions().iter().enumerate() {
        println!("  {i:>2}  {}", describe(inst));
    }
    println!("  ops: {}", style(op_summary(circuit)).dim());
}

/// `count_ops` rendered as `x×n` pairs, most frequent first.
fn op_summary(circuit: &Circuit) -> String {
    circuit
        .count_ops()
        .iter()
        .map(|(name, n)| format!("{name}×{n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One-line rendering such as `x q1 if c1 == 1`.
fn describe(inst: &Instruction) -> String {
    let mut line = inst.name().to_string();
    for q in &inst.qubits {
        line.push_str(&format!(" {q}"));
    }
    if inst.is_measure() {
        for c in &inst.clbits {
            line.push_str(&format!(" -> {c}"));
        }
    }
    if let Some(cond) = inst.condition() {
        line.push_str(&format!(" if {} == {}", cond.clbit, u8::from(cond.value)));
    }
    line
}
