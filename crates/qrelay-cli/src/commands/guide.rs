//! Guide command implementation.

use console::style;

use qrelay_teleport::NODES;

/// Execute the guide command.
pub fn execute() {
    println!(
        "{} Replacing direct CNOTs with teleportation relays\n",
        style("→").cyan().bold()
    );

    println!("{}", style("Steps").bold());
    println!("  1. Bring the relay helpers into scope");
    println!("  2. Add one ancilla qubit and one 2-bit classical register per node");
    println!("  3. Replace each node's CNOT with a relay through its ancilla");
    println!();

    println!("{}", style("Before").bold());
    for node in NODES {
        println!("  circuit.cx({node}_epr, {node})?;");
    }
    println!();

    println!("{}", style("After").bold());
    println!("  use qrelay_teleport::replace_cnot_with_teleportation;");
    println!();
    for node in NODES {
        println!(
            "  replace_cnot_with_teleportation(&mut circuit, {node}_epr, {node}, \"{node}\", None, None)?;"
        );
    }
    println!();
    println!(
        "  Each call adds {} and {}, then appends the eight relay instructions.",
        style("ancilla_<node>").yellow(),
        style("c_<node>").yellow()
    );
    println!(
        "  Pass an existing ancilla or register to reuse it instead; names must be free."
    );
}
