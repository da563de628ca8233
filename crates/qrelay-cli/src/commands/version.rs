//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - Teleportation relays for distributed quantum circuits",
        style("qrelay").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qrelay-ir           Circuit intermediate representation");
    println!("  qrelay-hal          Backend abstraction and result model");
    println!("  qrelay-teleport     Relay, topologies and analysis");
    println!("  qrelay-adapter-sim  Statevector simulator");
    println!("  qrelay-cli          Command-line interface");
    println!();
    println!("License:    {}", style(env!("CARGO_PKG_LICENSE")).dim());
}
