//! Fixed demonstration topologies.
//!
//! | Builder | Qubits | Clbits | Purpose |
//! |---------|--------|--------|---------|
//! | [`cnot_circuit`] | 2 | 0 | direct CNOT baseline |
//! | [`teleportation_circuit`] | 3 | 2 | one relay, nothing else |
//! | [`transfer_circuit`] | 3 | 3 | prepared source, relay, readout |
//! | [`collective_broadcast`] | 6 | 9 | chained-EPR broadcast |
//! | [`relay_broadcast`] | 9 | 9 | broadcast through three relays |

use std::fmt;

use serde::{Deserialize, Serialize};

use qrelay_ir::{Circuit, ClassicalRegister, IrResult, QubitId, StandardGate};

use crate::analysis::expected_zero_probability;
use crate::error::TeleportResult;
use crate::relay::{replace_cnot_with_teleportation, teleport, teleport_swapped_slots};

/// Node registers of the broadcast topologies, in declaration order.
pub const NODES: [&str; 3] = ["node1", "node2", "node3"];

/// Final readout register of the broadcast topologies.
pub const FINAL_REGISTER: &str = "final_measure";

/// Relay scratch register of the single-relay topologies.
pub const RELAY_REGISTER: &str = "cbits";

/// Target readout register of the transfer topologies.
pub const RESULT_REGISTER: &str = "result";

/// Gate applied to the source before it is relayed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourcePreparation {
    /// Hadamard, an equal superposition.
    H,
    /// X rotation by the given angle.
    Rx(f64),
    /// Y rotation by the given angle.
    Ry(f64),
}

impl SourcePreparation {
    /// The gate this preparation applies.
    pub fn gate(self) -> StandardGate {
        match self {
            SourcePreparation::H => StandardGate::H,
            SourcePreparation::Rx(theta) => StandardGate::Rx(theta),
            SourcePreparation::Ry(theta) => StandardGate::Ry(theta),
        }
    }

    /// P(0) of the prepared state.
    pub fn expected_zero_probability(self) -> f64 {
        match self {
            SourcePreparation::H => 0.5,
            SourcePreparation::Rx(theta) | SourcePreparation::Ry(theta) => {
                expected_zero_probability(theta)
            }
        }
    }
}

impl fmt::Display for SourcePreparation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourcePreparation::H => write!(f, "h"),
            SourcePreparation::Rx(theta) => write!(f, "rx({theta:.4})"),
            SourcePreparation::Ry(theta) => write!(f, "ry({theta:.4})"),
        }
    }
}

/// The direct-CNOT baseline: `h(epr)` then `cx(epr, target)`.
pub fn cnot_circuit() -> TeleportResult<Circuit> {
    let mut circuit = Circuit::new("cnot");
    let epr = circuit.add_qreg("epr", 1)?[0];
    let target = circuit.add_qreg("target", 1)?[0];

    circuit.h(epr)?.cx(epr, target)?;
    Ok(circuit)
}

struct RelayQubits {
    source: QubitId,
    target: QubitId,
    ancilla: QubitId,
    cbits: ClassicalRegister,
}

fn relay_layout(name: &str) -> TeleportResult<(Circuit, RelayQubits)> {
    let mut circuit = Circuit::new(name);
    let source = circuit.add_qreg("source", 1)?[0];
    let target = circuit.add_qreg("target", 1)?[0];
    let ancilla = circuit.add_qreg("ancilla", 1)?[0];
    let cbits = circuit.add_creg(RELAY_REGISTER, 2)?;
    Ok((
        circuit,
        RelayQubits {
            source,
            target,
            ancilla,
            cbits,
        },
    ))
}

/// A single relay on registers `source`, `target`, `ancilla` and `cbits`.
///
/// The source is left in |0⟩; use
/// [`teleportation_circuit_with_preparation`] to relay something else.
pub fn teleportation_circuit() -> TeleportResult<Circuit> {
    let (mut circuit, q) = relay_layout("teleportation")?;
    teleport(&mut circuit, q.source, q.target, q.ancilla, &q.cbits)?;
    Ok(circuit)
}

/// [`teleportation_circuit`] with `preparation` applied to the source first.
pub fn teleportation_circuit_with_preparation(
    preparation: SourcePreparation,
) -> TeleportResult<Circuit> {
    let (mut circuit, q) = relay_layout("teleportation")?;
    circuit.gate(preparation.gate(), [q.source])?;
    teleport(&mut circuit, q.source, q.target, q.ancilla, &q.cbits)?;
    Ok(circuit)
}

/// Relay an `rx(theta)` source and read the target into `result`.
///
/// The target's P(0) should be cos²(θ/2).
pub fn transfer_circuit(theta: f64) -> TeleportResult<Circuit> {
    let (mut circuit, q) = relay_layout("transfer")?;
    circuit.rx(theta, q.source)?;
    teleport(&mut circuit, q.source, q.target, q.ancilla, &q.cbits)?;
    read_target(&mut circuit, q.target)?;
    Ok(circuit)
}

/// [`transfer_circuit`] wired through [`teleport_swapped_slots`].
///
/// The target does not end up with the source state.
pub fn swapped_transfer_circuit(theta: f64) -> TeleportResult<Circuit> {
    let (mut circuit, q) = relay_layout("transfer_swapped")?;
    circuit.rx(theta, q.source)?;
    teleport_swapped_slots(&mut circuit, q.source, q.target, q.ancilla, &q.cbits)?;
    read_target(&mut circuit, q.target)?;
    Ok(circuit)
}

fn read_target(circuit: &mut Circuit, target: QubitId) -> IrResult<()> {
    let result = circuit.add_creg(RESULT_REGISTER, 1)?;
    circuit.measure(target, result[0])?;
    Ok(())
}

/// A broadcast node: its own qubit and its EPR qubit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    /// The node's data qubit.
    pub qubit: QubitId,
    /// The node's share of the entanglement chain.
    pub epr: QubitId,
}

/// Declare `node{k}` and `node{k}_epr` for each node, interleaved.
fn add_nodes(circuit: &mut Circuit) -> IrResult<[Node; 3]> {
    let mut add = |name: &str| -> IrResult<Node> {
        let qubit = circuit.add_qreg(name, 1)?[0];
        let epr = circuit.add_qreg(format!("{name}_epr"), 1)?[0];
        Ok(Node { qubit, epr })
    };
    Ok([add(NODES[0])?, add(NODES[1])?, add(NODES[2])?])
}

fn measure_nodes(circuit: &mut Circuit, nodes: &[Node; 3]) -> IrResult<()> {
    let fin = circuit.add_creg(FINAL_REGISTER, 3)?;
    for (k, node) in nodes.iter().enumerate() {
        circuit.measure(node.qubit, fin[k])?;
    }
    Ok(())
}

/// The collective broadcast as first drafted.
///
/// `node1` is prepared with `rx(theta)` and relayed into an EPR chain
/// (`node1_epr` → `node2_epr` → `node3_epr`). The relay's corrections are
/// fanned out to both downstream EPR qubits, each of which then hops onto its
/// node with a single measurement and a conditional Z. Phases are separated
/// by barriers and every node is read into `final_measure`.
///
/// The downstream hops carry a single classical bit, so node2 and node3 do
/// not end up in the prepared state. Compare [`relay_broadcast`].
pub fn collective_broadcast(theta: f64) -> TeleportResult<Circuit> {
    let mut circuit = Circuit::new("collective_broadcast");
    let [n1, n2, n3] = add_nodes(&mut circuit)?;
    let m1 = circuit.add_creg("node1_measure", 2)?;
    let m2 = circuit.add_creg("node2_measure", 2)?;
    let m3 = circuit.add_creg("node3_measure", 2)?;

    circuit.rx(theta, n1.qubit)?;

    // EPR chain
    circuit
        .h(n1.epr)?
        .cx(n1.epr, n2.epr)?
        .h(n2.epr)?
        .cx(n2.epr, n3.epr)?
        .barrier_all()?;

    // Bell measurement of node1 against its EPR qubit
    circuit
        .cx(n1.qubit, n1.epr)?
        .h(n1.qubit)?
        .measure(n1.qubit, m1[0])?
        .measure(n1.epr, m1[1])?
        .barrier_all()?;

    for downstream in [n2, n3] {
        circuit.x_if(downstream.epr, m1[1])?.z_if(downstream.epr, m1[0])?;
    }
    circuit.barrier_all()?;

    for (node, slots) in [(n2, &m2), (n3, &m3)] {
        circuit
            .cx(node.epr, node.qubit)?
            .h(node.epr)?
            .measure(node.epr, slots[0])?
            .z_if(node.qubit, slots[0])?;
    }
    circuit.barrier_all()?;

    measure_nodes(&mut circuit, &[n1, n2, n3])?;
    Ok(circuit)
}

/// The broadcast rebuilt around full relays.
///
/// `rx(theta)` is prepared on `node1_epr` and fanned out with CX to the other
/// EPR qubits. Each `cx(epr, node)` of the draft is then replaced by a relay,
/// which adds `ancilla_node{k}` and `c_node{k}` per node. Every node ends up
/// with P(0) = cos²(θ/2).
pub fn relay_broadcast(theta: f64) -> TeleportResult<Circuit> {
    let mut circuit = Circuit::new("relay_broadcast");
    let nodes = add_nodes(&mut circuit)?;
    let root = nodes[0].epr;

    circuit.rx(theta, root)?;
    for node in &nodes[1..] {
        circuit.cx(root, node.epr)?;
    }

    for (node, name) in nodes.iter().zip(NODES) {
        replace_cnot_with_teleportation(&mut circuit, node.epr, node.qubit, name, None, None)?;
    }
    circuit.barrier_all()?;

    measure_nodes(&mut circuit, &nodes)?;
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_cnot_structure() {
        let circuit = cnot_circuit().unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 0);
        assert_eq!(circuit.depth(), 2);
        assert_eq!(circuit.num_instructions(), 2);
    }

    #[test]
    fn test_teleportation_structure() {
        let circuit = teleportation_circuit().unwrap();
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.num_instructions(), 8);
        assert_eq!(circuit.num_measurements(), 2);
        assert_eq!(circuit.num_conditional(), 2);
        assert_eq!(circuit.depth(), 6);
    }

    #[test]
    fn test_preparation_prepends_one_gate() {
        let circuit =
            teleportation_circuit_with_preparation(SourcePreparation::Ry(PI / 3.0)).unwrap();
        assert_eq!(circuit.num_instructions(), 9);
        assert_eq!(circuit.instructions()[0].name(), "ry");
        assert_eq!(circuit.instructions()[0].qubits, vec![circuit.qregs()[0][0]]);
    }

    #[test]
    fn test_preparation_expectations() {
        assert!((SourcePreparation::H.expected_zero_probability() - 0.5).abs() < 1e-12);
        let p = SourcePreparation::Rx(PI / 4.0).expected_zero_probability();
        assert!((p - 0.853_553).abs() < 1e-6);
        assert_eq!(SourcePreparation::Rx(PI / 2.0).to_string(), "rx(1.5708)");
    }

    #[test]
    fn test_rotation_expectation_matches_transfer_report() {
        for theta in [0.0, 0.3, PI / 4.0, PI / 2.0, 2.5, PI] {
            let expected = expected_zero_probability(theta);
            assert_eq!(SourcePreparation::Rx(theta).expected_zero_probability(), expected);
            assert_eq!(SourcePreparation::Ry(theta).expected_zero_probability(), expected);
        }
    }

    #[test]
    fn test_transfer_reads_target() {
        let circuit = transfer_circuit(PI / 4.0).unwrap();
        let result = circuit.creg(RESULT_REGISTER).unwrap();
        let last = circuit.instructions().last().unwrap();

        assert!(last.is_measure());
        assert_eq!(last.qubits, vec![circuit.qreg("target").unwrap()[0]]);
        assert_eq!(last.clbits, vec![result[0]]);
    }

    #[test]
    fn test_collective_structure() {
        let circuit = collective_broadcast(PI / 4.0).unwrap();
        assert_eq!(circuit.num_qubits(), 6);
        assert_eq!(circuit.num_clbits(), 9);
        assert_eq!(circuit.num_instructions(), 28);
        assert_eq!(circuit.num_measurements(), 7);
        assert_eq!(circuit.num_conditional(), 6);

        let names: Vec<_> = circuit.qregs().iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            vec!["node1", "node1_epr", "node2", "node2_epr", "node3", "node3_epr"]
        );
        assert_eq!(circuit.cregs().last().unwrap().name(), FINAL_REGISTER);
    }

    #[test]
    fn test_relay_broadcast_structure() {
        let circuit = relay_broadcast(PI / 4.0).unwrap();
        assert_eq!(circuit.num_qubits(), 9);
        assert_eq!(circuit.num_clbits(), 9);
        assert_eq!(circuit.num_instructions(), 31);
        assert_eq!(circuit.num_conditional(), 6);

        for node in NODES {
            assert!(circuit.qreg(&format!("ancilla_{node}")).is_some());
            assert_eq!(circuit.creg(&format!("c_{node}")).map(|r| r.len()), Some(2));
        }
    }

    #[test]
    fn test_builders_are_deterministic() {
        assert_eq!(cnot_circuit().unwrap(), cnot_circuit().unwrap());
        assert_eq!(
            collective_broadcast(0.3).unwrap(),
            collective_broadcast(0.3).unwrap()
        );
        assert_ne!(relay_broadcast(0.3).unwrap(), relay_broadcast(0.4).unwrap());
    }
}
