//! qrelay Teleportation Relay
//!
//! This crate implements the teleportation relay, a fixed eight-instruction
//! sequence that moves the state of a source qubit onto a target qubit
//! through an ancilla and two classical slots, and the demonstration
//! circuits built around it.
//!
//! # Overview
//!
//! - [`relay`]: the relay itself ([`teleport`]), the CNOT replacement helper
//!   ([`replace_cnot_with_teleportation`]) and a miswired variant used as a
//!   regression fixture
//! - [`topology`]: the fixed circuits (CNOT baseline, single relay, state
//!   transfer, collective broadcast, relay broadcast)
//! - [`analysis`]: structural metrics, circuit comparison and per-node
//!   marginal probabilities
//!
//! # Example: Relaying a Rotated State
//!
//! ```
//! use qrelay_adapter_sim::SimulatorBackend;
//! use qrelay_hal::Backend;
//! use qrelay_teleport::{TransferReport, transfer_circuit};
//! use std::f64::consts::PI;
//!
//! let theta = PI / 4.0;
//! let circuit = transfer_circuit(theta).unwrap();
//!
//! let backend = SimulatorBackend::new().with_seed(42);
//! let result = backend.run(&circuit, 4096).unwrap();
//!
//! let report = TransferReport::from_result(theta, &result).unwrap();
//! assert!(report.within(0.03));
//! ```
//!
//! # The Relay
//!
//! | Step | Instructions | Effect |
//! |------|--------------|--------|
//! | 1 | `h(ancilla)`, `cx(ancilla, target)` | Bell pair |
//! | 2 | `cx(source, ancilla)`, `h(source)` | Bell-basis rotation |
//! | 3 | `measure(source → slot 0)`, `measure(ancilla → slot 1)` | Outcomes |
//! | 4 | `x(target) if slot 1`, `z(target) if slot 0` | Corrections |

pub mod analysis;
pub mod error;
pub mod relay;
pub mod topology;

pub use analysis::{
    CircuitMetrics, Comparison, NodeProbability, Overhead, TransferReport,
    broadcast_probabilities, compare_circuits, expected_zero_probability, node_zero_probabilities,
};
pub use error::{TeleportError, TeleportResult};
pub use relay::{
    ANCILLA_SLOT, RELAY_INSTRUCTIONS, RelayHandles, SOURCE_SLOT, replace_cnot_with_teleportation,
    teleport, teleport_swapped_slots,
};
pub use topology::{
    FINAL_REGISTER, NODES, Node, RELAY_REGISTER, RESULT_REGISTER, SourcePreparation, cnot_circuit,
    collective_broadcast, relay_broadcast, swapped_transfer_circuit, teleportation_circuit,
    teleportation_circuit_with_preparation, transfer_circuit,
};
