//! Structural metrics and marginal analysis.

use serde::{Deserialize, Serialize};

use qrelay_hal::ExecutionResult;
use qrelay_ir::Circuit;

use crate::error::{TeleportError, TeleportResult};
use crate::topology::{FINAL_REGISTER, NODES, RESULT_REGISTER};

/// Structural metrics of a circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitMetrics {
    /// Circuit name.
    pub name: String,
    /// Number of qubits.
    pub qubits: usize,
    /// Number of classical bits.
    pub clbits: usize,
    /// Circuit depth.
    pub depth: usize,
    /// Total instructions, barriers included.
    pub instructions: usize,
    /// Unitary gates, conditional ones included.
    pub gates: usize,
    /// Measurements.
    pub measurements: usize,
    /// Classically conditioned gates.
    pub conditional: usize,
    /// Gates acting on two or more qubits.
    pub two_qubit: usize,
}

impl CircuitMetrics {
    /// Collect the metrics of `circuit`.
    pub fn of(circuit: &Circuit) -> Self {
        Self {
            name: circuit.name().to_string(),
            qubits: circuit.num_qubits(),
            clbits: circuit.num_clbits(),
            depth: circuit.depth(),
            instructions: circuit.num_instructions(),
            gates: circuit.num_gates(),
            measurements: circuit.num_measurements(),
            conditional: circuit.num_conditional(),
            two_qubit: circuit.num_multi_qubit_gates(),
        }
    }
}

/// Resource differences, candidate minus baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overhead {
    /// Extra qubits.
    pub qubits: i64,
    /// Extra classical bits.
    pub clbits: i64,
    /// Extra depth.
    pub depth: i64,
    /// Extra gates.
    pub gates: i64,
}

/// Side-by-side metrics of two circuits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    /// The reference circuit.
    pub baseline: CircuitMetrics,
    /// The circuit being compared against it.
    pub candidate: CircuitMetrics,
    /// What the candidate costs on top of the baseline.
    pub overhead: Overhead,
}

/// Compare `candidate` against `baseline`.
pub fn compare_circuits(baseline: &Circuit, candidate: &Circuit) -> Comparison {
    let baseline = CircuitMetrics::of(baseline);
    let candidate = CircuitMetrics::of(candidate);
    let delta = |a: usize, b: usize| b as i64 - a as i64;

    let overhead = Overhead {
        qubits: delta(baseline.qubits, candidate.qubits),
        clbits: delta(baseline.clbits, candidate.clbits),
        depth: delta(baseline.depth, candidate.depth),
        gates: delta(baseline.gates, candidate.gates),
    };

    Comparison {
        baseline,
        candidate,
        overhead,
    }
}

/// P(0) for every bit of `register`, lowest index first.
pub fn node_zero_probabilities(result: &ExecutionResult, register: &str) -> TeleportResult<Vec<f64>> {
    let group = result
        .layout
        .register(register)
        .ok_or_else(|| TeleportError::RegisterNotFound(register.to_string()))?;

    group
        .clbits
        .iter()
        .map(|&clbit| -> TeleportResult<f64> { Ok(result.clbit_probability(clbit, false)?) })
        .collect()
}

/// P(0) of one broadcast node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeProbability {
    /// Node name.
    pub node: String,
    /// Measured P(0).
    pub zero: f64,
}

/// Per-node P(0) of a broadcast run, read from `final_measure`.
pub fn broadcast_probabilities(result: &ExecutionResult) -> TeleportResult<Vec<NodeProbability>> {
    let zeros = node_zero_probabilities(result, FINAL_REGISTER)?;
    Ok(NODES
        .iter()
        .zip(zeros)
        .map(|(node, zero)| NodeProbability {
            node: (*node).to_string(),
            zero,
        })
        .collect())
}

/// P(0) of `rx(theta)|0⟩`, which a faithful relay reproduces on its target.
pub fn expected_zero_probability(theta: f64) -> f64 {
    (theta / 2.0).cos().powi(2)
}

/// Expected against measured target P(0) of a transfer run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransferReport {
    /// Preparation angle.
    pub theta: f64,
    /// cos²(θ/2).
    pub expected_zero: f64,
    /// Fraction of shots reading 0 on the target.
    pub measured_zero: f64,
    /// Shots taken.
    pub shots: u32,
}

impl TransferReport {
    /// Build the report from a run of a transfer circuit.
    pub fn from_result(theta: f64, result: &ExecutionResult) -> TeleportResult<Self> {
        let measured_zero = node_zero_probabilities(result, RESULT_REGISTER)?
            .first()
            .copied()
            .ok_or_else(|| TeleportError::RegisterNotFound(RESULT_REGISTER.to_string()))?;

        Ok(Self {
            theta,
            expected_zero: expected_zero_probability(theta),
            measured_zero,
            shots: result.shots,
        })
    }

    /// Absolute difference between measured and expected P(0).
    pub fn deviation(&self) -> f64 {
        (self.measured_zero - self.expected_zero).abs()
    }

    /// Whether the measured P(0) is within `tolerance` of the expectation.
    pub fn within(&self, tolerance: f64) -> bool {
        self.deviation() <= tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{cnot_circuit, teleportation_circuit};
    use qrelay_hal::{ClassicalLayout, Counts};
    use std::f64::consts::PI;

    #[test]
    fn test_metrics_of_teleportation() {
        let metrics = CircuitMetrics::of(&teleportation_circuit().unwrap());
        assert_eq!(metrics.name, "teleportation");
        assert_eq!(metrics.qubits, 3);
        assert_eq!(metrics.clbits, 2);
        assert_eq!(metrics.instructions, 8);
        assert_eq!(metrics.gates, 6);
        assert_eq!(metrics.measurements, 2);
        assert_eq!(metrics.conditional, 2);
        assert_eq!(metrics.two_qubit, 2);
    }

    #[test]
    fn test_compare_overhead() {
        let cmp = compare_circuits(&cnot_circuit().unwrap(), &teleportation_circuit().unwrap());
        assert_eq!(
            cmp.overhead,
            Overhead {
                qubits: 1,
                clbits: 2,
                depth: 4,
                gates: 4,
            }
        );
        assert_eq!(cmp.baseline.depth, 2);
    }

    #[test]
    fn test_expected_zero() {
        assert!((expected_zero_probability(0.0) - 1.0).abs() < 1e-12);
        assert!((expected_zero_probability(PI) - 0.0).abs() < 1e-12);
        assert!((expected_zero_probability(PI / 2.0) - 0.5).abs() < 1e-12);
    }

    fn broadcast_result() -> ExecutionResult {
        let mut circuit = Circuit::new("probe");
        circuit.add_creg("c_node1", 2).unwrap();
        circuit.add_creg(FINAL_REGISTER, 3).unwrap();
        let layout = ClassicalLayout::from_circuit(&circuit);
        // final_measure is leftmost; node3 node2 node1 then c_node1
        let counts = Counts::from_pairs([("001 00", 60), ("100 11", 40)]);
        ExecutionResult::new(counts, 100, layout)
    }

    #[test]
    fn test_node_zero_probabilities() {
        let zeros = node_zero_probabilities(&broadcast_result(), FINAL_REGISTER).unwrap();
        assert_eq!(zeros.len(), 3);
        assert!((zeros[0] - 0.4).abs() < 1e-12);
        assert!((zeros[1] - 1.0).abs() < 1e-12);
        assert!((zeros[2] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_broadcast_probabilities_named() {
        let nodes = broadcast_probabilities(&broadcast_result()).unwrap();
        assert_eq!(nodes[0].node, "node1");
        assert_eq!(nodes[2].node, "node3");
    }

    #[test]
    fn test_missing_register() {
        let err = node_zero_probabilities(&broadcast_result(), "nope").unwrap_err();
        assert!(matches!(err, TeleportError::RegisterNotFound(ref n) if n == "nope"));
        assert!(TransferReport::from_result(0.1, &broadcast_result()).is_err());
    }

    #[test]
    fn test_transfer_report_tolerance() {
        let report = TransferReport {
            theta: PI / 4.0,
            expected_zero: expected_zero_probability(PI / 4.0),
            measured_zero: 0.87,
            shots: 4096,
        };
        assert!(report.within(0.03));
        assert!(!report.within(0.01));
    }
}
