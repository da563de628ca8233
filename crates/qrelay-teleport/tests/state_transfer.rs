//! End-to-end relay behaviour on the local simulator.

use qrelay_adapter_sim::SimulatorBackend;
use qrelay_hal::{Backend, HalError};
use qrelay_teleport::{
    CircuitMetrics, FINAL_REGISTER, RELAY_REGISTER, RESULT_REGISTER, SourcePreparation,
    TeleportError, TransferReport, broadcast_probabilities, cnot_circuit, collective_broadcast,
    compare_circuits, expected_zero_probability, node_zero_probabilities, relay_broadcast,
    swapped_transfer_circuit, teleportation_circuit, teleportation_circuit_with_preparation,
    transfer_circuit,
};
use std::f64::consts::PI;

const SHOTS: u32 = 4096;
const TOLERANCE: f64 = 0.03;

fn backend(seed: u64) -> SimulatorBackend {
    SimulatorBackend::new().with_seed(seed)
}

// ---- Structure ----

#[test]
fn test_cnot_and_teleport_structure() {
    let cnot = CircuitMetrics::of(&cnot_circuit().unwrap());
    assert_eq!((cnot.qubits, cnot.clbits, cnot.depth), (2, 0, 2));

    let tele = CircuitMetrics::of(&teleportation_circuit().unwrap());
    assert_eq!(tele.qubits, 3);
    assert_eq!(tele.clbits, 2);
    assert_eq!(tele.instructions, 8);
    assert_eq!(tele.measurements, 2);
    assert_eq!(tele.conditional, 2);
}

#[test]
fn test_construction_is_idempotent() {
    assert_eq!(cnot_circuit().unwrap(), cnot_circuit().unwrap());
    assert_eq!(teleportation_circuit().unwrap(), teleportation_circuit().unwrap());
    assert_eq!(transfer_circuit(0.7).unwrap(), transfer_circuit(0.7).unwrap());
    assert_eq!(relay_broadcast(0.7).unwrap(), relay_broadcast(0.7).unwrap());

    let a = compare_circuits(&cnot_circuit().unwrap(), &teleportation_circuit().unwrap());
    let b = compare_circuits(&cnot_circuit().unwrap(), &teleportation_circuit().unwrap());
    assert_eq!(a, b);
}

// ---- State transfer ----

#[test]
fn test_transfer_reproduces_source_distribution() {
    for (i, theta) in [PI / 4.0, PI / 3.0, PI / 2.0, 2.0 * PI / 3.0, 0.0]
        .into_iter()
        .enumerate()
    {
        let circuit = transfer_circuit(theta).unwrap();
        let result = backend(100 + i as u64).run(&circuit, SHOTS).unwrap();
        let report = TransferReport::from_result(theta, &result).unwrap();

        assert!(
            report.within(TOLERANCE),
            "theta = {theta}: measured {} expected {}",
            report.measured_zero,
            report.expected_zero
        );
    }
}

#[test]
fn test_transfer_holds_for_every_outcome_pair() {
    let theta = PI / 4.0;
    let circuit = transfer_circuit(theta).unwrap();
    let result = backend(7).run(&circuit, SHOTS).unwrap();

    let slots = circuit.creg(RELAY_REGISTER).unwrap();
    let readout = circuit.creg(RESULT_REGISTER).unwrap();

    // All four correction branches are exercised
    let pairs = result.register_counts(RELAY_REGISTER).unwrap();
    assert_eq!(pairs.len(), 4);

    // Key: readout, slot 1, slot 0 (first listed bit rightmost)
    let joint = result
        .marginal_counts(&[slots[0], slots[1], readout[0]])
        .unwrap();
    let expected = expected_zero_probability(theta);
    for pair in ["00", "01", "10", "11"] {
        let zero = joint.get(&format!("0{pair}")) as f64;
        let one = joint.get(&format!("1{pair}")) as f64;
        let p = zero / (zero + one);
        assert!(
            (p - expected).abs() < 0.06,
            "pair {pair}: P(0) = {p}, expected {expected}"
        );
    }
}

#[test]
fn test_hadamard_source_transfers() {
    let mut circuit = teleportation_circuit_with_preparation(SourcePreparation::H).unwrap();
    let target = circuit.qreg("target").unwrap()[0];
    let result_reg = circuit.add_creg(RESULT_REGISTER, 1).unwrap();
    circuit.h(target).unwrap().measure(target, result_reg[0]).unwrap();

    // H then relay then H: the target reads 0 every time
    let result = backend(3).run(&circuit, 1024).unwrap();
    let zeros = node_zero_probabilities(&result, RESULT_REGISTER).unwrap();
    assert_eq!(zeros, vec![1.0]);
}

#[test]
fn test_swapped_slots_break_transfer() {
    let theta = PI / 4.0;
    let result = backend(11)
        .run(&swapped_transfer_circuit(theta).unwrap(), SHOTS)
        .unwrap();
    let report = TransferReport::from_result(theta, &result).unwrap();

    assert!((report.measured_zero - 0.5).abs() < 0.05, "{report:?}");
    assert!(!report.within(0.2));
}

// ---- Broadcast ----

#[test]
fn test_relay_broadcast_reaches_every_node() {
    let theta = PI / 4.0;
    let result = backend(21)
        .run(&relay_broadcast(theta).unwrap(), SHOTS)
        .unwrap();

    let expected = expected_zero_probability(theta);
    for node in broadcast_probabilities(&result).unwrap() {
        assert!(
            (node.zero - expected).abs() < TOLERANCE,
            "{}: P(0) = {}, expected {expected}",
            node.node,
            node.zero
        );
    }
}

#[test]
fn test_collective_broadcast_does_not_carry_state() {
    let result = backend(31)
        .run(&collective_broadcast(PI / 4.0).unwrap(), SHOTS)
        .unwrap();

    let zeros = node_zero_probabilities(&result, FINAL_REGISTER).unwrap();
    assert_eq!(zeros.len(), 3);
    for p in zeros {
        assert!((p - 0.5).abs() < 0.05, "P(0) = {p}");
    }
}

// ---- Counts and errors ----

#[test]
fn test_counts_conserved_across_topologies() {
    let circuits = [
        transfer_circuit(0.4).unwrap(),
        collective_broadcast(0.4).unwrap(),
        relay_broadcast(0.4).unwrap(),
    ];
    for (i, circuit) in circuits.iter().enumerate() {
        let shots = 777 + i as u32;
        let result = backend(i as u64).run(circuit, shots).unwrap();
        assert_eq!(result.counts.total_shots(), u64::from(shots));
    }
}

#[test]
fn test_unmeasured_circuits_are_rejected() {
    let err = backend(0).run(&cnot_circuit().unwrap(), 10).unwrap_err();
    assert!(matches!(err, HalError::InvalidCircuit(_)));

    let wrapped: TeleportError = err.into();
    assert!(matches!(wrapped, TeleportError::Hal(HalError::InvalidCircuit(_))));
}

#[test]
fn test_narrow_backend_rejects_broadcast() {
    let err = SimulatorBackend::with_max_qubits(8)
        .run(&relay_broadcast(0.1).unwrap(), 10)
        .unwrap_err();
    assert!(matches!(err, HalError::CircuitTooLarge(_)));
}
