//! High-level circuit builder API.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{ClassicalCondition, StandardGate};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{Clbit, ClbitId, Qubit, QubitId};
use crate::register::{ClassicalRegister, QuantumRegister};

/// A quantum circuit.
///
/// The circuit owns its qubits, classical bits, registers and an append-only
/// instruction log. Every append validates its operands against the bits
/// already registered; nothing is ever removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Qubits in the circuit, indexed by `QubitId`.
    qubits: Vec<Qubit>,
    /// Classical bits in the circuit, indexed by `ClbitId`.
    clbits: Vec<Clbit>,
    /// Quantum registers in declaration order.
    qregs: Vec<QuantumRegister>,
    /// Classical registers in declaration order.
    cregs: Vec<ClassicalRegister>,
    /// Instructions in append order.
    instructions: Vec<Instruction>,
    /// Counter for generating qubit IDs.
    next_qubit_id: u32,
    /// Counter for generating classical bit IDs.
    next_clbit_id: u32,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            clbits: vec![],
            qregs: vec![],
            cregs: vec![],
            instructions: vec![],
            next_qubit_id: 0,
            next_clbit_id: 0,
        }
    }

    /// Create a circuit with a given number of loose qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        for _ in 0..num_qubits {
            circuit.add_qubit();
        }
        for _ in 0..num_clbits {
            circuit.add_clbit();
        }
        circuit
    }

    /// Add a single qubit outside any register.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.next_qubit_id);
        self.next_qubit_id += 1;
        self.qubits.push(Qubit::new(id));
        id
    }

    /// Add a named quantum register of `size` qubits.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> IrResult<QuantumRegister> {
        let name = name.into();
        self.check_register_name(&name)?;

        let mut ids = Vec::with_capacity(size as usize);
        for i in 0..size {
            let id = QubitId(self.next_qubit_id);
            self.next_qubit_id += 1;
            self.qubits.push(Qubit::with_register(id, &name, i));
            ids.push(id);
        }

        let reg = QuantumRegister::new(name, ids);
        self.qregs.push(reg.clone());
        Ok(reg)
    }

    /// Add a single classical bit outside any register.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = ClbitId(self.next_clbit_id);
        self.next_clbit_id += 1;
        self.clbits.push(Clbit::new(id));
        id
    }

    /// Add a named classical register of `size` bits.
    pub fn add_creg(
        &mut self,
        name: impl Into<String>,
        size: u32,
    ) -> IrResult<ClassicalRegister> {
        let name = name.into();
        self.check_register_name(&name)?;

        let mut ids = Vec::with_capacity(size as usize);
        for i in 0..size {
            let id = ClbitId(self.next_clbit_id);
            self.next_clbit_id += 1;
            self.clbits.push(Clbit::with_register(id, &name, i));
            ids.push(id);
        }

        let reg = ClassicalRegister::new(name, ids);
        self.cregs.push(reg.clone());
        Ok(reg)
    }

    fn check_register_name(&self, name: &str) -> IrResult<()> {
        let taken = self.qregs.iter().any(|r| r.name() == name)
            || self.cregs.iter().any(|r| r.name() == name);
        if taken {
            return Err(IrError::DuplicateRegister(name.to_string()));
        }
        Ok(())
    }

    /// Validate an instruction against the circuit and append it.
    fn apply(&mut self, instruction: Instruction) -> IrResult<()> {
        let gate_name = instruction.as_gate().map(|g| g.name().to_string());

        if let InstructionKind::Gate(gate) = &instruction.kind {
            let expected = gate.num_qubits();
            let got = instruction.qubits.len() as u32;
            if expected != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected,
                    got,
                });
            }
        }

        for &qubit in &instruction.qubits {
            if !self.contains_qubit(qubit) {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        for clbit in instruction.classical_wires() {
            if !self.contains_clbit(clbit) {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        self.instructions.push(instruction);
        Ok(())
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::H, qubit))?;
        Ok(self)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::X, qubit))?;
        Ok(self)
    }





    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Rx(theta), qubit))?;
        Ok(self)
    }




    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CX, control, target))?;
        Ok(self)
    }





    /// Apply any standard gate.
    pub fn gate(
        &mut self,
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(gate, qubits))?;
        Ok(self)
    }

    // =========================================================================
    // Classically conditioned gates
    // =========================================================================

    /// Apply `gate` only in shots where `clbit` holds `value`.
    ///
    /// The condition is recorded on the instruction and resolved by the
    /// backend at run time; nothing is decided here.
    pub fn gate_if(
        &mut self,
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
        clbit: ClbitId,
        value: bool,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::conditional_gate(
            gate,
            qubits,
            ClassicalCondition::new(clbit, value),
        ))?;
        Ok(self)
    }

    /// Apply X to `qubit` when `clbit` reads 1.
    pub fn x_if(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.gate_if(StandardGate::X, [qubit], clbit, true)
    }

    /// Apply Z to `qubit` when `clbit` reads 1.
    pub fn z_if(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.gate_if(StandardGate::Z, [qubit], clbit, true)
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.apply(Instruction::measure(qubit, clbit))?;
        Ok(self)
    }

    /// Measure a quantum register into a classical register, index by index.
    pub fn measure_register(
        &mut self,
        qreg: &QuantumRegister,
        creg: &ClassicalRegister,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::measure_many(qreg.iter(), creg.iter())?)?;
        Ok(self)
    }

    /// Reset a qubit to |0⟩.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::reset(qubit))?;
        Ok(self)
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.apply(Instruction::barrier(qubits))?;
        Ok(self)
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        self.apply(Instruction::barrier(qubits))?;
        Ok(self)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Get the qubits in the circuit.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Get the classical bits in the circuit.
    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }

    /// Whether `qubit` is registered on this circuit.
    pub fn contains_qubit(&self, qubit: QubitId) -> bool {
        qubit.index() < self.qubits.len()
    }

    /// Whether `clbit` is registered on this circuit.
    pub fn contains_clbit(&self, clbit: ClbitId) -> bool {
        clbit.index() < self.clbits.len()
    }

    /// Quantum registers in declaration order.
    pub fn qregs(&self) -> &[QuantumRegister] {
        &self.qregs
    }

    /// Classical registers in declaration order.
    pub fn cregs(&self) -> &[ClassicalRegister] {
        &self.cregs
    }

    /// Look up a quantum register by name.
    pub fn qreg(&self, name: &str) -> Option<&QuantumRegister> {
        self.qregs.iter().find(|r| r.name() == name)
    }

    /// Look up a classical register by name.
    pub fn creg(&self, name: &str) -> Option<&ClassicalRegister> {
        self.cregs.iter().find(|r| r.name() == name)
    }

    /// The instruction log in append order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Total number of instructions, barriers included.
    pub fn num_instructions(&self) -> usize {
        self.instructions.len()
    }

    /// Number of gate instructions, conditional or not.
    pub fn num_gates(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_gate()).count()
    }

    /// Number of measurement instructions.
    pub fn num_measurements(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_measure()).count()
    }

    /// Number of classically conditioned gates.
    pub fn num_conditional(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| i.is_conditional())
            .count()
    }

    /// Number of gates acting on two or more qubits.
    pub fn num_multi_qubit_gates(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| i.is_gate() && i.qubits.len() >= 2)
            .count()
    }

    /// Operation counts by instruction name, most frequent first.
    ///
    /// Ties are broken by name so the order is stable.
    pub fn count_ops(&self) -> Vec<(String, usize)> {
        let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
        for inst in &self.instructions {
            *counts.entry(inst.name()).or_insert(0) += 1;
        }
        let mut ops: Vec<_> = counts
            .into_iter()
            .map(|(name, n)| (name.to_string(), n))
            .collect();
        ops.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ops
    }

    /// Get the circuit depth.
    ///
    /// Each instruction sits one layer above the deepest wire it touches.
    /// Measurements occupy their classical bit as a wire and conditional gates
    /// occupy the bit they read. Barriers add no depth.
    pub fn depth(&self) -> usize {
        let mut qubit_front = vec![0usize; self.qubits.len()];
        let mut clbit_front = vec![0usize; self.clbits.len()];
        let mut max_depth = 0usize;

        for inst in &self.instructions {
            if inst.is_barrier() {
                continue;
            }

            let level = inst
                .qubits
                .iter()
                .map(|q| qubit_front[q.index()])
                .chain(inst.classical_wires().map(|c| clbit_front[c.index()]))
                .max()
                .unwrap_or(0)
                + 1;

            for q in &inst.qubits {
                qubit_front[q.index()] = level;
            }
            for c in inst.classical_wires() {
                clbit_front[c.index()] = level;
            }
            max_depth = max_depth.max(level);
        }

        max_depth
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::new("bell");
        let q = circuit.add_qreg("q", 2)?;
        let c = circuit.add_creg("c", 2)?;

        circuit
            .h(q[0])?
            .cx(q[0], q[1])?
            .measure(q[0], c[0])?
            .measure(q[1], c[1])?;

        Ok(circuit)
    }

    /// Create a GHZ state circuit.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::new(format!("ghz_{n}"));
        if n == 0 {
            return Ok(circuit);
        }
        let q = circuit.add_qreg("q", n)?;
        let c = circuit.add_creg("c", n)?;

        circuit.h(q[0])?;
        for i in 1..q.len() {
            circuit.cx(q[i - 1], q[i])?;
        }
        circuit.measure_register(&q, &c)?;

        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test");
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.num_clbits(), 0);
        assert_eq!(circuit.depth(), 0);
    }

    #[test]
    fn test_circuit_with_size() {
        let circuit = Circuit::with_size("test", 3, 2);
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_clbits(), 2);
        assert!(circuit.qregs().is_empty());
    }

    #[test]
    fn test_add_registers() {
        let mut circuit = Circuit::new("test");
        let a = circuit.add_qreg("a", 2).unwrap();
        let b = circuit.add_qreg("b", 1).unwrap();
        let c = circuit.add_creg("c", 4).unwrap();

        assert_eq!(a.as_slice(), &[QubitId(0), QubitId(1)]);
        assert_eq!(b[0], QubitId(2));
        assert_eq!(c.len(), 4);
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_clbits(), 4);
        assert_eq!(circuit.qreg("b"), Some(&b));
        assert!(circuit.creg("missing").is_none());
        assert_eq!(circuit.qubits()[2].to_string(), "b[0]");
    }

    #[test]
    fn test_duplicate_register_name() {
        let mut circuit = Circuit::new("test");
        circuit.add_qreg("node1", 1).unwrap();
        let err = circuit.add_creg("node1", 2);
        assert!(matches!(err, Err(IrError::DuplicateRegister(name)) if name == "node1"));
        assert_eq!(circuit.num_clbits(), 0);
    }

    #[test]
    fn test_bell_state() {
        let circuit = Circuit::bell().unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.depth(), 3); // H, CX, parallel measures
        assert_eq!(circuit.num_measurements(), 2);
    }

    #[test]
    fn test_ghz_state() {
        let circuit = Circuit::ghz(5).unwrap();
        assert_eq!(circuit.num_qubits(), 5);
        assert_eq!(circuit.num_clbits(), 5);
        assert_eq!(circuit.depth(), 6); // H, 4 chained CX, measures
    }

    #[test]
    fn test_rejects_unknown_operands() {
        let mut circuit = Circuit::with_size("test", 1, 1);

        let err = circuit.h(QubitId(3));
        assert!(matches!(
            err,
            Err(IrError::QubitNotFound { qubit: QubitId(3), .. })
        ));

        let err = circuit.measure(QubitId(0), ClbitId(9));
        assert!(matches!(
            err,
            Err(IrError::ClbitNotFound { clbit: ClbitId(9), .. })
        ));

        let err = circuit.x_if(QubitId(0), ClbitId(2));
        assert!(matches!(
            err,
            Err(IrError::ClbitNotFound { clbit: ClbitId(2), .. })
        ));

        assert_eq!(circuit.num_instructions(), 0);
    }

    #[test]
    fn test_rejects_duplicate_and_arity() {
        let mut circuit = Circuit::with_size("test", 2, 0);

        let err = circuit.cx(QubitId(1), QubitId(1));
        assert!(matches!(err, Err(IrError::DuplicateQubit { .. })));

        let err = circuit.gate(StandardGate::CX, [QubitId(0)]);
        assert!(matches!(
            err,
            Err(IrError::QubitCountMismatch {
                expected: 2,
                got: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_conditional_gates_counted_and_deepen() {
        let mut circuit = Circuit::with_size("test", 2, 1);
        circuit
            .h(QubitId(0))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .x_if(QubitId(1), ClbitId(0))
            .unwrap();

        assert_eq!(circuit.num_gates(), 2);
        assert_eq!(circuit.num_conditional(), 1);
        // q1 is idle until the bit it reads is written at layer 2.
        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_barrier_adds_no_depth() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.barrier_all().unwrap();
        circuit.h(QubitId(1)).unwrap();

        assert_eq!(circuit.depth(), 1);
        assert_eq!(circuit.num_instructions(), 3);
    }

    #[test]
    fn test_count_ops_order() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit
            .h(QubitId(0))
            .unwrap()
            .h(QubitId(1))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap();

        assert_eq!(
            circuit.count_ops(),
            vec![("h".to_string(), 2), ("cx".to_string(), 1)]
        );
        assert_eq!(circuit.num_multi_qubit_gates(), 1);
    }

    #[test]
    fn test_fluent_api_and_structural_equality() {
        let build = || {
            let mut circuit = Circuit::with_size("test", 2, 2);
            circuit
                .rx(PI / 4.0, QubitId(0))
                .unwrap()
                .cx(QubitId(0), QubitId(1))
                .unwrap()
                .measure(QubitId(0), ClbitId(0))
                .unwrap()
                .measure(QubitId(1), ClbitId(1))
                .unwrap();
            circuit
        };

        let a = build();
        let b = build();
        assert_eq!(a, b);
        assert_eq!(a.depth(), 3);
    }

    #[test]
    fn test_serde_roundtrip_preserves_log() {
        let circuit = Circuit::bell().unwrap();
        let json = serde_json::to_string(&circuit).unwrap();
        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, circuit);
    }
}
