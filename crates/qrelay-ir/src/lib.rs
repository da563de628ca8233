//! qrelay Circuit Intermediate Representation
//!
//! This crate provides the data structures for describing small quantum
//! circuits in qrelay: qubit and classical-bit handles, named registers, a
//! fixed gate set, and an append-only [`Circuit`] builder.
//!
//! # Overview
//!
//! A [`Circuit`] owns every bit it references and an ordered instruction log.
//! Callers thread `&mut Circuit` through whatever builds on it; each append
//! validates its operands and returns `IrResult<&mut Circuit>` so calls chain.
//!
//! Gates may carry a [`ClassicalCondition`]. Such a gate fires only in shots
//! where the named classical bit holds the expected value, which is decided by
//! the backend at run time rather than here.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`]
//! - **Registers**: [`QuantumRegister`], [`ClassicalRegister`]
//! - **Gates**: [`StandardGate`], wrapped in [`Gate`] with optional condition
//! - **Instructions**: [`Instruction`] combining gates with their operands
//! - **Circuit**: [`Circuit`] builder with structural metrics
//!
//! # Example: Classically Corrected Bell Pair
//!
//! ```rust
//! use qrelay_ir::Circuit;
//!
//! let mut circuit = Circuit::new("corrected");
//! let q = circuit.add_qreg("q", 2).unwrap();
//! let c = circuit.add_creg("c", 1).unwrap();
//!
//! circuit
//!     .h(q[0]).unwrap()
//!     .cx(q[0], q[1]).unwrap()
//!     .measure(q[0], c[0]).unwrap()
//!     .x_if(q[1], c[0]).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.num_conditional(), 1);
//! assert_eq!(circuit.depth(), 4);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg`, `T`, `Tdg`, `SX` | 1 | Clifford+T gates |
//! | `Rx`, `Ry`, `Rz`, `P` | 1 | Rotation and phase gates |
//! | `CX` | 2 | Controlled-NOT (CNOT) |
//! | `CY`, `CZ`, `CH`, `CP` | 2 | Controlled gates |
//! | `Swap` | 2 | SWAP gate |
//! | `CCX` | 3 | Toffoli (CCNOT) gate |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;
pub mod register;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{ClassicalCondition, Gate, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{Clbit, ClbitId, Qubit, QubitId};
pub use register::{ClassicalRegister, QuantumRegister, Register};
