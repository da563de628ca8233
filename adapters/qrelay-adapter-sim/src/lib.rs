//! qrelay Local Statevector Simulator
//!
//! This crate provides a local quantum simulator for testing and
//! small-scale experiments. It keeps the full statevector and samples
//! measurements shot by shot, which makes it exact in distribution but
//! limited to ~20-25 qubits.
//!
//! # Features
//!
//! - **Mid-circuit Measurement**: measurements collapse the state and the
//!   circuit keeps running
//! - **Dynamic Circuits**: classically conditioned gates are evaluated per
//!   shot against that shot's measurement record
//! - **Reset**: measure-and-flip reset to |0⟩
//! - **Reproducible Runs**: optional fixed RNG seed
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//! | 25 | ~512 MB | Slow |
//!
//! Every shot re-simulates the whole circuit, so cost is linear in shots.
//!
//! # Example
//!
//! ```
//! use qrelay_adapter_sim::SimulatorBackend;
//! use qrelay_hal::Backend;
//! use qrelay_ir::Circuit;
//!
//! let backend = SimulatorBackend::new().with_seed(7);
//! assert_eq!(backend.capabilities().num_qubits, 20);
//!
//! let circuit = Circuit::bell().unwrap();
//! let result = backend.run(&circuit, 1000).unwrap();
//!
//! // Expect ~50% "00" and ~50% "11"
//! assert_eq!(result.counts.get("00") + result.counts.get("11"), 1000);
//! ```

mod simulator;
mod statevector;

pub use simulator::{DEFAULT_MAX_QUBITS, DEFAULT_MAX_SHOTS, SimulatorBackend};
