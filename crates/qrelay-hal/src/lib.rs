//! qrelay execution abstraction
//!
//! This crate defines what it means to run a circuit, independently of the
//! engine that runs it:
//! - a [`Backend`] trait with synchronous validation and execution
//! - [`Capabilities`] describing a backend's limits and gate set
//! - [`ExecutionResult`] and [`Counts`] holding aggregated outcomes, with a
//!   [`ClassicalLayout`] that documents how bitstring keys are built
//!
//! # Example: Reading a Result
//!
//! ```ignore
//! use qrelay_adapter_sim::SimulatorBackend;
//! use qrelay_hal::Backend;
//! use qrelay_ir::Circuit;
//!
//! let circuit = Circuit::bell()?;
//! let backend = SimulatorBackend::new().with_seed(7);
//! let result = backend.run(&circuit, 1000)?;
//!
//! if let Some((bitstring, count)) = result.counts.most_frequent() {
//!     println!("Most frequent: {bitstring} ({count} times)");
//! }
//! let c0 = circuit.clbits()[0].id;
//! println!("P(c0 = 0) = {:.3}", result.clbit_probability(c0, false)?);
//! ```
//!
//! # Implementing a Backend
//!
//! ```ignore
//! use qrelay_hal::{Backend, Capabilities, ExecutionResult, HalResult, ValidationResult};
//! use qrelay_ir::Circuit;
//!
//! struct MyBackend {
//!     capabilities: Capabilities,
//! }
//!
//! impl Backend for MyBackend {
//!     fn name(&self) -> &str { "my_backend" }
//!
//!     fn capabilities(&self) -> &Capabilities {
//!         &self.capabilities
//!     }
//!
//!     fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
//!         Ok(ValidationResult::Valid)
//!     }
//!
//!     fn run(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
//!         # todo!()
//!     }
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod result;

pub use backend::{Backend, BackendConfig, BackendFactory, ValidationResult};
pub use capability::{Capabilities, GateSet};
pub use error::{HalError, HalResult};
pub use result::{ClassicalLayout, Counts, ExecutionResult, LayoutGroup};
