//! Simulator backend implementation.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use std::time::Instant;
use tracing::{debug, info, instrument};

use qrelay_hal::{
    Backend, BackendConfig, BackendFactory, Capabilities, ClassicalLayout, Counts,
    ExecutionResult, HalError, HalResult, ValidationResult,
};
use qrelay_ir::{Circuit, InstructionKind};

use crate::statevector::Statevector;

/// Default qubit ceiling. A 20-qubit statevector is 16 MiB.
pub const DEFAULT_MAX_QUBITS: u32 = 20;

/// Default shot ceiling.
pub const DEFAULT_MAX_SHOTS: u32 = 100_000;

/// Local simulator backend.
///
/// Every shot starts from a fresh |0...0⟩ statevector and an all-zero
/// classical state, then walks the instruction log in order. Measurements
/// collapse the state and write their classical bit, so conditional gates
/// later in the same shot see that outcome.
pub struct SimulatorBackend {
    /// Backend configuration.
    config: BackendConfig,
    /// Cached capabilities.
    capabilities: Capabilities,
    /// Maximum number of qubits supported.
    max_qubits: u32,
    /// RNG seed; `None` draws fresh entropy per run.
    seed: Option<u64>,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::with_max_qubits(DEFAULT_MAX_QUBITS)
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self {
            config: BackendConfig::new("simulator"),
            capabilities: Capabilities::simulator(max_qubits).with_max_shots(DEFAULT_MAX_SHOTS),
            max_qubits,
            seed: None,
        }
    }

    /// Fix the RNG seed so that runs are reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The configured RNG seed, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn check_shots(&self, shots: u32) -> HalResult<()> {
        let max_shots = self.capabilities.max_shots;
        if shots == 0 || shots > max_shots {
            return Err(HalError::InvalidShots(format!(
                "requested {shots} shots, simulator accepts 1..={max_shots}"
            )));
        }
        Ok(())
    }

    /// Run simulation synchronously.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    fn run_simulation(&self, circuit: &Circuit, shots: u32) -> ExecutionResult {
        let start = Instant::now();

        debug!(
            "Starting simulation: {} qubits, {} clbits, {} shots",
            circuit.num_qubits(),
            circuit.num_clbits(),
            shots
        );
        debug!("Circuit has {} instructions", circuit.num_instructions());

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        // Aggregate raw classical states, format each distinct one once.
        let mut outcomes: FxHashMap<Vec<bool>, u64> = FxHashMap::default();
        for shot in 0..shots {
            let bits = run_shot(circuit, &mut rng);
            *outcomes.entry(bits).or_insert(0) += 1;

            if shot > 0 && shot % 1000 == 0 {
                debug!("Completed {} shots", shot);
            }
        }

        let layout = ClassicalLayout::from_circuit(circuit);
        let mut counts = Counts::new();
        for (bits, n) in &outcomes {
            counts.insert(layout.format(bits), *n);
        }

        let elapsed = start.elapsed();
        debug!(
            "Simulation completed in {:?}, {} distinct outcomes",
            elapsed,
            counts.len()
        );

        let mut result = ExecutionResult::new(counts, shots, layout)
            .with_execution_time(elapsed.as_millis() as u64)
            .with_metadata("backend", serde_json::json!(self.name()));
        if let Some(seed) = self.seed {
            result = result.with_metadata("seed", serde_json::json!(seed));
        }
        result
    }
}

/// Execute one shot and return the final classical state, indexed by `ClbitId`.
fn run_shot<R: Rng + ?Sized>(circuit: &Circuit, rng: &mut R) -> Vec<bool> {
    let mut sv = Statevector::new(circuit.num_qubits());
    let mut bits = vec![false; circuit.num_clbits()];

    for inst in circuit.instructions() {
        match &inst.kind {
            InstructionKind::Gate(gate) => {
                if let Some(cond) = &gate.condition {
                    if !cond.is_satisfied_by(bits[cond.clbit.index()]) {
                        continue;
                    }
                }
                let qubits: Vec<usize> = inst.qubits.iter().map(|q| q.index()).collect();
                sv.apply_gate(&gate.kind, &qubits);
            }
            InstructionKind::Measure => {
                for (qubit, clbit) in inst.qubits.iter().zip(&inst.clbits) {
                    bits[clbit.index()] = sv.measure(qubit.index(), rng);
                }
            }
            InstructionKind::Reset => {
                for qubit in &inst.qubits {
                    sv.reset(qubit.index(), rng);
                }
            }
            InstructionKind::Barrier => {}
        }
    }

    bits
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        let mut reasons = Vec::new();

        if circuit.num_qubits() > self.max_qubits as usize {
            reasons.push(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                self.max_qubits
            ));
        }
        if circuit.num_measurements() == 0 {
            reasons.push("circuit records no measurement".to_string());
        }
        for inst in circuit.instructions() {
            if let Some(gate) = inst.as_gate() {
                if !self.capabilities.gate_set.contains(gate.name()) {
                    reasons.push(format!("unsupported gate '{}'", gate.name()));
                }
            }
        }

        if reasons.is_empty() {
            Ok(ValidationResult::Valid)
        } else {
            Ok(ValidationResult::Invalid { reasons })
        }
    }

    #[instrument(skip(self, circuit))]
    fn run(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        self.check_shots(shots)?;

        if circuit.num_qubits() > self.max_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                self.max_qubits
            )));
        }
        self.validate(circuit)?.into_result()?;

        Ok(self.run_simulation(circuit, shots))
    }
}

impl BackendFactory for SimulatorBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let to_u32 = |key: &str, value: u64| {
            u32::try_from(value)
                .map_err(|_| HalError::Configuration(format!("'{key}' is out of range: {value}")))
        };

        let max_qubits = match config.extra_u64("max_qubits")? {
            Some(v) => to_u32("max_qubits", v)?,
            None => DEFAULT_MAX_QUBITS,
        };
        let max_shots = match config.extra_u64("max_shots")? {
            Some(v) => to_u32("max_shots", v)?,
            None => DEFAULT_MAX_SHOTS,
        };
        if max_qubits == 0 || max_shots == 0 {
            return Err(HalError::Configuration(
                "max_qubits and max_shots must be positive".into(),
            ));
        }
        let seed = config.extra_u64("seed")?;

        info!(
            name = %config.name,
            max_qubits,
            max_shots,
            seed = ?seed,
            "Configured simulator backend"
        );

        let mut capabilities = Capabilities::simulator(max_qubits).with_max_shots(max_shots);
        capabilities.name.clone_from(&config.name);

        Ok(Self {
            config,
            capabilities,
            max_qubits,
            seed,
        })
    }
}
