//! The teleportation relay procedure.
//!
//! A relay moves the state of a source qubit onto a target qubit through an
//! ancilla, spending two classical slots:
//!
//! ```text
//! source  ─────────────●──H──M──────────────────
//!                      │     ║ slot 0
//! ancilla ──H──●───────X─────╫──M───────────────
//!              │             ║  ║ slot 1
//! target  ─────X─────────────╫──╫──X^(s1)──Z^(s0)──
//! ```
//!
//! Slot 0 always receives the source outcome and slot 1 the ancilla outcome.
//! The corrections read the slots by position, so this ordering cannot be
//! changed without also changing the corrections.

use tracing::debug;

use qrelay_ir::{Circuit, ClassicalRegister, ClbitId, IrError, QubitId};

use crate::error::{TeleportError, TeleportResult};

/// Instructions appended by one relay.
pub const RELAY_INSTRUCTIONS: usize = 8;

/// Register slot receiving the source measurement.
pub const SOURCE_SLOT: usize = 0;

/// Register slot receiving the ancilla measurement.
pub const ANCILLA_SLOT: usize = 1;

/// Which slot each measurement writes and each correction reads.
#[derive(Debug, Clone, Copy)]
struct Wiring {
    source_measure: ClbitId,
    ancilla_measure: ClbitId,
    x_condition: ClbitId,
    z_condition: ClbitId,
}

/// Append a teleportation relay from `source` to `target`.
///
/// `ancilla` must be in |0⟩ and `cbits` must have at least two slots; slots
/// 0 and 1 are consumed. All operands are checked before anything is
/// appended, so on error the circuit is unchanged.
///
/// # Errors
///
/// - [`TeleportError::DuplicateQubit`] if two roles share a qubit.
/// - [`TeleportError::RegisterTooSmall`] if `cbits` has fewer than two slots.
/// - [`TeleportError::Ir`] if a qubit or slot is not registered on `circuit`.
pub fn teleport(
    circuit: &mut Circuit,
    source: QubitId,
    target: QubitId,
    ancilla: QubitId,
    cbits: &ClassicalRegister,
) -> TeleportResult<()> {
    let (slot0, slot1) = check_operands(circuit, source, target, ancilla, cbits)?;

    debug!(%source, %target, %ancilla, register = cbits.name(), "Appending relay");
    append_relay(
        circuit,
        source,
        target,
        ancilla,
        Wiring {
            source_measure: slot0,
            ancilla_measure: slot1,
            x_condition: slot1,
            z_condition: slot0,
        },
    )
}

/// A deliberately miswired relay: measurements land in swapped slots while
/// the corrections stay positional.
///
/// The target does not receive the source state. Kept as a fixture showing
/// that slot order matters.
pub fn teleport_swapped_slots(
    circuit: &mut Circuit,
    source: QubitId,
    target: QubitId,
    ancilla: QubitId,
    cbits: &ClassicalRegister,
) -> TeleportResult<()> {
    let (slot0, slot1) = check_operands(circuit, source, target, ancilla, cbits)?;

    debug!(%source, %target, %ancilla, register = cbits.name(), "Appending swapped-slot relay");
    append_relay(
        circuit,
        source,
        target,
        ancilla,
        Wiring {
            source_measure: slot1,
            ancilla_measure: slot0,
            x_condition: slot1,
            z_condition: slot0,
        },
    )
}

fn append_relay(
    circuit: &mut Circuit,
    source: QubitId,
    target: QubitId,
    ancilla: QubitId,
    wiring: Wiring,
) -> TeleportResult<()> {
    circuit
        // Bell pair between ancilla and target
        .h(ancilla)?
        .cx(ancilla, target)?
        // Bell-basis rotation of source and ancilla
        .cx(source, ancilla)?
        .h(source)?
        .measure(source, wiring.source_measure)?
        .measure(ancilla, wiring.ancilla_measure)?
        // Corrections
        .x_if(target, wiring.x_condition)?
        .z_if(target, wiring.z_condition)?;
    Ok(())
}

fn check_operands(
    circuit: &Circuit,
    source: QubitId,
    target: QubitId,
    ancilla: QubitId,
    cbits: &ClassicalRegister,
) -> TeleportResult<(ClbitId, ClbitId)> {
    require_distinct(&[("source", source), ("target", target), ("ancilla", ancilla)])?;
    for qubit in [source, target, ancilla] {
        require_qubit(circuit, qubit)?;
    }
    check_slots(circuit, cbits)
}

fn require_distinct(roles: &[(&'static str, QubitId)]) -> TeleportResult<()> {
    for (i, &(first, a)) in roles.iter().enumerate() {
        for &(second, b) in &roles[i + 1..] {
            if a == b {
                return Err(TeleportError::DuplicateQubit {
                    first,
                    second,
                    qubit: a,
                });
            }
        }
    }
    Ok(())
}

fn require_qubit(circuit: &Circuit, qubit: QubitId) -> TeleportResult<()> {
    if circuit.contains_qubit(qubit) {
        Ok(())
    } else {
        Err(IrError::QubitNotFound {
            qubit,
            gate_name: Some("teleport".into()),
        }
        .into())
    }
}

fn check_slots(circuit: &Circuit, cbits: &ClassicalRegister) -> TeleportResult<(ClbitId, ClbitId)> {
    let (Some(slot0), Some(slot1)) = (cbits.get(SOURCE_SLOT), cbits.get(ANCILLA_SLOT)) else {
        return Err(TeleportError::RegisterTooSmall {
            name: cbits.name().to_string(),
            len: cbits.len(),
        });
    };
    for clbit in [slot0, slot1] {
        if !circuit.contains_clbit(clbit) {
            return Err(IrError::ClbitNotFound {
                clbit,
                gate_name: Some("teleport".into()),
            }
            .into());
        }
    }
    Ok((slot0, slot1))
}

fn require_free_name(circuit: &Circuit, name: &str) -> TeleportResult<()> {
    if circuit.qreg(name).is_some() || circuit.creg(name).is_some() {
        return Err(IrError::DuplicateRegister(name.to_string()).into());
    }
    Ok(())
}

/// Qubit and register a relay ran through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayHandles {
    /// The ancilla used.
    pub ancilla: QubitId,
    /// The classical register whose slots 0 and 1 were consumed.
    pub cbits: ClassicalRegister,
}

/// Replace `cx(control, target)` with a relay from `control` to `target`.
///
/// Missing resources are created on the fly: a one-qubit register
/// `ancilla_{node}` when `ancilla` is `None`, and a two-slot register
/// `c_{node}` when `cbits` is `None`. Every check runs before the first
/// register is added, so on error the circuit is unchanged.
pub fn replace_cnot_with_teleportation(
    circuit: &mut Circuit,
    control: QubitId,
    target: QubitId,
    node: &str,
    ancilla: Option<QubitId>,
    cbits: Option<ClassicalRegister>,
) -> TeleportResult<RelayHandles> {
    let mut roles = vec![("source", control), ("target", target)];
    if let Some(qubit) = ancilla {
        roles.push(("ancilla", qubit));
    }
    require_distinct(&roles)?;
    for &(_, qubit) in &roles {
        require_qubit(circuit, qubit)?;
    }
    if let Some(reg) = &cbits {
        check_slots(circuit, reg)?;
    }

    let ancilla_name = format!("ancilla_{node}");
    let cbits_name = format!("c_{node}");
    if ancilla.is_none() {
        require_free_name(circuit, &ancilla_name)?;
    }
    if cbits.is_none() {
        require_free_name(circuit, &cbits_name)?;
    }

    let ancilla = match ancilla {
        Some(qubit) => qubit,
        None => circuit.add_qreg(ancilla_name, 1)?[0],
    };
    let cbits = match cbits {
        Some(reg) => reg,
        None => circuit.add_creg(cbits_name, 2)?,
    };

    teleport(circuit, control, target, ancilla, &cbits)?;
    Ok(RelayHandles { ancilla, cbits })
}
