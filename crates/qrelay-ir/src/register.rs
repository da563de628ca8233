//! Named quantum and classical registers.

use serde::{Deserialize, Serialize};
use std::ops::Index;

use crate::qubit::{ClbitId, QubitId};

/// A named, ordered group of bits owned by a circuit.
///
/// Registers are handed out by [`Circuit::add_qreg`](crate::Circuit::add_qreg)
/// and [`Circuit::add_creg`](crate::Circuit::add_creg). They are plain handles:
/// cloning one does not add bits to the circuit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Register<B> {
    name: String,
    bits: Vec<B>,
}

/// A register of qubits.
pub type QuantumRegister = Register<QubitId>;

/// A register of classical bits.
pub type ClassicalRegister = Register<ClbitId>;

impl<B: Copy> Register<B> {
    pub(crate) fn new(name: String, bits: Vec<B>) -> Self {
        Self { name, bits }
    }

    /// Register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of bits in the register.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether the register holds no bits.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Bit at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<B> {
        self.bits.get(index).copied()
    }

    /// Iterate over the bits, lowest index first.
    pub fn iter(&self) -> impl Iterator<Item = B> + '_ {
        self.bits.iter().copied()
    }

    /// The bits as a slice.
    pub fn as_slice(&self) -> &[B] {
        &self.bits
    }
}

impl<B> Index<usize> for Register<B> {
    type Output = B;

    fn index(&self, index: usize) -> &B {
        &self.bits[index]
    }
}

impl<'a, B> IntoIterator for &'a Register<B> {
    type Item = &'a B;
    type IntoIter = std::slice::Iter<'a, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.bits.iter()
    }
}
