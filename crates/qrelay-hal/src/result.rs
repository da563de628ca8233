//! Execution results and the counts-key format.
//!
//! # Key format
//!
//! A counts key holds one character per classical bit, `'0'` or `'1'`.
//! Bits are grouped the way the circuit declared them:
//!
//! - each classical register is one group, and a bit declared outside any
//!   register is a group of its own;
//! - groups are separated by a single space, the **last-declared group
//!   leftmost**;
//! - inside a group the **highest index is leftmost**.
//!
//! Registers `a` (2 bits) then `b` (3 bits) therefore render as
//! `"b2b1b0 a1a0"`. Use [`ClassicalLayout::position`] or the typed helpers
//! on [`ExecutionResult`] instead of slicing keys by hand.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use qrelay_ir::{Circuit, ClbitId};

use crate::error::{HalError, HalResult};

/// Measurement outcome frequencies keyed by bitstring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: FxHashMap<String, u64>,
}

impl Counts {
    /// Create an empty counts table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(bitstring, count)` pairs, summing repeats.
    pub fn from_pairs<K: Into<String>>(pairs: impl IntoIterator<Item = (K, u64)>) -> Self {
        let mut counts = Self::new();
        for (key, n) in pairs {
            counts.insert(key, n);
        }
        counts
    }

    /// Add `n` observations of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, n: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += n;
    }

    /// Frequency of `bitstring`, zero if never observed.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Iterate over `(bitstring, count)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.counts.iter()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no outcome was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Outcomes sorted by descending count, ties broken by bitstring.
    pub fn sorted(&self) -> Vec<(&String, &u64)> {
        let mut entries: Vec<_> = self.counts.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Sum of all frequencies.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// The most frequent outcome.
    pub fn most_frequent(&self) -> Option<(&String, &u64)> {
        self.sorted().into_iter().next()
    }

    /// Relative frequency of `bitstring`.
    pub fn probability(&self, bitstring: &str) -> f64 {
        let total = self.total_shots();
        if total == 0 {
            return 0.0;
        }
        self.get(bitstring) as f64 / total as f64
    }
}

/// One space-separated group of a counts key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutGroup {
    /// Register name, `None` for a bit declared outside any register.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub register: Option<String>,
    /// Bits of the group, lowest index first.
    pub clbits: Vec<ClbitId>,
}

/// How classical bits map onto counts-key characters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicalLayout {
    /// Groups in declaration order.
    groups: Vec<LayoutGroup>,
}

impl ClassicalLayout {
    /// Derive the layout from a circuit's classical bits.
    pub fn from_circuit(circuit: &Circuit) -> Self {
        let mut groups: Vec<LayoutGroup> = Vec::new();
        for clbit in circuit.clbits() {
            match (&clbit.register, groups.last_mut()) {
                (Some(name), Some(last)) if last.register.as_ref() == Some(name) => {
                    last.clbits.push(clbit.id);
                }
                (register, _) => groups.push(LayoutGroup {
                    register: register.clone(),
                    clbits: vec![clbit.id],
                }),
            }
        }
        Self { groups }
    }

    /// Groups in declaration order.
    pub fn groups(&self) -> &[LayoutGroup] {
        &self.groups
    }

    /// Total number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.groups.iter().map(|g| g.clbits.len()).sum()
    }

    /// The group for a named register.
    pub fn register(&self, name: &str) -> Option<&LayoutGroup> {
        self.groups
            .iter()
            .find(|g| g.register.as_deref() == Some(name))
    }

    /// Render a key from per-bit values indexed by `ClbitId`.
    ///
    /// Bits missing from `values` render as `'0'`.
    pub fn format(&self, values: &[bool]) -> String {
        let mut key = String::with_capacity(self.num_clbits() + self.groups.len());
        for (i, group) in self.groups.iter().rev().enumerate() {
            if i > 0 {
                key.push(' ');
            }
            for clbit in group.clbits.iter().rev() {
                let set = values.get(clbit.index()).copied().unwrap_or(false);
                key.push(if set { '1' } else { '0' });
            }
        }
        key
    }

    /// Byte offset of `clbit` inside a formatted key.
    pub fn position(&self, clbit: ClbitId) -> Option<usize> {
        let mut offset = 0;
        for group in self.groups.iter().rev() {
            if let Some(i) = group.clbits.iter().position(|&c| c == clbit) {
                return Some(offset + group.clbits.len() - 1 - i);
            }
            offset += group.clbits.len() + 1;
        }
        None
    }

    /// Read `clbit` out of a formatted key.
    pub fn bit(&self, key: &str, clbit: ClbitId) -> Option<bool> {
        let pos = self.position(clbit)?;
        match key.as_bytes().get(pos) {
            Some(b'1') => Some(true),
            Some(b'0') => Some(false),
            _ => None,
        }
    }
}

/// Result of executing a circuit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Outcome frequencies.
    pub counts: Counts,
    /// Number of shots requested.
    pub shots: u32,
    /// Key layout of `counts`.
    pub layout: ClassicalLayout,
    /// Wall-clock execution time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
    /// Backend-specific metadata.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl ExecutionResult {
    /// Create a new execution result.
    pub fn new(counts: Counts, shots: u32, layout: ClassicalLayout) -> Self {
        Self {
            counts,
            shots,
            layout,
            execution_time_ms: None,
            metadata: serde_json::Map::new(),
        }
    }

    /// Set the execution time.
    #[must_use]
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }

    /// Attach a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Fraction of shots in which `clbit` read `value`.
    pub fn clbit_probability(&self, clbit: ClbitId, value: bool) -> HalResult<f64> {
        if self.layout.position(clbit).is_none() {
            return Err(HalError::UnknownClbit(clbit));
        }

        let total = self.counts.total_shots();
        if total == 0 {
            return Ok(0.0);
        }
        let hits: u64 = self
            .counts
            .iter()
            .filter(|(key, _)| self.layout.bit(key, clbit) == Some(value))
            .map(|(_, n)| *n)
            .sum();
        Ok(hits as f64 / total as f64)
    }

    /// Counts over a subset of bits.
    ///
    /// The new keys hold one character per requested bit with `clbits[0]`
    /// rightmost and no separators.
    pub fn marginal_counts(&self, clbits: &[ClbitId]) -> HalResult<Counts> {
        let positions = clbits
            .iter()
            .map(|&c| self.layout.position(c).ok_or(HalError::UnknownClbit(c)))
            .collect::<HalResult<Vec<_>>>()?;

        let mut out = Counts::new();
        for (key, n) in self.counts.iter() {
            let bytes = key.as_bytes();
            let marginal: String = positions
                .iter()
                .rev()
                .map(|&p| bytes.get(p).map_or('0', |&b| b as char))
                .collect();
            out.insert(marginal, *n);
        }
        Ok(out)
    }

    /// Counts for a single named register, rendered like that register's group.
    pub fn register_counts(&self, name: &str) -> HalResult<Counts> {
        let group = self
            .layout
            .register(name)
            .ok_or_else(|| HalError::UnknownRegister(name.to_string()))?;
        self.marginal_counts(&group.clbits)
    }

    /// Serialize the result as pretty-printed JSON.
    pub fn to_json(&self) -> HalResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
