//! Qubit addressing within a simulated register

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of one binary quantum degree of freedom in a subcircuit's register
///
/// Qubit 0 is the most significant bit of a basis-state index, so in a
/// register of `n` qubits qubit `q` toggles the bit worth `2^(n - q - 1)`.
///
/// # Example
/// ```
/// use qlogic_core::QubitId;
///
/// let q0 = QubitId::new(0);
/// assert_eq!(q0.stride(3), 4);
/// assert_eq!(QubitId::new(2).stride(3), 1);
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct QubitId(usize);

impl QubitId {
    /// Create a new qubit identifier
    #[inline]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the underlying index
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }

    /// Bit position of this qubit inside a basis-state index, counted from
    /// the least significant bit
    ///
    /// # Panics
    /// Panics if the qubit is outside a register of `num_qubits`.
    #[inline]
    pub fn bit_position(&self, num_qubits: usize) -> usize {
        assert!(
            self.0 < num_qubits,
            "qubit {} outside {}-qubit register",
            self.0,
            num_qubits
        );
        num_qubits - self.0 - 1
    }

    /// Distance between basis states that differ only in this qubit
    #[inline]
    pub fn stride(&self, num_qubits: usize) -> usize {
        1 << self.bit_position(num_qubits)
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<usize> for QubitId {
    #[inline]
    fn from(id: usize) -> Self {
        Self::new(id)
    }
}

impl From<QubitId> for usize {
    #[inline]
    fn from(qid: QubitId) -> Self {
        qid.index()
    }
}
