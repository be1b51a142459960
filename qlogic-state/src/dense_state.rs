//! Dense statevector over a register of up to [`MAX_QUBITS`] qubits
//!
//! Qubit 0 is the most significant bit of a basis-state index, matching the
//! operator layout of `qlogic_gates::matrix_ops`. The bit of qubit `q` in an
//! `n`-qubit register therefore repeats with stride `2^(n - q - 1)`.

use crate::error::{Result, StateError};
use num_complex::Complex64;
use qlogic_core::QubitId;
use std::fmt;

/// Largest register [`DenseState::new`] will allocate
pub const MAX_QUBITS: usize = 24;

/// Exact bit pattern of a statevector, used as a cache key
///
/// Two states share a fingerprint only if every amplitude is bit-identical
/// (negative zero is folded into zero).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateFingerprint(Vec<u64>);

impl StateFingerprint {
    /// Number of 64-bit words in the fingerprint
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Dense amplitude vector of length `2^num_qubits`
///
/// # Example
///
/// ```
/// use qlogic_core::QubitId;
/// use qlogic_state::DenseState;
///
/// let state = DenseState::new(2).unwrap();
/// assert_eq!(state.dimension(), 4);
/// assert_eq!(state.zero_probability(QubitId::new(1)).unwrap(), 1.0);
/// ```
#[derive(Clone, PartialEq)]
pub struct DenseState {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
}

impl DenseState {
    /// Create a new state initialised to |0...0⟩
    ///
    /// # Errors
    /// Returns [`StateError::TooManyQubits`] above [`MAX_QUBITS`].
    pub fn new(num_qubits: usize) -> Result<Self> {
        if num_qubits > MAX_QUBITS {
            return Err(StateError::TooManyQubits {
                num_qubits,
                max: MAX_QUBITS,
            });
        }
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            num_qubits,
            amplitudes,
        })
    }

    /// Create a state from amplitude data
    ///
    /// The amplitudes are taken as given; call [`DenseState::normalize`] if
    /// they are not already unit-norm.
    ///
    /// # Errors
    /// Returns error if `amplitudes.len() != 2^num_qubits`
    pub fn from_amplitudes(num_qubits: usize, amplitudes: &[Complex64]) -> Result<Self> {
        if num_qubits > MAX_QUBITS {
            return Err(StateError::TooManyQubits {
                num_qubits,
                max: MAX_QUBITS,
            });
        }
        let expected = 1 << num_qubits;
        if amplitudes.len() != expected {
            return Err(StateError::DimensionMismatch {
                expected,
                actual: amplitudes.len(),
            });
        }
        Ok(Self {
            num_qubits,
            amplitudes: amplitudes.to_vec(),
        })
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get the state dimension (2^num_qubits)
    #[inline]
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Compute the L2 norm of the state
    pub fn norm(&self) -> f64 {
        self.amplitudes
            .iter()
            .map(|a| a.norm_sqr())
            .sum::<f64>()
            .sqrt()
    }

    /// Check if |norm - 1| < epsilon
    pub fn is_normalized(&self, epsilon: f64) -> bool {
        (self.norm() - 1.0).abs() < epsilon
    }

    /// Rescale to unit norm
    ///
    /// # Errors
    /// Returns [`StateError::ZeroNorm`] for the zero vector.
    pub fn normalize(&mut self) -> Result<()> {
        let norm = self.norm();
        if norm < f64::EPSILON {
            return Err(StateError::ZeroNorm);
        }
        self.scale(1.0 / norm);
        Ok(())
    }

    /// Reset the state to |0...0⟩
    pub fn reset(&mut self) {
        self.amplitudes.fill(Complex64::new(0.0, 0.0));
        self.amplitudes[0] = Complex64::new(1.0, 0.0);
    }

    /// Replace the amplitudes wholesale, e.g. with a cached result
    ///
    /// # Errors
    /// Returns error if the length differs from the current dimension
    pub fn replace_amplitudes(&mut self, amplitudes: Vec<Complex64>) -> Result<()> {
        if amplitudes.len() != self.dimension() {
            return Err(StateError::DimensionMismatch {
                expected: self.dimension(),
                actual: amplitudes.len(),
            });
        }
        self.amplitudes = amplitudes;
        Ok(())
    }

    /// Multiply the state by a full-register operator
    ///
    /// # Arguments
    /// * `operator` - `2^n × 2^n` matrix in row-major order
    ///
    /// # Errors
    /// Returns error if the operator size doesn't match the state
    pub fn apply_operator(&mut self, operator: &[Complex64]) -> Result<()> {
        let dim = self.dimension();
        if operator.len() != dim * dim {
            return Err(StateError::DimensionMismatch {
                expected: dim * dim,
                actual: operator.len(),
            });
        }

        let next: Vec<Complex64> = operator
            .chunks_exact(dim)
            .map(|row| row.iter().zip(&self.amplitudes).map(|(m, a)| m * a).sum())
            .collect();
        self.amplitudes = next;
        Ok(())
    }

    /// Probability of observing 0 on `qubit`
    ///
    /// Sums `|amplitude|²` over the blocks of length `stride` in which the
    /// qubit's bit is clear, where `stride = 2^(n - qubit - 1)`.
    ///
    /// # Errors
    /// Returns error if the qubit is outside the register
    pub fn zero_probability(&self, qubit: QubitId) -> Result<f64> {
        let stride = self.stride(qubit)?;
        let probability = self
            .amplitudes
            .chunks(stride)
            .step_by(2)
            .flatten()
            .map(|a| a.norm_sqr())
            .sum::<f64>();
        Ok(probability)
    }

    /// Probability of observing 1 on `qubit`
    pub fn one_probability(&self, qubit: QubitId) -> Result<f64> {
        Ok(1.0 - self.zero_probability(qubit)?)
    }

    /// Probability of observing `outcome` on `qubit`
    pub fn outcome_probability(&self, qubit: QubitId, outcome: bool) -> Result<f64> {
        let zero = self.zero_probability(qubit)?;
        Ok(if outcome { 1.0 - zero } else { zero })
    }

    /// Zero every amplitude inconsistent with `outcome` and multiply the rest
    /// by `scale`
    pub fn project(&mut self, qubit: QubitId, outcome: bool, scale: f64) -> Result<()> {
        let stride = self.stride(qubit)?;
        for (block, chunk) in self.amplitudes.chunks_mut(stride).enumerate() {
            let bit_set = block % 2 == 1;
            if bit_set == outcome {
                chunk.iter_mut().for_each(|a| *a *= scale);
            } else {
                chunk.fill(Complex64::new(0.0, 0.0));
            }
        }
        Ok(())
    }

    /// Force `qubit` to `outcome` and renormalise
    ///
    /// Returns the probability the outcome had before the collapse.
    ///
    /// # Errors
    /// Returns [`StateError::ImpossibleOutcome`] when that probability is
    /// below `tolerance`.
    pub fn collapse(&mut self, qubit: QubitId, outcome: bool, tolerance: f64) -> Result<f64> {
        let probability = self.outcome_probability(qubit, outcome)?;
        if probability <= tolerance {
            return Err(StateError::ImpossibleOutcome {
                qubit: qubit.index(),
                outcome: outcome as u8,
                probability,
            });
        }
        self.project(qubit, outcome, 1.0 / probability.sqrt())?;
        Ok(probability)
    }

    /// Probabilities of every computational basis state
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Bit-exact key for the current amplitudes
    pub fn fingerprint(&self) -> StateFingerprint {
        StateFingerprint(
            self.amplitudes
                .iter()
                .flat_map(|a| [(a.re + 0.0).to_bits(), (a.im + 0.0).to_bits()])
                .collect(),
        )
    }

    fn scale(&mut self, factor: f64) {
        self.amplitudes.iter_mut().for_each(|a| *a *= factor);
    }

    fn stride(&self, qubit: QubitId) -> Result<usize> {
        if qubit.index() >= self.num_qubits {
            return Err(StateError::InvalidQubitIndex {
                index: qubit.index(),
                num_qubits: self.num_qubits,
            });
        }
        Ok(qubit.stride(self.num_qubits))
    }
}

impl fmt::Debug for DenseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenseState")
            .field("num_qubits", &self.num_qubits)
            .field("dimension", &self.dimension())
            .field("norm", &self.norm())
            .finish()
    }
}
