//! Dense statevector for qlogic circuits
//!
//! [`DenseState`] holds the `2^Q` amplitudes of one subcircuit's register and
//! provides what the simulation engine needs between layers: operator
//! application, strided single-qubit outcome probabilities, projection onto
//! a forced outcome, and a bit-exact [`StateFingerprint`] for result caching.
//!
//! # Example
//!
//! ```
//! use qlogic_core::QubitId;
//! use qlogic_state::DenseState;
//! use num_complex::Complex64;
//!
//! let h = std::f64::consts::FRAC_1_SQRT_2;
//! let mut state = DenseState::from_amplitudes(
//!     1,
//!     &[Complex64::new(h, 0.0), Complex64::new(h, 0.0)],
//! )
//! .unwrap();
//! let p = state.collapse(QubitId::new(0), true, 1e-12).unwrap();
//! assert!((p - 0.5).abs() < 1e-12);
//! assert!(state.is_normalized(1e-12));
//! ```

pub mod dense_state;
pub mod error;

pub use dense_state::{DenseState, StateFingerprint, MAX_QUBITS};
pub use error::{Result, StateError};
