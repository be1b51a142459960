//! Gate matrices in their local (unexpanded) form
//!
//! Single-qubit matrices are 2×2, controlled forms are built on demand.
//! Matrices marked "parity" reproduce the editor's real-valued placeholders
//! for gates whose true form needs complex phases.

use num_complex::Complex64;
use std::f64::consts::FRAC_PI_4;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);
const NEG_I: Complex64 = Complex64::new(0.0, -1.0);
const NEG_ONE: Complex64 = Complex64::new(-1.0, 0.0);

const INV_SQRT2: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// A 2×2 matrix in row-major nested form
pub type Matrix2 = [[Complex64; 2]; 2];

/// Identity
pub const IDENTITY: Matrix2 = [[ONE, ZERO], [ZERO, ONE]];

/// Hadamard gate matrix
/// H = 1/√2 * [[1,  1],
///             [1, -1]]
pub const HADAMARD: Matrix2 = [
    [
        Complex64::new(INV_SQRT2, 0.0),
        Complex64::new(INV_SQRT2, 0.0),
    ],
    [
        Complex64::new(INV_SQRT2, 0.0),
        Complex64::new(-INV_SQRT2, 0.0),
    ],
];

/// Pauli-X gate matrix (NOT gate)
pub const PAULI_X: Matrix2 = [[ZERO, ONE], [ONE, ZERO]];

/// Pauli-Y gate matrix
/// Y = [[0, -i],
///      [i,  0]]
pub const PAULI_Y: Matrix2 = [[ZERO, NEG_I], [I, ZERO]];

/// Parity form of Pauli-Y with the `i` factors dropped
/// Y' = [[0, -1],
///       [1,  0]]
pub const PAULI_Y_PARITY: Matrix2 = [[ZERO, NEG_ONE], [ONE, ZERO]];

/// Pauli-Z gate matrix
pub const PAULI_Z: Matrix2 = [[ONE, ZERO], [ZERO, NEG_ONE]];

/// S gate matrix (phase gate, √Z)
/// S = [[1, 0],
///      [0, i]]
pub const S_GATE: Matrix2 = [[ONE, ZERO], [ZERO, I]];

/// T gate matrix (π/8 gate, √S)
/// T = [[1, 0],
///      [0, e^(iπ/4)]]
pub const T_GATE: Matrix2 = [
    [ONE, ZERO],
    [ZERO, Complex64::new(INV_SQRT2, INV_SQRT2)],
];

/// Phase rotation R(θ) = diag(1, e^{iθ})
pub fn phase(theta: f64) -> Matrix2 {
    [[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, theta)]]
}

/// Real rotation taking |0⟩ to `alpha|0⟩ + beta|1⟩`
///
/// The pair is normalised first; a zero pair yields the identity.
pub fn preparation(alpha: f64, beta: f64) -> Matrix2 {
    let norm = (alpha * alpha + beta * beta).sqrt();
    if norm < f64::EPSILON {
        return IDENTITY;
    }
    let (a, b) = (alpha / norm, beta / norm);
    [
        [Complex64::new(a, 0.0), Complex64::new(-b, 0.0)],
        [Complex64::new(b, 0.0), Complex64::new(a, 0.0)],
    ]
}

/// Flatten a 2×2 matrix into row-major order
pub fn flatten(matrix: &Matrix2) -> Vec<Complex64> {
    matrix.iter().flatten().copied().collect()
}

/// Controlled form of a single-qubit gate, control on the first (most
/// significant) qubit
///
/// CU = [[I, 0],
///       [0, U]]
pub fn controlled(u: &Matrix2) -> Vec<Complex64> {
    multi_controlled(u, 1)
}

/// `controls`-fold controlled form of a single-qubit gate; the target is
/// the last (least significant) qubit
pub fn multi_controlled(u: &Matrix2, controls: usize) -> Vec<Complex64> {
    let dim = 1usize << (controls + 1);
    let mut result = vec![ZERO; dim * dim];
    for i in 0..dim - 2 {
        result[i * dim + i] = ONE;
    }
    let base = dim - 2;
    for r in 0..2 {
        for c in 0..2 {
            result[(base + r) * dim + base + c] = u[r][c];
        }
    }
    result
}

/// SWAP gate matrix
/// SWAP = [[1, 0, 0, 0],
///         [0, 0, 1, 0],
///         [0, 1, 0, 0],
///         [0, 0, 0, 1]]
pub const SWAP: [[Complex64; 4]; 4] = [
    [ONE, ZERO, ZERO, ZERO],
    [ZERO, ZERO, ONE, ZERO],
    [ZERO, ONE, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ONE],
];

/// Angle of the T gate's phase
pub const T_ANGLE: f64 = FRAC_PI_4;
