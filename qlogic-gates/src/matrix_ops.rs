//! Matrix operations for expanding and composing component operators
//!
//! All matrices are square, stored row-major as flattened vectors. Qubit 0
//! is the most significant bit of a basis-state index, so
//! `tensor_pad(q, n - q - 1, m)` places a single-qubit `m` on qubit `q` of
//! an `n`-qubit register.
//!
//! # Example
//!
//! ```rust
//! use qlogic_core::QubitId;
//! use qlogic_gates::matrices::{flatten, PAULI_X};
//! use qlogic_gates::matrix_ops::{embed_operator, is_unitary, tensor_pad};
//!
//! let x = flatten(&PAULI_X);
//! let padded = tensor_pad(1, 0, &x);
//! let embedded = embed_operator(&x, 2, &[QubitId::new(1)]);
//! assert_eq!(padded, embedded);
//! assert!(is_unitary(&embedded, 1e-10));
//! ```

use num_complex::Complex64;
use qlogic_core::QubitId;

/// Side length of a flattened square matrix
///
/// # Panics
/// Panics if the matrix is not square.
#[inline]
pub fn dimension_of(matrix: &[Complex64]) -> usize {
    let n = (matrix.len() as f64).sqrt().round() as usize;
    assert_eq!(n * n, matrix.len(), "Matrix must be square");
    n
}

/// Compute the tensor (Kronecker) product of two matrices
///
/// For matrices A (m×m) and B (n×n), A ⊗ B is (mn)×(mn).
pub fn tensor_product(a: &[Complex64], b: &[Complex64]) -> Vec<Complex64> {
    let n_a = dimension_of(a);
    let n_b = dimension_of(b);
    let n_result = n_a * n_b;
    let mut result = vec![Complex64::new(0.0, 0.0); n_result * n_result];

    for i in 0..n_a {
        for j in 0..n_a {
            let a_ij = a[i * n_a + j];
            if a_ij == Complex64::new(0.0, 0.0) {
                continue;
            }
            for k in 0..n_b {
                for l in 0..n_b {
                    let row = i * n_b + k;
                    let col = j * n_b + l;
                    result[row * n_result + col] = a_ij * b[k * n_b + l];
                }
            }
        }
    }

    result
}

/// Create an identity matrix of the given size
pub fn identity_matrix(size: usize) -> Vec<Complex64> {
    let mut matrix = vec![Complex64::new(0.0, 0.0); size * size];
    for i in 0..size {
        matrix[i * size + i] = Complex64::new(1.0, 0.0);
    }
    matrix
}

/// Pad a matrix with identities: `I(2^before) ⊗ matrix ⊗ I(2^after)`
pub fn tensor_pad(before: usize, after: usize, matrix: &[Complex64]) -> Vec<Complex64> {
    let right = tensor_product(matrix, &identity_matrix(1 << after));
    tensor_product(&identity_matrix(1 << before), &right)
}

/// Embed a local operator into an `num_qubits` register
///
/// `qubits[0]` is the most significant qubit of the local operator's index,
/// so for a controlled gate built with the control first, `qubits` lists
/// the control qubit first. The qubits need not be adjacent or sorted.
///
/// # Panics
/// Panics if the operator size doesn't match `qubits.len()` or a qubit is
/// outside the register.
pub fn embed_operator(local: &[Complex64], num_qubits: usize, qubits: &[QubitId]) -> Vec<Complex64> {
    let local_dim = dimension_of(local);
    assert_eq!(
        local_dim,
        1 << qubits.len(),
        "Operator size must match the number of qubits"
    );

    let positions: Vec<usize> = qubits.iter().map(|q| q.bit_position(num_qubits)).collect();
    let target_mask = positions.iter().fold(0usize, |mask, p| mask | (1 << p));
    let k = qubits.len();

    // Local index bit (k - 1 - j) lives at register bit positions[j]
    let deposit = |local_index: usize| -> usize {
        positions.iter().enumerate().fold(0, |acc, (j, &p)| {
            acc | (((local_index >> (k - 1 - j)) & 1) << p)
        })
    };
    let extract = |full_index: usize| -> usize {
        positions.iter().enumerate().fold(0, |acc, (j, &p)| {
            acc | (((full_index >> p) & 1) << (k - 1 - j))
        })
    };

    let dim = 1usize << num_qubits;
    let mut result = vec![Complex64::new(0.0, 0.0); dim * dim];
    for col in 0..dim {
        let local_col = extract(col);
        let base = col & !target_mask;
        for local_row in 0..local_dim {
            let row = base | deposit(local_row);
            result[row * dim + col] = local[local_row * local_dim + local_col];
        }
    }
    result
}

/// Multiply two matrices
///
/// Computes C = A * B where A, B, and C are square matrices stored as flattened vectors.
pub fn matrix_multiply(a: &[Complex64], b: &[Complex64]) -> Vec<Complex64> {
    let n = dimension_of(a);
    assert_eq!(n * n, b.len(), "Matrix B must match A");

    let mut result = vec![Complex64::new(0.0, 0.0); n * n];

    for i in 0..n {
        for k in 0..n {
            let a_ik = a[i * n + k];
            if a_ik == Complex64::new(0.0, 0.0) {
                continue;
            }
            for j in 0..n {
                result[i * n + j] += a_ik * b[k * n + j];
            }
        }
    }

    result
}

/// Multiply a matrix by a column vector
pub fn matrix_vector_multiply(matrix: &[Complex64], vector: &[Complex64]) -> Vec<Complex64> {
    let n = vector.len();
    assert_eq!(n * n, matrix.len(), "Matrix must match vector length");
    (0..n)
        .map(|i| {
            matrix[i * n..(i + 1) * n]
                .iter()
                .zip(vector)
                .map(|(m, v)| m * v)
                .sum()
        })
        .collect()
}

/// Compute the adjoint (Hermitian conjugate) of a matrix
pub fn matrix_adjoint(matrix: &[Complex64]) -> Vec<Complex64> {
    let n = dimension_of(matrix);
    let mut result = vec![Complex64::new(0.0, 0.0); n * n];
    for i in 0..n {
        for j in 0..n {
            result[i * n + j] = matrix[j * n + i].conj();
        }
    }
    result
}

/// Check if a matrix is unitary (U†U = I)
pub fn is_unitary(matrix: &[Complex64], tolerance: f64) -> bool {
    let n = dimension_of(matrix);
    let product = matrix_multiply(&matrix_adjoint(matrix), matrix);
    approx_equal(&product, &identity_matrix(n), tolerance)
}

/// Element-wise comparison within `tolerance`
pub fn approx_equal(a: &[Complex64], b: &[Complex64], tolerance: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).norm() <= tolerance)
}
