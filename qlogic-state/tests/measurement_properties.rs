//! Property tests for strided measurement and collapse

use approx::assert_relative_eq;
use num_complex::Complex64;
use proptest::prelude::*;
use qlogic_core::QubitId;
use qlogic_state::DenseState;

fn arb_state(max_qubits: usize) -> impl Strategy<Value = DenseState> {
    (1..=max_qubits).prop_flat_map(|n| {
        prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0), 1 << n).prop_filter_map(
            "zero vector",
            move |pairs| {
                let amplitudes: Vec<Complex64> =
                    pairs.into_iter().map(|(re, im)| Complex64::new(re, im)).collect();
                let mut state = DenseState::from_amplitudes(n, &amplitudes).ok()?;
                state.normalize().ok()?;
                Some(state)
            },
        )
    })
}

/// Reference: test the qubit's bit directly instead of striding
fn bitwise_zero_probability(state: &DenseState, qubit: usize) -> f64 {
    let shift = state.num_qubits() - qubit - 1;
    state
        .amplitudes()
        .iter()
        .enumerate()
        .filter(|(i, _)| (i >> shift) & 1 == 0)
        .map(|(_, a)| a.norm_sqr())
        .sum()
}

proptest! {
    #[test]
    fn strided_sum_matches_bitwise_sum(state in arb_state(5), q in 0usize..5) {
        let q = q % state.num_qubits();
        let strided = state.zero_probability(QubitId::new(q)).unwrap();
        assert_relative_eq!(strided, bitwise_zero_probability(&state, q), epsilon = 1e-12);
    }

    #[test]
    fn collapse_keeps_unit_norm(state in arb_state(4), q in 0usize..4, outcome in any::<bool>()) {
        let q = QubitId::new(q % state.num_qubits());
        let mut collapsed = state.clone();
        match collapsed.collapse(q, outcome, 1e-9) {
            Ok(p) => {
                prop_assert!((0.0..=1.0 + 1e-12).contains(&p));
                prop_assert!(collapsed.is_normalized(1e-9));
                let certain = collapsed.outcome_probability(q, outcome).unwrap();
                assert_relative_eq!(certain, 1.0, epsilon = 1e-9);
            }
            Err(_) => {
                prop_assert!(state.outcome_probability(q, outcome).unwrap() <= 1e-9);
            }
        }
    }

    #[test]
    fn outcome_probabilities_sum_to_one(state in arb_state(4), q in 0usize..4) {
        let q = QubitId::new(q % state.num_qubits());
        let total = state.outcome_probability(q, false).unwrap()
            + state.outcome_probability(q, true).unwrap();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
    }
}
