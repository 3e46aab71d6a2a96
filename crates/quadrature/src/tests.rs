use approx::{assert_abs_diff_eq, assert_relative_eq};
use pint_core::TimeInterval;
use proptest::prelude::*;

use super::{Config, NodeKind, PolynomialWeights, QuadratureError, SdcQuadrature};

fn interval(start: f64, end: f64) -> TimeInterval {
    TimeInterval::new(start, end).unwrap()
}

fn gauss_lobatto(num_nodes: usize, on: TimeInterval) -> SdcQuadrature {
    SdcQuadrature::new(Config::gauss_lobatto(num_nodes).unwrap(), on).unwrap()
}

#[test]
fn gauss_lobatto_three_on_standard_interval() {
    let quadrature = gauss_lobatto(3, TimeInterval::STANDARD);

    assert_eq!(quadrature.nodes(), &[-1.0, 0.0, 1.0]);

    let weights = quadrature.weights();
    assert_relative_eq!(weights[0], 1.0 / 3.0, epsilon = 1e-14);
    assert_relative_eq!(weights[1], 4.0 / 3.0, epsilon = 1e-14);
    assert_relative_eq!(weights[2], 1.0 / 3.0, epsilon = 1e-14);

    let s = quadrature.s_matrix();
    assert_eq!(s.shape(), (2, 3));
    let expected_s = [[5.0 / 12.0, 2.0 / 3.0, -1.0 / 12.0], [-1.0 / 12.0, 2.0 / 3.0, 5.0 / 12.0]];
    for (i, row) in expected_s.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            assert_relative_eq!(s[(i, j)], value, epsilon = 1e-14);
        }
    }

    let q = quadrature.q_matrix();
    assert_eq!(q.shape(), (3, 3));
    for j in 0..3 {
        assert_eq!(q[(0, j)], 0.0);
        assert_relative_eq!(q[(2, j)], weights[j], epsilon = 1e-14);
    }
}

#[test]
fn apply_selects_rows() {
    let quadrature = gauss_lobatto(5, interval(0.0, 2.0));
    // Integrand t^3 is exact for five Lobatto nodes.
    let data: Vec<f64> = quadrature.nodes().iter().map(|t| t.powi(3)).collect();
    let antiderivative = |t: f64| t.powi(4) / 4.0;
    let nodes = quadrature.nodes().to_vec();

    let full = quadrature.apply(&data, 0, 4).unwrap();
    assert_relative_eq!(full, 4.0, epsilon = 1e-12);

    let adjacent = quadrature.apply(&data, 1, 2).unwrap();
    assert_relative_eq!(
        adjacent,
        antiderivative(nodes[2]) - antiderivative(nodes[1]),
        epsilon = 1e-12
    );

    let span = quadrature.apply(&data, 1, 4).unwrap();
    let from_q = quadrature.apply(&data, 0, 4).unwrap() - quadrature.apply(&data, 0, 1).unwrap();
    assert_relative_eq!(span, from_q, epsilon = 1e-12);
}

#[test]
fn apply_works_on_vector_values() {
    let quadrature = gauss_lobatto(3, interval(0.0, 1.0));
    let data: Vec<Vec<f64>> = quadrature
        .nodes()
        .iter()
        .map(|&t| vec![1.0, t])
        .collect();

    let integral = quadrature.apply(&data, 0, 2).unwrap();
    assert_relative_eq!(integral[0], 1.0, epsilon = 1e-14);
    assert_relative_eq!(integral[1], 0.5, epsilon = 1e-14);
}

#[test]
fn apply_rejects_bad_indices_and_data() {
    let quadrature = gauss_lobatto(3, TimeInterval::STANDARD);
    let data = [1.0, 1.0, 1.0];

    assert_eq!(
        quadrature.apply(&data, 0, 3),
        Err(QuadratureError::TargetOutOfRange { target: 3, max: 2 })
    );
    assert_eq!(
        quadrature.apply(&data, 2, 2),
        Err(QuadratureError::EmptySpan { from: 2, target: 2 })
    );
    assert_eq!(
        quadrature.apply(&data, 2, 1),
        Err(QuadratureError::EmptySpan { from: 2, target: 1 })
    );
    assert_eq!(
        quadrature.apply(&data[..2], 0, 1),
        Err(QuadratureError::DataLength {
            expected: 3,
            actual: 2
        })
    );
}

#[test]
fn shifting_keeps_matrices() {
    let mut quadrature = gauss_lobatto(4, interval(0.0, 0.5));
    let s_before = quadrature.s_matrix().clone();

    quadrature.transform(interval(0.5, 1.0));

    assert_eq!(quadrature.nodes()[0], 0.5);
    assert_eq!(quadrature.nodes()[3], 1.0);
    assert_eq!(quadrature.s_matrix(), &s_before);
}

#[test]
fn resizing_rebuilds_matrices() {
    let mut quadrature = gauss_lobatto(4, interval(0.0, 0.5));
    let s_before = quadrature.s_matrix().clone();

    quadrature.transform(interval(0.0, 2.0));

    // Constant weights scale linearly with the width.
    for (after, before) in quadrature.s_matrix().iter().zip(s_before.iter()) {
        assert_relative_eq!(*after, 4.0 * before, epsilon = 1e-13);
    }
}

#[test]
fn gauss_legendre_weights_are_exact() {
    let config = Config::new(4, NodeKind::GaussLegendre, PolynomialWeights::default()).unwrap();
    let quadrature = SdcQuadrature::new(config, TimeInterval::STANDARD).unwrap();

    // Four Gauss-Legendre nodes integrate degree 7 exactly.
    let data: Vec<f64> = quadrature.nodes().iter().map(|x| x.powi(6)).collect();
    let integral = quadrature.integrate(&data).unwrap();

    assert_relative_eq!(integral, 2.0 / 7.0, epsilon = 1e-13);
    assert!(quadrature.nodes()[0] > -1.0);
}

#[test]
fn weight_function_enters_integrals() {
    let weights = PolynomialWeights::new(vec![0.0, 1.0]).unwrap();
    let config = Config::new(3, NodeKind::GaussLobatto, weights).unwrap();
    let quadrature = SdcQuadrature::new(config, interval(0.0, 1.0)).unwrap();

    // ∫_0^1 x * 1 dx
    let ones = [1.0; 3];
    assert_relative_eq!(quadrature.integrate(&ones).unwrap(), 0.5, epsilon = 1e-14);
    assert_relative_eq!(quadrature.apply(&ones, 0, 2).unwrap(), 0.5, epsilon = 1e-14);
}

#[test]
fn deltas_sum_to_width() {
    let quadrature = gauss_lobatto(6, interval(1.0, 1.25));
    let total: f64 = quadrature.deltas().iter().sum();
    assert_relative_eq!(total, 0.25, epsilon = 1e-14);
}

proptest! {
    #[test]
    fn constants_integrate_to_width(
        num_nodes in 2usize..12,
        start in -50.0f64..50.0,
        width in 1e-3f64..10.0,
    ) {
        let quadrature = gauss_lobatto(num_nodes, interval(start, start + width));
        let ones = vec![1.0; num_nodes];

        let integral = quadrature.apply(&ones, 0, num_nodes - 1).unwrap();
        prop_assert!((integral - width).abs() <= 1e-10 * width.max(1.0));
    }

    #[test]
    fn unit_interval_constant_is_one(num_nodes in 2usize..16) {
        let quadrature = gauss_lobatto(num_nodes, interval(0.0, 1.0));
        let ones = vec![1.0; num_nodes];

        let integral = quadrature.apply(&ones, 0, num_nodes - 1).unwrap();
        assert_abs_diff_eq!(integral, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn transform_round_trip_restores_nodes(
        num_nodes in 2usize..10,
        start in -10.0f64..10.0,
        width in 1e-2f64..5.0,
    ) {
        let original = interval(0.0, 1.0);
        let mut quadrature = gauss_lobatto(num_nodes, original);
        let before = quadrature.nodes().to_vec();

        quadrature.transform(interval(start, start + width));
        quadrature.transform(original);

        for (a, b) in quadrature.nodes().iter().zip(&before) {
            prop_assert!((a - b).abs() <= 1e-12);
        }
    }

    #[test]
    fn nodes_increase_and_hit_endpoints(
        num_nodes in 2usize..20,
        start in -100.0f64..100.0,
        width in 1e-3f64..10.0,
    ) {
        let target = interval(start, start + width);
        let quadrature = gauss_lobatto(num_nodes, target);
        let nodes = quadrature.nodes();

        prop_assert!(nodes.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(nodes[0], target.start());
        prop_assert_eq!(nodes[num_nodes - 1], target.end());
    }
}
