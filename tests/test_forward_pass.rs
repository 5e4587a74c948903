// Tests for forward propagation through Dense, Relu and Softmax layers.
// Covers output shapes, exact affine results, rectifier behaviour and softmax
// normalisation/stability properties.

use approx::assert_abs_diff_eq;
use feedforward_layers::layers::{Dense, Layer, Matrix, Relu, Softmax};
use feedforward_layers::utils::SimpleRng;
use ndarray::{array, Array2};

fn random_matrix(rows: usize, cols: usize, scale: f64, rng: &mut SimpleRng) -> Matrix {
    Array2::from_shape_simple_fn((rows, cols), || rng.gen_range_f64(-scale, scale))
}

// ============================================================================
// Dense Forward Tests
// ============================================================================

mod dense_forward_tests {
    use super::*;

    #[test]
    fn test_forward_shape() {
        let mut rng = SimpleRng::new(42);
        for &(n, k, m) in &[(3, 2, 1), (5, 4, 7), (1, 1, 3), (10, 6, 32)] {
            let mut layer = Dense::new(k, 0.01);
            layer.initialise(n, &mut rng).unwrap();

            let x = random_matrix(n, m, 1.0, &mut rng);
            let z = layer.forward(&x).unwrap();

            assert_eq!(z.dim(), (k, m));
            assert_eq!(layer.batch_size(), Some(m));
        }
    }

    #[test]
    fn test_forward_matches_matrix_product() {
        let weights = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let bias = array![[0.0], [0.0]];
        let mut layer = Dense::with_parameters(weights, bias).unwrap();

        let z = layer.forward(&array![[1.0], [2.0], [3.0]]).unwrap();
        assert_eq!(z, array![[14.0], [32.0]]);
    }

    #[test]
    fn test_bias_broadcasts_across_batch() {
        let weights = array![[1.0, 0.0], [0.0, 1.0]];
        let bias = array![[10.0], [-10.0]];
        let mut layer = Dense::with_parameters(weights, bias).unwrap();

        let z = layer.forward(&array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(z, array![[11.0, 12.0, 13.0], [-6.0, -5.0, -4.0]]);
    }

    #[test]
    fn test_zero_input_gives_bias() {
        let mut rng = SimpleRng::new(5);
        let mut layer = Dense::new(3, 0.01);
        layer.initialise(4, &mut rng).unwrap();
        layer.set_bias(array![[0.5], [-0.5], [2.0]]).unwrap();

        let z = layer.forward(&Array2::zeros((4, 2))).unwrap();
        assert_eq!(z, array![[0.5, 0.5], [-0.5, -0.5], [2.0, 2.0]]);
    }

    #[test]
    fn test_forward_twice_is_idempotent() {
        let mut rng = SimpleRng::new(77);
        let mut layer = Dense::new(4, 0.01);
        layer.initialise(3, &mut rng).unwrap();
        let x = random_matrix(3, 5, 2.0, &mut rng);

        let first = layer.forward(&x).unwrap();
        let second = layer.forward(&x).unwrap();
        assert_eq!(first, second);
    }
}

// ============================================================================
// Relu Forward Tests
// ============================================================================

mod relu_forward_tests {
    use super::*;

    #[test]
    fn test_relu_elementwise_property() {
        let mut rng = SimpleRng::new(101);
        let mut z = random_matrix(6, 9, 3.0, &mut rng);
        z[[0, 0]] = 0.0;
        z[[3, 4]] = -0.0;

        let mut relu = Relu::new();
        let a = relu.forward(&z).unwrap();

        assert_eq!(a.dim(), z.dim());
        for (&zi, &ai) in z.iter().zip(a.iter()) {
            if zi <= 0.0 {
                assert_eq!(ai, 0.0);
            } else {
                assert_eq!(ai, zi);
            }
        }
    }

    #[test]
    fn test_relu_passes_empty_input() {
        let mut relu = Relu::new();
        let a = relu.forward(&Matrix::zeros((3, 0))).unwrap();
        assert_eq!(a.dim(), (3, 0));
    }
}

// ============================================================================
// Softmax Forward Tests
// ============================================================================

mod softmax_forward_tests {
    use super::*;

    #[test]
    fn test_softmax_columns_sum_to_one() {
        let mut rng = SimpleRng::new(202);
        let mut softmax = Softmax::new();

        for &(n, m) in &[(2, 1), (5, 8), (10, 3)] {
            let z = random_matrix(n, m, 10.0, &mut rng);
            let a = softmax.forward(&z).unwrap();

            assert_eq!(a.dim(), (n, m));
            for column in a.columns() {
                assert_abs_diff_eq!(column.sum(), 1.0, epsilon = 1e-12);
                assert!(column.iter().all(|&p| p > 0.0 && p <= 1.0));
            }
        }
    }

    #[test]
    fn test_softmax_is_monotonic_within_column() {
        let mut rng = SimpleRng::new(303);
        let z = random_matrix(7, 6, 5.0, &mut rng);
        let a = Softmax::new().forward(&z).unwrap();

        for col in 0..z.ncols() {
            for i in 0..z.nrows() {
                for j in 0..z.nrows() {
                    if z[[i, col]] > z[[j, col]] {
                        assert!(a[[i, col]] >= a[[j, col]]);
                    }
                }
            }
        }
    }

    #[test]
    fn test_softmax_large_magnitudes_are_stable() {
        let z = array![
            [1.0e4, -1.0e4, 9999.5],
            [9999.0, -9999.0, -1.0e4],
            [-1.0e4, 1.0e4, 1.0e4]
        ];
        let a = Softmax::new().forward(&z).unwrap();

        assert!(a.iter().all(|p| p.is_finite()));
        for column in a.columns() {
            assert_abs_diff_eq!(column.sum(), 1.0, epsilon = 1e-12);
        }
        assert!(a[[0, 0]] > a[[1, 0]]);
    }

    #[test]
    fn test_softmax_invariant_to_column_shift() {
        let z = array![[1.0e4, 0.5, -3.25], [9998.5, 2.0, -3.0], [9999.75, -1.5, 4.0]];
        let shifts = [-1024.0, 256.0, 4096.0];

        let mut shifted = z.clone();
        for (mut column, shift) in shifted.columns_mut().into_iter().zip(shifts.iter()) {
            column += *shift;
        }

        let a = Softmax::new().forward(&z).unwrap();
        let b = Softmax::new().forward(&shifted).unwrap();
        for (x, y) in a.iter().zip(b.iter()) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-9);
        }
    }
}
