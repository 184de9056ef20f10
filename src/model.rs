use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::activation::{sigmoid, softmax};
use crate::dataset::Dataset;
use crate::error::{Error, Result};

/// Parameters of the 2-hidden-layer network.
///
/// Weights are stored input-major (`[fan_in × fan_out]`) so a batch of row
/// vectors is propagated with `x.dot(&w)`. Biases are `[1 × fan_out]` rows
/// broadcast over the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub w1: Array2<f64>,
    pub b1: Array2<f64>,
    pub w2: Array2<f64>,
    pub b2: Array2<f64>,
    pub w3: Array2<f64>,
    pub b3: Array2<f64>,
}

/// Everything the forward pass computes, kept for backpropagation.
#[derive(Debug, Clone)]
pub struct ForwardPass {
    pub z1: Array2<f64>,
    pub a1: Array2<f64>,
    pub z2: Array2<f64>,
    pub a2: Array2<f64>,
    pub z3: Array2<f64>,
    /// Per-example class probabilities
    pub a3: Array2<f64>,
}

fn init_weights<R: Rng + ?Sized>(fan_in: usize, fan_out: usize, rng: &mut R) -> Array2<f64> {
    let scale = (fan_in as f64).sqrt();
    Array2::from_shape_fn((fan_in, fan_out), |_| {
        let sample: f64 = rng.sample(StandardNormal);
        sample / scale
    })
}

fn check_shape(what: &'static str, array: &Array2<f64>, expected: (usize, usize)) -> Result<()> {
    if array.dim() != expected {
        return Err(Error::ShapeMismatch {
            what,
            expected,
            found: array.dim(),
        });
    }
    Ok(())
}

impl Model {
    /// Create a randomly initialized model.
    ///
    /// Weights are standard-normal samples divided by the square root of the
    /// layer's fan-in, drawn for W1, W2, then W3 in row-major order. Biases
    /// start at zero.
    pub fn new<R: Rng + ?Sized>(
        input_dim: usize,
        hidden_dim: usize,
        output_dim: usize,
        rng: &mut R,
    ) -> Self {
        let w1 = init_weights(input_dim, hidden_dim, rng);
        let w2 = init_weights(hidden_dim, hidden_dim, rng);
        let w3 = init_weights(hidden_dim, output_dim, rng);

        Model {
            w1,
            b1: Array2::zeros((1, hidden_dim)),
            w2,
            b2: Array2::zeros((1, hidden_dim)),
            w3,
            b3: Array2::zeros((1, output_dim)),
        }
    }

    /// Assemble a model from explicit parameters, checking that every layer's
    /// row count matches the previous layer's width.
    pub fn from_parts(
        w1: Array2<f64>,
        b1: Array2<f64>,
        w2: Array2<f64>,
        b2: Array2<f64>,
        w3: Array2<f64>,
        b3: Array2<f64>,
    ) -> Result<Self> {
        let hidden_dim = w1.ncols();
        let output_dim = w3.ncols();

        check_shape("b1", &b1, (1, hidden_dim))?;
        check_shape("W2", &w2, (hidden_dim, hidden_dim))?;
        check_shape("b2", &b2, (1, hidden_dim))?;
        check_shape("W3", &w3, (hidden_dim, output_dim))?;
        check_shape("b3", &b3, (1, output_dim))?;

        Ok(Model { w1, b1, w2, b2, w3, b3 })
    }

    pub fn input_dim(&self) -> usize {
        self.w1.nrows()
    }

    pub fn hidden_dim(&self) -> usize {
        self.w1.ncols()
    }

    pub fn output_dim(&self) -> usize {
        self.w3.ncols()
    }

    /// Total number of weights and biases
    pub fn parameter_count(&self) -> usize {
        [&self.w1, &self.b1, &self.w2, &self.b2, &self.w3, &self.b3]
            .iter()
            .map(|p| p.len())
            .sum()
    }

    pub fn forward(&self, x: &Array2<f64>) -> ForwardPass {
        let z1 = x.dot(&self.w1) + &self.b1;
        let a1 = sigmoid(&z1);

        let z2 = a1.dot(&self.w2) + &self.b2;
        let a2 = sigmoid(&z2);

        let z3 = a2.dot(&self.w3) + &self.b3;
        let a3 = softmax(&z3);

        ForwardPass { z1, a1, z2, a2, z3, a3 }
    }

    /// Most probable class for each row of `x`
    pub fn predict(&self, x: &Array2<f64>) -> Array1<usize> {
        self.forward(x).a3.map_axis(Axis(1), argmax)
    }

    /// Fraction of the dataset's examples that `predict` labels correctly
    pub fn accuracy(&self, dataset: &Dataset) -> f64 {
        let predictions = self.predict(dataset.features());
        let correct = predictions
            .iter()
            .zip(dataset.labels().iter())
            .filter(|(p, y)| p == y)
            .count();
        correct as f64 / dataset.len() as f64
    }
}

/// Index of the largest entry; the first one wins on ties. A NaN entry is
/// treated as the maximum, so a row that went NaN reports its first NaN.
fn argmax(row: ArrayView1<f64>) -> usize {
    let mut best = 0;
    for (i, &v) in row.iter().enumerate() {
        if v.is_nan() {
            return i;
        }
        if v > row[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_initialization_shapes() {
        let mut rng = StdRng::seed_from_u64(0);
        let model = Model::new(2, 6, 2, &mut rng);

        assert_eq!(model.w1.dim(), (2, 6));
        assert_eq!(model.b1.dim(), (1, 6));
        assert_eq!(model.w2.dim(), (6, 6));
        assert_eq!(model.b2.dim(), (1, 6));
        assert_eq!(model.w3.dim(), (6, 2));
        assert_eq!(model.b3.dim(), (1, 2));

        assert!(model.b1.iter().chain(model.b2.iter()).chain(model.b3.iter()).all(|&b| b == 0.0));
        assert!(model.w1.iter().any(|&w| w != 0.0));
    }

    #[test]
    fn test_initialization_is_seeded() {
        let a = Model::new(2, 4, 2, &mut StdRng::seed_from_u64(3));
        let b = Model::new(2, 4, 2, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_parts_rejects_inconsistent_shapes() {
        let result = Model::from_parts(
            Array2::zeros((2, 3)),
            Array2::zeros((1, 3)),
            Array2::zeros((4, 3)),
            Array2::zeros((1, 3)),
            Array2::zeros((3, 2)),
            Array2::zeros((1, 2)),
        );

        match result {
            Err(Error::ShapeMismatch { what, expected, found }) => {
                assert_eq!(what, "W2");
                assert_eq!(expected, (3, 3));
                assert_eq!(found, (4, 3));
            }
            other => panic!("expected a shape mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_forward_with_zero_weights_is_uniform() {
        let model = Model::from_parts(
            Array2::zeros((2, 3)),
            Array2::zeros((1, 3)),
            Array2::zeros((3, 3)),
            Array2::zeros((1, 3)),
            Array2::zeros((3, 2)),
            Array2::zeros((1, 2)),
        )
        .unwrap();

        let pass = model.forward(&array![[1.0, -2.0], [0.3, 0.4]]);
        assert_eq!(pass.a1.dim(), (2, 3));
        assert!(pass.a1.iter().all(|&a| a == 0.5));
        assert!(pass.a2.iter().all(|&a| a == 0.5));
        assert!(pass.a3.iter().all(|&p| p == 0.5));
    }

    #[test]
    fn test_predict_follows_output_bias() {
        let model = Model::from_parts(
            Array2::zeros((2, 2)),
            Array2::zeros((1, 2)),
            Array2::zeros((2, 2)),
            Array2::zeros((1, 2)),
            Array2::zeros((2, 2)),
            array![[0.0, 1.0]],
        )
        .unwrap();

        let x = array![[5.0, 5.0], [-5.0, 0.0], [0.0, 0.0]];
        assert_eq!(model.predict(&x), array![1, 1, 1]);
    }

    #[test]
    fn test_predict_separates_by_first_feature() {
        // both hidden layers saturate on the sign of x0
        let model = Model::from_parts(
            array![[10.0, 10.0], [0.0, 0.0]],
            Array2::zeros((1, 2)),
            array![[10.0, 0.0], [0.0, 10.0]],
            array![[-5.0, -5.0]],
            array![[-10.0, 10.0], [-10.0, 10.0]],
            array![[10.0, -10.0]],
        )
        .unwrap();

        let x = array![[-1.0, -1.0], [-1.0, 1.0], [1.0, -1.0], [1.0, 1.0]];
        assert_eq!(model.predict(&x), array![0, 0, 1, 1]);
    }

    #[test]
    fn test_argmax_ties_and_nan() {
        assert_eq!(argmax(array![0.5, 0.5].view()), 0);
        assert_eq!(argmax(array![0.2, 0.8].view()), 1);
        assert_eq!(argmax(array![0.2, f64::NAN].view()), 1);
    }

    #[test]
    fn test_parameter_count() {
        let model = Model::new(2, 6, 2, &mut StdRng::seed_from_u64(0));
        // 2*6 + 6 + 6*6 + 6 + 6*2 + 2
        assert_eq!(model.parameter_count(), 74);
    }

    #[test]
    fn test_accuracy() {
        let model = Model::from_parts(
            Array2::zeros((2, 2)),
            Array2::zeros((1, 2)),
            Array2::zeros((2, 2)),
            Array2::zeros((1, 2)),
            Array2::zeros((2, 2)),
            array![[1.0, 0.0]],
        )
        .unwrap();
        let data = Dataset::new(
            array![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]],
            array![0, 0, 0, 1],
        )
        .unwrap();

        assert_abs_diff_eq!(model.accuracy(&data), 0.75);
    }
}
