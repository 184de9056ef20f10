use crate::model::Model;
use crate::trainer::Gradients;

/// Vanilla gradient descent with L2 weight decay on the weight matrices.
#[derive(Debug, Clone)]
pub struct GradientDescent {
    pub learning_rate: f64,
    pub reg_lambda: f64,
}

impl GradientDescent {
    pub fn new(learning_rate: f64, reg_lambda: f64) -> Self {
        Self { learning_rate, reg_lambda }
    }

    /// Add `reg_lambda * W` to each weight gradient. Bias gradients are left
    /// alone.
    pub fn regularize(&self, model: &Model, grads: &mut Gradients) {
        grads.dw1.scaled_add(self.reg_lambda, &model.w1);
        grads.dw2.scaled_add(self.reg_lambda, &model.w2);
        grads.dw3.scaled_add(self.reg_lambda, &model.w3);
    }

    /// `param -= learning_rate * grad` for every weight and bias.
    pub fn update(&self, model: &mut Model, grads: &Gradients) {
        let step = -self.learning_rate;
        model.w1.scaled_add(step, &grads.dw1);
        model.b1.scaled_add(step, &grads.db1);
        model.w2.scaled_add(step, &grads.dw2);
        model.b2.scaled_add(step, &grads.db2);
        model.w3.scaled_add(step, &grads.dw3);
        model.b3.scaled_add(step, &grads.db3);
    }

    /// Regularize the gradients, then apply them.
    pub fn step(&self, model: &mut Model, mut grads: Gradients) {
        self.regularize(model, &mut grads);
        self.update(model, &grads);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};

    fn unit_model() -> Model {
        Model::from_parts(
            Array2::ones((2, 2)),
            Array2::ones((1, 2)),
            Array2::ones((2, 2)),
            Array2::ones((1, 2)),
            Array2::ones((2, 2)),
            Array2::ones((1, 2)),
        )
        .unwrap()
    }

    fn zero_gradients() -> Gradients {
        Gradients {
            dw1: Array2::zeros((2, 2)),
            db1: Array2::zeros((1, 2)),
            dw2: Array2::zeros((2, 2)),
            db2: Array2::zeros((1, 2)),
            dw3: Array2::zeros((2, 2)),
            db3: Array2::zeros((1, 2)),
        }
    }

    #[test]
    fn test_weight_decay_skips_biases() {
        let mut model = unit_model();
        GradientDescent::new(0.1, 0.5).step(&mut model, zero_gradients());

        // 1 - 0.1 * (0 + 0.5 * 1)
        let mut weights = model.w1.iter().chain(model.w2.iter()).chain(model.w3.iter());
        assert!(weights.all(|&w| (w - 0.95).abs() < 1e-12));
        let mut biases = model.b1.iter().chain(model.b2.iter()).chain(model.b3.iter());
        assert!(biases.all(|&b| b == 1.0));
    }

    #[test]
    fn test_update_moves_against_gradient() {
        let mut model = unit_model();
        let mut grads = zero_gradients();
        grads.dw2 = array![[1.0, -1.0], [2.0, 0.0]];
        grads.db3 = array![[0.5, -0.5]];

        GradientDescent::new(0.01, 0.0).step(&mut model, grads);

        assert_abs_diff_eq!(model.w2, array![[0.99, 1.01], [0.98, 1.0]], epsilon = 1e-12);
        assert_abs_diff_eq!(model.b3, array![[0.995, 1.005]], epsilon = 1e-12);
        assert_eq!(model.w1, Array2::ones((2, 2)));
    }
}
