use ndarray::{Array2, Axis};

/// Enum representing the activation functions the network knows about
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivationType {
    Sigmoid,
    ReLU,
}

impl ActivationType {
    /// Applies the activation function to a given input
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            ActivationType::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            ActivationType::ReLU => x.max(0.0),
        }
    }

    /// Computes the derivative of the activation function.
    ///
    /// For `Sigmoid` the argument is the activation value `a = sigmoid(z)`,
    /// not the pre-activation. For `ReLU` it is the pre-activation.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationType::Sigmoid => x * (1.0 - x),
            ActivationType::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
        }
    }
}

/// Elementwise logistic function. No clamping: very negative inputs
/// underflow to 0.
pub fn sigmoid(x: &Array2<f64>) -> Array2<f64> {
    x.mapv(|v| ActivationType::Sigmoid.apply(v))
}

/// Sigmoid derivative expressed in terms of the sigmoid output `a`.
pub fn d_sigmoid(a: &Array2<f64>) -> Array2<f64> {
    a.mapv(|v| ActivationType::Sigmoid.derivative(v))
}

pub fn relu(x: &Array2<f64>) -> Array2<f64> {
    x.mapv(|v| ActivationType::ReLU.apply(v))
}

pub fn d_relu(x: &Array2<f64>) -> Array2<f64> {
    x.mapv(|v| ActivationType::ReLU.derivative(v))
}

/// Row-wise softmax. The exponentials are taken as-is (no max subtraction),
/// so large logits overflow to inf and the row turns into NaN.
pub fn softmax(z: &Array2<f64>) -> Array2<f64> {
    let exponent = z.mapv(f64::exp);
    let sums = exponent.sum_axis(Axis(1)).insert_axis(Axis(1));
    exponent / &sums
}
