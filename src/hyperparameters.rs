use crate::error::{Error, Result};

/// Width of the input layer (two features per point)
pub const INPUT_DIM: usize = 2;

/// Width of the output layer (two classes)
pub const OUTPUT_DIM: usize = 2;

/// How the L2 penalty in the reported loss combines the three weight matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regularization {
    /// `sum(W1²) + sum(W2² + sum(W3²))`: the W3 term is nested inside the W2
    /// sum, so it is counted once per element of W2.
    Nested,
    /// `sum(W1²) + sum(W2²) + sum(W3²)`
    Sibling,
}

/// Which activation each hidden-layer error term is paired with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backprop {
    /// dW3 from a1, the layer-2 error scaled by d_sigmoid(a1) and the
    /// layer-1 error scaled by d_sigmoid(a2).
    Literal,
    /// Standard chain rule: dW3 from a2, d_sigmoid(a2) into layer 2,
    /// d_sigmoid(a1) into layer 1.
    ChainRule,
}

/// Hyperparameters for the neural network model
#[derive(Debug, Clone)]
pub struct ModelHyperparameters {
    /// Width of both hidden layers
    pub hidden_dim: usize,

    /// Number of full-batch gradient descent passes
    pub num_passes: usize,

    /// Learning rate
    pub epsilon: f64,

    /// L2 regularization strength
    pub reg_lambda: f64,

    /// Report the loss every this many iterations; `None` disables it
    pub print_loss_interval: Option<usize>,

    /// Seed for weight initialization
    pub seed: u64,

    /// How the weight penalty is summed into the reported loss
    pub regularization: Regularization,

    /// Activation pairing used when computing gradients
    pub backprop: Backprop,
}

impl Default for ModelHyperparameters {
    fn default() -> Self {
        ModelHyperparameters {
            hidden_dim: 6,
            num_passes: 40_000,
            epsilon: 0.01,
            reg_lambda: 0.01,
            print_loss_interval: None,
            seed: 0,
            regularization: Regularization::Nested,
            backprop: Backprop::Literal,
        }
    }
}

impl ModelHyperparameters {
    pub fn with_hidden_dim(mut self, hidden_dim: usize) -> Self {
        self.hidden_dim = hidden_dim;
        self
    }

    pub fn with_num_passes(mut self, num_passes: usize) -> Self {
        self.num_passes = num_passes;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_reg_lambda(mut self, reg_lambda: f64) -> Self {
        self.reg_lambda = reg_lambda;
        self
    }

    /// Enable loss reporting every `interval` iterations
    pub fn with_print_loss(mut self, interval: usize) -> Self {
        self.print_loss_interval = Some(interval);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_regularization(mut self, regularization: Regularization) -> Self {
        self.regularization = regularization;
        self
    }

    pub fn with_backprop(mut self, backprop: Backprop) -> Self {
        self.backprop = backprop;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.hidden_dim == 0 {
            return Err(Error::InvalidHyperparameter {
                name: "hidden_dim",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(Error::InvalidHyperparameter {
                name: "epsilon",
                reason: format!("must be finite and positive, got {}", self.epsilon),
            });
        }
        if !self.reg_lambda.is_finite() || self.reg_lambda < 0.0 {
            return Err(Error::InvalidHyperparameter {
                name: "reg_lambda",
                reason: format!("must be finite and non-negative, got {}", self.reg_lambda),
            });
        }
        if self.print_loss_interval == Some(0) {
            return Err(Error::InvalidHyperparameter {
                name: "print_loss_interval",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
