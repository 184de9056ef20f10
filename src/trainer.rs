use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::activation::d_sigmoid;
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::hyperparameters::{Backprop, ModelHyperparameters, OUTPUT_DIM};
use crate::loss::calculate_loss;
use crate::model::{ForwardPass, Model};
use crate::optimizer::GradientDescent;

/// The dataset and hyperparameters a training run works against.
#[derive(Debug, Clone, Copy)]
pub struct TrainingContext<'a> {
    pub dataset: &'a Dataset,
    pub hyperparameters: &'a ModelHyperparameters,
}

impl<'a> TrainingContext<'a> {
    pub fn new(dataset: &'a Dataset, hyperparameters: &'a ModelHyperparameters) -> Self {
        Self { dataset, hyperparameters }
    }
}

/// Gradients of the summed data loss for every parameter, shaped like the
/// parameters themselves.
#[derive(Debug, Clone)]
pub struct Gradients {
    pub dw1: Array2<f64>,
    pub db1: Array2<f64>,
    pub dw2: Array2<f64>,
    pub db2: Array2<f64>,
    pub dw3: Array2<f64>,
    pub db3: Array2<f64>,
}

/// A loss value reported during training
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossRecord {
    pub iteration: usize,
    pub loss: f64,
}

#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub model: Model,
    /// One entry per logging interval; empty when logging is disabled
    pub loss_history: Vec<LossRecord>,
}

/// Softmax cross-entropy gradient w.r.t. the logits: the probabilities with
/// 1 subtracted at each example's true class. Works on a copy so the
/// forward pass output stays intact.
pub fn output_delta(probs: &Array2<f64>, labels: &Array1<usize>) -> Array2<f64> {
    let mut delta = probs.to_owned();
    for (i, &label) in labels.iter().enumerate() {
        delta[[i, label]] -= 1.0;
    }
    delta
}

fn column_sum(delta: &Array2<f64>) -> Array2<f64> {
    delta.sum_axis(Axis(0)).insert_axis(Axis(0))
}

/// Backpropagate the output error through the network.
///
/// With `Backprop::Literal` the output-layer weight gradient is taken against
/// `a1`, the error entering layer 2 is scaled by `d_sigmoid(a1)` and the
/// error entering layer 1 by `d_sigmoid(a2)`. `Backprop::ChainRule` pairs
/// each layer with its own activation instead.
pub fn backward(
    model: &Model,
    x: &Array2<f64>,
    labels: &Array1<usize>,
    pass: &ForwardPass,
    backprop: Backprop,
) -> Gradients {
    let (upper, lower) = match backprop {
        Backprop::Literal => (&pass.a1, &pass.a2),
        Backprop::ChainRule => (&pass.a2, &pass.a1),
    };

    let delta4 = output_delta(&pass.a3, labels);
    let dw3 = upper.t().dot(&delta4);
    let db3 = column_sum(&delta4);

    let delta3 = d_sigmoid(upper) * delta4.dot(&model.w3.t());
    let dw2 = lower.t().dot(&delta3);
    let db2 = column_sum(&delta3);

    let delta2 = d_sigmoid(lower) * delta3.dot(&model.w2.t());
    let dw1 = x.t().dot(&delta2);
    let db1 = column_sum(&delta2);

    Gradients { dw1, db1, dw2, db2, dw3, db3 }
}

/// Run `num_passes` full-batch gradient descent iterations on `model` in place.
///
/// When a logging interval is set, the loss is evaluated after every
/// iteration whose index is a multiple of it, starting with iteration 0.
pub fn train(model: &mut Model, ctx: &TrainingContext) -> Result<Vec<LossRecord>> {
    let hp = ctx.hyperparameters;
    let x = ctx.dataset.features();
    let y = ctx.dataset.labels();

    hp.validate()?;
    if model.input_dim() != x.ncols() {
        return Err(Error::ShapeMismatch {
            what: "W1",
            expected: (x.ncols(), model.hidden_dim()),
            found: model.w1.dim(),
        });
    }
    if model.output_dim() != OUTPUT_DIM {
        return Err(Error::ShapeMismatch {
            what: "W3",
            expected: (model.hidden_dim(), OUTPUT_DIM),
            found: model.w3.dim(),
        });
    }

    debug!(
        examples = ctx.dataset.len(),
        hidden_dim = model.hidden_dim(),
        num_passes = hp.num_passes,
        backprop = ?hp.backprop,
        "Starting gradient descent"
    );

    let optimizer = GradientDescent::new(hp.epsilon, hp.reg_lambda);
    let mut history = Vec::new();

    for i in 0..hp.num_passes {
        let pass = model.forward(x);
        let grads = backward(model, x, y, &pass, hp.backprop);
        optimizer.step(model, grads);

        if let Some(interval) = hp.print_loss_interval {
            if i % interval == 0 {
                let loss = calculate_loss(model, ctx);
                info!("Loss after iteration {}: {:.6}", i, loss);
                history.push(LossRecord { iteration: i, loss });
            }
        }
    }

    Ok(history)
}

/// Initialize a model from the configured seed and train it on the context's
/// dataset.
pub fn build_model(ctx: &TrainingContext) -> Result<TrainedModel> {
    let hp = ctx.hyperparameters;
    hp.validate()?;

    let mut rng = StdRng::seed_from_u64(hp.seed);
    let mut model = Model::new(ctx.dataset.features().ncols(), hp.hidden_dim, OUTPUT_DIM, &mut rng);
    let loss_history = train(&mut model, ctx)?;

    info!(
        passes = hp.num_passes,
        accuracy = model.accuracy(ctx.dataset),
        "Training finished"
    );

    Ok(TrainedModel { model, loss_history })
}
