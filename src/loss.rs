use ndarray::{Array1, Array2};

use crate::hyperparameters::Regularization;
use crate::model::Model;
use crate::trainer::TrainingContext;

/// Summed cross-entropy of the true labels: `-Σ ln(probs[i, y[i]])`.
/// A zero probability yields `inf`; nothing is clipped.
pub fn cross_entropy(probs: &Array2<f64>, labels: &Array1<usize>) -> f64 {
    labels
        .iter()
        .enumerate()
        .map(|(i, &label)| -probs[[i, label]].ln())
        .sum()
}

/// Sum of squared weights entering the L2 term. Biases are excluded.
pub fn regularization_penalty(model: &Model, regularization: Regularization) -> f64 {
    let w1 = model.w1.mapv(|w| w * w).sum();
    let w3 = model.w3.mapv(|w| w * w).sum();

    match regularization {
        Regularization::Nested => model.w2.mapv(|w| w * w + w3).sum() + w1,
        Regularization::Sibling => w1 + model.w2.mapv(|w| w * w).sum() + w3,
    }
}

/// Mean regularized cross-entropy over the whole dataset.
pub fn calculate_loss(model: &Model, ctx: &TrainingContext) -> f64 {
    let dataset = ctx.dataset;
    let hp = ctx.hyperparameters;

    let probs = model.forward(dataset.features()).a3;
    let mut data_loss = cross_entropy(&probs, dataset.labels());
    data_loss += hp.reg_lambda / 2.0 * regularization_penalty(model, hp.regularization);

    data_loss / dataset.len() as f64
}
