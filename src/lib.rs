mod activation;
mod dataset;
mod error;
mod hyperparameters;
mod loss;
mod model;
mod optimizer;
mod trainer;
pub mod visualize;

pub use activation::{d_relu, d_sigmoid, relu, sigmoid, softmax, ActivationType};
pub use dataset::{make_moons, Dataset};
pub use error::{Error, Result};
pub use hyperparameters::{Backprop, ModelHyperparameters, Regularization, INPUT_DIM, OUTPUT_DIM};
pub use loss::{calculate_loss, cross_entropy, regularization_penalty};
pub use model::{ForwardPass, Model};
pub use optimizer::GradientDescent;
pub use trainer::{
    backward, build_model, output_delta, train, Gradients, LossRecord, TrainedModel,
    TrainingContext,
};
pub use visualize::{plot_decision_boundary, DecisionGrid, PlotConfig};
