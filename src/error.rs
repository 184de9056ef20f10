use thiserror::Error;

/// Errors surfaced at the API boundary. Matrix products inside the forward
/// and backward passes never return errors; inputs are checked before they
/// get there.
#[derive(Debug, Error)]
pub enum Error {
    #[error("shape mismatch for {what}: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("invalid hyperparameter `{name}`: {reason}")]
    InvalidHyperparameter {
        name: &'static str,
        reason: String,
    },

    #[error("invalid plot setting `{name}`: {reason}")]
    InvalidPlotConfig {
        name: &'static str,
        reason: String,
    },

    #[error("failed to render decision boundary: {0}")]
    Render(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
