use std::f64::consts::PI;

use ndarray::{Array1, Array2};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::StandardNormal;
use tracing::debug;

use crate::error::{Error, Result};
use crate::hyperparameters::{INPUT_DIM, OUTPUT_DIM};

/// A labeled set of 2-D points. Rows of `x` line up with entries of `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x: Array2<f64>,
    y: Array1<usize>,
}

impl Dataset {
    pub fn new(x: Array2<f64>, y: Array1<usize>) -> Result<Self> {
        if x.ncols() != INPUT_DIM {
            return Err(Error::InvalidDataset(format!(
                "expected {} features per example, found {}",
                INPUT_DIM,
                x.ncols()
            )));
        }
        if x.nrows() != y.len() {
            return Err(Error::InvalidDataset(format!(
                "{} feature rows but {} labels",
                x.nrows(),
                y.len()
            )));
        }
        if y.is_empty() {
            return Err(Error::InvalidDataset("no examples".to_string()));
        }
        if let Some(&label) = y.iter().find(|&&label| label >= OUTPUT_DIM) {
            return Err(Error::InvalidDataset(format!(
                "label {} is outside 0..{}",
                label, OUTPUT_DIM
            )));
        }

        Ok(Dataset { x, y })
    }

    pub fn features(&self) -> &Array2<f64> {
        &self.x
    }

    pub fn labels(&self) -> &Array1<usize> {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}

/// Evenly spaced angles over [0, π], `n` of them. A single angle is 0.
fn half_circle(n: usize) -> impl Iterator<Item = f64> {
    (0..n).map(move |i| if n > 1 { PI * i as f64 / (n - 1) as f64 } else { 0.0 })
}

/// Two interleaving half circles.
///
/// The first `n_samples / 2` points lie on the upper arc `(cos t, sin t)` and
/// are labeled 0; the rest lie on the lower arc `(1 - cos t, 0.5 - sin t)` and
/// are labeled 1. The points are shuffled, then every coordinate gets
/// Gaussian noise with standard deviation `noise`.
pub fn make_moons<R: Rng + ?Sized>(n_samples: usize, noise: f64, rng: &mut R) -> Result<Dataset> {
    if n_samples < 2 {
        return Err(Error::InvalidDataset(format!(
            "need at least 2 samples for two moons, got {}",
            n_samples
        )));
    }
    if !noise.is_finite() || noise < 0.0 {
        return Err(Error::InvalidDataset(format!(
            "noise must be finite and non-negative, got {}",
            noise
        )));
    }

    let n_outer = n_samples / 2;
    let n_inner = n_samples - n_outer;

    let mut points: Vec<([f64; 2], usize)> = Vec::with_capacity(n_samples);
    points.extend(half_circle(n_outer).map(|t| ([t.cos(), t.sin()], 0)));
    points.extend(half_circle(n_inner).map(|t| ([1.0 - t.cos(), 1.0 - t.sin() - 0.5], 1)));
    points.shuffle(rng);

    let mut x = Array2::from_shape_fn((n_samples, INPUT_DIM), |(i, j)| points[i].0[j]);
    if noise > 0.0 {
        x.mapv_inplace(|v| {
            let sample: f64 = rng.sample(StandardNormal);
            v + noise * sample
        });
    }
    let y = points.iter().map(|&(_, label)| label).collect::<Array1<usize>>();

    debug!(n_samples, n_outer, n_inner, noise, "Generated two moons");
    Dataset::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_dataset_validation() {
        assert!(Dataset::new(array![[0.0, 1.0]], array![1]).is_ok());

        let cases = vec![
            Dataset::new(array![[0.0, 1.0, 2.0]], array![0]),
            Dataset::new(array![[0.0, 1.0], [1.0, 0.0]], array![0]),
            Dataset::new(array![[0.0, 1.0]], array![2]),
            Dataset::new(Array2::zeros((0, 2)), Array1::zeros(0)),
        ];
        for case in cases {
            assert!(matches!(case, Err(Error::InvalidDataset(_))));
        }
    }

    #[test]
    fn test_noiseless_moons_lie_on_arcs() {
        let mut rng = StdRng::seed_from_u64(0);
        let data = make_moons(101, 0.0, &mut rng).unwrap();

        assert_eq!(data.len(), 101);
        assert_eq!(data.labels().iter().filter(|&&l| l == 0).count(), 50);
        assert_eq!(data.labels().iter().filter(|&&l| l == 1).count(), 51);

        for (row, &label) in data.features().rows().into_iter().zip(data.labels().iter()) {
            let (cx, cy) = if label == 0 { (0.0, 0.0) } else { (1.0, 0.5) };
            let radius = ((row[0] - cx).powi(2) + (row[1] - cy).powi(2)).sqrt();
            assert_abs_diff_eq!(radius, 1.0, epsilon = 1e-12);
            if label == 0 {
                assert!(row[1] >= -1e-12);
            } else {
                assert!(row[1] <= 0.5 + 1e-12);
            }
        }
    }

    #[test]
    fn test_moons_are_shuffled() {
        let mut rng = StdRng::seed_from_u64(0);
        let data = make_moons(200, 0.0, &mut rng).unwrap();
        let first_half_zeros = data.labels().iter().take(100).filter(|&&l| l == 0).count();
        assert!(first_half_zeros < 100);
    }

    #[test]
    fn test_moons_reproducible_from_seed() {
        let a = make_moons(200, 0.2, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = make_moons(200, 0.2, &mut StdRng::seed_from_u64(7)).unwrap();
        let c = make_moons(200, 0.2, &mut StdRng::seed_from_u64(8)).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_moons_rejects_bad_arguments() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(make_moons(1, 0.1, &mut rng).is_err());
        assert!(make_moons(10, -0.1, &mut rng).is_err());
    }
}
