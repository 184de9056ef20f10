//! Decision-boundary rendering.
//!
//! The classifier is sampled on a regular grid covering the dataset's
//! bounding box, and the resulting class map is written out as a PNG with the
//! training points drawn on top.

use std::path::Path;

use image::{Rgb, RgbImage};
use ndarray::{Array1, Array2, Axis};
use tracing::info;

use crate::dataset::Dataset;
use crate::error::{Error, Result};

/// End colours of the Spectral colour map
pub mod colors {
    use image::Rgb;

    pub const SPECTRAL_LOW: Rgb<u8> = Rgb([158, 1, 66]);
    pub const SPECTRAL_HIGH: Rgb<u8> = Rgb([94, 79, 162]);
    pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
}

#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Padding added on every side of the data's bounding box
    pub margin: f64,
    /// Grid spacing; one pixel per grid cell
    pub step: f64,
    /// Radius of the scatter markers, in pixels
    pub point_radius: u32,
    /// Colour per class, used for both regions (tinted) and points
    pub class_colors: [Rgb<u8>; 2],
    /// How far region fills are blended towards white
    pub region_tint: f64,
    pub outline: Rgb<u8>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            margin: 0.5,
            step: 0.01,
            point_radius: 4,
            class_colors: [colors::SPECTRAL_LOW, colors::SPECTRAL_HIGH],
            region_tint: 0.6,
            outline: colors::BLACK,
        }
    }
}

impl PlotConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(Error::InvalidPlotConfig {
                name: "step",
                reason: format!("must be finite and positive, got {}", self.step),
            });
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(Error::InvalidPlotConfig {
                name: "margin",
                reason: format!("must be finite and non-negative, got {}", self.margin),
            });
        }
        Ok(())
    }

    fn region_color(&self, class: usize) -> Rgb<u8> {
        match self.class_colors.get(class) {
            Some(&c) => interpolate_color(c, colors::WHITE, self.region_tint),
            None => self.outline,
        }
    }

    fn point_color(&self, class: usize) -> Rgb<u8> {
        self.class_colors.get(class).copied().unwrap_or(self.outline)
    }
}

/// Interpolate between two colors
pub fn interpolate_color(c1: Rgb<u8>, c2: Rgb<u8>, t: f64) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| ((1.0 - t) * a as f64 + t * b as f64).round() as u8;
    Rgb([mix(c1.0[0], c2.0[0]), mix(c1.0[1], c2.0[1]), mix(c1.0[2], c2.0[2])])
}

/// `start, start + step, ...` up to but excluding `stop`
fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let n = ((stop - start) / step).ceil().max(0.0) as usize;
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// Classifier output sampled over a padded bounding box.
#[derive(Debug, Clone)]
pub struct DecisionGrid {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    /// `classes[[row, col]]` is the class at `(xs[col], ys[row])`
    pub classes: Array2<usize>,
    pub step: f64,
}

impl DecisionGrid {
    /// Evaluate `classify` once over every grid point, passing the points as
    /// a single `[rows·cols × 2]` batch ordered row by row.
    pub fn evaluate<F>(dataset: &Dataset, config: &PlotConfig, classify: F) -> Result<Self>
    where
        F: Fn(&Array2<f64>) -> Array1<usize>,
    {
        config.validate()?;

        let x = dataset.features();
        let column_bounds = |col: usize| {
            let values = x.index_axis(Axis(1), col);
            let min = values.fold(f64::INFINITY, |m, &v| m.min(v));
            let max = values.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
            (min - config.margin, max + config.margin)
        };
        let (x_min, x_max) = column_bounds(0);
        let (y_min, y_max) = column_bounds(1);

        let xs = arange(x_min, x_max, config.step);
        let ys = arange(y_min, y_max, config.step);
        let (rows, cols) = (ys.len(), xs.len());

        let points = Array2::from_shape_fn((rows * cols, 2), |(k, j)| {
            if j == 0 { xs[k % cols] } else { ys[k / cols] }
        });
        let predictions = classify(&points);
        if predictions.len() != rows * cols {
            return Err(Error::ShapeMismatch {
                what: "grid predictions",
                expected: (rows * cols, 1),
                found: (predictions.len(), 1),
            });
        }
        let classes = Array2::from_shape_fn((rows, cols), |(r, c)| predictions[r * cols + c]);

        Ok(DecisionGrid { xs, ys, classes, step: config.step })
    }

    pub fn width(&self) -> usize {
        self.xs.len()
    }

    pub fn height(&self) -> usize {
        self.ys.len()
    }

    /// Grid cell containing `(x, y)`, as `(row, col)`
    fn cell(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let (&x0, &y0) = (self.xs.first()?, self.ys.first()?);
        let col = ((x - x0) / self.step).floor();
        let row = ((y - y0) / self.step).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        (row < self.height() && col < self.width()).then_some((row, col))
    }

    /// Predicted class at the grid cell containing `(x, y)`
    pub fn class_at(&self, x: f64, y: f64) -> Option<usize> {
        self.cell(x, y).map(|(row, col)| self.classes[[row, col]])
    }

    /// Draw the class regions with the dataset scattered on top. The y axis
    /// points up, so grid row 0 is the bottom row of the image.
    pub fn render(&self, dataset: &Dataset, config: &PlotConfig) -> RgbImage {
        let (width, height) = (self.width() as u32, self.height() as u32);
        let mut img = RgbImage::new(width, height);

        for ((row, col), &class) in self.classes.indexed_iter() {
            let py = height - 1 - row as u32;
            img.put_pixel(col as u32, py, config.region_color(class));
        }

        let features = dataset.features();
        for (point, &label) in features.rows().into_iter().zip(dataset.labels().iter()) {
            if let Some((row, col)) = self.cell(point[0], point[1]) {
                let cx = col as i64;
                let cy = (height - 1) as i64 - row as i64;
                draw_marker(
                    &mut img,
                    cx,
                    cy,
                    config.point_radius as i64,
                    config.point_color(label),
                    config.outline,
                );
            }
        }

        img
    }
}

/// Filled disc with a one-pixel outline, clipped to the image
fn draw_marker(img: &mut RgbImage, cx: i64, cy: i64, radius: i64, fill: Rgb<u8>, outline: Rgb<u8>) {
    let (width, height) = (img.width() as i64, img.height() as i64);
    let outer = radius * radius;
    let inner = (radius - 1).max(0).pow(2);

    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let (px, py) = (cx + dx, cy + dy);
            let d = dx * dx + dy * dy;
            if d > outer || px < 0 || py < 0 || px >= width || py >= height {
                continue;
            }
            let color = if d > inner { outline } else { fill };
            img.put_pixel(px as u32, py as u32, color);
        }
    }
}

/// Sample `classify` over the dataset's padded bounding box and write the
/// decision regions with the training points to a PNG at `path`.
pub fn plot_decision_boundary<F, P>(
    classify: F,
    dataset: &Dataset,
    config: &PlotConfig,
    path: P,
) -> Result<DecisionGrid>
where
    F: Fn(&Array2<f64>) -> Array1<usize>,
    P: AsRef<Path>,
{
    let grid = DecisionGrid::evaluate(dataset, config, classify)?;
    let img = grid.render(dataset, config);
    img.save(path.as_ref())?;

    info!(
        width = grid.width(),
        height = grid.height(),
        path = %path.as_ref().display(),
        "Saved decision boundary"
    );
    Ok(grid)
}
