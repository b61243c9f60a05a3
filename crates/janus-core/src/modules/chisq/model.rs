use super::parser::{ChiSquarePoint, TransitionLevels};
use crate::domain::{JanusError, JanusResult};
use crate::modules::serialization::format_repr_f64;

/// Row-major grid of optional values; `None` cells are drawn masked.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceMatrix {
    rows: usize,
    columns: usize,
    cells: Vec<Option<f64>>,
}

impl SurfaceMatrix {
    fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![None; rows * columns],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.cells[row * self.columns + column]
    }

    fn set(&mut self, row: usize, column: usize, value: f64) {
        self.cells[row * self.columns + column] = Some(value);
    }

    /// Smallest and largest finite value present, if any.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.cells
            .iter()
            .flatten()
            .copied()
            .filter(|value| value.is_finite())
            .fold(None, |range, value| match range {
                None => Some((value, value)),
                Some((low, high)) => Some((low.min(value), high.max(value))),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementBounds {
    pub min: f64,
    pub max: f64,
}

impl ElementBounds {
    fn include(bounds: Option<Self>, value: f64) -> Option<Self> {
        Some(match bounds {
            None => Self {
                min: value,
                max: value,
            },
            Some(bounds) => Self {
                min: bounds.min.min(value),
                max: bounds.max.max(value),
            },
        })
    }
}

/// A chi-square surface over two E2 matrix elements.
///
/// Columns follow the first matrix element ascending, rows the second one
/// descending so row zero is the top of the image.
#[derive(Debug, Clone, PartialEq)]
pub struct ChiSquareSurface {
    pub x_elements: Vec<f64>,
    pub y_elements: Vec<f64>,
    pub projectile: SurfaceMatrix,
    pub target: SurfaceMatrix,
    pub total: SurfaceMatrix,
    pub one_sigma: SurfaceMatrix,
    pub chi_min: f64,
    pub best_fit: (f64, f64),
    pub x_bounds: ElementBounds,
    pub y_bounds: ElementBounds,
}

impl ChiSquareSurface {
    pub fn from_points(points: &[ChiSquarePoint]) -> JanusResult<Self> {
        let chi_min = points
            .iter()
            .map(|point| point.total)
            .filter(|total| !total.is_nan())
            .fold(f64::INFINITY, f64::min);
        if !chi_min.is_finite() {
            return Err(JanusError::computation(
                "RUN.CHISQ_MINIMUM",
                "chi-square surface has no finite total chi-square value",
            ));
        }

        let x_elements = unique_sorted(points.iter().map(|point| point.x_element), false);
        let y_elements = unique_sorted(points.iter().map(|point| point.y_element), true);
        let (rows, columns) = (y_elements.len(), x_elements.len());

        let mut projectile = SurfaceMatrix::new(rows, columns);
        let mut target = SurfaceMatrix::new(rows, columns);
        let mut total = SurfaceMatrix::new(rows, columns);
        let mut one_sigma = SurfaceMatrix::new(rows, columns);
        let mut best_fit = None;
        let mut x_bounds = None;
        let mut y_bounds = None;

        for point in points {
            let column = position_of(&x_elements, point.x_element)?;
            let row = position_of(&y_elements, point.y_element)?;
            projectile.set(row, column, point.projectile);
            target.set(row, column, point.target);
            total.set(row, column, point.total);

            if point.total <= chi_min + 1.0 {
                one_sigma.set(row, column, point.total);
                x_bounds = ElementBounds::include(x_bounds, point.x_element);
                y_bounds = ElementBounds::include(y_bounds, point.y_element);
                if point.total == chi_min {
                    best_fit = Some((point.x_element, point.y_element));
                }
            }
        }

        match (best_fit, x_bounds, y_bounds) {
            (Some(best_fit), Some(x_bounds), Some(y_bounds)) => Ok(Self {
                x_elements,
                y_elements,
                projectile,
                target,
                total,
                one_sigma,
                chi_min,
                best_fit,
                x_bounds,
                y_bounds,
            }),
            _ => Err(JanusError::internal(
                "SYS.CHISQ_BEST_FIT",
                "minimum chi-square point was not found in the one-sigma region",
            )),
        }
    }

    /// Axis labels, best fit and one-sigma bounds as printed after plotting.
    pub fn render_summary(&self, levels: &TransitionLevels) -> String {
        format!(
            "X axis: {}\nY axis: {}\n\
             Matrix Element One Best Fit: ({})\n\
             Matrix Element One Bounds: ({},{})\n\
             Matrix Element Two Best Fit: ({})\n\
             Matrix Element Two Bounds: ({},{})\n",
            levels.x_axis_label(),
            levels.y_axis_label(),
            format_repr_f64(self.best_fit.0),
            format_repr_f64(self.x_bounds.min),
            format_repr_f64(self.x_bounds.max),
            format_repr_f64(self.best_fit.1),
            format_repr_f64(self.y_bounds.min),
            format_repr_f64(self.y_bounds.max),
        )
    }
}

fn unique_sorted(values: impl Iterator<Item = f64>, descending: bool) -> Vec<f64> {
    let mut unique: Vec<f64> = values.collect();
    unique.sort_by(f64::total_cmp);
    unique.dedup();
    if descending {
        unique.reverse();
    }
    unique
}

fn position_of(axis: &[f64], value: f64) -> JanusResult<usize> {
    axis.iter().position(|candidate| *candidate == value).ok_or_else(|| {
        JanusError::input_validation(
            "INPUT.CHISQ_VALUE",
            format!("matrix element {} cannot be placed on the surface grid", value),
        )
    })
}
