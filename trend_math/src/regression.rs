//! Least-squares trend fitting over an index sequence
//!
//! Both fits use the positions `0..n` of the observations as x values,
//! so a series is fitted without reference to its calendar.
//! - Linear fit: `intercept + slope * x`
//! - Quadratic fit: `a + b * x + c * x^2`, solved from the normal equations
//!   with Cramer's rule

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Determinants this small are treated as a singular system
const SINGULAR_EPSILON: f64 = 1e-10;

/// Straight-line trend `intercept + slope * x`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    /// Change per index step
    pub slope: f64,
    /// Value at index 0
    pub intercept: f64,
}

impl LinearFit {
    /// Fit a line through the points `(i, values[i])`
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.len() < 2 {
            return Err(MathError::InsufficientData(
                "Not enough data for a linear fit. Need at least 2 points.".to_string(),
            ));
        }

        let n = values.len() as f64;
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut sum_xy = 0.0;
        let mut sum_xx = 0.0;

        for (i, &y) in values.iter().enumerate() {
            let x = i as f64;
            sum_x += x;
            sum_y += y;
            sum_xy += x * y;
            sum_xx += x * x;
        }

        let denominator = n * sum_xx - sum_x * sum_x;
        if denominator.abs() < SINGULAR_EPSILON {
            return Err(MathError::CalculationError(
                "Cannot calculate slope: x values are too similar".to_string(),
            ));
        }

        let slope = (n * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / n;

        Ok(Self { slope, intercept })
    }

    /// Value of the fitted line at index `x`
    pub fn value_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Degree-2 trend `a + b * x + c * x^2`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadraticFit {
    /// Constant term
    pub a: f64,
    /// Linear coefficient
    pub b: f64,
    /// Quadratic coefficient
    pub c: f64,
}

impl QuadraticFit {
    /// Fit a parabola through the points `(i, values[i])`
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.len() < 3 {
            return Err(MathError::InsufficientData(
                "Not enough data for a quadratic fit. Need at least 3 points.".to_string(),
            ));
        }

        // Power sums: s[k] = sum of x^k
        let mut s = [0.0f64; 5];
        let mut sum_y = 0.0;
        let mut sum_xy = 0.0;
        let mut sum_xxy = 0.0;

        for (i, &y) in values.iter().enumerate() {
            let x = i as f64;
            let mut power = 1.0;
            for sk in s.iter_mut() {
                *sk += power;
                power *= x;
            }
            sum_y += y;
            sum_xy += x * y;
            sum_xxy += x * x * y;
        }

        let matrix = [[s[0], s[1], s[2]], [s[1], s[2], s[3]], [s[2], s[3], s[4]]];
        let rhs = [sum_y, sum_xy, sum_xxy];

        let det = det3(&matrix);
        if det.abs() < SINGULAR_EPSILON {
            return Err(MathError::CalculationError(
                "Cannot solve quadratic fit: normal equations are singular".to_string(),
            ));
        }

        Ok(Self {
            a: det3(&replace_column(&matrix, 0, &rhs)) / det,
            b: det3(&replace_column(&matrix, 1, &rhs)) / det,
            c: det3(&replace_column(&matrix, 2, &rhs)) / det,
        })
    }

    /// Value of the fitted curve at index `x`
    pub fn value_at(&self, x: f64) -> f64 {
        self.a + self.b * x + self.c * x * x
    }
}

fn det3(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

fn replace_column(m: &[[f64; 3]; 3], column: usize, values: &[f64; 3]) -> [[f64; 3]; 3] {
    let mut out = *m;
    for (row, &value) in out.iter_mut().zip(values.iter()) {
        row[column] = value;
    }
    out
}
