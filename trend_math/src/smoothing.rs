//! Exponential smoothing recursions
//!
//! Contains the state machines behind the smoothing forecasts:
//! - Double Exponential Smoothing (Holt's method)
//! - Holt-Winters with multiplicative seasonal ratios
//!
//! Both are driven one observation at a time through `update`.

use crate::{check_factor, MathError, Result};

/// Double Exponential Smoothing (Holt's Method) implementation
#[derive(Debug, Clone)]
pub struct DoubleExponentialSmoothing {
    alpha: f64,
    beta: f64,
    level: Option<f64>,
    trend: Option<f64>,
}

impl DoubleExponentialSmoothing {
    /// Create a new Double Exponential Smoothing with the specified parameters
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        check_factor("Alpha", alpha)?;
        check_factor("Beta", beta)?;

        Ok(Self {
            alpha,
            beta,
            level: None,
            trend: None,
        })
    }

    /// Smooth a whole series.
    ///
    /// The level starts at the first value and the trend at the difference
    /// between the first two values (zero for a single value); every value
    /// after the first is then fed through [`update`](Self::update).
    pub fn fit(alpha: f64, beta: f64, values: &[f64]) -> Result<Self> {
        let mut smoother = Self::new(alpha, beta)?;
        let first = *values.first().ok_or_else(|| {
            MathError::InsufficientData("No data available for double exponential smoothing".to_string())
        })?;
        let initial_trend = values.get(1).map(|second| second - first).unwrap_or(0.0);

        smoother.level = Some(first);
        smoother.trend = Some(initial_trend);

        for &value in &values[1..] {
            smoother.update(value)?;
        }

        Ok(smoother)
    }

    /// Update the smoother with a new value
    pub fn update(&mut self, value: f64) -> Result<()> {
        match (self.level, self.trend) {
            (None, None) => {
                self.level = Some(value);
                self.trend = Some(0.0);
            }
            (Some(prev_level), Some(prev_trend)) => {
                let new_level = self.alpha * value + (1.0 - self.alpha) * (prev_level + prev_trend);
                let new_trend =
                    self.beta * (new_level - prev_level) + (1.0 - self.beta) * prev_trend;

                self.level = Some(new_level);
                self.trend = Some(new_trend);
            }
            _ => {
                return Err(MathError::CalculationError(
                    "Inconsistent state: level and trend should both be Some or None".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Forecast h steps ahead; the trend is held constant
    pub fn forecast(&self, h: usize) -> Result<f64> {
        match (self.level, self.trend) {
            (Some(level), Some(trend)) => Ok(level + (h as f64) * trend),
            _ => Err(MathError::InsufficientData(
                "Not enough data to make a forecast".to_string(),
            )),
        }
    }

    /// Get the current level
    pub fn level(&self) -> Result<f64> {
        self.level.ok_or_else(|| {
            MathError::InsufficientData("Level not calculated yet".to_string())
        })
    }

    /// Get the current trend
    pub fn trend(&self) -> Result<f64> {
        self.trend.ok_or_else(|| {
            MathError::InsufficientData("Trend not calculated yet".to_string())
        })
    }
}

/// Holt-Winters triple exponential smoothing with seasonal ratios.
///
/// ```text
/// Level:    L_t = α (x_t / S_i) + (1 - α)(L_{t-1} + T_{t-1})
/// Trend:    T_t = β (L_t - L_{t-1}) + (1 - β) T_{t-1}
/// Season:   S_i = γ (x_t / L_t) + (1 - γ) S_i        where i = t mod m
/// Forecast: F_{t+h} = (L_t + h T_t) S_{(t+h) mod m}
/// ```
#[derive(Debug, Clone)]
pub struct HoltWinters {
    alpha: f64,
    beta: f64,
    gamma: f64,
    level: f64,
    trend: f64,
    seasonal: Vec<f64>,
    values_seen: usize,
}

impl HoltWinters {
    /// Smooth a whole series with seasonal period `period`.
    ///
    /// The seasonal ratio of each cycle position starts as the value at that
    /// position in the first cycle divided by the mean of the whole series.
    /// The level starts at `values[0] / S_0` with zero trend, and every value
    /// after the first is fed through [`update`](Self::update).
    pub fn fit(alpha: f64, beta: f64, gamma: f64, period: usize, values: &[f64]) -> Result<Self> {
        check_factor("Alpha", alpha)?;
        check_factor("Beta", beta)?;
        check_factor("Gamma", gamma)?;
        if period < 2 {
            return Err(MathError::InvalidInput(format!(
                "Seasonal period must be at least 2, got {}",
                period
            )));
        }
        if values.len() < period {
            return Err(MathError::InsufficientData(format!(
                "Holt-Winters needs at least one full cycle of {} values, have {}",
                period,
                values.len()
            )));
        }

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        if mean == 0.0 {
            return Err(MathError::CalculationError(
                "Cannot build seasonal ratios: series mean is zero".to_string(),
            ));
        }

        let seasonal: Vec<f64> = values[..period].iter().map(|v| v / mean).collect();
        if seasonal[0] == 0.0 {
            return Err(MathError::CalculationError(
                "Cannot initialise level: first seasonal ratio is zero".to_string(),
            ));
        }

        let mut smoother = Self {
            alpha,
            beta,
            gamma,
            level: values[0] / seasonal[0],
            trend: 0.0,
            seasonal,
            values_seen: 1,
        };

        for &value in &values[1..] {
            smoother.update(value)?;
        }

        Ok(smoother)
    }

    /// Update the smoother with the next observation in the cycle
    pub fn update(&mut self, value: f64) -> Result<()> {
        let position = self.values_seen % self.period();
        let ratio = self.seasonal[position];
        if ratio == 0.0 {
            return Err(MathError::CalculationError(format!(
                "Seasonal ratio at cycle position {} is zero",
                position
            )));
        }

        let prev_level = self.level;
        let level = self.alpha * (value / ratio) + (1.0 - self.alpha) * (prev_level + self.trend);
        if level == 0.0 {
            return Err(MathError::CalculationError(
                "Level collapsed to zero".to_string(),
            ));
        }

        self.trend = self.beta * (level - prev_level) + (1.0 - self.beta) * self.trend;
        self.seasonal[position] = self.gamma * (value / level) + (1.0 - self.gamma) * ratio;
        self.level = level;
        self.values_seen += 1;

        Ok(())
    }

    /// Forecast h steps past the last observation
    pub fn forecast(&self, h: usize) -> f64 {
        let position = (self.values_seen - 1 + h) % self.period();
        (self.level + h as f64 * self.trend) * self.seasonal[position]
    }

    /// Seasonal period
    pub fn period(&self) -> usize {
        self.seasonal.len()
    }

    /// Current level
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Current trend
    pub fn trend(&self) -> f64 {
        self.trend
    }

    /// Current seasonal ratios, indexed by cycle position
    pub fn seasonal(&self) -> &[f64] {
        &self.seasonal
    }
}
