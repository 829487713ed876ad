//! Piecewise-linear state-of-charge profiles.
//!
//! A [`SocFunction`] maps elapsed time to the best achievable SOC. It is
//! described by breakpoints `(times[k], socs[k])` and, per segment, a slope
//! and y-intercept so a segment can be evaluated in constant time.

use itertools::Itertools;

use crate::error::LabelError;

#[derive(Debug, Clone, PartialEq)]
pub struct SocFunction {
    times: Vec<f64>,
    socs: Vec<f64>,
    slope: Vec<f64>,
    y_intercept: Vec<f64>,
}

impl SocFunction {
    /// Builds a profile from breakpoints and per-segment slopes, deriving
    /// `y_intercept[i] = socs[i] - slope[i] * times[i]`.
    pub fn new(times: Vec<f64>, socs: Vec<f64>, slope: Vec<f64>) -> Result<Self, LabelError> {
        check_points(&times, &socs)?;
        check_segments("slope", &slope, times.len())?;
        let y_intercept = times
            .iter()
            .zip(&socs)
            .zip(&slope)
            .map(|((t, s), m)| s - m * t)
            .collect();
        Ok(Self {
            times,
            socs,
            slope,
            y_intercept,
        })
    }

    /// Builds a profile with explicitly supplied intercepts.
    pub fn with_intercepts(
        times: Vec<f64>,
        socs: Vec<f64>,
        slope: Vec<f64>,
        y_intercept: Vec<f64>,
    ) -> Result<Self, LabelError> {
        check_points(&times, &socs)?;
        check_segments("slope", &slope, times.len())?;
        check_segments("y_intercept", &y_intercept, times.len())?;
        Ok(Self {
            times,
            socs,
            slope,
            y_intercept,
        })
    }

    /// Builds a profile passing through the given breakpoints.
    pub fn from_points(times: Vec<f64>, socs: Vec<f64>) -> Result<Self, LabelError> {
        check_points(&times, &socs)?;
        let slope = times
            .iter()
            .zip(&socs)
            .tuple_windows()
            .map(|((t0, s0), (t1, s1))| (s1 - s0) / (t1 - t0))
            .collect();
        Self::new(times, socs, slope)
    }

    /// SOC reachable at `time`.
    ///
    /// Returns `f64::NEG_INFINITY` before the first breakpoint (the time is
    /// infeasible) and the last SOC at or after the final breakpoint.
    pub fn evaluate(&self, time: f64) -> f64 {
        if time.is_nan() || time < self.first_time() {
            return f64::NEG_INFINITY;
        }
        if time >= self.last_time() {
            return self.last_soc();
        }
        // largest i with times[i] <= time; at least 1 because times[0] <= time
        let i = self.times.partition_point(|&t| t <= time) - 1;
        self.slope[i] * time + self.y_intercept[i]
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn socs(&self) -> &[f64] {
        &self.socs
    }

    pub fn slope(&self) -> &[f64] {
        &self.slope
    }

    pub fn y_intercept(&self) -> &[f64] {
        &self.y_intercept
    }

    pub fn num_points(&self) -> usize {
        self.times.len()
    }

    pub fn first_time(&self) -> f64 {
        self.times[0]
    }

    pub fn last_time(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    pub fn first_soc(&self) -> f64 {
        self.socs[0]
    }

    pub fn last_soc(&self) -> f64 {
        self.socs[self.socs.len() - 1]
    }
}

fn check_points(times: &[f64], socs: &[f64]) -> Result<(), LabelError> {
    if times.len() < 2 {
        return Err(LabelError::TooFewBreakpoints(times.len()));
    }
    if socs.len() != times.len() {
        return Err(LabelError::LengthMismatch {
            what: "socs",
            expected: times.len(),
            found: socs.len(),
        });
    }
    check_finite("times", times)?;
    check_finite("socs", socs)?;
    if let Some((index, _)) = times.iter().tuple_windows().find_position(|(a, b)| a >= b) {
        return Err(LabelError::NonIncreasingTimes { index: index + 1 });
    }
    if let Some((index, _)) = socs.iter().tuple_windows().find_position(|(a, b)| a > b) {
        return Err(LabelError::DecreasingSoc { index: index + 1 });
    }
    Ok(())
}

fn check_segments(what: &'static str, values: &[f64], num_points: usize) -> Result<(), LabelError> {
    if values.len() != num_points - 1 {
        return Err(LabelError::LengthMismatch {
            what,
            expected: num_points - 1,
            found: values.len(),
        });
    }
    check_finite(what, values)
}

fn check_finite(what: &'static str, values: &[f64]) -> Result<(), LabelError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(LabelError::NonFinite { what, index }),
        None => Ok(()),
    }
}
