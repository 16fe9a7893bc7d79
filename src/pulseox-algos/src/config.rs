use serde::Deserialize;

use crate::{
    error::ConfigError,
    sample::{SAMPLE_RATE_HZ, WINDOW_LEN},
};

/// Runtime thresholds of the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Slowest heart rate reported as valid.
    pub min_bpm: u32,
    /// Fastest heart rate reported as valid.
    pub max_bpm: u32,
    /// Minimum r(τ*) / r(0) for a periodicity to count as usable.
    pub min_correlation: f64,
    pub peak_min_distance: usize,
    pub max_peaks: usize,
    pub peak_height_floor: i64,
    pub peak_height_ceiling: i64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            min_bpm: 40,
            max_bpm: 180,
            min_correlation: 0.3,
            peak_min_distance: 4,
            max_peaks: 15,
            peak_height_floor: 30,
            peak_height_ceiling: 60,
        }
    }
}

impl EstimatorConfig {
    /// Shortest lag examined, i.e. the period of `max_bpm` in samples.
    pub fn min_lag(&self) -> usize {
        (60 * SAMPLE_RATE_HZ).div_ceil(self.max_bpm.max(1) as usize)
    }

    /// Longest lag examined, i.e. the period of `min_bpm` in samples.
    pub fn max_lag(&self) -> usize {
        60 * SAMPLE_RATE_HZ / self.min_bpm.max(1) as usize
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_bpm == 0 || self.min_bpm >= self.max_bpm {
            return Err(ConfigError(format!(
                "bpm range {}..{} is empty",
                self.min_bpm, self.max_bpm
            )));
        }

        // the refined lag needs a neighbour on each side of τ*
        if self.min_lag() < 2 || self.max_lag() + 1 >= WINDOW_LEN {
            return Err(ConfigError(format!(
                "lag range {}..={} does not fit a {WINDOW_LEN} sample window",
                self.min_lag(),
                self.max_lag()
            )));
        }

        if !(self.min_correlation > 0.0 && self.min_correlation <= 1.0) {
            return Err(ConfigError(format!(
                "min_correlation {} outside (0, 1]",
                self.min_correlation
            )));
        }

        if self.peak_min_distance == 0 || self.max_peaks == 0 {
            return Err(ConfigError(
                "peak distance and peak count must be positive".to_owned(),
            ));
        }

        if self.peak_height_floor > self.peak_height_ceiling {
            return Err(ConfigError(format!(
                "peak height floor {} above ceiling {}",
                self.peak_height_floor, self.peak_height_ceiling
            )));
        }

        Ok(())
    }
}
