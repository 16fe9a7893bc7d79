use serde::Serialize;
use thiserror::Error;

use crate::{
    autocorrelation::Periodicity, calibration::spo2_from_ratio, config::EstimatorConfig,
};

/// Why a heart-rate estimate was rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Serialize)]
pub enum HeartRateFault {
    #[error("no periodic correlation maximum")]
    NoPeriodicity,
    #[error("correlation strength {0:.2} too weak")]
    WeakCorrelation(f64),
    #[error("{0} bpm outside the supported range")]
    OutOfRange(u32),
}

/// Why an SpO2 estimate was rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Serialize)]
pub enum SpO2Fault {
    #[error("{0} IR peaks, at least two needed")]
    TooFewPeaks(usize),
    #[error("no pulse cycle with positive AC and DC on both channels")]
    DegenerateChannel,
    #[error("ratio-of-ratios {0:.3} outside calibration")]
    RatioOutOfRange(f64),
}

pub fn classify_heart_rate(
    periodicity: Option<&Periodicity>,
    config: &EstimatorConfig,
) -> Result<u32, HeartRateFault> {
    let periodicity = periodicity.ok_or(HeartRateFault::NoPeriodicity)?;

    if periodicity.strength < config.min_correlation {
        return Err(HeartRateFault::WeakCorrelation(periodicity.strength));
    }

    if !(config.min_bpm..=config.max_bpm).contains(&periodicity.bpm) {
        return Err(HeartRateFault::OutOfRange(periodicity.bpm));
    }

    Ok(periodicity.bpm)
}

pub fn classify_spo2(ratio: Result<f64, SpO2Fault>) -> Result<u8, SpO2Fault> {
    let ratio = ratio?;
    spo2_from_ratio(ratio).ok_or(SpO2Fault::RatioOutOfRange(ratio))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn periodicity(bpm: u32, strength: f64) -> Periodicity {
        Periodicity {
            lag: 21,
            refined_lag: 20.8,
            correlation: strength * 1e9,
            strength,
            bpm,
        }
    }

    #[test]
    fn accepts_strong_in_range_rate() {
        let config = EstimatorConfig::default();
        assert_eq!(classify_heart_rate(Some(&periodicity(72, 0.8)), &config), Ok(72));
    }

    #[test]
    fn rejects_missing_periodicity() {
        let config = EstimatorConfig::default();
        assert_eq!(
            classify_heart_rate(None, &config),
            Err(HeartRateFault::NoPeriodicity)
        );
    }

    #[test]
    fn rejects_weak_correlation() {
        let config = EstimatorConfig::default();
        assert_eq!(
            classify_heart_rate(Some(&periodicity(72, 0.1)), &config),
            Err(HeartRateFault::WeakCorrelation(0.1))
        );
    }

    #[test]
    fn rejects_out_of_range_rate() {
        let config = EstimatorConfig {
            max_bpm: 150,
            ..Default::default()
        };
        assert_eq!(
            classify_heart_rate(Some(&periodicity(168, 0.9)), &config),
            Err(HeartRateFault::OutOfRange(168))
        );
    }

    #[test]
    fn spo2_faults_pass_through() {
        assert_eq!(
            classify_spo2(Err(SpO2Fault::TooFewPeaks(1))),
            Err(SpO2Fault::TooFewPeaks(1))
        );
        assert_eq!(classify_spo2(Ok(2.5)), Err(SpO2Fault::RatioOutOfRange(2.5)));
        assert_eq!(classify_spo2(Ok(1.0)), Ok(80));
    }

    #[test]
    fn faults_read_well() {
        assert_eq!(
            SpO2Fault::TooFewPeaks(1).to_string(),
            "1 IR peaks, at least two needed"
        );
        assert_eq!(
            HeartRateFault::WeakCorrelation(0.123).to_string(),
            "correlation strength 0.12 too weak"
        );
    }
}
