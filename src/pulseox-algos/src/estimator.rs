use serde::Serialize;

use crate::{
    autocorrelation::{CorrelationArray, Periodicity, estimate_periodicity},
    conditioning::{ConditionedSeries, condition},
    config::EstimatorConfig,
    error::{ConfigError, WindowError},
    peaks::{PeakList, find_peaks},
    ratio::ratio_of_ratios,
    sample::{SAMPLE_RATE_HZ, Sample, SampleSeries, WINDOW_LEN},
    validity::{HeartRateFault, SpO2Fault, classify_heart_rate, classify_spo2},
};

/// Value reported in place of a reading that failed validation.
pub const INVALID_READING: i32 = -999;

/// The four outputs of one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VitalSigns {
    pub heart_rate: i32,
    pub hr_valid: bool,
    pub spo2: i32,
    pub spo2_valid: bool,
}

/// Scratch buffers for one estimation. Keep one per caller to estimate
/// repeatedly without touching fresh stack space each time.
pub struct Workspace<S: Sample> {
    conditioned: ConditionedSeries,
    correlation: CorrelationArray<S::Acc>,
    peaks: PeakList,
}

impl<S: Sample> Default for Workspace<S> {
    fn default() -> Self {
        Self {
            conditioned: [0; WINDOW_LEN],
            correlation: [S::Acc::default(); WINDOW_LEN],
            peaks: PeakList::default(),
        }
    }
}

/// Outputs of one window together with the intermediate results that
/// produced them.
#[derive(Debug, Clone, Serialize)]
pub struct WindowAnalysis {
    pub vitals: VitalSigns,
    pub periodicity: Option<Periodicity>,
    pub hr_fault: Option<HeartRateFault>,
    pub peak_threshold: i64,
    pub peaks: PeakList,
    /// Heart rate from the mean IR peak spacing, for comparison with the
    /// correlation estimate.
    pub peak_interval_bpm: Option<u32>,
    pub ratio: Option<f64>,
    pub spo2_fault: Option<SpO2Fault>,
}

#[derive(Debug, Clone, Default)]
pub struct OximetryEstimator {
    config: EstimatorConfig,
}

impl OximetryEstimator {
    pub fn new(config: EstimatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    pub fn estimate<S: Sample>(&self, ir: &SampleSeries<S>, red: &SampleSeries<S>) -> VitalSigns {
        self.estimate_with(ir, red, &mut Workspace::default())
    }

    pub fn estimate_with<S: Sample>(
        &self,
        ir: &SampleSeries<S>,
        red: &SampleSeries<S>,
        workspace: &mut Workspace<S>,
    ) -> VitalSigns {
        self.analyze_with(ir, red, workspace).vitals
    }

    /// Estimates from buffers whose length is only known at runtime.
    pub fn estimate_slices<S: Sample>(&self, ir: &[S], red: &[S]) -> Result<VitalSigns, WindowError> {
        let ir = window(ir, "IR")?;
        let red = window(red, "red")?;
        Ok(self.estimate(ir, red))
    }

    pub fn analyze<S: Sample>(&self, ir: &SampleSeries<S>, red: &SampleSeries<S>) -> WindowAnalysis {
        self.analyze_with(ir, red, &mut Workspace::default())
    }

    pub fn analyze_with<S: Sample>(
        &self,
        ir: &SampleSeries<S>,
        red: &SampleSeries<S>,
        workspace: &mut Workspace<S>,
    ) -> WindowAnalysis {
        let Workspace {
            conditioned,
            correlation,
            peaks,
        } = workspace;

        condition(ir, conditioned);

        let periodicity = estimate_periodicity(conditioned, &self.config, correlation);
        let heart_rate = classify_heart_rate(periodicity.as_ref(), &self.config);

        let peak_threshold = self.peak_threshold(conditioned);
        find_peaks(
            conditioned.as_slice(),
            peak_threshold,
            self.config.peak_min_distance,
            self.config.max_peaks,
            peaks,
        );

        let ratio = ratio_of_ratios(ir, red, peaks);
        let spo2 = classify_spo2(ratio);

        debug!(
            "window: lag {:?}, {} peaks above {}, ratio {:?}",
            periodicity.map(|p| p.refined_lag),
            peaks.len(),
            peak_threshold,
            ratio.ok()
        );

        let vitals = VitalSigns {
            heart_rate: heart_rate.map_or(INVALID_READING, |bpm| bpm as i32),
            hr_valid: heart_rate.is_ok(),
            spo2: spo2.map_or(INVALID_READING, i32::from),
            spo2_valid: spo2.is_ok(),
        };

        WindowAnalysis {
            vitals,
            periodicity,
            hr_fault: heart_rate.err(),
            peak_threshold,
            peaks: *peaks,
            peak_interval_bpm: peak_interval_bpm(peaks),
            ratio: ratio.ok(),
            spo2_fault: spo2.err(),
        }
    }

    /// Mean absolute level of the conditioned IR channel, clamped to the
    /// configured bounds.
    fn peak_threshold(&self, conditioned: &ConditionedSeries) -> i64 {
        let sum: i64 = conditioned.iter().map(|v| v.abs()).sum();
        (sum / WINDOW_LEN as i64).clamp(self.config.peak_height_floor, self.config.peak_height_ceiling)
    }
}

fn window<'a, S>(samples: &'a [S], channel: &'static str) -> Result<&'a SampleSeries<S>, WindowError> {
    samples.try_into().map_err(|_| WindowError::LengthMismatch {
        channel,
        len: samples.len(),
        expected: WINDOW_LEN,
    })
}

fn peak_interval_bpm(peaks: &[usize]) -> Option<u32> {
    let (first, last) = (peaks.first()?, peaks.last()?);
    if peaks.len() < 2 {
        return None;
    }
    let spacing = (last - first) as f64 / (peaks.len() - 1) as f64;
    Some((60.0 * SAMPLE_RATE_HZ as f64 / spacing).round() as u32)
}

/// Heart rate and SpO2 of one window with the default thresholds.
pub fn heart_rate_and_oxygen_saturation<S: Sample>(
    ir: &SampleSeries<S>,
    red: &SampleSeries<S>,
) -> VitalSigns {
    OximetryEstimator::default().estimate(ir, red)
}
