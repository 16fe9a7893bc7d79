use num_traits::{AsPrimitive, Zero};
use serde::Serialize;

use crate::{
    conditioning::ConditionedSeries,
    config::EstimatorConfig,
    sample::{Accumulator, SAMPLE_RATE_HZ, WINDOW_LEN},
};

/// Autocorrelation indexed by lag. Only the lags up to the estimator's
/// search range are filled in.
pub type CorrelationArray<A> = [A; WINDOW_LEN];

/// Dominant repetition period of the conditioned IR channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Periodicity {
    /// Lag of the correlation maximum, in samples.
    pub lag: usize,
    /// `lag` refined by parabolic interpolation over its neighbours.
    pub refined_lag: f64,
    /// r(lag)
    pub correlation: f64,
    /// r(lag) / r(0)
    pub strength: f64,
    pub bpm: u32,
}

/// Fills `out[..=max_lag]` with the biased, unnormalised autocorrelation
/// `r(τ) = Σ x[i]·x[i+τ]`.
pub fn autocorrelate<A: Accumulator>(x: &ConditionedSeries, max_lag: usize, out: &mut [A]) {
    for lag in 0..=max_lag.min(WINDOW_LEN - 1) {
        let mut sum = A::zero();
        for (&a, &b) in x.iter().zip(&x[lag..]) {
            let (a, b): (A, A) = (a.into(), b.into());
            sum += a * b;
        }
        out[lag] = sum;
    }
}

/// Locates the first correlation maximum past the zero-lag shoulder.
///
/// The search starts at the first local minimum of r(τ) (or one lag short
/// of the period of `max_bpm` if that comes later) and ends at the period
/// of `min_bpm`. A pulse at `max_bpm` whose period falls between two lags
/// peaks at the shorter one, so that lag has to be searched as well.
/// Ties go to the smallest lag. Returns `None` unless the winner is a true
/// local maximum with positive correlation.
pub fn estimate_periodicity<A: Accumulator>(
    x: &ConditionedSeries,
    config: &EstimatorConfig,
    correlation: &mut CorrelationArray<A>,
) -> Option<Periodicity> {
    let max_lag = config.max_lag().min(WINDOW_LEN - 2);
    // one extra lag so a maximum at max_lag can still be checked
    autocorrelate(x, max_lag + 1, correlation);
    let r = &correlation[..=max_lag + 1];

    let zero = A::zero();
    if r[0] <= zero {
        return None;
    }

    let mut trough = 0;
    while trough < max_lag && r[trough + 1] < r[trough] {
        trough += 1;
    }
    if trough == 0 {
        return None;
    }

    let start = trough.max(config.min_lag() - 1);
    if start > max_lag {
        return None;
    }

    let mut lag = start;
    for candidate in start + 1..=max_lag {
        if r[candidate] > r[lag] {
            lag = candidate;
        }
    }

    if r[lag] <= zero || r[lag] <= r[lag - 1] || r[lag] < r[lag + 1] {
        trace!("no correlation maximum past lag {trough}");
        return None;
    }

    let refined_lag = lag as f64 + parabolic_offset(r[lag - 1], r[lag], r[lag + 1]);
    let bpm = (60.0 * SAMPLE_RATE_HZ as f64 / refined_lag).round() as u32;

    let correlation: f64 = r[lag].as_();
    Some(Periodicity {
        lag,
        refined_lag,
        correlation,
        strength: correlation / r[0].as_(),
        bpm,
    })
}

/// Vertex offset of the parabola through three equally spaced points,
/// clamped to half a sample.
fn parabolic_offset<A: Accumulator>(y0: A, y1: A, y2: A) -> f64 {
    let (y0, y1, y2): (f64, f64, f64) = (y0.as_(), y1.as_(), y2.as_());
    let denom = y0 - 2.0 * y1 + y2;
    if denom >= 0.0 {
        return 0.0;
    }
    (0.5 * (y0 - y2) / denom).clamp(-0.5, 0.5)
}
