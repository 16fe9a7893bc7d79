use crate::sample::{Sample, SampleSeries, WINDOW_LEN};

/// Width of the moving-average smoothing filter.
pub const MA_WINDOW: usize = 4;

/// DC-free, smoothed copy of one channel.
pub type ConditionedSeries = [i64; WINDOW_LEN];

/// Integer mean of one window, summed in 64 bits.
pub fn dc_level<S: Sample>(series: &SampleSeries<S>) -> i64 {
    let sum: i64 = series.iter().map(|&s| s.widen()).sum();
    sum / WINDOW_LEN as i64
}

/// Removes the DC level of `series` and smooths it with a forward
/// moving average of [`MA_WINDOW`] samples.
///
/// The last `MA_WINDOW - 1` outputs average over the samples that remain,
/// so the output keeps the input length.
pub fn condition<S: Sample>(series: &SampleSeries<S>, out: &mut ConditionedSeries) {
    let mean = dc_level(series);
    for (o, &s) in out.iter_mut().zip(series) {
        *o = s.widen() - mean;
    }

    // in place: every output only reads samples at or after its own index
    for k in 0..WINDOW_LEN {
        let end = (k + MA_WINDOW).min(WINDOW_LEN);
        let sum: i64 = out[k..end].iter().sum();
        out[k] = sum / (end - k) as i64;
    }
}
