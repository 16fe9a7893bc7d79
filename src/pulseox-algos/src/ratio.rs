use crate::{
    sample::{Sample, SampleSeries},
    validity::SpO2Fault,
};

/// Pulsatile and baseline level of one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChannelLevels {
    pub ac: f64,
    pub dc: f64,
}

impl ChannelLevels {
    /// Levels of the pulse cycle spanning `from..=to`: AC is the
    /// peak-to-trough excursion, DC the mean over the cycle.
    fn over_cycle<S: Sample>(series: &SampleSeries<S>, from: usize, to: usize) -> Self {
        let cycle = series[from..=to].iter().map(|&s| s.widen());
        let (min, max) = cycle.fold((i64::MAX, i64::MIN), |(min, max), v| {
            (min.min(v), max.max(v))
        });

        let sum: i64 = series[from..to].iter().map(|&s| s.widen()).sum();

        Self {
            ac: (max - min) as f64,
            dc: sum as f64 / (to - from) as f64,
        }
    }

    fn is_usable(&self) -> bool {
        self.ac > 0.0 && self.dc > 0.0
    }

    fn perfusion(&self) -> f64 {
        self.ac / self.dc
    }
}

/// Computes `R = (AC_red / DC_red) / (AC_ir / DC_ir)` with AC and DC
/// averaged over the pulse cycles between consecutive IR peaks.
///
/// Cycles where either channel has no excursion or no baseline are skipped.
pub fn ratio_of_ratios<S: Sample>(
    ir: &SampleSeries<S>,
    red: &SampleSeries<S>,
    peaks: &[usize],
) -> Result<f64, SpO2Fault> {
    if peaks.len() < 2 {
        return Err(SpO2Fault::TooFewPeaks(peaks.len()));
    }

    let mut ir_sum = ChannelLevels::default();
    let mut red_sum = ChannelLevels::default();
    let mut cycles = 0_usize;

    for pair in peaks.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let ir_levels = ChannelLevels::over_cycle(ir, from, to);
        let red_levels = ChannelLevels::over_cycle(red, from, to);
        if !ir_levels.is_usable() || !red_levels.is_usable() {
            continue;
        }

        ir_sum.ac += ir_levels.ac;
        ir_sum.dc += ir_levels.dc;
        red_sum.ac += red_levels.ac;
        red_sum.dc += red_levels.dc;
        cycles += 1;
    }

    if cycles == 0 {
        return Err(SpO2Fault::DegenerateChannel);
    }

    // the cycle count cancels out of both perfusion indices
    Ok(red_sum.perfusion() / ir_sum.perfusion())
}
