use std::fmt::{self, Display};

use chrono::{NaiveDateTime, TimeDelta};
use pulseox_algos::{WINDOW_SECONDS, WindowAnalysis};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct WindowReport {
    pub index: usize,
    pub time: NaiveDateTime,
    #[serde(flatten)]
    pub analysis: WindowAnalysis,
}

impl WindowReport {
    /// Report for the `index`-th window of a recording that started at `start`.
    pub fn new(index: usize, start: NaiveDateTime, analysis: WindowAnalysis) -> Self {
        let offset = TimeDelta::seconds((index * WINDOW_SECONDS) as i64);
        Self {
            index,
            time: start + offset,
            analysis,
        }
    }
}

impl Display for WindowReport {
    /// One line per window; the alternate form adds the intermediate results.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let analysis = &self.analysis;
        let vitals = &analysis.vitals;

        write!(f, "{} window {}: ", self.time.format("%Y-%m-%d %H:%M:%S"), self.index)?;
        match analysis.hr_fault {
            None => write!(f, "HR {} bpm", vitals.heart_rate)?,
            Some(fault) => write!(f, "HR invalid ({fault})")?,
        }
        match analysis.spo2_fault {
            None => write!(f, ", SpO2 {}%", vitals.spo2)?,
            Some(fault) => write!(f, ", SpO2 invalid ({fault})")?,
        }

        if f.alternate() {
            if let Some(periodicity) = &analysis.periodicity {
                f.write_fmt(format_args!(
                    "\n  lag {} ({:.2} refined), strength {:.2}",
                    periodicity.lag, periodicity.refined_lag, periodicity.strength
                ))?;
            }
            f.write_fmt(format_args!(
                "\n  peaks {:?} above {}",
                analysis.peaks, analysis.peak_threshold
            ))?;
            if let Some(bpm) = analysis.peak_interval_bpm {
                write!(f, ", spacing {bpm} bpm")?;
            }
            if let Some(ratio) = analysis.ratio {
                write!(f, "\n  ratio-of-ratios {ratio:.3}")?;
            }
        }

        Ok(())
    }
}
