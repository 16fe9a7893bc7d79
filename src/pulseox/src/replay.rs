use anyhow::Result;
use chrono::NaiveDateTime;
use pulseox_algos::{OximetryEstimator, Sample, WINDOW_LEN, Workspace};
use pulseox_codec::Capture;

use crate::WindowReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStyle {
    Line,
    Detailed,
    Json,
}

/// Runs every full window of `capture` through `estimator`, handing one
/// formatted report per window to `sink`. Returns the number of windows.
pub fn replay<S: Sample>(
    estimator: &OximetryEstimator,
    capture: &Capture<S>,
    start: NaiveDateTime,
    style: ReportStyle,
    mut sink: impl FnMut(String),
) -> Result<usize> {
    if capture.remainder() > 0 {
        warn!(
            "dropping {} trailing samples short of a {WINDOW_LEN} sample window",
            capture.remainder()
        );
    }

    let mut workspace = Workspace::default();
    let mut count = 0;
    for (index, (ir, red)) in capture.windows().enumerate() {
        let analysis = estimator.analyze_with(ir, red, &mut workspace);
        let report = WindowReport::new(index, start, analysis);
        sink(match style {
            ReportStyle::Line => report.to_string(),
            ReportStyle::Detailed => format!("{report:#}"),
            ReportStyle::Json => serde_json::to_string(&report)?,
        });
        count += 1;
    }

    info!("processed {count} windows");
    Ok(count)
}
