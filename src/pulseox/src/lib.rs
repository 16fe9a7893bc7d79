#[macro_use]
extern crate log;

mod report;
pub use report::WindowReport;

mod synth;
pub use synth::SyntheticPulse;

mod replay;
pub use replay::{ReportStyle, replay};
