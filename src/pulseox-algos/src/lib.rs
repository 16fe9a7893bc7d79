#[macro_use]
extern crate log;

pub mod sample;
pub use sample::{Accumulator, SAMPLE_RATE_HZ, Sample, SampleSeries, WINDOW_LEN, WINDOW_SECONDS};

mod error;
pub use error::{ConfigError, WindowError};

mod config;
pub use config::EstimatorConfig;

pub mod conditioning;
pub mod autocorrelation;
pub mod peaks;
pub mod ratio;
pub mod calibration;

pub(crate) mod validity;
pub use validity::{HeartRateFault, SpO2Fault};

pub(crate) mod estimator;
pub use estimator::{
    INVALID_READING, OximetryEstimator, VitalSigns, WindowAnalysis, Workspace,
    heart_rate_and_oxygen_saturation,
};

pub mod helpers;
