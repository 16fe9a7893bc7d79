use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("{channel} channel holds {len} samples, expected {expected}")]
    LengthMismatch {
        channel: &'static str,
        len: usize,
        expected: usize,
    },
}

#[derive(Debug, Error, PartialEq)]
#[error("invalid estimator config: {0}")]
pub struct ConfigError(pub String);
