use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("line {line}: expected an `ir,red` sample pair, got {content:?}")]
    InvalidLine { line: usize, content: String },
    #[error("truncated record at byte {0}")]
    TruncatedRecord(usize),
    #[error("sample {value} at index {index} does not fit in 16 bits")]
    SampleOutOfRange { index: usize, value: u32 },
    #[error("unknown capture format {0:?}")]
    UnknownFormat(String),
    #[error("csv: {0}")]
    Csv(String),
}

impl From<csv::Error> for CodecError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}
