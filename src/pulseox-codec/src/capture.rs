use std::{io, path::Path, str::FromStr};

use csv::{ReaderBuilder, StringRecord, Trim, Writer};
use pulseox_algos::{SampleSeries, WINDOW_LEN};

use crate::{
    error::CodecError,
    helpers::{BufferReader, ShortBufferError},
};

/// Bytes per binary record: little-endian `u32` IR then `u32` red.
const RECORD_SIZE: usize = 8;

const CSV_HEADER: [&str; 2] = ["ir", "red"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFormat {
    Csv,
    Binary,
}

impl CaptureFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "csv" | "txt" => Some(Self::Csv),
            "bin" | "raw" => Some(Self::Binary),
            _ => None,
        }
    }
}

impl FromStr for CaptureFormat {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(Self::Csv),
            "bin" | "binary" => Ok(Self::Binary),
            _ => Err(CodecError::UnknownFormat(s.to_owned())),
        }
    }
}

/// Synchronously sampled IR and red channels of a recording.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capture<S> {
    pub ir: Vec<S>,
    pub red: Vec<S>,
}

impl<S: Copy> Capture<S> {
    pub fn push(&mut self, ir: S, red: S) {
        self.ir.push(ir);
        self.red.push(red);
    }

    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.ir.len().min(self.red.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consecutive full windows. A trailing partial window is skipped.
    pub fn windows(&self) -> impl Iterator<Item = (&SampleSeries<S>, &SampleSeries<S>)> {
        self.ir
            .chunks_exact(WINDOW_LEN)
            .zip(self.red.chunks_exact(WINDOW_LEN))
            .filter_map(|(ir, red)| Some((ir.try_into().ok()?, red.try_into().ok()?)))
    }

    /// Samples left over after the last full window.
    pub fn remainder(&self) -> usize {
        self.len() % WINDOW_LEN
    }
}

impl Capture<u32> {
    pub fn decode(format: CaptureFormat, bytes: &[u8]) -> Result<Self, CodecError> {
        let capture = match format {
            CaptureFormat::Csv => Self::from_csv(bytes)?,
            CaptureFormat::Binary => Self::from_binary(bytes)?,
        };
        debug!(
            "decoded {} samples per channel, {} full windows",
            capture.len(),
            capture.len() / WINDOW_LEN
        );
        Ok(capture)
    }

    /// Parses `ir,red` records. Blank lines and `#` comments are skipped,
    /// as is an `ir,red` header on the first record.
    pub fn from_csv(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .trim(Trim::All)
            .from_reader(bytes);

        let mut capture = Self::default();
        let mut record = StringRecord::new();
        let mut first = true;

        while reader.read_record(&mut record)? {
            if first && is_header(&record) {
                first = false;
                continue;
            }
            first = false;

            match parse_pair(&record) {
                Some((ir, red)) => capture.push(ir, red),
                None => {
                    return Err(CodecError::InvalidLine {
                        line: record.position().map_or(0, |pos| pos.line() as usize),
                        content: record.iter().collect::<Vec<_>>().join(","),
                    });
                }
            }
        }

        Ok(capture)
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut capture = Self::default();
        let mut buf = bytes;

        while !buf.is_empty() {
            let offset = bytes.len() - buf.len();
            let (ir, red) =
                read_record(&mut buf).map_err(|_| CodecError::TruncatedRecord(offset))?;
            capture.push(ir, red);
        }

        Ok(capture)
    }

    /// Writes an `ir,red` header followed by one record per sample pair.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), CodecError> {
        let mut writer = Writer::from_writer(writer);
        writer.write_record(CSV_HEADER)?;
        for pair in self.ir.iter().zip(&self.red) {
            writer.serialize(pair)?;
        }
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    pub fn to_csv(&self) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        self.write_csv(&mut out)?;
        Ok(out)
    }

    pub fn to_binary(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len() * RECORD_SIZE);
        for (ir, red) in self.ir.iter().zip(&self.red) {
            out.extend_from_slice(&ir.to_le_bytes());
            out.extend_from_slice(&red.to_le_bytes());
        }
        out
    }

    /// Converts to the reduced-width variant, failing on the first sample
    /// that does not fit.
    pub fn narrow(&self) -> Result<Capture<u16>, CodecError> {
        let narrow = |samples: &[u32]| {
            samples
                .iter()
                .enumerate()
                .map(|(index, &value)| {
                    u16::try_from(value).map_err(|_| CodecError::SampleOutOfRange { index, value })
                })
                .collect::<Result<Vec<_>, _>>()
        };

        Ok(Capture {
            ir: narrow(&self.ir)?,
            red: narrow(&self.red)?,
        })
    }
}

fn read_record(buf: &mut &[u8]) -> Result<(u32, u32), ShortBufferError> {
    Ok((buf.read_u32_le()?, buf.read_u32_le()?))
}

fn parse_pair(record: &StringRecord) -> Option<(u32, u32)> {
    if record.len() != 2 {
        return None;
    }
    record.deserialize(None).ok()
}

fn is_header(record: &StringRecord) -> bool {
    record.len() == CSV_HEADER.len()
        && record
            .iter()
            .zip(CSV_HEADER)
            .all(|(field, name)| field.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn parses_csv_with_header_and_comments() {
        let text = b"# finger probe, left hand\nir,red\n50000,45000\n\n50010, 45005\n";
        let capture = Capture::from_csv(text).unwrap();
        assert_eq!(capture.ir, vec![50000, 50010]);
        assert_eq!(capture.red, vec![45000, 45005]);
    }

    #[test]
    fn reports_bad_csv_line() {
        let text = b"ir,red\n50000,45000\n50010;45005\n";
        assert_eq!(
            Capture::from_csv(text),
            Err(CodecError::InvalidLine {
                line: 3,
                content: "50010;45005".to_owned(),
            })
        );
    }

    #[test]
    fn header_only_allowed_first() {
        let text = b"50000,45000\nir,red\n";
        assert!(Capture::from_csv(text).is_err());
    }

    #[test]
    fn numeric_first_line_is_not_a_header() {
        assert!(Capture::from_csv(b"50000\n").is_err());
    }

    #[test]
    fn header_matches_ignoring_case() {
        let capture = Capture::from_csv(b"IR, Red\n1,2\n").unwrap();
        assert_eq!(capture.ir, vec![1]);
        assert_eq!(capture.red, vec![2]);
    }

    #[test]
    fn unexpected_first_line_is_reported() {
        for (text, content) in [
            (&b"time,pleth\n50000,45000\n"[..], "time,pleth"),
            (&b"x50000,45000\n1,2\n"[..], "x50000,45000"),
        ] {
            assert_eq!(
                Capture::from_csv(text),
                Err(CodecError::InvalidLine {
                    line: 1,
                    content: content.to_owned(),
                })
            );
        }
    }

    #[test]
    fn extra_columns_are_rejected() {
        assert_eq!(
            Capture::from_csv(b"ir,red\n1,2,3\n"),
            Err(CodecError::InvalidLine {
                line: 2,
                content: "1,2,3".to_owned(),
            })
        );
    }

    #[test]
    fn writes_csv_with_header() {
        let mut capture = Capture::default();
        capture.push(50_000, 45_000);
        capture.push(50_010, 45_005);
        let text = String::from_utf8(capture.to_csv().unwrap()).unwrap();
        assert_eq!(text, "ir,red\n50000,45000\n50010,45005\n");
    }

    #[test]
    fn parses_binary_records() {
        let bytes = [
            0x50, 0xC3, 0x00, 0x00, 0xC8, 0xAF, 0x00, 0x00, // 50000, 45000
            0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, // 1, 2
        ];
        let capture = Capture::from_binary(&bytes).unwrap();
        assert_eq!(capture.ir, vec![50000, 1]);
        assert_eq!(capture.red, vec![45000, 2]);
    }

    #[test]
    fn truncated_binary_record() {
        let bytes = [0_u8; RECORD_SIZE + 5];
        assert_eq!(
            Capture::from_binary(&bytes),
            Err(CodecError::TruncatedRecord(RECORD_SIZE))
        );
    }

    #[test]
    fn binary_and_csv_agree() {
        let mut rng = rand::rng();
        let mut capture = Capture::default();
        for _ in 0..250 {
            capture.push(rng.random_range(0..1 << 18), rng.random_range(0..1 << 18));
        }
        assert_eq!(Capture::from_binary(&capture.to_binary()).unwrap(), capture);
        assert_eq!(Capture::from_csv(&capture.to_csv().unwrap()).unwrap(), capture);
    }

    #[test]
    fn splits_into_full_windows() {
        let mut capture = Capture::default();
        for i in 0..(2 * WINDOW_LEN + 30) as u32 {
            capture.push(i, i + 1);
        }
        let windows: Vec<_> = capture.windows().collect();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[1].0[0], WINDOW_LEN as u32);
        assert_eq!(windows[1].1[0], WINDOW_LEN as u32 + 1);
        assert_eq!(capture.remainder(), 30);
    }

    #[test]
    fn narrowing_rejects_wide_samples() {
        let mut capture = Capture::default();
        capture.push(65_535, 100);
        capture.push(65_536, 100);
        assert_eq!(
            capture.narrow(),
            Err(CodecError::SampleOutOfRange {
                index: 1,
                value: 65_536,
            })
        );
    }

    #[test]
    fn narrowing_keeps_values() {
        let mut capture = Capture::default();
        capture.push(50_000, 45_000);
        let narrow = capture.narrow().unwrap();
        assert_eq!(narrow.ir, vec![50_000_u16]);
        assert_eq!(narrow.red, vec![45_000_u16]);
    }

    #[test]
    fn format_from_name_and_path() {
        assert_eq!("csv".parse(), Ok(CaptureFormat::Csv));
        assert_eq!("bin".parse(), Ok(CaptureFormat::Binary));
        assert!("wav".parse::<CaptureFormat>().is_err());
        assert_eq!(
            CaptureFormat::from_path(Path::new("night/capture.raw")),
            Some(CaptureFormat::Binary)
        );
        assert_eq!(CaptureFormat::from_path(Path::new("capture")), None);
    }
}
