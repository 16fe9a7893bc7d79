#[macro_use]
extern crate log;

mod error;
pub use error::CodecError;

mod helpers;

mod capture;
pub use capture::{Capture, CaptureFormat};
