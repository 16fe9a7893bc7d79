use std::fmt::Debug;

use num_traits::{AsPrimitive, NumAssign, PrimInt, Signed};

/// Sampling frequency of both PPG channels.
pub const SAMPLE_RATE_HZ: usize = 25;

/// Duration of one acquisition window.
pub const WINDOW_SECONDS: usize = 4;

/// Number of samples per channel in one window.
pub const WINDOW_LEN: usize = SAMPLE_RATE_HZ * WINDOW_SECONDS;

/// One channel of one acquisition window.
pub type SampleSeries<S> = [S; WINDOW_LEN];

/// Signed accumulator used for lag products.
///
/// Products of two conditioned samples must not overflow when summed over a
/// whole window, so the accumulator width depends on the sample width.
pub trait Accumulator:
    PrimInt + Signed + NumAssign + AsPrimitive<f64> + From<i64> + Default + Debug
{
}

impl<T> Accumulator for T where
    T: PrimInt + Signed + NumAssign + AsPrimitive<f64> + From<i64> + Default + Debug
{
}

/// Raw ADC count as delivered by the sensor driver.
///
/// `u16` is the reduced-width variant for targets that cannot hold two
/// windows of 32-bit samples, `u32` the full-width one.
pub trait Sample: Copy + Default + Debug + Into<i64> {
    type Acc: Accumulator;

    fn widen(self) -> i64 {
        self.into()
    }
}

impl Sample for u16 {
    // (2^16)^2 * WINDOW_LEN stays far below i64::MAX
    type Acc = i64;
}

impl Sample for u32 {
    type Acc = i128;
}
