use std::f64::consts::PI;

use pulseox_algos::{SAMPLE_RATE_HZ, WINDOW_LEN};
use pulseox_codec::Capture;
use rand::Rng;

/// Sinusoidal stand-in for a finger on the sensor.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticPulse {
    pub bpm: f64,
    pub ir_offset: f64,
    pub ir_amplitude: f64,
    pub red_offset: f64,
    pub red_amplitude: f64,
    /// Peak amplitude of uniform noise added to every sample.
    pub noise: f64,
}

impl Default for SyntheticPulse {
    fn default() -> Self {
        Self {
            bpm: 72.0,
            ir_offset: 50_000.0,
            ir_amplitude: 1000.0,
            red_offset: 45_000.0,
            red_amplitude: 300.0,
            noise: 0.0,
        }
    }
}

impl SyntheticPulse {
    pub fn generate<R: Rng>(&self, windows: usize, rng: &mut R) -> Capture<u32> {
        let freq_hz = self.bpm / 60.0;
        let mut capture = Capture::default();

        for i in 0..windows * WINDOW_LEN {
            let phase = (2.0 * PI * freq_hz * i as f64 / SAMPLE_RATE_HZ as f64).sin();
            let ir = self.ir_offset + self.ir_amplitude * phase + self.jitter(rng);
            let red = self.red_offset + self.red_amplitude * phase + self.jitter(rng);
            capture.push(to_sample(ir), to_sample(red));
        }

        capture
    }

    fn jitter<R: Rng>(&self, rng: &mut R) -> f64 {
        if self.noise > 0.0 {
            rng.random_range(-self.noise..=self.noise)
        } else {
            0.0
        }
    }
}

fn to_sample(value: f64) -> u32 {
    value.clamp(0.0, u32::MAX as f64) as u32
}
