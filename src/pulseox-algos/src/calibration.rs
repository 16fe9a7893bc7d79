//! SpO2 calibration of the reference pulse-oximetry module.
//!
//! Bin `i` holds the saturation for a ratio-of-ratios of `i / 100`, taken
//! from the empirical regression `-45.060·R² + 30.354·R + 94.845` and
//! rounded. The values must stay byte-for-byte identical to keep readings
//! comparable with the reference device.

/// Bins per unit of ratio-of-ratios.
pub const RATIO_SCALE: f64 = 100.0;

/// Lowest bin treated as calibrated.
pub const MIN_BIN: usize = 3;

/// Highest bin treated as calibrated.
pub const MAX_BIN: usize = SPO2_TABLE.len() - 1;

#[rustfmt::skip]
pub const SPO2_TABLE: [u8; 183] = [
     95,  95,  95,  96,  96,  96,  97,  97,  97,  97,  97,  98,  98,  98,  98,  98,  99,  99,  99,  99,
     99,  99,  99,  99, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100,
    100, 100, 100, 100,  99,  99,  99,  99,  99,  99,  99,  99,  98,  98,  98,  98,  98,  98,  97,  97,
     97,  97,  96,  96,  96,  96,  95,  95,  95,  94,  94,  94,  93,  93,  93,  92,  92,  92,  91,  91,
     90,  90,  89,  89,  89,  88,  88,  87,  87,  86,  86,  85,  85,  84,  84,  83,  82,  82,  81,  81,
     80,  80,  79,  78,  78,  77,  76,  76,  75,  74,  74,  73,  72,  72,  71,  70,  69,  69,  68,  67,
     66,  66,  65,  64,  63,  62,  62,  61,  60,  59,  58,  57,  56,  56,  55,  54,  53,  52,  51,  50,
     49,  48,  47,  46,  45,  44,  43,  42,  41,  40,  39,  38,  37,  36,  35,  34,  33,  31,  30,  29,
     28,  27,  26,  25,  23,  22,  21,  20,  19,  17,  16,  15,  14,  12,  11,  10,   9,   7,   6,   5,
      3,   2,   1,
];

/// Maps a ratio-of-ratios to a saturation percentage, interpolating
/// linearly between neighbouring bins.
///
/// Ratios outside the calibrated bins return `None`; the table is never
/// extrapolated.
pub fn spo2_from_ratio(ratio: f64) -> Option<u8> {
    let scaled = ratio * RATIO_SCALE;
    if !(scaled >= MIN_BIN as f64 && scaled <= MAX_BIN as f64) {
        return None;
    }

    let bin = scaled.floor() as usize;
    if bin == MAX_BIN {
        return Some(SPO2_TABLE[MAX_BIN]);
    }

    let low = f64::from(SPO2_TABLE[bin]);
    let high = f64::from(SPO2_TABLE[bin + 1]);
    let fraction = scaled - bin as f64;
    Some((low + (high - low) * fraction).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_tracks_regression() {
        for (bin, &spo2) in SPO2_TABLE.iter().enumerate() {
            let r = bin as f64 / RATIO_SCALE;
            let fitted = -45.060 * r * r + 30.354 * r + 94.845;
            assert!(
                (fitted - f64::from(spo2)).abs() <= 0.5 + 1e-9,
                "bin {bin}: table {spo2}, regression {fitted}"
            );
        }
    }

    #[test]
    fn saturation_falls_past_the_plateau() {
        assert!(SPO2_TABLE[40..].windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn unity_ratio() {
        assert_eq!(spo2_from_ratio(1.0), Some(80));
    }

    #[test]
    fn healthy_ratio() {
        assert_eq!(spo2_from_ratio(0.4), Some(100));
        assert_eq!(spo2_from_ratio(0.333), Some(100));
    }

    #[test]
    fn interpolates_between_bins() {
        // bins 102 and 103 hold 79 and 78
        assert_eq!(spo2_from_ratio(1.022), Some(79));
        assert_eq!(spo2_from_ratio(1.028), Some(78));
    }

    #[test]
    fn domain_edges() {
        assert_eq!(spo2_from_ratio(0.03), Some(96));
        assert_eq!(spo2_from_ratio(1.82), Some(1));
        assert_eq!(spo2_from_ratio(0.029), None);
        assert_eq!(spo2_from_ratio(1.821), None);
    }

    #[test]
    fn non_finite_ratio_is_rejected() {
        assert_eq!(spo2_from_ratio(f64::NAN), None);
        assert_eq!(spo2_from_ratio(f64::INFINITY), None);
        assert_eq!(spo2_from_ratio(-1.0), None);
    }
}
