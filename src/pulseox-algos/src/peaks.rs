use std::ops::Deref;

use serde::{Serialize, Serializer};

use crate::{
    helpers::sort::{sort_ascending, sort_indices_descending},
    sample::WINDOW_LEN,
};

/// Upper bound on local maxima in one window: each needs a rising sample
/// before it.
pub const MAX_CANDIDATES: usize = WINDOW_LEN / 2;

/// Fixed-capacity list of sample indices.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PeakList {
    locs: [usize; MAX_CANDIDATES],
    len: usize,
}

impl Default for PeakList {
    fn default() -> Self {
        Self {
            locs: [0; MAX_CANDIDATES],
            len: 0,
        }
    }
}

impl PeakList {
    pub fn as_slice(&self) -> &[usize] {
        &self.locs[..self.len]
    }

    fn as_mut_slice(&mut self) -> &mut [usize] {
        &mut self.locs[..self.len]
    }

    fn push(&mut self, loc: usize) -> bool {
        if self.len == MAX_CANDIDATES {
            return false;
        }
        self.locs[self.len] = loc;
        self.len += 1;
        true
    }

    fn truncate(&mut self, len: usize) {
        self.len = self.len.min(len);
    }

    fn clear(&mut self) {
        self.len = 0;
    }
}

impl Deref for PeakList {
    type Target = [usize];

    fn deref(&self) -> &[usize] {
        self.as_slice()
    }
}

impl std::fmt::Debug for PeakList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl Serialize for PeakList {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_seq(self.as_slice())
    }
}

/// Collects every local maximum of `series` at or above `min_height`.
///
/// A flat top is reported once, at its left edge, and only if the plateau
/// is followed by a fall. The first and last samples are never peaks.
pub fn peaks_above_min_height<T: PartialOrd + Copy>(
    series: &[T],
    min_height: T,
    peaks: &mut PeakList,
) {
    peaks.clear();
    let n = series.len();
    let mut i = 1;

    while i + 1 < n {
        if series[i] >= min_height && series[i] > series[i - 1] {
            let mut width = 1;
            while i + width < n && series[i] == series[i + width] {
                width += 1;
            }

            if i + width < n && series[i] > series[i + width] {
                if !peaks.push(i) {
                    break;
                }
                i += width + 1;
            } else {
                i += width;
            }
        } else {
            i += 1;
        }
    }
}

/// Sorts `peaks` by position and drops the smaller of every pair closer
/// than `min_distance`, until no such pair is left.
///
/// Equal amplitudes keep the earlier peak.
pub fn remove_close_peaks<T: PartialOrd + Copy>(
    peaks: &mut PeakList,
    series: &[T],
    min_distance: usize,
) {
    sort_ascending(peaks.as_mut_slice());

    // every pass that changes the list shortens it, so the loop settles
    // within len + 1 passes
    for _ in 0..=peaks.len() {
        let before = peaks.len();
        let kept = prune_pass(peaks.as_mut_slice(), series, min_distance);
        peaks.truncate(kept);
        if kept == before {
            break;
        }
    }

    debug_assert!(peaks.windows(2).all(|w| w[1] - w[0] >= min_distance));
}

/// One left-to-right sweep comparing each candidate with the last
/// survivor. Returns the number of survivors, compacted to the front.
fn prune_pass<T: PartialOrd + Copy>(locs: &mut [usize], series: &[T], min_distance: usize) -> usize {
    let mut kept = 0;
    for j in 0..locs.len() {
        let loc = locs[j];
        if kept > 0 && loc - locs[kept - 1] < min_distance {
            if series[loc] > series[locs[kept - 1]] {
                locs[kept - 1] = loc;
            }
        } else {
            locs[kept] = loc;
            kept += 1;
        }
    }
    kept
}

/// Finds at most `max_count` of the strongest peaks of `series` that are
/// at least `min_height` high and `min_distance` apart. The result is
/// ordered by position.
pub fn find_peaks<T: PartialOrd + Copy>(
    series: &[T],
    min_height: T,
    min_distance: usize,
    max_count: usize,
    peaks: &mut PeakList,
) {
    peaks_above_min_height(series, min_height, peaks);
    remove_close_peaks(peaks, series, min_distance);

    sort_indices_descending(series, peaks.as_mut_slice());
    peaks.truncate(max_count);
    sort_ascending(peaks.as_mut_slice());
}
