//! Allocation-free insertion sorts for the short sequences of one window.

/// Sorts `values` ascending in place. Equal values keep their order.
pub fn sort_ascending<T: PartialOrd + Copy>(values: &mut [T]) {
    for i in 1..values.len() {
        let temp = values[i];
        let mut j = i;
        while j > 0 && temp < values[j - 1] {
            values[j] = values[j - 1];
            j -= 1;
        }
        values[j] = temp;
    }
}

/// Reorders `indices` so that `values[indices[0]] >= values[indices[1]] >= ...`.
///
/// Indices referencing equal values keep their order.
pub fn sort_indices_descending<T: PartialOrd>(values: &[T], indices: &mut [usize]) {
    for i in 1..indices.len() {
        let temp = indices[i];
        let mut j = i;
        while j > 0 && values[temp] > values[indices[j - 1]] {
            indices[j] = indices[j - 1];
            j -= 1;
        }
        indices[j] = temp;
    }
}
