//! Cross-sectional ranking of scores.
//!
//! Rank 1 is the highest score. Tied scores share the average of the ranks
//! they span, and missing scores get a missing rank without consuming a rank
//! number, so the defined ranks of a row are always a permutation of `1..=k`
//! (up to tie averaging) where `k` is the number of defined scores.

use ndarray::{Array1, ArrayView1};

/// Rank values in descending order (highest value gets rank 1).
///
/// # Example
///
/// ```rust
/// use ndarray::array;
/// use surge_rank::descending_ranks;
///
/// let ranks = descending_ranks(array![0.5, 2.0, f64::NAN, 0.5].view());
/// assert_eq!(ranks[1], 1.0);
/// assert_eq!(ranks[0], 2.5);
/// assert_eq!(ranks[3], 2.5);
/// assert!(ranks[2].is_nan());
/// ```
#[must_use]
pub fn descending_ranks(values: ArrayView1<'_, f64>) -> Array1<f64> {
    let mut ranks = Array1::from_elem(values.len(), f64::NAN);

    let mut indexed: Vec<(usize, f64)> = values
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .collect();

    // Highest first; index order keeps the sort deterministic
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    let n = indexed.len();
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j < n && indexed[j].1 == indexed[i].1 {
            j += 1;
        }

        // Positions i..j hold ranks i+1..=j
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for &(index, _) in &indexed[i..j] {
            ranks[index] = avg_rank;
        }

        i = j;
    }

    ranks
}

/// Number of defined (finite) ranks in a ranked row.
#[must_use]
pub fn ranked_count(ranks: ArrayView1<'_, f64>) -> usize {
    ranks.iter().filter(|r| r.is_finite()).count()
}
