//! Fixed trading-day look-back offsets for historical ranks.

use serde::{Deserialize, Serialize};

/// Rows back from the last score row for the 1, 2 and 3 month look-backs.
///
/// Offsets are calendar-naive: a month is 21 trading days, so the defaults
/// point at rows `n-22`, `n-43` and `n-64` of an `n`-row history. A lag whose
/// offset reaches past the first row is unavailable for every instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookbackOffsets {
    /// Offset for the rank one month ago (default: 21)
    pub one_month: usize,

    /// Offset for the rank two months ago (default: 42)
    pub two_months: usize,

    /// Offset for the rank three months ago (default: 63)
    pub three_months: usize,
}

impl LookbackOffsets {
    /// Offsets spaced `days_per_month` rows apart.
    #[must_use]
    pub const fn monthly(days_per_month: usize) -> Self {
        Self {
            one_month: days_per_month,
            two_months: 2 * days_per_month,
            three_months: 3 * days_per_month,
        }
    }

    /// Row index `offset` rows before the last of `n_rows`, if it exists.
    ///
    /// ```
    /// use surge_rank::LookbackOffsets;
    ///
    /// assert_eq!(LookbackOffsets::row_for(0, 100), Some(99));
    /// assert_eq!(LookbackOffsets::row_for(21, 100), Some(78));
    /// assert_eq!(LookbackOffsets::row_for(100, 100), None);
    /// ```
    #[must_use]
    pub const fn row_for(offset: usize, n_rows: usize) -> Option<usize> {
        if offset < n_rows {
            Some(n_rows - 1 - offset)
        } else {
            None
        }
    }

    /// The current offset followed by the three look-backs.
    #[must_use]
    pub const fn all(&self) -> [usize; 4] {
        [0, self.one_month, self.two_months, self.three_months]
    }
}

impl Default for LookbackOffsets {
    fn default() -> Self {
        Self::monthly(21)
    }
}
