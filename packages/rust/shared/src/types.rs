//! Core domain types for advisorboard.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// AdvisorRecord
// ---------------------------------------------------------------------------

/// One advisor row read from the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorRecord {
    /// Trimmed, non-empty display name.
    pub name: String,
    /// Count attributed to the advisor.
    pub count: u64,
}

impl AdvisorRecord {
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

// ---------------------------------------------------------------------------
// BoardTotals
// ---------------------------------------------------------------------------

/// Aggregate figures reported after an update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardTotals {
    /// Number of advisors published.
    pub advisors: usize,
    /// Sum of every advisor's count (saturating).
    pub total_count: u64,
}

impl BoardTotals {
    /// Compute totals over a record slice.
    pub fn from_records(records: &[AdvisorRecord]) -> Self {
        Self {
            advisors: records.len(),
            total_count: records
                .iter()
                .fold(0u64, |acc, r| acc.saturating_add(r.count)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_sum_counts() {
        let records = vec![
            AdvisorRecord::new("Ana", 7),
            AdvisorRecord::new("Luis", 0),
            AdvisorRecord::new("Carla", 0),
        ];
        let totals = BoardTotals::from_records(&records);
        assert_eq!(totals.advisors, 3);
        assert_eq!(totals.total_count, 7);
    }

    #[test]
    fn totals_saturate_instead_of_overflowing() {
        let records = vec![AdvisorRecord::new("A", u64::MAX), AdvisorRecord::new("B", 5)];
        assert_eq!(BoardTotals::from_records(&records).total_count, u64::MAX);
    }

    #[test]
    fn totals_of_empty_slice() {
        assert_eq!(BoardTotals::from_records(&[]), BoardTotals::default());
    }
}
