use super::domain::{CaseField, CaseStatus};
use serde::Serialize;

/// Headline counts and the status tally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub total: usize,
    pub despacho_count: usize,
    pub prearchivo_count: usize,
    pub other_count: usize,
    /// `0.0` when the dataset is empty.
    pub despacho_pct: f64,
    /// `0.0` when the dataset is empty.
    pub prearchivo_pct: f64,
    pub advisor_count: usize,
}

impl Totals {
    /// Derives the total and both status percentages from the tally.
    pub fn from_counts(
        despacho_count: usize,
        prearchivo_count: usize,
        other_count: usize,
        advisor_count: usize,
    ) -> Self {
        let total = despacho_count + prearchivo_count + other_count;
        Self {
            total,
            despacho_count,
            prearchivo_count,
            other_count,
            despacho_pct: percentage(despacho_count, total),
            prearchivo_pct: percentage(prearchivo_count, total),
            advisor_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Slices for the status distribution chart, in display order.
    pub fn status_shares(&self) -> [StatusShare; 2] {
        [
            StatusShare {
                status: CaseStatus::Despacho,
                count: self.despacho_count,
                pct: self.despacho_pct,
            },
            StatusShare {
                status: CaseStatus::PreArchivo,
                count: self.prearchivo_count,
                pct: self.prearchivo_pct,
            },
        ]
    }
}

// Scaling before dividing keeps the two named shares from summing past 100.
fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 * 100.0) / total as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusShare {
    pub status: CaseStatus,
    pub count: usize,
    pub pct: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvisorRow {
    /// 1-based position after ordering.
    pub rank: usize,
    pub advisor: String,
    pub total: usize,
    pub despacho: usize,
    pub pre_archivo: usize,
    pub other: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicStatusRow {
    pub topic: String,
    pub status: CaseStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicTotalRow {
    pub topic: String,
    pub total: usize,
}

/// Result of the topic/status grouping. `Empty` means the topic column exists
/// but no record carries a usable topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum TopicBreakdown {
    Empty,
    Rows(Vec<TopicStatusRow>),
}

impl TopicBreakdown {
    pub fn rows(&self) -> &[TopicStatusRow] {
        match self {
            Self::Empty => &[],
            Self::Rows(rows) => rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Section of the dashboard whose availability depends on the source schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Section<T> {
    Available { data: T },
    Unsupported { missing: CaseField, message: String },
}

impl<T> Section<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Available { data } => Some(data),
            Self::Unsupported { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicSummary {
    pub breakdown: TopicBreakdown,
    pub totals: Vec<TopicTotalRow>,
}

/// Everything the presentation layer needs for one rendering pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub totals: Section<Totals>,
    pub advisors: Section<Vec<AdvisorRow>>,
    pub topics: Section<TopicSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_guards_zero_total() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
    }

    #[test]
    fn from_counts_keeps_named_shares_within_hundred() {
        let totals = Totals::from_counts(2, 9, 0, 1);
        assert_eq!(totals.total, 11);
        assert!(totals.despacho_pct + totals.prearchivo_pct <= 100.0);

        let empty = Totals::from_counts(0, 0, 0, 0);
        assert!(empty.is_empty());
        assert_eq!(empty.despacho_pct, 0.0);
    }
}
