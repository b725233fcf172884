//! Pure aggregation over a [`CaseTable`].
//!
//! Every operation checks the columns it depends on before touching the
//! records, so a table without `TEMA` still yields totals and the advisor
//! breakdown. Nothing here performs I/O or logs.

use super::domain::{CaseField, CaseRecord, CaseStatus, CaseTable};
use super::views::{
    AdvisorRow, DashboardSummary, Section, TopicBreakdown, TopicStatusRow, TopicSummary,
    TopicTotalRow, Totals,
};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

const TOTALS_COLUMNS: &[CaseField] =
    &[CaseField::Expediente, CaseField::Status, CaseField::Advisor];
const ADVISOR_COLUMNS: &[CaseField] =
    &[CaseField::Expediente, CaseField::Status, CaseField::Advisor];
const TOPIC_STATUS_COLUMNS: &[CaseField] =
    &[CaseField::Expediente, CaseField::Status, CaseField::Topic];
const TOPIC_TOTAL_COLUMNS: &[CaseField] = &[CaseField::Expediente, CaseField::Topic];

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SummaryError {
    #[error("column '{field}' is not present in the case table")]
    UnsupportedSchema { field: CaseField },
}

impl SummaryError {
    pub fn field(&self) -> CaseField {
        match self {
            Self::UnsupportedSchema { field } => *field,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CaseSummarizer<'a> {
    table: &'a CaseTable,
}

impl<'a> CaseSummarizer<'a> {
    pub fn new(table: &'a CaseTable) -> Self {
        Self { table }
    }

    pub fn totals(&self) -> Result<Totals, SummaryError> {
        self.require(TOTALS_COLUMNS)?;

        let records = self.table.records();
        let mut tally = StatusTally::default();
        let mut advisors = BTreeSet::new();
        for record in records {
            tally.add(&record.status);
            if let Some(advisor) = record.advisor_name() {
                advisors.insert(advisor);
            }
        }

        Ok(Totals::from_counts(
            tally.despacho,
            tally.pre_archivo,
            tally.other,
            advisors.len(),
        ))
    }

    /// One row per non-blank advisor, busiest first; equal totals fall back to
    /// the advisor name so the order never depends on input order.
    pub fn advisor_breakdown(&self) -> Result<Vec<AdvisorRow>, SummaryError> {
        self.require(ADVISOR_COLUMNS)?;

        let mut by_advisor: BTreeMap<&str, StatusTally> = BTreeMap::new();
        for record in self.table.records() {
            if let Some(advisor) = record.advisor_name() {
                by_advisor.entry(advisor).or_default().add(&record.status);
            }
        }

        let mut rows: Vec<AdvisorRow> = by_advisor
            .into_iter()
            .map(|(advisor, tally)| AdvisorRow {
                rank: 0,
                advisor: advisor.to_string(),
                total: tally.total(),
                despacho: tally.despacho,
                pre_archivo: tally.pre_archivo,
                other: tally.other,
            })
            .collect();

        rows.sort_by(|a, b| {
            by_count_then_name((a.total, a.advisor.as_str()), (b.total, b.advisor.as_str()))
        });
        for (index, row) in rows.iter_mut().enumerate() {
            row.rank = index + 1;
        }

        Ok(rows)
    }

    pub fn topic_status_breakdown(&self) -> Result<TopicBreakdown, SummaryError> {
        self.require(TOPIC_STATUS_COLUMNS)?;

        let mut by_pair: BTreeMap<(&str, &CaseStatus), usize> = BTreeMap::new();
        let mut by_topic: BTreeMap<&str, usize> = BTreeMap::new();
        for record in self.table.records() {
            if let Some(topic) = record.topic_label() {
                *by_pair.entry((topic, &record.status)).or_default() += 1;
                *by_topic.entry(topic).or_default() += 1;
            }
        }

        if by_pair.is_empty() {
            return Ok(TopicBreakdown::Empty);
        }

        let mut rows: Vec<TopicStatusRow> = by_pair
            .into_iter()
            .map(|((topic, status), count)| TopicStatusRow {
                topic: topic.to_string(),
                status: status.clone(),
                count,
            })
            .collect();

        // Topics keep the chart's "total descending" order; within a topic the
        // status order from the map is kept by the stable sort.
        rows.sort_by(|a, b| {
            let total_a = by_topic.get(a.topic.as_str()).copied().unwrap_or_default();
            let total_b = by_topic.get(b.topic.as_str()).copied().unwrap_or_default();
            by_count_then_name((total_a, a.topic.as_str()), (total_b, b.topic.as_str()))
        });

        Ok(TopicBreakdown::Rows(rows))
    }

    pub fn topic_totals(&self) -> Result<Vec<TopicTotalRow>, SummaryError> {
        self.require(TOPIC_TOTAL_COLUMNS)?;

        let mut by_topic: BTreeMap<&str, usize> = BTreeMap::new();
        for topic in self.table.records().iter().filter_map(CaseRecord::topic_label) {
            *by_topic.entry(topic).or_default() += 1;
        }

        let mut rows: Vec<TopicTotalRow> = by_topic
            .into_iter()
            .map(|(topic, total)| TopicTotalRow {
                topic: topic.to_string(),
                total,
            })
            .collect();
        rows.sort_by(|a, b| {
            by_count_then_name((a.total, a.topic.as_str()), (b.total, b.topic.as_str()))
        });

        Ok(rows)
    }

    /// Runs every view, keeping failures scoped to the section that needs the
    /// missing column.
    pub fn dashboard(&self) -> DashboardSummary {
        let topics = self.topic_status_breakdown().and_then(|breakdown| {
            self.topic_totals()
                .map(|totals| TopicSummary { breakdown, totals })
        });

        DashboardSummary {
            totals: section(self.totals()),
            advisors: section(self.advisor_breakdown()),
            topics: section(topics),
        }
    }

    fn require(&self, columns: &[CaseField]) -> Result<(), SummaryError> {
        match self.table.missing_column(columns) {
            Some(field) => Err(SummaryError::UnsupportedSchema { field }),
            None => Ok(()),
        }
    }
}

impl CaseTable {
    pub fn summarizer(&self) -> CaseSummarizer<'_> {
        CaseSummarizer::new(self)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct StatusTally {
    despacho: usize,
    pre_archivo: usize,
    other: usize,
}

impl StatusTally {
    fn add(&mut self, status: &CaseStatus) {
        match status {
            CaseStatus::Despacho => self.despacho += 1,
            CaseStatus::PreArchivo => self.pre_archivo += 1,
            CaseStatus::Other(_) => self.other += 1,
        }
    }

    fn total(&self) -> usize {
        self.despacho + self.pre_archivo + self.other
    }
}

fn by_count_then_name(a: (usize, &str), b: (usize, &str)) -> Ordering {
    b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1))
}

fn section<T>(result: Result<T, SummaryError>) -> Section<T> {
    match result {
        Ok(data) => Section::Available { data },
        Err(err) => Section::Unsupported {
            missing: err.field(),
            message: err.to_string(),
        },
    }
}
