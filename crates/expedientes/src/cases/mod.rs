//! Expediente records, the summaries derived from them, and the importers that
//! build a [`CaseTable`] from spreadsheet exports.

pub mod domain;
pub mod import;
mod summarizer;
pub mod views;

pub use domain::{CaseField, CaseRecord, CaseStatus, CaseTable};
pub use import::{CaseImporter, ImportError, SourceFormat};
pub use summarizer::{CaseSummarizer, SummaryError};
pub use views::{
    AdvisorRow, DashboardSummary, Section, StatusShare, TopicBreakdown, TopicStatusRow,
    TopicSummary, TopicTotalRow, Totals,
};
