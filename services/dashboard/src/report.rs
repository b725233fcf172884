use crate::infra::load_table;
use clap::Args;
use expedientes::cases::{
    AdvisorRow, CaseRecord, CaseTable, DashboardSummary, Section, TopicBreakdown, TopicSummary,
    Totals,
};
use expedientes::config::{AppConfig, DatasetConfig};
use expedientes::error::AppError;
use expedientes::telemetry;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct SummaryArgs {
    /// CSV or workbook export to summarize (defaults to EXPEDIENTES_PATH)
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Workbook sheet holding the expedientes (defaults to EXPEDIENTES_SHEET)
    #[arg(long)]
    pub(crate) sheet: Option<String>,
    /// Print the summary as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    /// Include every imported record in the output
    #[arg(long)]
    pub(crate) list_records: bool,
}

pub(crate) fn run_summary(args: SummaryArgs) -> Result<(), AppError> {
    let SummaryArgs {
        input,
        sheet,
        json,
        list_records,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let dataset = DatasetConfig {
        path: input.unwrap_or(config.dataset.path),
        sheet: sheet.unwrap_or(config.dataset.sheet),
    };
    let table = load_table(&dataset)?;
    let summary = table.summarizer().dashboard();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let records = list_records.then_some(&table);
    if json {
        render_json(&mut out, &dataset, &summary, records)?;
    } else {
        render_summary(&mut out, &dataset, &summary, records)?;
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct SummaryReport<'a> {
    source: String,
    summary: &'a DashboardSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    records: Option<&'a [CaseRecord]>,
}

pub(crate) fn render_json<W: Write>(
    out: &mut W,
    dataset: &DatasetConfig,
    summary: &DashboardSummary,
    records: Option<&CaseTable>,
) -> io::Result<()> {
    let report = SummaryReport {
        source: dataset.path.display().to_string(),
        summary,
        records: records.map(CaseTable::records),
    };
    let rendered = serde_json::to_string_pretty(&report).map_err(io::Error::from)?;
    writeln!(out, "{rendered}")
}

pub(crate) fn render_summary<W: Write>(
    out: &mut W,
    dataset: &DatasetConfig,
    summary: &DashboardSummary,
    records: Option<&CaseTable>,
) -> io::Result<()> {
    writeln!(out, "Expedientes dashboard")?;
    writeln!(out, "Source: {}", dataset.path.display())?;

    match &summary.totals {
        Section::Available { data } => render_totals(out, data)?,
        Section::Unsupported { message, .. } => {
            writeln!(out, "\nTotals unavailable: {message}")?;
        }
    }

    match &summary.advisors {
        Section::Available { data } => render_advisors(out, data)?,
        Section::Unsupported { message, .. } => {
            writeln!(out, "\nAdvisor breakdown unavailable: {message}")?;
        }
    }

    match &summary.topics {
        Section::Available { data } => render_topics(out, data)?,
        Section::Unsupported { missing, .. } => {
            writeln!(out, "\nTopics: column '{missing}' not found in the data")?;
        }
    }

    if let Some(table) = records {
        writeln!(out, "\nRecords ({})", table.len())?;
        for record in table.records() {
            writeln!(
                out,
                "- {} | {} | {} | {}",
                record.expediente_id,
                record.status.label(),
                record.advisor_name().unwrap_or("-"),
                record.topic_label().unwrap_or("-")
            )?;
        }
    }

    Ok(())
}

fn render_totals<W: Write>(out: &mut W, totals: &Totals) -> io::Result<()> {
    writeln!(out, "\nTotal expedientes: {}", totals.total)?;
    if totals.is_empty() {
        writeln!(out, "No expedientes in the export")?;
    }

    for share in totals.status_shares() {
        writeln!(
            out,
            "{}: {} ({:.1}% of total)",
            share.status.label(),
            share.count,
            share.pct
        )?;
    }
    if totals.other_count > 0 {
        writeln!(out, "Other statuses: {}", totals.other_count)?;
    }

    Ok(())
}

fn render_advisors<W: Write>(out: &mut W, rows: &[AdvisorRow]) -> io::Result<()> {
    writeln!(out, "\nAdvisors ({})", rows.len())?;
    for row in rows {
        writeln!(
            out,
            "{:>3}. {}: {} total, {} DESPACHO, {} PRE-ARCHIVO",
            row.rank, row.advisor, row.total, row.despacho, row.pre_archivo
        )?;
    }
    Ok(())
}

fn render_topics<W: Write>(out: &mut W, topics: &TopicSummary) -> io::Result<()> {
    match &topics.breakdown {
        TopicBreakdown::Empty => {
            writeln!(out, "\nTopics: no valid topic data found")?;
            return Ok(());
        }
        TopicBreakdown::Rows(rows) => {
            writeln!(out, "\nExpedientes by topic and status")?;
            for row in rows {
                writeln!(out, "- {} / {}: {}", row.topic, row.status.label(), row.count)?;
            }
        }
    }

    writeln!(out, "\nTopic totals")?;
    for row in &topics.totals {
        writeln!(out, "- {}: {}", row.topic, row.total)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use expedientes::cases::CaseField;

    fn dataset() -> DatasetConfig {
        DatasetConfig {
            path: PathBuf::from("export.csv"),
            sheet: "HSA".to_string(),
        }
    }

    fn render(table: &CaseTable, list_records: bool) -> String {
        let summary = table.summarizer().dashboard();
        let mut buffer = Vec::new();
        render_summary(
            &mut buffer,
            &dataset(),
            &summary,
            list_records.then_some(table),
        )
        .expect("render succeeds");
        String::from_utf8(buffer).expect("utf-8 output")
    }

    #[test]
    fn renders_metrics_advisors_and_topics() {
        let table = CaseTable::from_records(vec![
            CaseRecord::new("1", "DESPACHO", "A", Some("CIVIL")),
            CaseRecord::new("2", "DESPACHO", "A", Some("CIVIL")),
            CaseRecord::new("3", "DESPACHO", "B", Some("CIVIL")),
            CaseRecord::new("4", "PRE-ARCHIVO", "B", Some("CIVIL")),
            CaseRecord::new("5", "PRE-ARCHIVO", "C", None),
        ]);
        let output = render(&table, false);

        assert!(output.contains("Total expedientes: 5"));
        assert!(output.contains("DESPACHO: 3 (60.0% of total)"));
        assert!(output.contains("PRE-ARCHIVO: 2 (40.0% of total)"));
        assert!(output.contains("Advisors (3)"));
        assert!(output.contains("  1. A: 2 total, 2 DESPACHO, 0 PRE-ARCHIVO"));
        assert!(output.contains("- CIVIL / DESPACHO: 3"));
        assert!(output.contains("- CIVIL: 4"));
        assert!(!output.contains("Records ("));
    }

    #[test]
    fn distinguishes_missing_topic_column_from_empty_topics() {
        let without_column = CaseTable::new(
            [CaseField::Expediente, CaseField::Status, CaseField::Advisor],
            vec![CaseRecord::new("1", "DESPACHO", "A", None)],
        );
        assert!(render(&without_column, false).contains("column 'TEMA' not found"));

        let blank_topics =
            CaseTable::from_records(vec![CaseRecord::new("1", "DESPACHO", "A", None)]);
        assert!(render(&blank_topics, false).contains("no valid topic data found"));
    }

    #[test]
    fn empty_export_renders_zero_percentages() {
        let output = render(&CaseTable::from_records(Vec::new()), false);
        assert!(output.contains("Total expedientes: 0"));
        assert!(output.contains("DESPACHO: 0 (0.0% of total)"));
        assert!(output.contains("No expedientes in the export"));
    }

    #[test]
    fn lists_records_when_requested() {
        let table = CaseTable::from_records(vec![CaseRecord::new("9", "ARCHIVO", "", None)]);
        let output = render(&table, true);
        assert!(output.contains("Records (1)"));
        assert!(output.contains("- 9 | ARCHIVO | - | -"));
        assert!(output.contains("Other statuses: 1"));
    }

    fn render_as_json(table: &CaseTable, list_records: bool) -> serde_json::Value {
        let summary = table.summarizer().dashboard();
        let mut buffer = Vec::new();
        render_json(
            &mut buffer,
            &dataset(),
            &summary,
            list_records.then_some(table),
        )
        .expect("render succeeds");
        serde_json::from_slice(&buffer).expect("json output")
    }

    #[test]
    fn json_output_omits_records_unless_requested() {
        let table = CaseTable::from_records(vec![CaseRecord::new("1", "DESPACHO", "A", None)]);

        let without = render_as_json(&table, false);
        assert_eq!(without["source"], "export.csv");
        assert_eq!(without["summary"]["totals"]["state"], "available");
        assert!(without.get("records").is_none());

        let with = render_as_json(&table, true);
        assert_eq!(with["records"].as_array().expect("records array").len(), 1);
    }
}
