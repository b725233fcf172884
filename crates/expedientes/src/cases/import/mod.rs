mod columns;
mod csv_source;
mod workbook;

use crate::cases::domain::{CaseField, CaseRecord, CaseStatus, CaseTable};
use columns::ColumnLayout;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Sheet read from workbooks when the caller does not name one.
pub const DEFAULT_SHEET: &str = "HSA";

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read case export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid case CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("unable to open case workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("sheet '{sheet}' not found (available: {})", available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },
    #[error("case export has no header row")]
    MissingHeader,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Workbook,
}

impl SourceFormat {
    pub fn detect(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => Self::Workbook,
            _ => Self::Csv,
        }
    }
}

pub struct CaseImporter;

impl CaseImporter {
    /// Reads a CSV export or a workbook sheet depending on the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P, sheet: &str) -> Result<CaseTable, ImportError> {
        let path = path.as_ref();
        match SourceFormat::detect(path) {
            SourceFormat::Workbook => Self::from_workbook(path, sheet),
            SourceFormat::Csv => {
                let file = std::fs::File::open(path)?;
                Self::from_csv_reader(file)
            }
        }
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<CaseTable, ImportError> {
        let (headers, rows) = csv_source::read_rows(reader)?;
        assemble(&headers, rows)
    }

    pub fn from_workbook<P: AsRef<Path>>(path: P, sheet: &str) -> Result<CaseTable, ImportError> {
        let path = path.as_ref();
        // calamine wraps a missing file in its own error type
        std::fs::metadata(path)?;
        let mut rows = workbook::read_sheet(path, sheet)?.into_iter();
        let headers = rows.next().ok_or(ImportError::MissingHeader)?;
        assemble(&headers, rows)
    }
}

fn assemble<I>(headers: &[String], rows: I) -> Result<CaseTable, ImportError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    if headers.iter().all(|header| header.trim().is_empty()) {
        return Err(ImportError::MissingHeader);
    }

    let layout = ColumnLayout::from_headers(headers);
    let present = layout.present();
    let has_id_column = layout.index(CaseField::Expediente).is_some();

    let mut records = Vec::new();
    let mut skipped_without_id = 0usize;
    for (position, row) in rows.into_iter().enumerate() {
        let id = cell(&layout, &row, CaseField::Expediente);
        let status = cell(&layout, &row, CaseField::Status);
        let advisor = cell(&layout, &row, CaseField::Advisor);
        let topic = cell(&layout, &row, CaseField::Topic);

        if [id, status, advisor, topic].iter().all(|value| value.is_empty()) {
            continue;
        }

        let expediente_id = if has_id_column {
            if id.is_empty() {
                skipped_without_id += 1;
                continue;
            }
            id.to_string()
        } else {
            format!("row-{}", position + 1)
        };

        records.push(CaseRecord {
            expediente_id,
            status: CaseStatus::from_label(status),
            advisor: advisor.to_string(),
            topic: (!topic.is_empty()).then(|| topic.to_string()),
        });
    }

    if skipped_without_id > 0 {
        warn!(skipped = skipped_without_id, "skipped case rows without an expediente id");
    }
    debug!(records = records.len(), columns = ?present, "case table imported");

    Ok(CaseTable::new(present, records))
}

fn cell<'r>(layout: &ColumnLayout, row: &'r [String], field: CaseField) -> &'r str {
    layout
        .index(field)
        .and_then(|index| row.get(index))
        .map(|value| value.trim())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn detect_format_uses_extension() {
        assert_eq!(
            SourceFormat::detect(Path::new("HSA EXP VIVOS.xlsx")),
            SourceFormat::Workbook
        );
        assert_eq!(SourceFormat::detect(Path::new("data.XLS")), SourceFormat::Workbook);
        assert_eq!(SourceFormat::detect(Path::new("data.csv")), SourceFormat::Csv);
        assert_eq!(SourceFormat::detect(Path::new("data")), SourceFormat::Csv);
    }

    #[test]
    fn skips_blank_rows_and_rows_without_id() {
        let csv = "EXPEDIENTE,ESTADO,ASESOR,TEMA\n\
1,DESPACHO,Ana,CIVIL\n\
,,,\n\
,DESPACHO,Ana,CIVIL\n\
2,PRE-ARCHIVO,Luis,\n";
        let table = CaseImporter::from_csv_reader(Cursor::new(csv)).expect("import succeeds");
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[1].topic, None);
        assert_eq!(table.records()[1].status, CaseStatus::PreArchivo);
    }

    #[test]
    fn missing_id_column_gets_positional_ids() {
        let csv = "ESTADO,ASESOR\nDESPACHO,Ana\nDESPACHO,Luis\n";
        let table = CaseImporter::from_csv_reader(Cursor::new(csv)).expect("import succeeds");
        assert!(!table.has_column(CaseField::Expediente));
        assert_eq!(table.records()[0].expediente_id, "row-1");
        assert_eq!(table.records()[1].expediente_id, "row-2");
    }

    #[test]
    fn empty_input_reports_missing_header() {
        let error = CaseImporter::from_csv_reader(Cursor::new("")).expect_err("no header");
        assert!(matches!(error, ImportError::MissingHeader));
    }

    #[test]
    fn header_only_input_yields_empty_table() {
        let table = CaseImporter::from_csv_reader(Cursor::new("EXPEDIENTE,ESTADO,ASESOR,TEMA\n"))
            .expect("import succeeds");
        assert!(table.is_empty());
        assert!(table.has_column(CaseField::Topic));
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = CaseImporter::from_path("./does-not-exist.csv", DEFAULT_SHEET)
            .expect_err("expected io error");
        match error {
            ImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn missing_workbook_is_reported() {
        let error = CaseImporter::from_path("./does-not-exist.xlsx", DEFAULT_SHEET)
            .expect_err("expected io error");
        match error {
            ImportError::Io(err) => assert_eq!(err.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
