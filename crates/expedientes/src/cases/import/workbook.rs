use super::ImportError;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Every row of `sheet` rendered as strings, header row first.
pub(crate) fn read_sheet(path: &Path, sheet: &str) -> Result<Vec<Vec<String>>, ImportError> {
    let mut workbook = open_workbook_auto(path)?;
    let available = workbook.sheet_names().to_vec();
    if !available.iter().any(|name| name == sheet) {
        return Err(ImportError::SheetNotFound {
            sheet: sheet.to_string(),
            available,
        });
    }

    let range = workbook.worksheet_range(sheet)?;
    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}

/// Integral floats drop their fractional part so numeric expediente ids read
/// as `"1024"` rather than `"1024.0"`. Error cells read as empty.
pub(crate) fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(n) => n.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    #[test]
    fn cell_to_string_normalizes_numbers_and_errors() {
        assert_eq!(cell_to_string(&Data::Float(1024.0)), "1024");
        assert_eq!(cell_to_string(&Data::Float(10.5)), "10.5");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(cell_to_string(&Data::String("  CIVIL ".to_string())), "CIVIL");
        assert_eq!(cell_to_string(&Data::Error(CellErrorType::NA)), "");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }
}
