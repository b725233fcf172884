use crate::cases::domain::CaseField;
use std::collections::HashMap;
use std::sync::OnceLock;

static HEADER_ALIASES: OnceLock<HashMap<String, CaseField>> = OnceLock::new();

/// Position of each known column within a source row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ColumnLayout {
    expediente: Option<usize>,
    status: Option<usize>,
    advisor: Option<usize>,
    topic: Option<usize>,
}

impl ColumnLayout {
    pub(crate) fn from_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut layout = Self::default();
        for (index, header) in headers.into_iter().enumerate() {
            let Some(field) = field_for_header(header.as_ref()) else {
                continue;
            };
            let slot = layout.slot_mut(field);
            if slot.is_none() {
                *slot = Some(index);
            }
        }
        layout
    }

    pub(crate) fn index(&self, field: CaseField) -> Option<usize> {
        match field {
            CaseField::Expediente => self.expediente,
            CaseField::Status => self.status,
            CaseField::Advisor => self.advisor,
            CaseField::Topic => self.topic,
        }
    }

    pub(crate) fn present(&self) -> Vec<CaseField> {
        CaseField::ordered()
            .into_iter()
            .filter(|field| self.index(*field).is_some())
            .collect()
    }

    fn slot_mut(&mut self, field: CaseField) -> &mut Option<usize> {
        match field {
            CaseField::Expediente => &mut self.expediente,
            CaseField::Status => &mut self.status,
            CaseField::Advisor => &mut self.advisor,
            CaseField::Topic => &mut self.topic,
        }
    }
}

pub(crate) fn field_for_header(raw: &str) -> Option<CaseField> {
    header_aliases().get(&normalize_header(raw)).copied()
}

/// Uppercases, folds Spanish accents, and collapses whitespace so that
/// `" Estado "`, `"ESTADO"` and `"Expediente\u{feff}"` all compare equal.
pub(crate) fn normalize_header(raw: &str) -> String {
    let cleaned = raw.replace(['\u{feff}', '\u{200b}'], "");
    let folded: String = cleaned.chars().map(fold_accent).collect();
    folded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

fn fold_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'ä' | 'Á' | 'À' | 'Ä' => 'A',
        'é' | 'è' | 'ë' | 'É' | 'È' | 'Ë' => 'E',
        'í' | 'ì' | 'ï' | 'Í' | 'Ì' | 'Ï' => 'I',
        'ó' | 'ò' | 'ö' | 'Ó' | 'Ò' | 'Ö' => 'O',
        'ú' | 'ù' | 'ü' | 'Ú' | 'Ù' | 'Ü' => 'U',
        '_' => ' ',
        other => other,
    }
}

fn header_aliases() -> &'static HashMap<String, CaseField> {
    HEADER_ALIASES.get_or_init(|| {
        const ALIASES: &[(&str, CaseField)] = &[
            ("EXPEDIENTE", CaseField::Expediente),
            ("EXPEDIENTES", CaseField::Expediente),
            ("EXPEDIENTE ID", CaseField::Expediente),
            ("NUMERO EXPEDIENTE", CaseField::Expediente),
            ("ID", CaseField::Expediente),
            ("ESTADO", CaseField::Status),
            ("STATUS", CaseField::Status),
            ("ASESOR", CaseField::Advisor),
            ("ADVISOR", CaseField::Advisor),
            ("TEMA", CaseField::Topic),
            ("TOPIC", CaseField::Topic),
        ];

        ALIASES
            .iter()
            .map(|(alias, field)| (normalize_header(alias), *field))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_header_strips_noise() {
        assert_eq!(normalize_header("\u{feff} Número   expediente "), "NUMERO EXPEDIENTE");
        assert_eq!(normalize_header("expediente_id"), "EXPEDIENTE ID");
    }

    #[test]
    fn aliases_resolve_to_fields() {
        assert_eq!(field_for_header("Estado"), Some(CaseField::Status));
        assert_eq!(field_for_header("advisor"), Some(CaseField::Advisor));
        assert_eq!(field_for_header("Tema"), Some(CaseField::Topic));
        assert_eq!(field_for_header("FECHA"), None);
    }

    #[test]
    fn first_matching_column_wins() {
        let layout = ColumnLayout::from_headers(["ID", "ESTADO", "EXPEDIENTE", "ASESOR"]);
        assert_eq!(layout.index(CaseField::Expediente), Some(0));
        assert_eq!(layout.index(CaseField::Status), Some(1));
        assert_eq!(layout.index(CaseField::Advisor), Some(3));
        assert_eq!(layout.index(CaseField::Topic), None);
        assert_eq!(
            layout.present(),
            vec![CaseField::Expediente, CaseField::Status, CaseField::Advisor]
        );
    }
}
