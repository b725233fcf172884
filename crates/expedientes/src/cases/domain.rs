use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Logical columns of a case spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseField {
    Expediente,
    Status,
    Advisor,
    Topic,
}

impl CaseField {
    pub const fn ordered() -> [Self; 4] {
        [Self::Expediente, Self::Status, Self::Advisor, Self::Topic]
    }

    /// Column header used by the source spreadsheets.
    pub const fn header(self) -> &'static str {
        match self {
            Self::Expediente => "EXPEDIENTE",
            Self::Status => "ESTADO",
            Self::Advisor => "ASESOR",
            Self::Topic => "TEMA",
        }
    }
}

impl std::fmt::Display for CaseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header())
    }
}

/// Workflow state of an expediente. Only two states are tallied by name;
/// everything else is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CaseStatus {
    Despacho,
    PreArchivo,
    Other(String),
}

impl CaseStatus {
    pub const DESPACHO: &'static str = "DESPACHO";
    pub const PRE_ARCHIVO: &'static str = "PRE-ARCHIVO";

    pub fn from_label(raw: &str) -> Self {
        match raw.trim() {
            Self::DESPACHO => Self::Despacho,
            Self::PRE_ARCHIVO => Self::PreArchivo,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Despacho => Self::DESPACHO,
            Self::PreArchivo => Self::PRE_ARCHIVO,
            Self::Other(raw) => raw,
        }
    }

    pub fn is_named(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl Serialize for CaseStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for CaseStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_label(&raw))
    }
}

/// One expediente row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub expediente_id: String,
    pub status: CaseStatus,
    #[serde(default)]
    pub advisor: String,
    #[serde(default)]
    pub topic: Option<String>,
}

impl CaseRecord {
    pub fn new(
        expediente_id: impl Into<String>,
        status: &str,
        advisor: impl Into<String>,
        topic: Option<&str>,
    ) -> Self {
        Self {
            expediente_id: expediente_id.into(),
            status: CaseStatus::from_label(status),
            advisor: advisor.into(),
            topic: topic.map(str::to_string),
        }
    }

    /// Advisor name with surrounding whitespace removed, `None` when blank.
    pub fn advisor_name(&self) -> Option<&str> {
        let trimmed = self.advisor.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Topic label with surrounding whitespace removed, `None` when null or blank.
    pub fn topic_label(&self) -> Option<&str> {
        self.topic
            .as_deref()
            .map(str::trim)
            .filter(|topic| !topic.is_empty())
    }
}

/// Immutable set of case records plus the columns the source actually carried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseTable {
    columns: BTreeSet<CaseField>,
    records: Vec<CaseRecord>,
}

impl CaseTable {
    pub fn new(columns: impl IntoIterator<Item = CaseField>, records: Vec<CaseRecord>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
            records,
        }
    }

    /// Table with every column present.
    pub fn from_records(records: Vec<CaseRecord>) -> Self {
        Self::new(CaseField::ordered(), records)
    }

    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, field: CaseField) -> bool {
        self.columns.contains(&field)
    }

    pub fn columns(&self) -> impl Iterator<Item = CaseField> + '_ {
        self.columns.iter().copied()
    }

    /// First required column the table lacks, in declaration order.
    pub fn missing_column(&self, required: &[CaseField]) -> Option<CaseField> {
        required
            .iter()
            .copied()
            .find(|field| !self.has_column(*field))
    }
}
