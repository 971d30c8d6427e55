use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::NaryadError;

/// Rendered in place of counter info when a request has no meter record.
pub const NO_COUNTER_PLACEHOLDER: &str = "Нет ПУ";

/// Oldest worksheet document layout this crate understands.
pub const MIN_DOCUMENT_VERSION: u32 = 2;

/// Roman numeral for small ordinals (quarters, clearance groups).
pub fn roman(n: i32) -> Option<&'static str> {
    match n {
        1 => Some("I"),
        2 => Some("II"),
        3 => Some("III"),
        4 => Some("IV"),
        5 => Some("V"),
        _ => None,
    }
}

/// Canonical (short, full) label pair for a request's work type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkType {
    pub short: String,
    pub full: String,
}

impl WorkType {
    /// Identity fallback: the raw phrase becomes both labels.
    pub fn verbatim(raw: &str) -> Self {
        WorkType {
            short: raw.to_string(),
            full: raw.to_string(),
        }
    }
}

/// Last state verification of a meter, as a fiscal quarter and year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspection {
    pub quarter: u8,
    pub year: i32,
}

impl Inspection {
    /// Build from a calendar month (1-12). Returns None for other months.
    pub fn from_month(month: u32, year: i32) -> Option<Inspection> {
        if !(1..=12).contains(&month) {
            return None;
        }
        Some(Inspection {
            quarter: ((month - 1) / 3 + 1) as u8,
            year,
        })
    }
}

impl fmt::Display for Inspection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quarter = roman(i32::from(self.quarter)).unwrap_or("?");
        write!(f, "п. {}-{:02}", quarter, self.year.rem_euclid(100))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterInfo {
    pub number: String,
    pub meter_type: String,
    #[serde(default)]
    pub inspection: Option<Inspection>,
}

impl fmt::Display for CounterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "№{} {}", self.number, self.meter_type)?;
        if let Some(inspection) = &self.inspection {
            write!(f, " {inspection}")?;
        }
        Ok(())
    }
}

/// Where the customer is fed from: substation, feeder line, pillar/pole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionPoint {
    pub substation: Option<String>,
    pub feeder: Option<String>,
    pub pillar: Option<String>,
}

impl ConnectionPoint {
    pub fn is_empty(&self) -> bool {
        [&self.substation, &self.feeder, &self.pillar]
            .iter()
            .all(|part| part.as_deref().map_or(true, |s| s.trim().is_empty()))
    }
}

impl fmt::Display for ConnectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [
            ("ТП", &self.substation),
            ("Ф", &self.feeder),
            ("оп", &self.pillar),
        ]
        .iter()
        .filter_map(|(label, value)| value.as_ref().map(|v| format!("{label}: {v}")))
        .collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// One field-service request at one address/account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub account_id: Option<i64>,
    pub name: String,
    pub address: String,
    pub work_type: WorkType,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub additional_info: String,
    #[serde(default)]
    pub counter: Option<CounterInfo>,
    /// Rendered counter text; filled with a placeholder once extraction ends.
    #[serde(default)]
    pub counter_info: String,
    #[serde(default)]
    pub connection_point: Option<ConnectionPoint>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub power: Option<Decimal>,
}

impl Record {
    /// Append a fragment, joining with ", " once the field is non-empty.
    pub fn append_additional_info(&mut self, fragment: &str) {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return;
        }
        if self.additional_info.trim().is_empty() {
            self.additional_info = fragment.to_string();
        } else {
            self.additional_info.push_str(", ");
            self.additional_info.push_str(fragment);
        }
    }

    /// Counter text for rendering; never blank.
    pub fn counter_text(&self) -> String {
        if !self.counter_info.trim().is_empty() {
            return self.counter_info.clone();
        }
        match &self.counter {
            Some(counter) => counter.to_string(),
            None => NO_COUNTER_PLACEHOLDER.to_string(),
        }
    }

    /// Connection point, phone and free-text info joined with " | ".
    pub fn full_additional_info(&self) -> String {
        let connection = self
            .connection_point
            .as_ref()
            .map(|cp| cp.to_string())
            .unwrap_or_default();
        let phone = self.phone.clone().unwrap_or_default();

        [connection, phone, self.additional_info.clone()]
            .into_iter()
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// Six-digit account number, or "--" when unknown.
    pub fn padded_account_id(&self) -> String {
        match self.account_id {
            Some(id) => format!("{id:06}"),
            None => "--".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    pub position: String,
    /// Electrical safety clearance group, normally 1-5.
    pub access_group: i32,
}

impl Employee {
    fn group(&self) -> String {
        roman(self.access_group)
            .map(str::to_string)
            .unwrap_or_else(|| self.access_group.to_string())
    }

    pub fn name_with_group(&self) -> String {
        format!("{} {} гр.", self.name, self.group())
    }

    pub fn position_with_name(&self) -> String {
        format!("{} {}", self.position, self.name)
    }

    pub fn full(&self) -> String {
        format!("{}, {}, {} гр.", self.name, self.position, self.group())
    }
}

/// Issue date split into the fields the forms print separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDate {
    pub day: String,
    pub month: String,
    pub year: String,
    pub full: String,
}

/// One crew's dispatch for a given date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worksheet {
    pub name: String,
    pub lead: Employee,
    pub chief: Employee,
    #[serde(default)]
    pub crew: Vec<Employee>,
    #[serde(default)]
    pub records: Vec<Record>,
    #[serde(default)]
    pub work_types: Vec<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub issued_at: DateTime<Utc>,
}

impl Worksheet {
    pub fn issue_date(&self, offset: FixedOffset) -> IssueDate {
        let local = self.issued_at.with_timezone(&offset);
        IssueDate {
            day: local.format("%d").to_string(),
            month: local.format("%m").to_string(),
            year: local.format("%Y").to_string(),
            full: local.format("%d.%m.%Y").to_string(),
        }
    }

    /// Crew member names joined with ", ", or "--" for a crew of one.
    pub fn crew_names(&self) -> String {
        if self.crew.is_empty() {
            "--".to_string()
        } else {
            self.crew
                .iter()
                .map(|e| e.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    /// "Член бригады: ..." or "Члены бригады: ..." depending on crew size.
    pub fn crew_line(&self) -> String {
        let label = if self.crew.len() > 1 {
            "Члены бригады"
        } else {
            "Член бригады"
        };
        format!("{label}: {}", self.crew_names())
    }

    pub fn producer_line(&self) -> String {
        format!("Производитель работ: {}", self.lead.name)
    }
}

/// Serialized batch of worksheets handed over by the dispatcher front-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorksheetDocument {
    pub version: u32,
    pub worksheets: Vec<Worksheet>,
}

impl WorksheetDocument {
    pub fn from_json(json: &str) -> Result<WorksheetDocument, NaryadError> {
        let document: WorksheetDocument = serde_json::from_str(json)?;
        if document.version < MIN_DOCUMENT_VERSION {
            return Err(NaryadError::UnsupportedDocument(format!(
                "version {} found, at least {} required",
                document.version, MIN_DOCUMENT_VERSION
            )));
        }
        Ok(document)
    }
}
