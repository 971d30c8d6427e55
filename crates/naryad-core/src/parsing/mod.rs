pub mod fields;
pub mod header;
pub mod normalize;
pub mod values;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::NaryadError;
use crate::extraction::RawRow;
use crate::model::{Record, NO_COUNTER_PLACEHOLDER};
use fields::{extract_connection_point, extract_counter, extract_phone, extract_power};
use header::{is_header_row, parse_header_row};

/// Prefix of the meter record line under a request.
pub const COUNTER_MARKER: &str = "Т.учета";
/// Markers of the connection/contact line under a request.
pub const SUBSTATION_MARKER: &str = "ТП:";
pub const PHONE_MARKER: &str = "тел.:";

/// What a row contributes to the request list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// Starts a new request.
    Header,
    /// Meter record for the current request.
    Counter,
    /// Connection point, phone and power for the current request.
    AdditionalInfo,
    /// Anything else: titles, blank lines, page footers.
    Other,
}

/// Classify a row; the first matching rule wins.
pub fn classify_row(row: &RawRow) -> RowKind {
    if is_header_row(row) {
        return RowKind::Header;
    }
    match row.first_cell() {
        Some(cell) if cell.starts_with(COUNTER_MARKER) => RowKind::Counter,
        Some(cell) if cell.contains(SUBSTATION_MARKER) || cell.contains(PHONE_MARKER) => {
            RowKind::AdditionalInfo
        }
        _ => RowKind::Other,
    }
}

/// A row that was not part of any request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub row: usize,
    pub text: String,
}

/// An optional field whose pattern did not match on an annotation row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMiss {
    pub row: usize,
    pub field: String,
}

/// Records plus diagnostics collected along the way.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedRequests {
    pub records: Vec<Record>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_rows: Vec<SkippedRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pattern_misses: Vec<PatternMiss>,
}

/// Extraction state: the records built so far and which one annotation
/// rows currently attach to.
#[derive(Debug, Default)]
pub struct ExtractionState {
    parsed: ParsedRequests,
    current: Option<usize>,
}

impl ExtractionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the record that annotation rows attach to.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn records(&self) -> &[Record] {
        &self.parsed.records
    }

    /// Consume one row.
    pub fn step(&mut self, row: &RawRow) -> Result<RowKind, NaryadError> {
        let kind = classify_row(row);
        debug!(row = row.index, ?kind, "classified row");

        match kind {
            RowKind::Header => {
                let record = parse_header_row(row)?;
                self.parsed.records.push(record);
                self.current = Some(self.parsed.records.len() - 1);
            }
            RowKind::Counter => {
                let text = self.annotation_text(row)?;
                match extract_counter(&text) {
                    Some(counter) => {
                        if counter.inspection.is_none() {
                            self.miss(row, "inspection_date");
                        }
                        self.target(row)?.counter = Some(counter);
                    }
                    None => self.miss(row, "counter"),
                }
            }
            RowKind::AdditionalInfo => {
                let text = self.annotation_text(row)?;
                self.attach_additional_info(row, &text)?;
            }
            RowKind::Other => {
                if let Some(text) = row.first_cell() {
                    self.parsed.skipped_rows.push(SkippedRow {
                        row: row.index,
                        text: text.to_string(),
                    });
                }
            }
        }

        Ok(kind)
    }

    /// Replace blank counter text with the placeholder and hand back the result.
    pub fn finish(mut self) -> ParsedRequests {
        for record in &mut self.parsed.records {
            if record.counter_info.trim().is_empty() {
                record.counter_info = match &record.counter {
                    Some(counter) => counter.to_string(),
                    None => NO_COUNTER_PLACEHOLDER.to_string(),
                };
            }
        }
        self.parsed
    }

    fn attach_additional_info(&mut self, row: &RawRow, text: &str) -> Result<(), NaryadError> {
        let connection_point = extract_connection_point(text);
        let phone = extract_phone(text);
        let power = extract_power(text);

        if connection_point.is_none() {
            self.miss(row, "connection_point");
        }
        if phone.is_none() {
            self.miss(row, "phone");
        }

        let record = self.target(row)?;
        if let Some(point) = connection_point {
            record.connection_point = Some(point);
        }
        if let Some(phone) = phone {
            record.phone = Some(phone);
        }
        if let Some(power) = power {
            if !power.is_unset() {
                record.append_additional_info(&power.fragment());
                record.power = power.value;
            }
        }
        Ok(())
    }

    /// Text of an annotation row, checking first that it has a target.
    fn annotation_text(&self, row: &RawRow) -> Result<String, NaryadError> {
        if self.current.is_none() {
            return Err(NaryadError::State { row: row.index });
        }
        Ok(row.first_cell().unwrap_or_default().to_string())
    }

    fn target(&mut self, row: &RawRow) -> Result<&mut Record, NaryadError> {
        self.current
            .and_then(|idx| self.parsed.records.get_mut(idx))
            .ok_or(NaryadError::State { row: row.index })
    }

    fn miss(&mut self, row: &RawRow, field: &str) {
        debug!(row = row.index, field, "pattern miss");
        self.parsed.pattern_misses.push(PatternMiss {
            row: row.index,
            field: field.to_string(),
        });
    }
}

/// Turn a sheet's rows into requests, keeping diagnostics.
pub fn extract_detailed(rows: &[RawRow]) -> Result<ParsedRequests, NaryadError> {
    let mut state = ExtractionState::new();
    for row in rows {
        state.step(row)?;
    }
    let parsed = state.finish();
    tracing::info!(
        records = parsed.records.len(),
        skipped = parsed.skipped_rows.len(),
        misses = parsed.pattern_misses.len(),
        "extracted requests"
    );
    Ok(parsed)
}

/// Turn a sheet's rows into requests, in header order.
pub fn extract(rows: &[RawRow]) -> Result<Vec<Record>, NaryadError> {
    extract_detailed(rows).map(|parsed| parsed.records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(index: usize, account: &str) -> RawRow {
        RawRow::new(
            index,
            Some(0),
            &[
                "1",
                account,
                "Иванов И.И.",
                "Керчь, Ленина 5",
                "Заявка/Замена ПУ",
                "жалоба/нет света",
            ],
        )
    }

    fn note(index: usize, text: &str) -> RawRow {
        RawRow::new(index, Some(1), &[text])
    }

    #[test]
    fn test_classify_rows() {
        assert_eq!(classify_row(&header(0, "1")), RowKind::Header);
        assert_eq!(
            classify_row(&note(1, "Т.учета: № 1 СО 1 р.")),
            RowKind::Counter
        );
        assert_eq!(
            classify_row(&note(2, "ТП: ТП-5 Ф. 1")),
            RowKind::AdditionalInfo
        );
        assert_eq!(
            classify_row(&note(3, "тел.: 79781234567")),
            RowKind::AdditionalInfo
        );
        assert_eq!(classify_row(&note(4, "Итого заявок: 5")), RowKind::Other);
        assert_eq!(classify_row(&RawRow::new(5, None, &[])), RowKind::Other);
    }

    #[test]
    fn test_cursor_follows_latest_header() {
        let mut state = ExtractionState::new();
        assert_eq!(state.current(), None);
        state.step(&header(0, "10")).unwrap();
        assert_eq!(state.current(), Some(0));
        state.step(&note(1, "Итого")).unwrap();
        assert_eq!(state.current(), Some(0));
        state.step(&header(2, "20")).unwrap();
        assert_eq!(state.current(), Some(1));
        state.step(&note(3, "тел.: 79781234567")).unwrap();
        assert!(state.records()[0].phone.is_none());
        assert_eq!(state.records()[1].phone.as_deref(), Some("79781234567"));
    }

    #[test]
    fn test_annotation_before_header_is_state_error() {
        let rows = vec![note(0, "Отчет"), note(1, "Т.учета: № 1 СО 1 р.")];
        assert!(matches!(
            extract(&rows),
            Err(NaryadError::State { row: 1 })
        ));
    }

    #[test]
    fn test_header_format_error_reports_row() {
        let rows = vec![RawRow::new(9, Some(0), &["1", "abc"])];
        assert!(matches!(
            extract(&rows),
            Err(NaryadError::Format { row: 9, .. })
        ));
    }

    #[test]
    fn test_counter_attached() {
        let rows = vec![
            header(0, "10"),
            note(1, "Т.учета: № 0123 СО-505 1 р. госп: 15.02.2017"),
        ];
        let records = extract(&rows).unwrap();
        assert_eq!(records[0].counter_info, "№0123 СО-505 п. I-17");
    }

    #[test]
    fn test_counter_miss_leaves_placeholder() {
        let rows = vec![header(0, "10"), note(1, "Т.учета: не установлен")];
        let parsed = extract_detailed(&rows).unwrap();
        assert!(parsed.records[0].counter.is_none());
        assert_eq!(parsed.records[0].counter_info, NO_COUNTER_PLACEHOLDER);
        assert_eq!(parsed.pattern_misses[0].field, "counter");
    }

    #[test]
    fn test_phone_last_match_wins() {
        let rows = vec![
            header(0, "10"),
            note(1, "тел.: 11111"),
            note(2, "тел.: 22222"),
        ];
        let records = extract(&rows).unwrap();
        assert_eq!(records[0].phone.as_deref(), Some("22222"));
    }

    #[test]
    fn test_power_appended_to_additional_info() {
        let rows = vec![
            header(0, "10"),
            note(1, "ТП: ТП-1 Мощность: 15"),
            note(2, "ТП: ТП-1 Мощность: 0"),
            note(3, "ТП: ТП-1 Мощность: 3,5"),
        ];
        let records = extract(&rows).unwrap();
        assert_eq!(records[0].additional_info, "нет света, М: 15, М: 3,5");
    }

    #[test]
    fn test_empty_connection_point_not_attached() {
        let rows = vec![header(0, "10"), note(1, "тел.: 79781234567")];
        let records = extract(&rows).unwrap();
        assert!(records[0].connection_point.is_none());
    }

    #[test]
    fn test_skipped_rows_reported() {
        let rows = vec![note(0, "Список заявок"), header(1, "10")];
        let parsed = extract_detailed(&rows).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(
            parsed.skipped_rows,
            vec![SkippedRow {
                row: 0,
                text: "Список заявок".into()
            }]
        );
    }
}
