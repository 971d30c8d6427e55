use crate::error::NaryadError;
use crate::extraction::RawRow;
use crate::model::Record;
use crate::parsing::normalize::normalize_work_type;

/// City names stripped from the front of addresses (Cyrillic and Latin spelling).
pub const CITY_MARKERS: &[&str] = &["Керчь", "Kerch"];

/// Fixed cell positions of a request header row.
const CELL_ACCOUNT: usize = 1;
const CELL_NAME: usize = 2;
const CELL_ADDRESS: usize = 3;
const CELL_WORK_TYPE: usize = 4;
const CELL_REASON: usize = 5;

/// A request header starts in column 0 with its running number, stored
/// as text.
pub fn is_header_row(row: &RawRow) -> bool {
    row.first_column == Some(0)
        && row.text_column == Some(0)
        && row
            .first_cell()
            .is_some_and(|cell| cell.trim().parse::<i64>().is_ok())
}

/// Build a new request from a header row.
pub fn parse_header_row(row: &RawRow) -> Result<Record, NaryadError> {
    let cell = |idx: usize| {
        row.cells.get(idx).map(|s| s.trim()).ok_or_else(|| NaryadError::Format {
            row: row.index,
            reason: format!(
                "expected at least {} cells, found {}",
                CELL_REASON + 1,
                row.cells.len()
            ),
        })
    };

    let account_raw = cell(CELL_ACCOUNT)?;
    let account_id = account_raw
        .parse::<i64>()
        .map_err(|_| NaryadError::Format {
            row: row.index,
            reason: format!("account id '{account_raw}' is not an integer"),
        })?;

    let raw_type = cell(CELL_WORK_TYPE)?
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .trim();

    let reason_text = capitalize_first(cell(CELL_REASON)?);
    let (reason, extra) = match reason_text.split_once('/') {
        Some((reason, extra)) => (reason.trim(), extra.trim()),
        None => (reason_text.trim(), ""),
    };

    Ok(Record {
        account_id: Some(account_id),
        name: cell(CELL_NAME)?.to_string(),
        address: clean_address(cell(CELL_ADDRESS)?),
        work_type: normalize_work_type(raw_type),
        reason: reason.to_string(),
        additional_info: extra.to_string(),
        counter: None,
        counter_info: String::new(),
        connection_point: None,
        phone: None,
        power: None,
    })
}

/// Keep what follows the city marker and drop the comma separators.
pub fn clean_address(raw: &str) -> String {
    let tail = CITY_MARKERS
        .iter()
        .find_map(|marker| raw.find(marker).map(|idx| &raw[idx + marker.len()..]))
        .unwrap_or(raw);
    tail.replace(',', "").trim().to_string()
}

/// Uppercase the first character only.
fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
