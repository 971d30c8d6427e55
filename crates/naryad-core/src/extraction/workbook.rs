use std::io::Cursor;

use calamine::{Data, Reader};

use crate::error::NaryadError;
use crate::extraction::{RawRow, RowSource};

/// Reads the first worksheet of an `.xls` or `.xlsx` request export.
pub struct WorkbookRowSource;

impl WorkbookRowSource {
    pub fn new() -> Self {
        WorkbookRowSource
    }
}

impl Default for WorkbookRowSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RowSource for WorkbookRowSource {
    fn read_rows(&self, bytes: &[u8]) -> Result<Vec<RawRow>, NaryadError> {
        let cursor = Cursor::new(bytes);
        let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
            .map_err(|e| NaryadError::Spreadsheet(format!("failed to open workbook: {e}")))?;

        let sheet = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| NaryadError::Spreadsheet("workbook has no worksheets".into()))?
            .map_err(|e| NaryadError::Spreadsheet(format!("failed to read first sheet: {e}")))?;

        let (first_row, first_col) = match sheet.start() {
            Some((row, col)) => (row as usize, col as usize),
            None => return Ok(Vec::new()),
        };

        let rows = sheet
            .rows()
            .enumerate()
            .map(|(i, cells)| to_raw_row(first_row + i, first_col, cells))
            .collect();

        Ok(rows)
    }

    fn backend_name(&self) -> &str {
        "calamine"
    }
}

fn to_raw_row(index: usize, first_col: usize, cells: &[Data]) -> RawRow {
    let first_column = cells
        .iter()
        .position(|c| !is_blank(c))
        .map(|offset| first_col + offset);

    let text_column = cells
        .iter()
        .position(|c| cell_as_text(c).is_some())
        .map(|offset| first_col + offset);

    let cells = cells.iter().filter_map(cell_as_text).collect();

    RawRow {
        index,
        first_column,
        text_column,
        cells,
    }
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Only text cells take part in classification; numbers, dates and
/// errors are dropped.
fn cell_as_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_keeps_text_cells_only() {
        let cells = vec![
            Data::Empty,
            Data::String("1".into()),
            Data::Float(10045.0),
            Data::String("  Иванов И.И. ".into()),
            Data::String("   ".into()),
        ];
        let row = to_raw_row(7, 0, &cells);
        assert_eq!(row.index, 7);
        assert_eq!(row.first_column, Some(1));
        assert_eq!(row.text_column, Some(1));
        assert_eq!(row.cells, vec!["1", "Иванов И.И."]);
    }

    #[test]
    fn test_text_column_skips_leading_number() {
        let cells = vec![
            Data::Float(1.0),
            Data::String("7".into()),
            Data::String("Иванов И.И.".into()),
        ];
        let row = to_raw_row(2, 0, &cells);
        assert_eq!(row.first_column, Some(0));
        assert_eq!(row.text_column, Some(1));
        assert_eq!(row.first_cell(), Some("7"));
    }

    #[test]
    fn test_first_column_is_absolute() {
        let cells = vec![Data::Empty, Data::Int(3)];
        let row = to_raw_row(0, 2, &cells);
        assert_eq!(row.first_column, Some(3));
        assert_eq!(row.text_column, None);
        assert!(row.cells.is_empty());
    }

    #[test]
    fn test_empty_row() {
        let row = to_raw_row(4, 0, &[Data::Empty, Data::String(" ".into())]);
        assert_eq!(row.first_column, None);
        assert!(row.cells.is_empty());
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let err = WorkbookRowSource::new().read_rows(b"not a workbook").unwrap_err();
        assert!(matches!(err, NaryadError::Spreadsheet(_)));
    }
}
