pub mod workbook;

use serde::{Deserialize, Serialize};

use crate::error::NaryadError;

/// One spreadsheet row, reduced to what the request parser looks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// Row index within the sheet.
    pub index: usize,
    /// Absolute column of the first occupied cell; None for an empty row.
    pub first_column: Option<usize>,
    /// Absolute column of `cells[0]`; differs from `first_column` when a
    /// number or date precedes the first text cell.
    #[serde(default)]
    pub text_column: Option<usize>,
    /// Non-blank text cells, trimmed, in column order.
    pub cells: Vec<String>,
}

impl RawRow {
    /// A row whose first text cell is also its first occupied cell.
    pub fn new(index: usize, first_column: Option<usize>, cells: &[&str]) -> Self {
        RawRow {
            index,
            first_column,
            text_column: if cells.is_empty() { None } else { first_column },
            cells: cells.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn first_cell(&self) -> Option<&str> {
        self.cells.first().map(String::as_str)
    }
}

/// Trait for spreadsheet reading backends.
pub trait RowSource: Send + Sync {
    /// Read the request sheet from raw file bytes, one RawRow per sheet row.
    fn read_rows(&self, bytes: &[u8]) -> Result<Vec<RawRow>, NaryadError>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
