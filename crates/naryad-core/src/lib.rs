pub mod canvas;
pub mod compose;
pub mod error;
pub mod export;
pub mod extraction;
pub mod model;
pub mod parsing;
pub mod profile;

pub use compose::{compose, ComposeOptions, ComposeReport};
pub use export::export_table;
pub use parsing::{extract, extract_detailed};

use error::NaryadError;
use extraction::RowSource;
use parsing::ParsedRequests;

/// Main API entry point: read a request export and extract its records.
///
/// The row source turns the file bytes into rows; extraction then runs
/// the header/annotation state machine over them.
pub fn parse_workbook(
    bytes: &[u8],
    source: &dyn RowSource,
) -> Result<ParsedRequests, NaryadError> {
    let rows = source.read_rows(bytes)?;
    tracing::debug!(
        backend = source.backend_name(),
        rows = rows.len(),
        "read rows"
    );
    extract_detailed(&rows)
}
