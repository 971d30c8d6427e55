use serde::{Deserialize, Serialize};

use crate::model::Worksheet;

/// Column titles of the exported request table.
pub const COLUMNS: [&str; 7] = [
    "№",
    "Л/С",
    "Потребитель",
    "Адрес",
    "ПУ",
    "Тип заявки",
    "Дополнительно",
];

/// One worksheet flattened to rows of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

/// Flatten each worksheet into a table: producer and crew lines, the
/// column titles, then every record in order. Nothing is paginated or cut.
pub fn export_table(worksheets: &[Worksheet]) -> Vec<Table> {
    worksheets
        .iter()
        .map(|worksheet| {
            let mut rows = Vec::with_capacity(worksheet.records.len() + 3);
            rows.push(vec![worksheet.producer_line()]);
            rows.push(vec![worksheet.crew_line()]);
            rows.push(COLUMNS.iter().map(|c| c.to_string()).collect());

            for (i, record) in worksheet.records.iter().enumerate() {
                rows.push(vec![
                    (i + 1).to_string(),
                    record
                        .account_id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "--".to_string()),
                    record.name.clone(),
                    record.address.clone(),
                    record.counter_text(),
                    record.work_type.short.clone(),
                    record.full_additional_info(),
                ]);
            }

            Table {
                name: worksheet.name.clone(),
                rows,
            }
        })
        .collect()
}
