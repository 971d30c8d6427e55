//! Request list appendix.
//!
//! The `Split` template has a heading page with the crew and date and a
//! separate table page; `Combined` puts a short heading above the table
//! on one page. Table rows share the same column layout in both.

use crate::canvas::{Canvas, TemplateKind, TextBlock};
use crate::compose::text::truncate_chars;
use crate::error::NaryadError;
use crate::model::{IssueDate, Record, Worksheet};
use crate::profile::schema::{ListLayout, ListVariant};

/// Row placement of a list table page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListGeometry {
    pub first_row_y: f32,
    pub row_spacing: f32,
    /// Rows that fit above the page's bottom margin.
    pub max_rows: usize,
}

pub fn geometry(variant: ListVariant) -> ListGeometry {
    match variant {
        ListVariant::Split => ListGeometry {
            first_row_y: 70.0,
            row_spacing: 40.0,
            max_rows: 18,
        },
        ListVariant::Combined => ListGeometry {
            first_row_y: 112.0,
            row_spacing: 33.2,
            max_rows: 20,
        },
    }
}

/// Crew lines available on the split heading page.
pub const MAX_CREW_SLOTS: usize = 5;

const TITLE_FONT_SIZE: f32 = 12.0;
const TEXT_FONT_SIZE: f32 = 10.0;
const SMALL_FONT_SIZE: f32 = 9.0;

const COMBINED_TITLE_AT: (f32, f32) = (30.0, 47.0);
const COMBINED_PRODUCER_AT: (f32, f32) = (34.0, 67.0);
const COMBINED_CREW_AT: (f32, f32) = (34.0, 82.0);

const SPLIT_TITLE_AT: (f32, f32) = (30.0, 60.0);
const SPLIT_LEAD_AT: (f32, f32) = (150.0, 120.0);
const SPLIT_CREW_Y: f32 = 150.0;
const SPLIT_CREW_SPACING: f32 = 20.0;
const SPLIT_CHIEF_AT: (f32, f32) = (150.0, 250.0);
const SPLIT_DAY_AT: (f32, f32) = (120.0, 300.0);
const SPLIT_MONTH_AT: (f32, f32) = (170.0, 300.0);
const SPLIT_YEAR_AT: (f32, f32) = (260.0, 300.0);
const EMPTY_SLOT: &str = "------------------------------";

const POSITION_X: f32 = 55.0;
/// Single-digit positions move right to line up with two-digit ones.
const POSITION_X_SINGLE_DIGIT: f32 = 58.0;
const POSITION_DY: f32 = 7.0;
const ID_X: f32 = 76.0;
const NAME_X: f32 = 120.0;
const ADDRESS_X: f32 = 280.0;
const TYPE_X: f32 = 480.0;
const DETAIL_DY: f32 = 16.0;

/// Outcome of rendering one worksheet's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOutcome {
    pub rows: usize,
    pub dropped: usize,
}

pub fn title(date: &IssueDate) -> String {
    format!("Приложение к распоряжению № ____________ от {}", date.full)
}

/// Render one worksheet's list pages.
pub fn compose_list<C: Canvas>(
    canvas: &mut C,
    worksheet: &Worksheet,
    layout: &ListLayout,
    date: &IssueDate,
) -> Result<ListOutcome, NaryadError> {
    let geometry = geometry(layout.variant);
    let capacity = layout.capacity.min(geometry.max_rows);
    let rows = worksheet.records.len().min(capacity);

    let table_page = match layout.variant {
        ListVariant::Split => {
            let heading = canvas.import_page(TemplateKind::List, 0)?;
            let table = canvas.import_page(TemplateKind::List, 1)?;
            let mut block = canvas.begin_text(heading)?;
            write_split_heading(&mut block, worksheet, layout, date);
            table
        }
        ListVariant::Combined => {
            let page = canvas.import_page(TemplateKind::List, 0)?;
            let mut block = canvas.begin_text(page)?;
            write_combined_heading(&mut block, worksheet, date);
            page
        }
    };

    let mut block = canvas.begin_text(table_page)?;
    for (i, record) in worksheet.records[..rows].iter().enumerate() {
        let y = geometry.first_row_y + i as f32 * geometry.row_spacing;
        write_row(&mut block, layout, i + 1, record, y);
    }

    Ok(ListOutcome {
        rows,
        dropped: worksheet.records.len() - rows,
    })
}

fn write_combined_heading<B: TextBlock>(block: &mut B, worksheet: &Worksheet, date: &IssueDate) {
    block.place_text(
        COMBINED_TITLE_AT.0,
        COMBINED_TITLE_AT.1,
        &title(date),
        TITLE_FONT_SIZE,
    );
    block.place_text(
        COMBINED_PRODUCER_AT.0,
        COMBINED_PRODUCER_AT.1,
        &worksheet.producer_line(),
        TEXT_FONT_SIZE,
    );
    block.place_text(
        COMBINED_CREW_AT.0,
        COMBINED_CREW_AT.1,
        &worksheet.crew_line(),
        TEXT_FONT_SIZE,
    );
}

fn write_split_heading<B: TextBlock>(
    block: &mut B,
    worksheet: &Worksheet,
    layout: &ListLayout,
    date: &IssueDate,
) {
    block.place_text(SPLIT_TITLE_AT.0, SPLIT_TITLE_AT.1, &title(date), TITLE_FONT_SIZE);
    block.place_text(
        SPLIT_LEAD_AT.0,
        SPLIT_LEAD_AT.1,
        &worksheet.lead.full(),
        TEXT_FONT_SIZE,
    );

    for slot in 0..layout.crew_slots.min(MAX_CREW_SLOTS) {
        let text = match worksheet.crew.get(slot) {
            Some(member) => member.full(),
            None => EMPTY_SLOT.to_string(),
        };
        let y = SPLIT_CREW_Y + slot as f32 * SPLIT_CREW_SPACING;
        block.place_text(SPLIT_LEAD_AT.0, y, &text, TEXT_FONT_SIZE);
    }

    block.place_text(
        SPLIT_CHIEF_AT.0,
        SPLIT_CHIEF_AT.1,
        &worksheet.chief.full(),
        TEXT_FONT_SIZE,
    );
    block.place_text(SPLIT_DAY_AT.0, SPLIT_DAY_AT.1, &date.day, TEXT_FONT_SIZE);
    block.place_text(SPLIT_MONTH_AT.0, SPLIT_MONTH_AT.1, &date.month, TEXT_FONT_SIZE);
    block.place_text(SPLIT_YEAR_AT.0, SPLIT_YEAR_AT.1, &date.year, TEXT_FONT_SIZE);
}

fn write_row<B: TextBlock>(
    block: &mut B,
    layout: &ListLayout,
    position: usize,
    record: &Record,
    y: f32,
) {
    let position_x = if position < 10 {
        POSITION_X_SINGLE_DIGIT
    } else {
        POSITION_X
    };
    block.place_text(position_x, y + POSITION_DY, &position.to_string(), TEXT_FONT_SIZE);
    block.place_text(ID_X, y, &record.padded_account_id(), TEXT_FONT_SIZE);
    block.place_text(
        NAME_X,
        y,
        &truncate_chars(&record.name, layout.name_max_chars),
        SMALL_FONT_SIZE,
    );
    block.place_text(ADDRESS_X, y, &record.address, SMALL_FONT_SIZE);
    block.place_text(TYPE_X, y - 1.0, &record.work_type.short, TEXT_FONT_SIZE);
    block.place_text(
        ID_X,
        y + DETAIL_DY,
        &truncate_chars(&record.counter_text(), layout.counter_max_chars),
        TEXT_FONT_SIZE,
    );
    block.place_text(
        ADDRESS_X,
        y + DETAIL_DY,
        &truncate_chars(&record.full_additional_info(), layout.additional_max_chars),
        SMALL_FONT_SIZE,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::recording::RecordingCanvas;
    use crate::compose::tests::{layout_profile, worksheet};
    use crate::model::NO_COUNTER_PLACEHOLDER;

    #[test]
    fn test_combined_list() {
        let mut profile = layout_profile();
        profile.list.variant = ListVariant::Combined;
        profile.list.capacity = 20;
        let ws = worksheet(12);
        let date = ws.issue_date(profile.offset());
        let mut canvas = RecordingCanvas::new(2, 1);

        let outcome = compose_list(&mut canvas, &ws, &profile.list, &date).unwrap();
        assert_eq!(outcome, ListOutcome { rows: 12, dropped: 0 });

        let page = &canvas.pages()[0];
        assert!(page
            .find("Приложение к распоряжению № ____________ от 15.03.2019")
            .is_some());
        assert!(page.find("Производитель работ: Сидоров С.С.").is_some());
        assert!(page.find("Член бригады: Кузнецов К.К.").is_some());

        let nine = page.find("9").unwrap();
        assert_eq!(nine.x, POSITION_X_SINGLE_DIGIT);
        let ten = page.find("10").unwrap();
        assert_eq!(ten.x, POSITION_X);
        assert_eq!(ten.y, 112.0 + 9.0 * 33.2 + POSITION_DY);
    }

    #[test]
    fn test_split_heading_fills_empty_crew_slots() {
        let profile = layout_profile();
        let ws = worksheet(1);
        let date = ws.issue_date(profile.offset());
        let mut canvas = RecordingCanvas::new(2, 2);
        compose_list(&mut canvas, &ws, &profile.list, &date).unwrap();

        let pages = canvas.pages();
        assert_eq!(pages.len(), 2);
        let heading = &pages[0];
        assert!(heading
            .find("Кузнецов К.К., Электромонтер, III гр.")
            .is_some());
        let dashes = heading.texts().iter().filter(|t| **t == EMPTY_SLOT).count();
        assert_eq!(dashes, 3);
        assert!(heading.find("2019").is_some());
        assert_eq!(pages[1].template_page, 1);
    }

    #[test]
    fn test_row_fields() {
        let profile = layout_profile();
        let mut ws = worksheet(1);
        ws.records[0].name = "Очень длинное имя потребителя для проверки".into();
        let date = ws.issue_date(profile.offset());
        let mut canvas = RecordingCanvas::new(2, 2);
        compose_list(&mut canvas, &ws, &profile.list, &date).unwrap();

        let table = &canvas.pages()[1];
        assert!(table.find("010001").is_some());
        assert!(table.find(NO_COUNTER_PLACEHOLDER).is_some());
        let name = table.placements.iter().find(|p| p.x == NAME_X).unwrap();
        assert_eq!(name.text.chars().count(), 31);
    }

    #[test]
    fn test_overflow_truncated() {
        let profile = layout_profile();
        let ws = worksheet(25);
        let date = ws.issue_date(profile.offset());
        let mut canvas = RecordingCanvas::new(2, 2);
        let outcome = compose_list(&mut canvas, &ws, &profile.list, &date).unwrap();
        assert_eq!(outcome, ListOutcome { rows: 18, dropped: 7 });
    }

    #[test]
    fn test_split_needs_two_template_pages() {
        let profile = layout_profile();
        let ws = worksheet(1);
        let date = ws.issue_date(profile.offset());
        let mut canvas = RecordingCanvas::new(2, 1);
        assert!(matches!(
            compose_list(&mut canvas, &ws, &profile.list, &date),
            Err(NaryadError::Layout(_))
        ));
    }
}
