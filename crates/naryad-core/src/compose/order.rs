//! Work order form: two template pages per worksheet.
//!
//! Page 1 carries the heading block and the first records, page 2 the
//! remaining records and the chief's sign-off. All coordinates are in
//! points from the top-left corner of a landscape A4 page.

use crate::canvas::{Canvas, TemplateKind, TextBlock};
use crate::compose::text::{write_multiline, Multiline};
use crate::error::NaryadError;
use crate::model::{IssueDate, Record, Worksheet};
use crate::profile::schema::OrderLayout;

/// Template pages the order form needs.
pub const ORDER_TEMPLATE_PAGES: usize = 2;

const HEADING_FONT_SIZE: f32 = 12.0;
const POSITION_FONT_SIZE: f32 = 8.0;

const LEAD_AT: (f32, f32) = (174.0, 160.0);
const CREW_AT: (f32, f32) = (164.0, 186.0);
const WORK_TYPES_FIRST: (f32, f32) = (278.0, 212.0);
const WORK_TYPES_NEXT: (f32, f32) = (60.0, 225.0);
const WORK_TYPES_SPACING: f32 = 14.0;
const WORK_TYPES_SUFFIX: &str = " согласно бланка распоряжения номер № ";
const DAY_AT: (f32, f32) = (392.0, 279.0);
const MONTH_AT: (f32, f32) = (455.0, 279.0);
const YEAR_AT: (f32, f32) = (488.0, 279.0);
const FULL_DATE_AT: (f32, f32) = (166.0, 293.0);
const CHIEF_AT: (f32, f32) = (466.0, 293.0);
const CHIEF_SIGN_AT: (f32, f32) = (320.0, 319.0);
const LEAD_SIGN_AT: (f32, f32) = (675.0, 319.0);

const FIRST_PAGE_ROW_Y: f32 = 436.0;
const FIRST_PAGE_ROW_SPACING: f32 = 30.2;
const SECOND_PAGE_ROW_Y: f32 = 58.0;
const SECOND_PAGE_ROW_SPACING: f32 = 29.55;

/// Rows the order template has room for on each page.
pub const FIRST_PAGE_MAX_ROWS: usize = 4;
pub const SECOND_PAGE_MAX_ROWS: usize = 14;

const POSITION_X: f32 = 60.0;
const ADDRESS_X: f32 = 81.0;
const ADDRESS_FONT_SIZE: f32 = 7.0;
const ADDRESS_SPACING: f32 = 8.0;
const SAFETY_X: f32 = 200.0;
const SAFETY_FONT_SIZE: f32 = 6.0;
const SAFETY_SPACING: f32 = 7.0;

/// Safety steps printed next to every record.
pub const SAFETY_TEXT: &str = "1) Отключить нагрузку; 2) Проверить фазировку;\n\
3) Отключить электроустановку; 4) Проверить\n\
отсутствие напряжения; 5) Применить\n\
основные и дополнительные средства защиты";

const TAIL_CHIEF_AT: (f32, f32) = (140.0, 507.0);
const TAIL_DAY_AT: (f32, f32) = (392.0, 507.0);
const TAIL_MONTH_AT: (f32, f32) = (465.0, 507.0);
const TAIL_YEAR_AT: (f32, f32) = (508.0, 507.0);

/// How a worksheet's records spread over the two order pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSplit {
    pub first_page: usize,
    pub second_page: usize,
    pub dropped: usize,
}

pub fn split_order_records(total: usize, layout: &OrderLayout) -> OrderSplit {
    let first_page = total.min(layout.first_page_capacity);
    let second_page = total
        .saturating_sub(layout.first_page_capacity)
        .min(layout.second_page_capacity);
    OrderSplit {
        first_page,
        second_page,
        dropped: total - first_page - second_page,
    }
}

/// Render one worksheet's order form; returns how the records were split.
pub fn compose_order<C: Canvas>(
    canvas: &mut C,
    worksheet: &Worksheet,
    layout: &OrderLayout,
    date: &IssueDate,
) -> Result<OrderSplit, NaryadError> {
    let split = split_order_records(worksheet.records.len(), layout);
    let (first_records, rest) = worksheet.records.split_at(split.first_page);
    let second_records = &rest[..split.second_page];

    let first = canvas.import_page(TemplateKind::Order, 0)?;
    let second = canvas.import_page(TemplateKind::Order, 1)?;

    {
        let mut block = canvas.begin_text(first)?;
        write_heading(&mut block, worksheet, layout, date);
        for (i, record) in first_records.iter().enumerate() {
            let y = FIRST_PAGE_ROW_Y + i as f32 * FIRST_PAGE_ROW_SPACING;
            write_record(&mut block, layout, i + 1, record, y);
        }
    }

    let mut block = canvas.begin_text(second)?;
    for (i, record) in second_records.iter().enumerate() {
        let y = SECOND_PAGE_ROW_Y + i as f32 * SECOND_PAGE_ROW_SPACING;
        write_record(&mut block, layout, layout.first_page_capacity + i + 1, record, y);
    }
    write_tail(&mut block, worksheet, date);

    Ok(split)
}

fn write_heading<B: TextBlock>(
    block: &mut B,
    worksheet: &Worksheet,
    layout: &OrderLayout,
    date: &IssueDate,
) {
    let lead = worksheet.lead.name_with_group();
    let chief = worksheet.chief.name_with_group();
    let size = HEADING_FONT_SIZE;

    block.place_text(LEAD_AT.0, LEAD_AT.1, &lead, size);
    block.place_text(CREW_AT.0, CREW_AT.1, &worksheet.crew_names(), size);

    let work_types = format!("{}{}", worksheet.work_types.join(", "), WORK_TYPES_SUFFIX);
    let spec = Multiline {
        first: WORK_TYPES_FIRST,
        next: WORK_TYPES_NEXT,
        budget: layout.work_types_line_budget,
        font_size: size,
        line_spacing: WORK_TYPES_SPACING,
    };
    write_multiline(block, &spec, &work_types);

    block.place_text(DAY_AT.0, DAY_AT.1, &date.day, size);
    block.place_text(MONTH_AT.0, MONTH_AT.1, &date.month, size);
    block.place_text(YEAR_AT.0, YEAR_AT.1, &year_with_suffix(date), size);
    block.place_text(FULL_DATE_AT.0, FULL_DATE_AT.1, &date.full, size);
    block.place_text(CHIEF_AT.0, CHIEF_AT.1, &chief, size);
    block.place_text(CHIEF_SIGN_AT.0, CHIEF_SIGN_AT.1, &chief, size);
    block.place_text(LEAD_SIGN_AT.0, LEAD_SIGN_AT.1, &lead, size);
}

fn write_record<B: TextBlock>(
    block: &mut B,
    layout: &OrderLayout,
    position: usize,
    record: &Record,
    y: f32,
) {
    block.place_text(POSITION_X, y, &position.to_string(), POSITION_FONT_SIZE);

    let address = Multiline {
        first: (ADDRESS_X, y),
        next: (ADDRESS_X, y + ADDRESS_SPACING),
        budget: layout.address_line_budget,
        font_size: ADDRESS_FONT_SIZE,
        line_spacing: ADDRESS_SPACING,
    };
    write_multiline(block, &address, &record.address);

    let safety = Multiline {
        first: (SAFETY_X, y - 5.0),
        next: (SAFETY_X, y + 2.0),
        budget: layout.safety_text_line_budget,
        font_size: SAFETY_FONT_SIZE,
        line_spacing: SAFETY_SPACING,
    };
    write_multiline(block, &safety, SAFETY_TEXT);
}

fn write_tail<B: TextBlock>(block: &mut B, worksheet: &Worksheet, date: &IssueDate) {
    let size = HEADING_FONT_SIZE;
    block.place_text(
        TAIL_CHIEF_AT.0,
        TAIL_CHIEF_AT.1,
        &worksheet.chief.position_with_name(),
        size,
    );
    block.place_text(TAIL_DAY_AT.0, TAIL_DAY_AT.1, &date.day, size);
    block.place_text(TAIL_MONTH_AT.0, TAIL_MONTH_AT.1, &date.month, size);
    block.place_text(TAIL_YEAR_AT.0, TAIL_YEAR_AT.1, &year_with_suffix(date), size);
}

fn year_with_suffix(date: &IssueDate) -> String {
    format!("{} г.", date.year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::recording::RecordingCanvas;
    use crate::compose::tests::{layout_profile, worksheet};
    use proptest::prelude::*;

    #[test]
    fn test_page_limits_stay_above_tail() {
        let first_last = FIRST_PAGE_ROW_Y + (FIRST_PAGE_MAX_ROWS - 1) as f32 * FIRST_PAGE_ROW_SPACING;
        let second_last =
            SECOND_PAGE_ROW_Y + (SECOND_PAGE_MAX_ROWS - 1) as f32 * SECOND_PAGE_ROW_SPACING;
        assert!(first_last < 595.0);
        assert!(second_last < TAIL_CHIEF_AT.1);
    }

    #[test]
    fn test_split_counts() {
        let layout = layout_profile().order;
        assert_eq!(
            split_order_records(3, &layout),
            OrderSplit { first_page: 3, second_page: 0, dropped: 0 }
        );
        assert_eq!(
            split_order_records(20, &layout),
            OrderSplit { first_page: 4, second_page: 14, dropped: 2 }
        );
    }

    #[test]
    fn test_heading_block() {
        let profile = layout_profile();
        let ws = worksheet(2);
        let date = ws.issue_date(profile.offset());
        let mut canvas = RecordingCanvas::new(2, 2);
        compose_order(&mut canvas, &ws, &profile.order, &date).unwrap();

        let pages = canvas.pages();
        assert_eq!(pages.len(), 2);
        let first = &pages[0];
        assert_eq!(first.template_page, 0);
        let lead = first.find("Сидоров С.С. IV гр.").unwrap();
        assert_eq!((lead.x, lead.y), LEAD_AT);
        assert!(first.find("Кузнецов К.К.").is_some());
        assert!(first.find("15.03.2019").is_some());
        assert!(first.find("2019 г.").is_some());
        let chief_count = first
            .texts()
            .iter()
            .filter(|t| **t == "Петров П.П. V гр.")
            .count();
        assert_eq!(chief_count, 2);
    }

    #[test]
    fn test_records_numbered_across_pages() {
        let profile = layout_profile();
        let ws = worksheet(6);
        let date = ws.issue_date(profile.offset());
        let mut canvas = RecordingCanvas::new(2, 2);
        compose_order(&mut canvas, &ws, &profile.order, &date).unwrap();

        let pages = canvas.pages();
        let first_positions: Vec<_> = pages[0]
            .placements
            .iter()
            .filter(|p| p.x == POSITION_X)
            .map(|p| p.text.as_str())
            .collect();
        assert_eq!(first_positions, vec!["1", "2", "3", "4"]);

        let fifth = pages[1].find("5").unwrap();
        assert_eq!(fifth.y, SECOND_PAGE_ROW_Y);
        assert!(pages[1].find("6").is_some());
        assert!(pages[1].find("Начальник участка Петров П.П.").is_some());
    }

    #[test]
    fn test_safety_text_on_four_lines() {
        let profile = layout_profile();
        let ws = worksheet(1);
        let date = ws.issue_date(profile.offset());
        let mut canvas = RecordingCanvas::new(2, 2);
        compose_order(&mut canvas, &ws, &profile.order, &date).unwrap();

        let safety: Vec<_> = canvas.pages()[0]
            .placements
            .iter()
            .filter(|p| p.x == SAFETY_X)
            .collect();
        assert_eq!(safety.len(), 4);
        assert_eq!(safety[0].y, FIRST_PAGE_ROW_Y - 5.0);
        assert_eq!(safety[1].y, FIRST_PAGE_ROW_Y + 2.0);
        assert_eq!(safety[3].y, FIRST_PAGE_ROW_Y + 16.0);
    }

    proptest! {
        #[test]
        fn order_pagination_counts(total in 0usize..60) {
            let layout = layout_profile().order;
            let split = split_order_records(total, &layout);
            prop_assert_eq!(split.first_page, total.min(4));
            prop_assert_eq!(split.second_page, total.saturating_sub(4).min(14));
            prop_assert_eq!(split.first_page + split.second_page + split.dropped, total);
        }
    }
}
