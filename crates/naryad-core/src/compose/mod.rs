pub mod list;
pub mod order;
pub mod text;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::canvas::{Canvas, TemplateKind};
use crate::error::NaryadError;
use crate::model::Worksheet;
use crate::profile::schema::LayoutProfile;
use list::compose_list;
use order::{compose_order, ORDER_TEMPLATE_PAGES};

/// Options for composing forms.
#[derive(Debug, Clone)]
pub struct ComposeOptions {
    /// Render the request lists after the order forms.
    pub include_lists: bool,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            include_lists: true,
        }
    }
}

/// Records left off a form because its pages were full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Truncation {
    pub worksheet: String,
    pub form: TemplateKind,
    pub dropped: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeReport {
    /// Pages appended to the canvas.
    pub pages: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub truncated: Vec<Truncation>,
}

/// Render every worksheet's order form, then every worksheet's list.
///
/// Template page counts are checked before anything is imported, so a
/// template that is too short leaves the canvas untouched. Records that do
/// not fit a form are dropped and reported in [`ComposeReport::truncated`].
pub fn compose<C: Canvas>(
    worksheets: &[Worksheet],
    canvas: &mut C,
    profile: &LayoutProfile,
    options: &ComposeOptions,
) -> Result<ComposeReport, NaryadError> {
    check_template(canvas, TemplateKind::Order, ORDER_TEMPLATE_PAGES)?;
    let list_pages = profile.list.variant.page_count();
    if options.include_lists {
        check_template(canvas, TemplateKind::List, list_pages)?;
    }

    let offset = profile.offset();
    let mut report = ComposeReport::default();

    for worksheet in worksheets {
        let date = worksheet.issue_date(offset);
        let split = compose_order(canvas, worksheet, &profile.order, &date)?;
        report.pages += ORDER_TEMPLATE_PAGES;
        note_truncation(&mut report, worksheet, TemplateKind::Order, split.dropped);
    }

    if options.include_lists {
        for worksheet in worksheets {
            let date = worksheet.issue_date(offset);
            let outcome = compose_list(canvas, worksheet, &profile.list, &date)?;
            report.pages += list_pages;
            note_truncation(&mut report, worksheet, TemplateKind::List, outcome.dropped);
        }
    }

    info!(
        worksheets = worksheets.len(),
        pages = report.pages,
        truncated = report.truncated.len(),
        "composed forms"
    );
    Ok(report)
}

fn check_template<C: Canvas>(
    canvas: &C,
    template: TemplateKind,
    required: usize,
) -> Result<(), NaryadError> {
    let available = canvas.template_page_count(template);
    if available < required {
        return Err(NaryadError::Layout(format!(
            "{template} template has {available} page(s), {required} required"
        )));
    }
    Ok(())
}

fn note_truncation(
    report: &mut ComposeReport,
    worksheet: &Worksheet,
    form: TemplateKind,
    dropped: usize,
) {
    if dropped == 0 {
        return;
    }
    warn!(
        worksheet = %worksheet.name,
        %form,
        dropped,
        "records do not fit the form and were left out"
    );
    report.truncated.push(Truncation {
        worksheet: worksheet.name.clone(),
        form,
        dropped,
    });
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::canvas::recording::RecordingCanvas;
    use crate::model::{Employee, Record, WorkType};
    use crate::profile::builtin::load_preset;
    use chrono::{TimeZone, Utc};

    pub(crate) fn layout_profile() -> LayoutProfile {
        load_preset("standard").unwrap()
    }

    fn employee(name: &str, position: &str, group: i32) -> Employee {
        Employee {
            name: name.into(),
            position: position.into(),
            access_group: group,
        }
    }

    /// Worksheet issued 15.03.2019 (Moscow time) with `records` requests.
    pub(crate) fn worksheet(records: usize) -> Worksheet {
        Worksheet {
            name: "Бригада 1".into(),
            lead: employee("Сидоров С.С.", "Мастер", 4),
            chief: employee("Петров П.П.", "Начальник участка", 5),
            crew: vec![employee("Кузнецов К.К.", "Электромонтер", 3)],
            records: (0..records)
                .map(|i| Record {
                    account_id: Some(10_001 + i as i64),
                    name: format!("Абонент {}", i + 1),
                    address: format!("ул. Мира {}", i + 1),
                    work_type: WorkType {
                        short: "Замена ПУ".into(),
                        full: "Замена прибора учета электроэнергии".into(),
                    },
                    reason: "Жалоба".into(),
                    additional_info: String::new(),
                    counter: None,
                    counter_info: String::new(),
                    connection_point: None,
                    phone: None,
                    power: None,
                })
                .collect(),
            work_types: vec!["Замена ПУ".into(), "Откл. неуплата".into()],
            issued_at: Utc.with_ymd_and_hms(2019, 3, 15, 6, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_orders_before_lists() {
        let worksheets = vec![worksheet(2), worksheet(3)];
        let mut canvas = RecordingCanvas::new(2, 2);
        let report = compose(
            &worksheets,
            &mut canvas,
            &layout_profile(),
            &ComposeOptions::default(),
        )
        .unwrap();

        assert_eq!(report.pages, 8);
        let kinds: Vec<_> = canvas.pages().iter().map(|p| p.template).collect();
        assert_eq!(
            kinds,
            vec![
                TemplateKind::Order,
                TemplateKind::Order,
                TemplateKind::Order,
                TemplateKind::Order,
                TemplateKind::List,
                TemplateKind::List,
                TemplateKind::List,
                TemplateKind::List,
            ]
        );
    }

    #[test]
    fn test_lists_can_be_skipped() {
        let worksheets = vec![worksheet(1)];
        let mut canvas = RecordingCanvas::new(2, 0);
        let options = ComposeOptions {
            include_lists: false,
        };
        let report = compose(&worksheets, &mut canvas, &layout_profile(), &options).unwrap();
        assert_eq!(report.pages, 2);
    }

    #[test]
    fn test_short_template_rejected_before_import() {
        let worksheets = vec![worksheet(1)];
        let mut canvas = RecordingCanvas::new(1, 2);
        let result = compose(
            &worksheets,
            &mut canvas,
            &layout_profile(),
            &ComposeOptions::default(),
        );
        assert!(matches!(result, Err(NaryadError::Layout(_))));
        assert!(canvas.pages().is_empty());
    }

    #[test]
    fn test_truncation_reported() {
        let worksheets = vec![worksheet(20)];
        let mut canvas = RecordingCanvas::new(2, 2);
        let report = compose(
            &worksheets,
            &mut canvas,
            &layout_profile(),
            &ComposeOptions::default(),
        )
        .unwrap();
        assert_eq!(
            report.truncated,
            vec![
                Truncation {
                    worksheet: "Бригада 1".into(),
                    form: TemplateKind::Order,
                    dropped: 2,
                },
                Truncation {
                    worksheet: "Бригада 1".into(),
                    form: TemplateKind::List,
                    dropped: 2,
                },
            ]
        );
    }

    #[test]
    fn test_worksheets_left_unchanged() {
        let worksheets = vec![worksheet(5)];
        let before = worksheets.clone();
        let mut canvas = RecordingCanvas::new(2, 2);
        compose(
            &worksheets,
            &mut canvas,
            &layout_profile(),
            &ComposeOptions::default(),
        )
        .unwrap();
        assert_eq!(worksheets, before);
    }
}
