pub mod pdf;
pub mod recording;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::NaryadError;

/// The fixed page templates the forms are printed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// Work order form, two pages per worksheet.
    Order,
    /// Request list appendix, one or two pages per worksheet.
    List,
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateKind::Order => write!(f, "order"),
            TemplateKind::List => write!(f, "list"),
        }
    }
}

/// Handle of a page imported into the output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageHandle(pub usize);

/// Drawing context for one page.
///
/// Coordinates use a top-left origin in the template's native units
/// (PDF points); y grows downwards.
pub trait TextBlock {
    fn place_text(&mut self, x: f32, y: f32, text: &str, font_size: f32);
}

/// Output document built from template pages.
pub trait Canvas {
    type Block<'a>: TextBlock
    where
        Self: 'a;

    /// Number of pages the given template provides.
    fn template_page_count(&self, template: TemplateKind) -> usize;

    /// Append a copy of a template page to the output.
    fn import_page(
        &mut self,
        template: TemplateKind,
        index: usize,
    ) -> Result<PageHandle, NaryadError>;

    /// Open a text drawing context on an imported page.
    fn begin_text(&mut self, page: PageHandle) -> Result<Self::Block<'_>, NaryadError>;
}
