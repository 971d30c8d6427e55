use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, PageHandle, TemplateKind, TextBlock};
use crate::error::NaryadError;

/// One piece of text placed on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub font_size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedPage {
    pub template: TemplateKind,
    pub template_page: usize,
    pub placements: Vec<Placement>,
}

impl RecordedPage {
    pub fn texts(&self) -> Vec<&str> {
        self.placements.iter().map(|p| p.text.as_str()).collect()
    }

    pub fn find(&self, text: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.text == text)
    }
}

/// In-memory canvas that records every placement instead of rendering.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    order_pages: usize,
    list_pages: usize,
    pages: Vec<RecordedPage>,
}

impl RecordingCanvas {
    /// A canvas whose templates have the given page counts.
    pub fn new(order_pages: usize, list_pages: usize) -> Self {
        RecordingCanvas {
            order_pages,
            list_pages,
            pages: Vec::new(),
        }
    }

    pub fn pages(&self) -> &[RecordedPage] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<RecordedPage> {
        self.pages
    }
}

pub struct RecordingBlock<'a> {
    page: &'a mut RecordedPage,
}

impl TextBlock for RecordingBlock<'_> {
    fn place_text(&mut self, x: f32, y: f32, text: &str, font_size: f32) {
        self.page.placements.push(Placement {
            x,
            y,
            text: text.to_string(),
            font_size,
        });
    }
}

impl Canvas for RecordingCanvas {
    type Block<'a> = RecordingBlock<'a>;

    fn template_page_count(&self, template: TemplateKind) -> usize {
        match template {
            TemplateKind::Order => self.order_pages,
            TemplateKind::List => self.list_pages,
        }
    }

    fn import_page(
        &mut self,
        template: TemplateKind,
        index: usize,
    ) -> Result<PageHandle, NaryadError> {
        if index >= self.template_page_count(template) {
            return Err(NaryadError::Layout(format!(
                "{template} template has no page {}",
                index + 1
            )));
        }
        self.pages.push(RecordedPage {
            template,
            template_page: index,
            placements: Vec::new(),
        });
        Ok(PageHandle(self.pages.len() - 1))
    }

    fn begin_text(&mut self, page: PageHandle) -> Result<RecordingBlock<'_>, NaryadError> {
        let page = self
            .pages
            .get_mut(page.0)
            .ok_or_else(|| NaryadError::Layout(format!("unknown page handle {}", page.0)))?;
        Ok(RecordingBlock { page })
    }
}
