use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Capacities, budgets and date settings for one pair of form templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutProfile {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Offset from UTC used when printing the issue date.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
    pub order: OrderLayout,
    pub list: ListLayout,
}

impl LayoutProfile {
    /// The issue-date offset; falls back to UTC if out of range.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }
}

/// Work order form (two template pages per worksheet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLayout {
    pub first_page_capacity: usize,
    pub second_page_capacity: usize,
    pub work_types_line_budget: usize,
    pub address_line_budget: usize,
    pub safety_text_line_budget: usize,
}

impl OrderLayout {
    pub fn capacity(&self) -> usize {
        self.first_page_capacity + self.second_page_capacity
    }
}

/// Which list template layout is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListVariant {
    /// Heading page followed by a content page.
    Split,
    /// Heading and rows on a single page.
    Combined,
}

impl ListVariant {
    /// Template pages one worksheet's list consumes.
    pub fn page_count(self) -> usize {
        match self {
            ListVariant::Split => 2,
            ListVariant::Combined => 1,
        }
    }
}

/// Request list appendix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListLayout {
    pub variant: ListVariant,
    pub capacity: usize,
    pub name_max_chars: usize,
    pub counter_max_chars: usize,
    pub additional_max_chars: usize,
    /// Crew lines on the heading page; unused slots get a dashed rule.
    #[serde(default = "default_crew_slots")]
    pub crew_slots: usize,
}

fn default_utc_offset_minutes() -> i32 {
    180
}

fn default_crew_slots() -> usize {
    4
}
