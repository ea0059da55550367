/// User interface pieces: tab identifiers, per-tab views and the histogram canvas

use std::fmt;

pub mod histogram;
pub mod tabs;

/// Top-level tabs, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Format,
    Generate,
    Enhance,
    Background,
    Batch,
    Tools,
    Icons,
}

impl Tab {
    pub const ALL: [Tab; 7] = [
        Tab::Format,
        Tab::Generate,
        Tab::Enhance,
        Tab::Background,
        Tab::Batch,
        Tab::Tools,
        Tab::Icons,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Format => "Format",
            Tab::Generate => "AI Gen",
            Tab::Enhance => "Enhance",
            Tab::Background => "BG Remove",
            Tab::Batch => "Batch",
            Tab::Tools => "Tools",
            Tab::Icons => "Android Icons",
        }
    }
}

/// Sub-tabs of the Tools tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Analysis,
    Filters,
    Resize,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::Analysis, Tool::Filters, Tool::Resize];

    pub fn label(self) -> &'static str {
        match self {
            Tool::Analysis => "Image Analysis",
            Tool::Filters => "Custom Filters",
            Tool::Resize => "Resize & Crop",
        }
    }
}

/// Every place that holds its own input image and last result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Format,
    Generate,
    Enhance,
    Background,
    Analysis,
    Filters,
    Resize,
    Icons,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
