mod color;
mod milestones;

pub use color::{Rgba, BAR_ALPHA};
pub use milestones::{
    ColorEntry, ColorMilestoneTable, SkipReason, SkippedLine, DEFAULT_BASE_PRIMARY,
    DEFAULT_BASE_SECONDARY, DEFAULT_COLOR_TEXT,
};
