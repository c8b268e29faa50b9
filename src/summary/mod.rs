//! Display projections of collected data: loop item summaries, the loop page
//! view model, and the confirmation page sections.

pub mod format;
pub mod items;
pub mod loop_page;
pub mod sections;

pub use format::{display_text, format_value};
pub use items::{to_displayable_summary, ItemSummary, SummaryRow};
pub use loop_page::{resolve_title, summary_for, LoopPageSummary};
pub use sections::{
    add_loop_sections, Section, SectionRow, SectionSource, Spacer, StandardSummary, SummaryField,
};

/// Helpers reused by the loop page composer and exposed for custom pages.
pub mod helpers {
    pub use super::items::to_displayable_summary;
    pub use crate::translate::conditional_translate;
}
