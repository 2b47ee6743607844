use serde::Serialize;

use crate::markdown::Anchor;

pub const SUMMARY_SECTION_ID: &str = "summary";
pub const BODY_SECTION_ID: &str = "main-content";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableOfContentsEntry {
    pub anchor_id: String,
    pub title: String,
    pub nesting_level: u8,
}

impl TableOfContentsEntry {
    fn new(anchor_id: &str, title: &str, nesting_level: u8) -> Self {
        Self {
            anchor_id: anchor_id.to_string(),
            title: title.to_string(),
            nesting_level,
        }
    }
}

/// Sidebar entries for an article page: the fixed summary and body sections,
/// then every body heading one level deeper than it was written.
pub fn table_of_contents(anchors: &[Anchor]) -> Vec<TableOfContentsEntry> {
    let fixed = [
        TableOfContentsEntry::new(SUMMARY_SECTION_ID, "Summary", 2),
        TableOfContentsEntry::new(BODY_SECTION_ID, "Body", 2),
    ];
    fixed
        .into_iter()
        .chain(
            anchors
                .iter()
                .map(|anchor| TableOfContentsEntry::new(&anchor.id, &anchor.text, anchor.level + 1)),
        )
        .collect()
}
