//! Locating the cells whose printed output records a notebook's data inputs or outputs.

use crate::{codec::notebook::Cell, config::CellMarker};

/// Which strategy produced a selection. Kept for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectedBy {
    Tag,
    Section,
    /// No tagged cell, and the section strategy is turned off.
    Neither,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub by: SelectedBy,
    pub texts: Vec<String>,
}

/// Stream output text of every cell tagged `tag`, in cell order.
///
/// Returns `None` when no cell carries the tag. A tagged cell without stream output still
/// counts as found and yields `Some` with an empty list.
pub fn find_tagged(cells: &[Cell], tag: &str) -> Option<Vec<String>> {
    let mut found = false;
    let mut texts = Vec::new();
    for cell in cells.iter().filter(|c| c.has_tag(tag)) {
        found = true;
        texts.extend(cell.stream_texts().map(str::to_string));
    }
    found.then_some(texts)
}

/// Stream output text of the cells under the first heading that mentions `keyword`.
///
/// The section runs until the next heading cell, whatever that heading says. Only the
/// first matching section is read.
pub fn find_section(cells: &[Cell], keyword: &str) -> Vec<String> {
    let keyword = keyword.to_lowercase();
    let mut texts = Vec::new();
    let mut in_section = false;
    for cell in cells {
        if cell.is_heading() {
            if in_section {
                break;
            }
            in_section = cell.source.to_lowercase().contains(&keyword);
            continue;
        }
        if in_section {
            texts.extend(cell.stream_texts().map(str::to_string));
        }
    }
    texts
}

/// Tag strategy first; the section strategy only runs when no cell carries the tag.
///
/// An empty tag or section keyword disables that strategy.
pub fn select(cells: &[Cell], marker: &CellMarker) -> Selection {
    if !marker.tag.is_empty() {
        if let Some(texts) = find_tagged(cells, &marker.tag) {
            return Selection {
                by: SelectedBy::Tag,
                texts,
            };
        }
    }
    if marker.section.is_empty() {
        return Selection {
            by: SelectedBy::Neither,
            texts: Vec::new(),
        };
    }
    Selection {
        by: SelectedBy::Section,
        texts: find_section(cells, &marker.section),
    }
}
