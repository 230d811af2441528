//! # Page Layout
//!
//! Classification runs per subgroup: a band of notation rows on the scanned
//! page. Before encoding, subgroups are padded to whole beats and gathered
//! into the section their rows fall under.
//!
//! ## Section assignment
//! Each present section has a marker row (the row its heading sits on). A
//! subgroup belongs to the latest present section whose marker row lies
//! strictly above the subgroup's first row. Subgroups at or above the
//! sthayee marker are page furniture and are dropped.

use std::collections::BTreeMap;

use crate::composition::{Meend, Section, SlotSequences};

/// Rows `start_row..end_row` of the scanned page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SectionRange {
    pub start_row: usize,
    pub end_row: usize,
}

impl SectionRange {
    pub fn new(start_row: usize, end_row: usize) -> Self {
        Self { start_row, end_row }
    }
}

/// Marker row of each section present on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMarkers {
    rows: BTreeMap<Section, usize>,
}

impl SectionMarkers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, section: Section, row: usize) {
        self.rows.insert(section, row);
    }

    pub fn row(&self, section: Section) -> Option<usize> {
        self.rows.get(&section).copied()
    }

    /// Section owning a subgroup that starts on `start_row`.
    pub fn section_for(&self, start_row: usize) -> Option<Section> {
        let sthayee = self.row(Section::Sthayee)?;
        if start_row <= sthayee {
            return None;
        }
        self.rows
            .iter()
            .filter(|(_, row)| **row < start_row)
            .map(|(section, _)| *section)
            .max()
    }
}

impl FromIterator<(Section, usize)> for SectionMarkers {
    fn from_iter<I: IntoIterator<Item = (Section, usize)>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

/// Gather subgroups into sections, concatenating them in row order.
///
/// Every present section gets an entry, even if no subgroup lands in it.
pub fn flatten_by_section(
    subgroups: BTreeMap<SectionRange, SlotSequences>,
    markers: &SectionMarkers,
) -> BTreeMap<Section, SlotSequences> {
    let mut sections: BTreeMap<Section, SlotSequences> = markers
        .rows
        .keys()
        .map(|section| (*section, SlotSequences::default()))
        .collect();

    for (range, slots) in subgroups {
        match markers.section_for(range.start_row) {
            Some(section) => {
                log::debug!(
                    "rows {}..{} -> {} ({} slots)",
                    range.start_row,
                    range.end_row,
                    section,
                    slots.swar.len()
                );
                sections.entry(section).or_default().extend(slots);
            }
            None => log::debug!(
                "rows {}..{} precede the sthayee marker, skipped",
                range.start_row,
                range.end_row
            ),
        }
    }

    sections
}

/// Pad a subgroup with empty slots up to `beat_count`.
///
/// The first subgroup of a composition usually opens mid-cycle, so its
/// padding goes in front; later subgroups are padded at the end. Subgroups
/// already `beat_count` slots or longer are left alone.
pub fn pad_subgroup(slots: SlotSequences, first: bool, beat_count: usize) -> SlotSequences {
    let missing = beat_count.saturating_sub(slots.swar.len());
    if missing == 0 {
        return slots;
    }

    let padding = SlotSequences {
        meend: vec![Meend::None; missing],
        kann_swar: vec![Vec::new(); missing],
        swar: vec![Vec::new(); missing],
    };

    if first {
        let mut padded = padding;
        padded.extend(slots);
        padded
    } else {
        let mut padded = slots;
        padded.extend(padding);
        padded
    }
}
