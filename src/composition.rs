//! # Composition Model
//!
//! Types describing one classified bandish: its metadata and, for each
//! section the user marked, the sam beat and the flat per-slot sequences
//! produced by the classification pipeline.
//!
//! ## Type Hierarchy
//! ```text
//! Composition
//!   ├── raag, taal, lay: String
//!   ├── source: Option<SourceInfo> (name, page)
//!   └── sections: BTreeMap<Section, SectionInput>
//!         ├── sam_beat: usize (1-indexed)
//!         ├── meend: Vec<Meend>          (None | Start | End)
//!         ├── kann_swar: Vec<Vec<String>>
//!         └── swar: Vec<Vec<String>>
//! ```
//!
//! ## YAML form
//! ```yaml
//! raag: Yaman
//! taal: Teental
//! lay: Madhya
//! source:
//!   name: Kramik Pustak Malika
//!   page: 42
//! sections:
//!   sthayee:
//!     sam-beat: 9
//!     meend: ["", "S", "E", ""]
//!     kann-swar: [[], ["ga"], [], []]
//!     swar: [["ni,"], ["re"], ["ga"], []]
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::BandishError;
use crate::swar::clean_symbol;

/// Sections of a bandish in performance order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Sthayee,
    Antara,
    Sanchari,
    Aabhog,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Sthayee,
        Section::Antara,
        Section::Sanchari,
        Section::Aabhog,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Section::Sthayee => "Sthayee",
            Section::Antara => "Antara",
            Section::Sanchari => "Sanchari",
            Section::Aabhog => "Aabhog",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Meend (slide) marker for one beat slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Meend {
    #[default]
    None,
    /// `S`: a meend starts on the last swar of this slot.
    Start,
    /// `E`: a meend ends on the first swar of this slot.
    End,
}

impl Meend {
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker.trim() {
            "" => Some(Meend::None),
            "S" => Some(Meend::Start),
            "E" => Some(Meend::End),
            _ => None,
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            Meend::None => "",
            Meend::Start => "S",
            Meend::End => "E",
        }
    }
}

/// Flat per-slot sequences of one section. Index `i` of each vector
/// describes beat slot `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotSequences {
    pub meend: Vec<Meend>,
    pub kann_swar: Vec<Vec<String>>,
    pub swar: Vec<Vec<String>>,
}

impl SlotSequences {
    /// Number of beat slots, checking that the three sequences agree.
    pub fn slot_count(&self) -> Result<usize, BandishError> {
        let slots = self.swar.len();
        if self.meend.len() != slots || self.kann_swar.len() != slots {
            return Err(BandishError::SectionShape {
                meend: self.meend.len(),
                kann_swar: self.kann_swar.len(),
                swar: slots,
            });
        }
        Ok(slots)
    }

    /// True if slot `index` holds neither swar nor kann swar.
    pub fn is_silent(&self, index: usize) -> bool {
        let empty = |slots: &Vec<Vec<String>>| slots.get(index).map_or(true, Vec::is_empty);
        empty(&self.swar) && empty(&self.kann_swar)
    }

    /// Append `other`'s slots after this one's.
    pub fn extend(&mut self, other: SlotSequences) {
        self.meend.extend(other.meend);
        self.kann_swar.extend(other.kann_swar);
        self.swar.extend(other.swar);
    }

    /// Copy with classifier separators stripped from every symbol.
    pub fn cleaned(&self) -> Self {
        let clean = |slots: &Vec<Vec<String>>| {
            slots
                .iter()
                .map(|slot| slot.iter().map(|symbol| clean_symbol(symbol)).collect())
                .collect()
        };
        Self {
            meend: self.meend.clone(),
            kann_swar: clean(&self.kann_swar),
            swar: clean(&self.swar),
        }
    }
}

/// One present section: its sam beat and its slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionInput {
    pub sam_beat: usize,
    pub slots: SlotSequences,
}

/// Where the notation was scanned from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SourceInfo {
    pub name: Option<String>,
    pub page: Option<u32>,
}

/// A classified bandish ready for transcription.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composition {
    pub raag: String,
    pub taal: String,
    pub lay: String,
    pub source: Option<SourceInfo>,
    pub sections: BTreeMap<Section, SectionInput>,
}

/// Raw section for YAML deserialization
#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case")]
struct RawSection {
    sam_beat: usize,
    #[serde(default)]
    meend: Vec<String>,
    #[serde(default)]
    kann_swar: Vec<Vec<String>>,
    swar: Vec<Vec<String>>,
}

/// Raw composition for YAML deserialization
#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case")]
struct RawComposition {
    raag: String,
    taal: String,
    #[serde(default)]
    lay: String,
    source: Option<SourceInfo>,
    #[serde(default)]
    sections: BTreeMap<Section, RawSection>,
}

impl Composition {
    /// Parse a composition from YAML.
    ///
    /// Missing `meend` or `kann-swar` sequences default to empty slots of the
    /// same length as `swar`.
    pub fn from_yaml(source: &str) -> Result<Self, BandishError> {
        let raw: RawComposition =
            serde_yaml::from_str(source).map_err(|e| BandishError::Config(e.to_string()))?;

        let mut sections = BTreeMap::new();
        for (section, raw_section) in raw.sections {
            sections.insert(section, raw_section.into_input(section)?);
        }

        Ok(Self {
            raag: raw.raag,
            taal: raw.taal,
            lay: raw.lay,
            source: raw.source,
            sections,
        })
    }

    /// Present sections in performance order.
    pub fn present_sections(&self) -> impl Iterator<Item = (Section, &SectionInput)> {
        self.sections.iter().map(|(section, input)| (*section, input))
    }
}

impl RawSection {
    fn into_input(self, section: Section) -> Result<SectionInput, BandishError> {
        let slots = self.swar.len();

        let meend = if self.meend.is_empty() {
            vec![Meend::None; slots]
        } else {
            self.meend
                .iter()
                .map(|marker| {
                    Meend::from_marker(marker).ok_or_else(|| {
                        BandishError::Config(format!(
                            "{}: unknown meend marker '{}' (expected \"\", \"S\" or \"E\")",
                            section, marker
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        let kann_swar = if self.kann_swar.is_empty() {
            vec![Vec::new(); slots]
        } else {
            self.kann_swar
        };

        Ok(SectionInput {
            sam_beat: self.sam_beat,
            slots: SlotSequences {
                meend,
                kann_swar,
                swar: self.swar,
            },
        })
    }
}
