//! # Swar Symbols and Pitch Table
//!
//! Classified swar arrive as class names such as `"saa"`, `"re,"` (lower
//! octave), `"ga'"` (upper octave), `"-"` (sustain) or `"(pa)"` (murki).
//! This module classifies those strings, expands murki ornaments over the
//! three-octave scale, and maps swar names to kern pitch codes.
//!
//! ## Octave marks
//! - `,` suffix: mandra (lower) saptak, kern uppercase (`"saa,"` → `C`)
//! - no suffix: madhya (middle) saptak, kern lowercase (`"saa"` → `c`)
//! - `'` suffix: taar (upper) saptak, kern doubled (`"saa'"` → `cc`)

use std::collections::BTreeMap;

use crate::error::BandishError;

/// The 21 shuddha swar across three saptak, lowest first.
pub const SCALE: [&str; 21] = [
    "saa,", "re,", "ga,", "ma,", "pa,", "dha,", "ni,",
    "saa", "re", "ga", "ma", "pa", "dha", "ni",
    "saa'", "re'", "ga'", "ma'", "pa'", "dha'", "ni'",
];

/// Written sustain marker.
pub const SUSTAIN: &str = "-";

/// One classified symbol in a swar slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwarSymbol<'a> {
    /// `-`: hold the previously sounded swar.
    Sustain,
    /// `(name)`: a murki turn around `name`.
    Murki(&'a str),
    /// A plain swar name.
    Plain(&'a str),
}

impl<'a> SwarSymbol<'a> {
    pub fn parse(symbol: &'a str) -> Self {
        if symbol == SUSTAIN {
            SwarSymbol::Sustain
        } else if symbol.len() >= 2 && symbol.starts_with('(') && symbol.ends_with(')') {
            SwarSymbol::Murki(&symbol[1..symbol.len() - 1])
        } else {
            SwarSymbol::Plain(symbol)
        }
    }
}

/// Strip the `_` separators the classifier puts into class names.
pub fn clean_symbol(symbol: &str) -> String {
    symbol.replace('_', "")
}

/// Expand a murki around `name` into: swar above, itself, swar below, itself.
///
/// The neighbours clamp at the ends of [`SCALE`]. A name that is not on the
/// scale (for example a komal swar) is returned alone.
pub fn expand_murki(name: &str) -> Vec<&str> {
    let Some(index) = SCALE.iter().position(|swar| *swar == name) else {
        return vec![name];
    };

    let above = SCALE[(index + 1).min(SCALE.len() - 1)];
    let below = SCALE[index.saturating_sub(1)];
    vec![above, name, below, name]
}

/// Mapping from swar name to kern pitch code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PitchTable {
    codes: BTreeMap<String, String>,
}

impl PitchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shuddha swar on all three saptak with sa as C, plus komal
    /// (`rek`, `gak`, `dhak`, `nik`) and tivra (`mat`) forms.
    pub fn standard() -> Self {
        const MIDDLE: &[(&str, &str)] = &[
            ("saa", "c"),
            ("re", "d"),
            ("ga", "e"),
            ("ma", "f"),
            ("pa", "g"),
            ("dha", "a"),
            ("ni", "b"),
            ("rek", "d-"),
            ("gak", "e-"),
            ("mat", "f#"),
            ("dhak", "a-"),
            ("nik", "b-"),
        ];

        let mut table = Self::new();
        for (swar, code) in MIDDLE {
            let (letter, accidental) = code.split_at(1);
            table.insert(swar, code);
            table.insert(
                &format!("{},", swar),
                &format!("{}{}", letter.to_uppercase(), accidental),
            );
            table.insert(&format!("{}'", swar), &format!("{}{}{}", letter, letter, accidental));
        }
        table
    }

    /// Load a YAML map of swar name to kern code.
    pub fn from_yaml(source: &str) -> Result<Self, BandishError> {
        let codes: BTreeMap<String, String> =
            serde_yaml::from_str(source).map_err(|e| BandishError::Config(e.to_string()))?;
        Ok(Self { codes })
    }

    pub fn insert(&mut self, swar: &str, code: &str) {
        self.codes.insert(swar.to_string(), code.to_string());
    }

    /// Add every code from `other`, replacing same-named ones.
    pub fn merge(&mut self, other: PitchTable) {
        self.codes.extend(other.codes);
    }

    /// Kern code for `swar`, reported against beat `slot` when missing.
    pub fn code(&self, swar: &str, slot: usize) -> Result<&str, BandishError> {
        self.codes
            .get(swar)
            .map(String::as_str)
            .ok_or_else(|| BandishError::UnknownSymbol {
                symbol: swar.to_string(),
                slot,
            })
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
