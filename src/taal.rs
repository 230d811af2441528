//! # Taal Registry
//!
//! Read-only lookup of named rhythmic cycles.
//!
//! A [`Taal`] is a cycle of `beat_count` beats split into divisions (vibhaag).
//! Each division has a length in beats and a label: `X` marks sam, the
//! downbeat; `0` marks khali; numbers mark taali.
//!
//! ```text
//! Teental (16 beats)
//!   divisions: 4    4    4    4
//!   vibhaag:   X    2    0    3
//!   beats:     1-4  5-8  9-12 13-16
//! ```
//!
//! Definitions come from [`TaalRegistry::builtin`] or from a YAML source:
//!
//! ```rust
//! use bandish::TaalRegistry;
//!
//! let registry = TaalRegistry::from_yaml(r#"
//! Keherwa:
//!   beat-count: 8
//!   divisions: [4, 4]
//!   vibhaag: ["X", "0"]
//!   time-signature: 8/4
//! "#)?;
//! assert_eq!(registry.valid_sam_positions("Keherwa")?, vec![1, 5]);
//! # Ok::<(), bandish::BandishError>(())
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::BandishError;

/// Label used for the sam division in a vibhaag array.
pub const SAM_LABEL: &str = "X";

/// A named rhythmic cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taal {
    pub name: String,
    pub beat_count: usize,
    pub divisions: Vec<usize>,
    pub vibhaag: Vec<String>,
    pub time_signature: String,
}

impl Taal {
    /// Build a taal, checking that every division has a label and a
    /// positive length.
    pub fn new(
        name: &str,
        beat_count: usize,
        divisions: Vec<usize>,
        vibhaag: Vec<String>,
        time_signature: &str,
    ) -> Result<Self, BandishError> {
        let invalid = |message: String| BandishError::InvalidTaal {
            taal: name.to_string(),
            message,
        };

        if beat_count == 0 {
            return Err(invalid("beat count must be positive".to_string()));
        }
        if divisions.is_empty() {
            return Err(invalid("at least one division is required".to_string()));
        }
        if divisions.len() != vibhaag.len() {
            return Err(invalid(format!(
                "{} divisions but {} vibhaag labels",
                divisions.len(),
                vibhaag.len()
            )));
        }
        if divisions.contains(&0) {
            return Err(invalid("divisions must be positive".to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            beat_count,
            divisions,
            vibhaag,
            time_signature: time_signature.to_string(),
        })
    }

    /// Beat positions (1-indexed, ascending) where a section's sam may fall.
    ///
    /// Beat 1 is always valid. Walking the divisions from the end, every
    /// partial sum short of a full cycle marks the first beat of a division
    /// that sam can be moved onto.
    pub fn valid_sam_positions(&self) -> Vec<usize> {
        let mut positions = vec![1];
        let mut running_sum = 0;

        for division in self.divisions.iter().rev() {
            running_sum += division;
            if running_sum < self.beat_count {
                positions.push(running_sum + 1);
            }
        }

        positions.sort_unstable();
        positions.dedup();
        positions
    }
}

/// Raw taal definition for YAML deserialization
#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case")]
struct RawTaal {
    beat_count: usize,
    divisions: Vec<usize>,
    vibhaag: Vec<String>,
    time_signature: String,
}

/// Mapping from taal name to definition.
#[derive(Debug, Clone, Default)]
pub struct TaalRegistry {
    taals: BTreeMap<String, Taal>,
}

impl TaalRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The taals commonly used in bandish notation books.
    pub fn builtin() -> Self {
        // (name, beat count, divisions, vibhaag, time signature)
        const BUILTIN: &[(&str, usize, &[usize], &[&str], &str)] = &[
            ("Teental", 16, &[4, 4, 4, 4], &["X", "2", "0", "3"], "16/4"),
            ("Tilwada", 16, &[4, 4, 4, 4], &["X", "2", "0", "3"], "16/4"),
            ("Ektaal", 12, &[2, 2, 2, 2, 2, 2], &["X", "0", "2", "0", "3", "4"], "12/4"),
            ("Chautaal", 12, &[2, 2, 2, 2, 2, 2], &["X", "0", "2", "0", "3", "4"], "12/4"),
            ("Jhaptaal", 10, &[2, 3, 2, 3], &["X", "2", "0", "3"], "10/4"),
            ("Sooltaal", 10, &[2, 2, 2, 2, 2], &["X", "0", "2", "3", "0"], "10/4"),
            ("Rupak", 7, &[3, 2, 2], &["X", "1", "2"], "7/4"),
            ("Dadra", 6, &[3, 3], &["X", "0"], "6/8"),
            ("Keherwa", 8, &[4, 4], &["X", "0"], "8/4"),
            ("Jhoomra", 14, &[3, 4, 3, 4], &["X", "2", "0", "3"], "14/4"),
            ("Deepchandi", 14, &[3, 4, 3, 4], &["X", "2", "0", "3"], "14/4"),
            ("Dhamar", 14, &[5, 2, 3, 4], &["X", "2", "0", "3"], "14/4"),
        ];

        let mut registry = Self::new();
        for (name, beat_count, divisions, vibhaag, time_signature) in BUILTIN {
            registry.taals.insert(
                name.to_string(),
                Taal {
                    name: name.to_string(),
                    beat_count: *beat_count,
                    divisions: divisions.to_vec(),
                    vibhaag: vibhaag.iter().map(|label| label.to_string()).collect(),
                    time_signature: time_signature.to_string(),
                },
            );
        }
        registry
    }

    /// Load definitions from a YAML map of name to
    /// `{beat-count, divisions, vibhaag, time-signature}`.
    pub fn from_yaml(source: &str) -> Result<Self, BandishError> {
        let raw: BTreeMap<String, RawTaal> =
            serde_yaml::from_str(source).map_err(|e| BandishError::Config(e.to_string()))?;

        let mut registry = Self::new();
        for (name, taal) in raw {
            registry.insert(Taal::new(
                &name,
                taal.beat_count,
                taal.divisions,
                taal.vibhaag,
                &taal.time_signature,
            )?);
        }
        Ok(registry)
    }

    /// Add or replace a definition.
    pub fn insert(&mut self, taal: Taal) {
        self.taals.insert(taal.name.clone(), taal);
    }

    /// Add every definition from `other`, replacing same-named ones.
    pub fn merge(&mut self, other: TaalRegistry) {
        self.taals.extend(other.taals);
    }

    /// Look up a taal by name.
    pub fn get(&self, name: &str) -> Result<&Taal, BandishError> {
        self.taals
            .get(name)
            .ok_or_else(|| BandishError::UnknownTaal(name.to_string()))
    }

    /// Valid sam positions of a registered taal.
    pub fn valid_sam_positions(&self, name: &str) -> Result<Vec<usize>, BandishError> {
        Ok(self.get(name)?.valid_sam_positions())
    }

    /// Registered taal names in alphabetical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.taals.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teental_valid_sam_positions() {
        let registry = TaalRegistry::builtin();
        assert_eq!(registry.valid_sam_positions("Teental").unwrap(), vec![1, 5, 9, 13]);
    }

    #[test]
    fn test_jhaptaal_valid_sam_positions() {
        // Walking 3, 2, 3, 2 from the end: sums 3, 5, 8, 10
        let registry = TaalRegistry::builtin();
        assert_eq!(registry.valid_sam_positions("Jhaptaal").unwrap(), vec![1, 4, 6, 9]);
    }

    #[test]
    fn test_unknown_taal() {
        let registry = TaalRegistry::builtin();
        assert_eq!(
            registry.valid_sam_positions("Brahmtaal"),
            Err(BandishError::UnknownTaal("Brahmtaal".to_string()))
        );
    }

    #[test]
    fn test_builtin_taals_are_consistent() {
        let registry = TaalRegistry::builtin();
        for name in registry.names() {
            let taal = registry.get(name).unwrap();
            assert_eq!(taal.divisions.len(), taal.vibhaag.len(), "{}", name);
            assert_eq!(taal.divisions.iter().sum::<usize>(), taal.beat_count, "{}", name);
            assert_eq!(
                taal.vibhaag.iter().filter(|label| label.as_str() == SAM_LABEL).count(),
                1,
                "{}",
                name
            );
        }
    }

    #[test]
    fn test_from_yaml() {
        let registry = TaalRegistry::from_yaml(
            r#"
Rupak:
  beat-count: 7
  divisions: [3, 2, 2]
  vibhaag: ["X", "1", "2"]
  time-signature: 7/4
"#,
        )
        .unwrap();
        let rupak = registry.get("Rupak").unwrap();
        assert_eq!(rupak.beat_count, 7);
        assert_eq!(rupak.time_signature, "7/4");
        assert_eq!(rupak.valid_sam_positions(), vec![1, 3, 5]);
    }

    #[test]
    fn test_from_yaml_rejects_mismatched_vibhaag() {
        let result = TaalRegistry::from_yaml(
            r#"
Broken:
  beat-count: 8
  divisions: [4, 4]
  vibhaag: ["X"]
  time-signature: 8/4
"#,
        );
        assert!(matches!(result, Err(BandishError::InvalidTaal { .. })));
    }

    #[test]
    fn test_from_yaml_rejects_bad_yaml() {
        let result = TaalRegistry::from_yaml("Teental: [not, a, taal]");
        assert!(matches!(result, Err(BandishError::Config(_))));
    }

    #[test]
    fn test_merge_overrides_builtin() {
        let mut registry = TaalRegistry::builtin();
        let custom = TaalRegistry::from_yaml(
            r#"
Dadra:
  beat-count: 6
  divisions: [3, 3]
  vibhaag: ["X", "0"]
  time-signature: 6/4
"#,
        )
        .unwrap();
        registry.merge(custom);
        assert_eq!(registry.get("Dadra").unwrap().time_signature, "6/4");
        assert!(registry.get("Teental").is_ok());
    }
}
