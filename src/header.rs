//! # Composition Header
//!
//! Builds the kern header: reference records naming the raag, taal and lay
//! (plus the source book and page when known), followed by the spine
//! interpretation block with time signature and tempo.
//!
//! ```text
//! !!!raag: Yaman
//! !!!taal: Teental
//! !!!lay: Madhya
//! **kern
//! *M16/4
//! *MM90
//! *clefG2
//! *c:
//! ```

use std::fmt;

use crate::composition::SourceInfo;
use crate::error::BandishError;
use crate::taal::TaalRegistry;

/// Tempo class of a performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lay {
    #[default]
    Vilambit,
    Madhya,
    Drut,
}

impl Lay {
    /// Case-insensitive parse; anything unrecognised is vilambit.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "madhya" => Lay::Madhya,
            "drut" => Lay::Drut,
            "vilambit" => Lay::Vilambit,
            other => {
                log::debug!("unknown lay '{}', using vilambit", other);
                Lay::Vilambit
            }
        }
    }

    /// Metronome marking in beats per minute.
    pub fn tempo(&self) -> u16 {
        match self {
            Lay::Vilambit => 60,
            Lay::Madhya => 90,
            Lay::Drut => 150,
        }
    }
}

impl fmt::Display for Lay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lay::Vilambit => "vilambit",
            Lay::Madhya => "madhya",
            Lay::Drut => "drut",
        };
        f.write_str(name)
    }
}

/// Header text and its individual lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub text: String,
    pub lines: Vec<String>,
}

/// Build the header for a composition in `taal`.
///
/// `lay` is written as given; only the tempo uses the parsed [`Lay`].
pub fn build_header(
    registry: &TaalRegistry,
    raag: &str,
    taal: &str,
    lay: &str,
    source: Option<&SourceInfo>,
) -> Result<Header, BandishError> {
    let time_signature = &registry.get(taal)?.time_signature;
    let tempo = Lay::from_name(lay).tempo();

    let mut lines = vec![
        format!("!!!raag: {}", raag),
        format!("!!!taal: {}", taal),
        format!("!!!lay: {}", lay),
    ];

    if let Some(source) = source {
        if let Some(name) = source.name.as_deref().filter(|name| !name.is_empty()) {
            lines.push(format!("!!!source: {}", name));
        }
        if let Some(page) = source.page {
            lines.push(format!("!!!page: {}", page));
        }
    }

    lines.extend([
        "**kern".to_string(),
        format!("*M{}", time_signature),
        format!("*MM{}", tempo),
        "*clefG2".to_string(),
        "*c:".to_string(),
    ]);

    Ok(Header {
        text: lines.join("\n").trim().to_string(),
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaman_in_teental_madhya() {
        let registry = TaalRegistry::builtin();
        let header = build_header(&registry, "Yaman", "Teental", "Madhya", None).unwrap();
        assert_eq!(
            header.text,
            "!!!raag: Yaman\n!!!taal: Teental\n!!!lay: Madhya\n**kern\n*M16/4\n*MM90\n*clefG2\n*c:"
        );
        assert!(header.lines.contains(&"*M16/4".to_string()));
    }

    #[test]
    fn test_lay_is_case_insensitive() {
        assert_eq!(Lay::from_name("DRUT"), Lay::Drut);
        assert_eq!(Lay::from_name(" madhya "), Lay::Madhya);
        assert_eq!(Lay::from_name("Vilambit").tempo(), 60);
        assert_eq!(Lay::from_name("DRUT").to_string(), "drut");
    }

    #[test]
    fn test_unknown_lay_defaults_to_vilambit() {
        assert_eq!(Lay::from_name("ati-drut"), Lay::Vilambit);
        let registry = TaalRegistry::builtin();
        let header = build_header(&registry, "Bhairav", "Ektaal", "", None).unwrap();
        assert!(header.lines.contains(&"*MM60".to_string()));
        assert!(header.lines.contains(&"*M12/4".to_string()));
    }

    #[test]
    fn test_source_lines() {
        let registry = TaalRegistry::builtin();
        let source = SourceInfo {
            name: Some("Kramik Pustak Malika".to_string()),
            page: Some(42),
        };
        let header = build_header(&registry, "Yaman", "Jhaptaal", "drut", Some(&source)).unwrap();
        assert_eq!(
            &header.lines[..6],
            &[
                "!!!raag: Yaman".to_string(),
                "!!!taal: Jhaptaal".to_string(),
                "!!!lay: drut".to_string(),
                "!!!source: Kramik Pustak Malika".to_string(),
                "!!!page: 42".to_string(),
                "**kern".to_string(),
            ]
        );
    }

    #[test]
    fn test_unknown_taal() {
        let registry = TaalRegistry::builtin();
        assert_eq!(
            build_header(&registry, "Yaman", "Brahmtaal", "drut", None),
            Err(BandishError::UnknownTaal("Brahmtaal".to_string()))
        );
    }
}
