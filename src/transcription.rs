//! # Transcription
//!
//! Drives a whole composition through the pipeline: header, then each
//! present section in performance order, with a transition in front of
//! every section after the first.
//!
//! ## Failure handling
//! An unknown taal stops the transcription. Anything that goes wrong inside
//! one section (bad sam beat, unknown symbol, mismatched sequences) is
//! recorded as a [`Failure`] and the remaining sections are still written.
//! A transition is only built when the section before it was encoded.

use std::fmt;

use crate::composition::{Composition, Section};
use crate::encoder::BeatEncoder;
use crate::error::BandishError;
use crate::header::{build_header, Header};
use crate::rotation::{rotate, RotatedFramework};
use crate::swar::PitchTable;
use crate::taal::TaalRegistry;
use crate::token::Encoded;
use crate::transition::build_transition;

/// What a [`Part`] of the document holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Section(Section),
    Transition { from: Section, to: Section },
}

impl PartKind {
    /// Kern comment line introducing the part.
    pub fn heading(&self) -> String {
        format!("!! {}", self)
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartKind::Section(section) => write!(f, "{}", section),
            PartKind::Transition { from, to } => write!(f, "{} to {} Transition", from, to),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub kind: PartKind,
    pub heading: String,
    pub encoded: Encoded,
}

/// A part that could not be written.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub kind: PartKind,
    pub error: BandishError,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.error)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transcription {
    pub header: Header,
    pub parts: Vec<Part>,
    pub failures: Vec<Failure>,
}

impl Transcription {
    /// Assemble the kern document: header, then each part under its heading.
    pub fn to_kern(&self) -> String {
        let mut kern = format!("{}\n\n", self.header.text);
        for part in &self.parts {
            kern.push_str(&format!("{}\n{}\n\n", part.heading, part.encoded.text));
        }
        kern
    }

    pub fn part(&self, kind: PartKind) -> Option<&Part> {
        self.parts.iter().find(|part| part.kind == kind)
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Taal definitions and pitch codes shared by every transcription.
#[derive(Debug, Clone)]
pub struct Transcriber {
    registry: TaalRegistry,
    pitches: PitchTable,
}

impl Default for Transcriber {
    fn default() -> Self {
        Self::new(TaalRegistry::builtin(), PitchTable::standard())
    }
}

/// The last successfully encoded section, kept for the next transition.
struct Previous {
    section: Section,
    framework: RotatedFramework,
    encoded: Encoded,
}

impl Transcriber {
    pub fn new(registry: TaalRegistry, pitches: PitchTable) -> Self {
        Self { registry, pitches }
    }

    pub fn registry(&self) -> &TaalRegistry {
        &self.registry
    }

    pub fn pitches(&self) -> &PitchTable {
        &self.pitches
    }

    pub fn transcribe(&self, composition: &Composition) -> Result<Transcription, BandishError> {
        let header = build_header(
            &self.registry,
            &composition.raag,
            &composition.taal,
            &composition.lay,
            composition.source.as_ref(),
        )?;
        let taal = self.registry.get(&composition.taal)?;
        let encoder = BeatEncoder::new(&self.pitches);

        let mut parts = Vec::new();
        let mut failures = Vec::new();
        let mut previous: Option<Previous> = None;
        let mut first = true;

        for (section, input) in composition.present_sections() {
            log::info!("encoding {} (sam on beat {})", section, input.sam_beat);

            let framework = match rotate(taal, input.sam_beat) {
                Ok(framework) => framework,
                Err(error) => {
                    log::warn!("{}: {}", section, error);
                    failures.push(Failure {
                        kind: PartKind::Section(section),
                        error,
                    });
                    previous = None;
                    first = false;
                    continue;
                }
            };

            if !first {
                match &previous {
                    Some(prev) => {
                        let kind = PartKind::Transition {
                            from: prev.section,
                            to: section,
                        };
                        match build_transition(
                            &prev.encoded.tokens,
                            &prev.framework.vibhaag,
                            &framework.vibhaag,
                        ) {
                            Ok(encoded) => parts.push(Part {
                                kind,
                                heading: kind.heading(),
                                encoded,
                            }),
                            Err(error) => {
                                log::warn!("{}: {}", kind, error);
                                failures.push(Failure { kind, error });
                            }
                        }
                    }
                    None => log::debug!("no transition into {}: previous section failed", section),
                }
            }
            first = false;

            let kind = PartKind::Section(section);
            match encoder.encode(&input.slots.cleaned(), &framework.divisions, taal.beat_count) {
                Ok(encoded) => {
                    parts.push(Part {
                        kind,
                        heading: kind.heading(),
                        encoded: encoded.clone(),
                    });
                    previous = Some(Previous {
                        section,
                        framework,
                        encoded,
                    });
                }
                Err(error) => {
                    log::warn!("{}: {}", section, error);
                    failures.push(Failure { kind, error });
                    previous = None;
                }
            }
        }

        Ok(Transcription {
            header,
            parts,
            failures,
        })
    }
}
