pub mod composition;
pub mod encoder;
pub mod error;
pub mod header;
pub mod layout;
pub mod rotation;
pub mod swar;
pub mod taal;
pub mod token;
pub mod transcription;
pub mod transition;

pub use composition::*;
pub use encoder::BeatEncoder;
pub use error::*;
pub use header::{build_header, Header, Lay};
pub use layout::{flatten_by_section, pad_subgroup, SectionMarkers, SectionRange};
pub use rotation::{rotate, RotatedFramework};
pub use swar::{clean_symbol, expand_murki, PitchTable};
pub use taal::{Taal, TaalRegistry};
pub use token::{Encoded, Note, Token};
pub use transcription::{Failure, Part, PartKind, Transcriber, Transcription};
pub use transition::build_transition;

/// Transcribe a composition YAML string with the builtin taals and the
/// standard pitch table.
/// This is the main entry point for the library.
pub fn transcribe(source: &str) -> Result<Transcription, BandishError> {
    let composition = Composition::from_yaml(source)?;
    Transcriber::default().transcribe(&composition)
}

/// Transcribe straight to kern text, failing on the first broken part.
pub fn transcribe_to_kern(source: &str) -> Result<String, BandishError> {
    let transcription = transcribe(source)?;
    match transcription.failures.first() {
        Some(failure) => Err(failure.error.clone()),
        None => Ok(transcription.to_kern()),
    }
}
