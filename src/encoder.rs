//! # Beat Encoder
//!
//! Turns one section's flat per-slot sequences into a kern token stream.
//!
//! ## Slot rules
//! - Every `beat_count` slots a numbered cycle barline (`==n`) is written;
//!   other division starts get a plain barline (`=`).
//! - Silent slots before the first swar become rests (`4ryy`).
//! - The first silent slot after any swar ends the section: trailing empty
//!   slots are layout padding, not music.
//! - A slot with `n` swar divides its beat evenly: each swar gets kern
//!   duration `4 * n`; murki notes are four times shorter again.
//! - Kann swar are written as grace notes (`q`) before the swar they share
//!   a position with.
//! - Meend `S` opens a slur before the slot's last swar; meend `E` closes it
//!   after the slot's first swar.
//!
//! ## Example
//! ```rust
//! use bandish::{rotate, BeatEncoder, PitchTable, SlotSequences, TaalRegistry};
//!
//! let registry = TaalRegistry::builtin();
//! let keherwa = registry.get("Keherwa")?;
//! let framework = rotate(keherwa, 1)?;
//! let pitches = PitchTable::standard();
//!
//! let swar = |s: &[&str]| s.iter().map(|x| x.to_string()).collect::<Vec<_>>();
//! let slots = SlotSequences {
//!     meend: vec![Default::default(); 3],
//!     kann_swar: vec![vec![], vec![], vec![]],
//!     swar: vec![swar(&["saa"]), swar(&["re", "ga"]), vec![]],
//! };
//!
//! let encoded = BeatEncoder::new(&pitches).encode(&slots, &framework.divisions, keherwa.beat_count)?;
//! assert_eq!(encoded.text, "==1\n4c\n8d\n8e");
//! # Ok::<(), bandish::BandishError>(())
//! ```

use std::collections::BTreeSet;

use crate::composition::{Meend, SlotSequences};
use crate::error::BandishError;
use crate::swar::{expand_murki, PitchTable, SwarSymbol};
use crate::token::{Encoded, Note, Token};

/// Kern duration of one full beat slot holding a single swar.
const BEAT_DURATION: u32 = 4;

/// Murki notes are this many times shorter than plain swar in the same slot.
const MURKI_SUBDIVISION: u32 = 4;

/// Slots (other than slot 0) where a division of the rotated taal begins.
///
/// Divisions repeat cyclically; every running sum short of `slot_count` is a
/// boundary.
pub fn subdivision_boundaries(divisions: &[usize], slot_count: usize) -> BTreeSet<usize> {
    let mut boundaries = BTreeSet::new();
    if divisions.iter().all(|division| *division == 0) {
        return boundaries;
    }

    let mut running_sum = 0;
    for division in divisions.iter().cycle() {
        running_sum += division;
        if running_sum >= slot_count {
            break;
        }
        boundaries.insert(running_sum);
    }
    boundaries
}

/// Encodes sections against a pitch table.
#[derive(Debug, Clone, Copy)]
pub struct BeatEncoder<'a> {
    pitches: &'a PitchTable,
}

impl<'a> BeatEncoder<'a> {
    pub fn new(pitches: &'a PitchTable) -> Self {
        Self { pitches }
    }

    /// Encode `slots` laid out on the rotated `divisions` of a taal with
    /// `beat_count` beats per cycle.
    ///
    /// # Errors
    /// - [`BandishError::SectionShape`] if the slot sequences differ in length
    /// - [`BandishError::UnknownSymbol`] if a swar or kann swar has no kern code
    /// - [`BandishError::InvalidLayout`] if `beat_count` is zero or `divisions`
    ///   has no positive length
    pub fn encode(
        &self,
        slots: &SlotSequences,
        divisions: &[usize],
        beat_count: usize,
    ) -> Result<Encoded, BandishError> {
        let slot_count = slots.slot_count()?;
        if beat_count == 0 || divisions.iter().all(|division| *division == 0) {
            return Err(BandishError::InvalidLayout {
                beat_count,
                divisions: divisions.to_vec(),
            });
        }

        let boundaries = subdivision_boundaries(divisions, slot_count);
        let mut writer = StreamWriter::default();
        let mut content_seen = false;

        for slot in 0..slot_count {
            if slot % beat_count == 0 {
                writer.push(Token::MajorBarline {
                    cycle: slot / beat_count + 1,
                });
            } else if boundaries.contains(&slot) {
                writer.push(Token::SubdivisionBarline);
            }

            if slots.is_silent(slot) {
                if content_seen {
                    log::debug!("section ends at silent slot {} of {}", slot, slot_count);
                    return Ok(Encoded::from_tokens(writer.finish()));
                }
                writer.push(Token::Rest);
                continue;
            }

            content_seen = true;
            self.encode_slot(&mut writer, slots, slot)?;
        }

        if slot_count % beat_count == 0 {
            writer.push(Token::SubdivisionBarline);
        }

        Ok(Encoded::from_tokens(writer.finish()))
    }

    fn encode_slot(
        &self,
        writer: &mut StreamWriter,
        slots: &SlotSequences,
        slot: usize,
    ) -> Result<(), BandishError> {
        let symbols = &slots.swar[slot];
        let graces = &slots.kann_swar[slot];
        let meend = slots.meend[slot];

        if symbols.is_empty() {
            log::warn!("slot {}: kann swar {:?} without a swar, dropped", slot, graces);
            return Ok(());
        }

        let unit = BEAT_DURATION * symbols.len() as u32;

        for (index, symbol) in symbols.iter().enumerate() {
            if let Some(grace) = graces.get(index).filter(|grace| !grace.is_empty()) {
                let code = self.pitches.code(grace, slot)?;
                writer.push(Token::Note(Note::grace(code)));
            }

            if index == symbols.len() - 1 && meend == Meend::Start {
                writer.open_meend(slot);
            }

            match SwarSymbol::parse(symbol) {
                SwarSymbol::Sustain => writer.sustain(unit, slot),
                SwarSymbol::Murki(name) => {
                    for swar in expand_murki(name) {
                        let code = self.pitches.code(swar, slot)?;
                        writer.push_note(unit * MURKI_SUBDIVISION, code);
                    }
                }
                SwarSymbol::Plain(name) => {
                    let code = self.pitches.code(name, slot)?;
                    writer.push_note(unit, code);
                }
            }

            if index == 0 && meend == Meend::End {
                writer.close_meend(slot);
            }
        }

        Ok(())
    }
}

/// Token stream under construction, with the meend cursor.
#[derive(Debug, Default)]
struct StreamWriter {
    tokens: Vec<Token>,
    /// An `S` was seen; the next written note opens the meend.
    pending_open: bool,
    /// A note carrying an open meend has been written and not yet closed.
    meend_open: bool,
}

impl StreamWriter {
    fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    fn push_note(&mut self, duration: u32, pitch_code: &str) {
        let mut note = Note::new(duration, pitch_code);
        if self.pending_open {
            note.tie_open = true;
            self.pending_open = false;
            self.meend_open = true;
        }
        self.tokens.push(Token::Note(note));
    }

    /// Repeat the pitch of the last sounded swar for `duration`.
    fn sustain(&mut self, duration: u32, slot: usize) {
        let previous = self
            .tokens
            .iter()
            .rev()
            .filter_map(Token::as_note)
            .find(|note| !note.grace)
            .map(|note| note.pitch_code.clone());

        match previous {
            Some(pitch_code) => self.push_note(duration, &pitch_code),
            None => log::warn!("slot {}: sustain with no earlier swar, skipped", slot),
        }
    }

    fn open_meend(&mut self, slot: usize) {
        if self.pending_open || self.meend_open {
            log::warn!("slot {}: meend starts before the previous one ended", slot);
        }
        self.pending_open = true;
    }

    fn close_meend(&mut self, slot: usize) {
        if !self.meend_open {
            log::warn!("slot {}: meend end without a matching start, ignored", slot);
            return;
        }

        let last_note = self
            .tokens
            .iter_mut()
            .rev()
            .filter_map(Token::as_note_mut)
            .find(|note| !note.grace);

        match last_note {
            Some(note) => {
                note.tie_close = true;
                self.meend_open = false;
            }
            None => log::warn!("slot {}: meend end with no note to close", slot),
        }
    }

    fn finish(self) -> Vec<Token> {
        if self.pending_open || self.meend_open {
            log::warn!("meend left open at the end of the section");
        }
        self.tokens
    }
}
