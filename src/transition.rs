//! # Section Transitions
//!
//! When two sections place sam on different beats, the next section does not
//! start where the previous one stopped. The transition replays divisions
//! from the previous section until the cycle reaches the division the next
//! section opens with.
//!
//! ## Algorithm
//! 1. Count the divisions written since the last cycle barline: that is the
//!    division the previous section stopped in (`offset`).
//! 2. Express that position as steps past sam in the previous section's
//!    vibhaag, and find the division the same number of steps past sam in
//!    the next section's vibhaag.
//! 3. The transition needs enough divisions to wrap from there back to the
//!    next section's first division.
//! 4. Copy that many divisions from the previous section's stream, starting
//!    at division `offset` of its first cycle (or of its second cycle when the
//!    first one opens on a rest), with every barline written as `=`.

use crate::error::BandishError;
use crate::taal::SAM_LABEL;
use crate::token::{Encoded, Token};

/// Build the bridge from a section's token stream (laid out on
/// `from_vibhaag`) into a section laid out on `to_vibhaag`.
///
/// Both vibhaag arrays are assumed to come from the same taal; the cycle
/// length used for the wrap is `from_vibhaag.len()`.
pub fn build_transition(
    tokens: &[Token],
    from_vibhaag: &[String],
    to_vibhaag: &[String],
) -> Result<Encoded, BandishError> {
    let from_sam = sam_index(from_vibhaag)?;
    let to_sam = sam_index(to_vibhaag)?;
    let cycle_length = from_vibhaag.len();

    let offset = divisions_into_last_cycle(tokens) % cycle_length;
    let steps_from_sam = (offset + cycle_length - from_sam) % cycle_length;
    let next_division = (to_sam + steps_from_sam) % cycle_length;
    let division_count = (cycle_length - next_division) % cycle_length;

    log::debug!(
        "transition {:?} -> {:?}: offset {}, {} steps past sam, {} divisions",
        from_vibhaag,
        to_vibhaag,
        offset,
        steps_from_sam,
        division_count
    );

    let mut start = index_after_barlines(tokens, 0, offset + 1);
    if matches!(tokens.get(start), Some(Token::Rest)) {
        log::debug!("division {} opens on a rest, copying from the next cycle", offset);
        start = index_after_barlines(tokens, start, cycle_length);
    }

    let mut bridge = Vec::new();
    let mut copied = 0;
    for token in tokens.iter().skip(start) {
        if copied == division_count {
            break;
        }
        if token.is_barline() {
            copied += 1;
            bridge.push(Token::SubdivisionBarline);
        } else {
            bridge.push(token.clone());
        }
    }

    if copied < division_count {
        log::warn!(
            "transition ran out of source: {} of {} divisions copied",
            copied,
            division_count
        );
    }

    Ok(Encoded::from_tokens(bridge))
}

fn sam_index(vibhaag: &[String]) -> Result<usize, BandishError> {
    vibhaag
        .iter()
        .position(|label| label == SAM_LABEL)
        .ok_or_else(|| BandishError::NoSamInVibhaag(vibhaag.to_vec()))
}

/// Division barlines written after the last cycle barline.
fn divisions_into_last_cycle(tokens: &[Token]) -> usize {
    tokens
        .iter()
        .rev()
        .take_while(|token| !matches!(token, Token::MajorBarline { .. }))
        .filter(|token| matches!(token, Token::SubdivisionBarline))
        .count()
}

/// Index just past the `count`-th barline at or after `from`, or the end of
/// the stream if there are fewer.
fn index_after_barlines(tokens: &[Token], from: usize, count: usize) -> usize {
    let mut seen = 0;
    for (index, token) in tokens.iter().enumerate().skip(from) {
        if seen == count {
            return index;
        }
        if token.is_barline() {
            seen += 1;
        }
    }
    tokens.len()
}
