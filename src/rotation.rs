//! # Alignment Rotator
//!
//! Rotates a taal's divisions and vibhaag so they line up with where a
//! section's sam falls on the written page.
//!
//! A section written with its sam on beat 5 of Teental starts, on paper, with
//! the last division of the previous cycle:
//!
//! ```text
//! sam_beat = 5
//!   divisions: 4 4 4 4  ->  4 4 4 4
//!   vibhaag:   X 2 0 3  ->  3 X 2 0
//! ```

use crate::error::BandishError;
use crate::taal::{Taal, SAM_LABEL};

/// A taal's divisions and vibhaag as seen from one section's first slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotatedFramework {
    pub divisions: Vec<usize>,
    pub vibhaag: Vec<String>,
}

impl RotatedFramework {
    /// Index of the sam label, if any.
    pub fn sam_index(&self) -> Option<usize> {
        self.vibhaag.iter().position(|label| label == SAM_LABEL)
    }
}

/// Rotate `taal` so the division starting at `sam_beat` (1-indexed) comes
/// after the divisions written before it.
///
/// Fails with [`BandishError::InvalidSamBeat`] if `sam_beat` is not one of
/// [`Taal::valid_sam_positions`].
pub fn rotate(taal: &Taal, sam_beat: usize) -> Result<RotatedFramework, BandishError> {
    if sam_beat == 1 {
        return Ok(RotatedFramework {
            divisions: taal.divisions.clone(),
            vibhaag: taal.vibhaag.clone(),
        });
    }

    let rotation_index = rotation_index(taal, sam_beat).ok_or_else(|| {
        BandishError::InvalidSamBeat {
            taal: taal.name.clone(),
            sam_beat,
            valid: taal.valid_sam_positions(),
        }
    })?;

    let mut divisions = taal.divisions.clone();
    let mut vibhaag = taal.vibhaag.clone();
    divisions.rotate_left(rotation_index);
    vibhaag.rotate_left(rotation_index);

    log::debug!(
        "rotated {} for sam beat {}: {:?} {:?}",
        taal.name,
        sam_beat,
        divisions,
        vibhaag
    );

    Ok(RotatedFramework { divisions, vibhaag })
}

/// Index of the division whose trailing sum (itself plus everything after it)
/// puts sam on `sam_beat`.
fn rotation_index(taal: &Taal, sam_beat: usize) -> Option<usize> {
    let mut running_sum = 0;
    for (index, division) in taal.divisions.iter().enumerate().rev() {
        running_sum += division;
        if running_sum >= taal.beat_count {
            return None;
        }
        if running_sum + 1 == sam_beat {
            return Some(index);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taal::TaalRegistry;

    fn labels(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_sam_on_first_beat_is_identity() {
        let registry = TaalRegistry::builtin();
        for name in registry.names() {
            let taal = registry.get(name).unwrap();
            let framework = rotate(taal, 1).unwrap();
            assert_eq!(framework.divisions, taal.divisions);
            assert_eq!(framework.vibhaag, taal.vibhaag);
        }
    }

    #[test]
    fn test_teental_sam_on_fifth_beat() {
        let registry = TaalRegistry::builtin();
        let framework = rotate(registry.get("Teental").unwrap(), 5).unwrap();
        assert_eq!(framework.divisions, vec![4, 4, 4, 4]);
        assert_eq!(framework.vibhaag, labels(&["3", "X", "2", "0"]));
    }

    #[test]
    fn test_jhaptaal_sam_on_fourth_beat() {
        let registry = TaalRegistry::builtin();
        let framework = rotate(registry.get("Jhaptaal").unwrap(), 4).unwrap();
        assert_eq!(framework.divisions, vec![3, 2, 3, 2]);
        assert_eq!(framework.vibhaag, labels(&["3", "X", "2", "0"]));
    }

    #[test]
    fn test_invalid_sam_beat_is_rejected() {
        let registry = TaalRegistry::builtin();
        let result = rotate(registry.get("Teental").unwrap(), 6);
        assert_eq!(
            result,
            Err(BandishError::InvalidSamBeat {
                taal: "Teental".to_string(),
                sam_beat: 6,
                valid: vec![1, 5, 9, 13],
            })
        );
    }

    #[test]
    fn test_sam_beat_past_cycle_is_rejected() {
        let registry = TaalRegistry::builtin();
        assert!(rotate(registry.get("Teental").unwrap(), 17).is_err());
        assert!(rotate(registry.get("Teental").unwrap(), 0).is_err());
    }

    #[test]
    fn test_rotation_places_sam_at_sam_beat() {
        let registry = TaalRegistry::builtin();
        for name in registry.names() {
            let taal = registry.get(name).unwrap();
            for sam_beat in taal.valid_sam_positions() {
                let framework = rotate(taal, sam_beat).unwrap();
                let sam = framework.sam_index().unwrap();
                let beats_before_sam: usize = framework.divisions[..sam].iter().sum();
                assert_eq!(
                    beats_before_sam % taal.beat_count,
                    (sam_beat - 1) % taal.beat_count,
                    "{} sam beat {}",
                    name,
                    sam_beat
                );
            }
        }
    }
}
