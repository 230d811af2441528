//! # Error Types
//!
//! This module defines all error types for the bandish notation engine.
//!
//! Errors carry the data a human reviewer needs to find the offending input:
//! the taal name, the requested sam beat, or the beat slot of a symbol.
//!
//! ## Error Types
//! - `UnknownTaal` - taal name not present in the registry
//! - `InvalidSamBeat` - sam beat is not a legal downbeat for the taal
//! - `UnknownSymbol` - classified symbol missing from the pitch table
//! - `NoSamInVibhaag` - vibhaag array without an `X` label
//! - `SectionShape` - parallel meend/kann swar/swar sequences differ in length
//! - `InvalidTaal` - taal definition breaks the divisions/vibhaag invariant
//! - `InvalidLayout` - beat count or divisions cannot lay out a section
//! - `Config` - YAML input could not be read
//!
//! ## Usage
//! ```rust
//! use bandish::{rotate, BandishError, TaalRegistry};
//!
//! let registry = TaalRegistry::builtin();
//! let teental = registry.get("Teental")?;
//! match rotate(teental, 6) {
//!     Ok(framework) => println!("rotated: {:?}", framework.vibhaag),
//!     Err(BandishError::InvalidSamBeat { taal, sam_beat, valid }) => {
//!         eprintln!("{} cannot start at beat {} (valid: {:?})", taal, sam_beat, valid);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! # Ok::<(), BandishError>(())
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BandishError {
    /// The taal name is not registered.
    ///
    /// # Example
    /// ```
    /// # use bandish::BandishError;
    /// let err = BandishError::UnknownTaal("Brahmtaal".to_string());
    /// assert_eq!(err.to_string(), "Unknown taal: Brahmtaal");
    /// ```
    #[error("Unknown taal: {0}")]
    UnknownTaal(String),

    /// The sam beat does not start a division of the taal.
    ///
    /// # Example
    /// ```
    /// # use bandish::BandishError;
    /// let err = BandishError::InvalidSamBeat {
    ///     taal: "Teental".to_string(),
    ///     sam_beat: 6,
    ///     valid: vec![1, 5, 9, 13],
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Invalid sam beat 6 for taal Teental (valid positions: [1, 5, 9, 13])"
    /// );
    /// ```
    #[error("Invalid sam beat {sam_beat} for taal {taal} (valid positions: {valid:?})")]
    InvalidSamBeat {
        taal: String,
        sam_beat: usize,
        valid: Vec<usize>,
    },

    /// A classified symbol has no entry in the pitch table.
    ///
    /// # Example
    /// ```
    /// # use bandish::BandishError;
    /// let err = BandishError::UnknownSymbol { symbol: "tha".to_string(), slot: 12 };
    /// assert_eq!(err.to_string(), "Unknown symbol 'tha' at beat slot 12");
    /// ```
    #[error("Unknown symbol '{symbol}' at beat slot {slot}")]
    UnknownSymbol { symbol: String, slot: usize },

    /// A vibhaag array has no sam (`X`) label.
    #[error("Vibhaag {0:?} has no sam (X) label")]
    NoSamInVibhaag(Vec<String>),

    /// The parallel per-slot sequences of a section differ in length.
    #[error("Section sequences differ in length (meend {meend}, kann swar {kann_swar}, swar {swar})")]
    SectionShape {
        meend: usize,
        kann_swar: usize,
        swar: usize,
    },

    /// A taal definition is internally inconsistent.
    #[error("Invalid taal definition for {taal}: {message}")]
    InvalidTaal { taal: String, message: String },

    /// A section cannot be laid out on these divisions.
    ///
    /// # Example
    /// ```
    /// # use bandish::BandishError;
    /// let err = BandishError::InvalidLayout { beat_count: 0, divisions: vec![4, 4] };
    /// assert_eq!(err.to_string(), "Cannot lay out 0 beats on divisions [4, 4]");
    /// ```
    #[error("Cannot lay out {beat_count} beats on divisions {divisions:?}")]
    InvalidLayout {
        beat_count: usize,
        divisions: Vec<usize>,
    },

    /// YAML configuration or composition input could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
