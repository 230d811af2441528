//! # Notation Tokens
//!
//! The encoder and the transition builder work on a structured token stream
//! instead of raw kern lines. Each token knows how to render itself; a stream
//! renders to kern text with [`render`].
//!
//! ## Kern forms
//! ```text
//! MajorBarline { cycle: 2 }          "\n==2\n"
//! SubdivisionBarline                 "\n=\n"
//! Rest                               "4ryy\n"
//! Note { duration: 8, "c" }          "8c\n"
//! Note { grace, "d" }                "dq\n"
//! Note { tie_open, tie_close, .. }   "(8c)\n"
//! ```

use std::fmt;

/// Kern duration of an invisible rest filling a silent leading slot.
pub const REST_DURATION: u32 = 4;

/// A sounded note (or grace note) in the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Kern reciprocal duration; ignored for grace notes.
    pub duration: u32,
    pub pitch_code: String,
    pub grace: bool,
    /// Opens a meend (slur) before this note.
    pub tie_open: bool,
    /// Closes a meend after this note.
    pub tie_close: bool,
}

impl Note {
    pub fn new(duration: u32, pitch_code: &str) -> Self {
        Self {
            duration,
            pitch_code: pitch_code.to_string(),
            grace: false,
            tie_open: false,
            tie_close: false,
        }
    }

    pub fn grace(pitch_code: &str) -> Self {
        Self {
            grace: true,
            ..Self::new(0, pitch_code)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Start of a taal cycle; `cycle` counts from 1.
    MajorBarline { cycle: usize },
    /// Start of a division inside a cycle.
    SubdivisionBarline,
    Rest,
    Note(Note),
}

impl Token {
    pub fn is_barline(&self) -> bool {
        matches!(self, Token::MajorBarline { .. } | Token::SubdivisionBarline)
    }

    pub fn as_note(&self) -> Option<&Note> {
        match self {
            Token::Note(note) => Some(note),
            _ => None,
        }
    }

    pub fn as_note_mut(&mut self) -> Option<&mut Note> {
        match self {
            Token::Note(note) => Some(note),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::MajorBarline { cycle } => write!(f, "\n=={}\n", cycle),
            Token::SubdivisionBarline => write!(f, "\n=\n"),
            Token::Rest => write!(f, "{}ryy\n", REST_DURATION),
            Token::Note(note) => {
                if note.tie_open {
                    write!(f, "(")?;
                }
                if note.grace {
                    write!(f, "{}q", note.pitch_code)?;
                } else {
                    write!(f, "{}{}", note.duration, note.pitch_code)?;
                }
                if note.tie_close {
                    write!(f, ")")?;
                }
                writeln!(f)
            }
        }
    }
}

/// Render a token stream to kern text: one record per line, no blank lines,
/// no leading or trailing whitespace.
pub fn render(tokens: &[Token]) -> String {
    let joined: String = tokens.iter().map(Token::to_string).collect();
    joined
        .lines()
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// A rendered token stream together with the tokens it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Encoded {
    pub text: String,
    pub tokens: Vec<Token>,
}

impl Encoded {
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            text: render(&tokens),
            tokens,
        }
    }
}
