// Guide engine errors.
//
// Every error is recoverable and every failed operation is atomic: the
// Guide's construction, state, and choices are unchanged after an Err.

use cantus_pitch::PitchError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuideError {
    /// The chosen pitch is not in the current set of next-note choices.
    IllegalChoice(String),
    /// Pop was called on an empty construction.
    EmptyConstruction,
    /// The supplied pitch or key string could not be parsed.
    Pitch(PitchError),
}

impl fmt::Display for GuideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuideError::IllegalChoice(pitch) => {
                write!(f, "{pitch} is not in the current set of next-note choices")
            }
            GuideError::EmptyConstruction => {
                write!(f, "cannot pop from an empty construction")
            }
            GuideError::Pitch(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for GuideError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GuideError::Pitch(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PitchError> for GuideError {
    fn from(err: PitchError) -> GuideError {
        GuideError::Pitch(err)
    }
}
