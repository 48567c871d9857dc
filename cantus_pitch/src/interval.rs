// Interval arithmetic between two pitches.
//
// Size is the scale-step distance (a second, a third), counted inclusively
// from staff positions: C4 to E4 is a 3rd, C4 to E5 a 10th. Quality is
// derived from the semitone distance relative to the size: F4-B4 is an
// augmented 4th even though B4-C5 and F4-E4 span "the same" letter count.
//
// All functions are symmetric in their arguments.

use crate::pitch::Pitch;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interval quality. Displayed with the conventional single letters:
/// P, M, m, A, d.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quality {
    Perfect,
    Major,
    Minor,
    Augmented,
    Diminished,
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Quality::Perfect => 'P',
            Quality::Major => 'M',
            Quality::Minor => 'm',
            Quality::Augmented => 'A',
            Quality::Diminished => 'd',
        };
        write!(f, "{c}")
    }
}

/// Scale-step distance between two pitches, counted inclusively:
/// 1 = unison, 2 = second, 8 = octave, 9 = ninth.
pub fn interval_size(a: &Pitch, b: &Pitch) -> u8 {
    let span = (a.staff_position() - b.staff_position()).unsigned_abs();
    u8::try_from(span + 1).unwrap_or(u8::MAX)
}

/// Reduce a compound size to its simple equivalent (9th -> 2nd). Octaves
/// reduce to unison.
pub fn simple_size(size: u8) -> u8 {
    (size - 1) % 7 + 1
}

/// Absolute semitone distance between the sounding heights of two pitches.
pub fn semitones(a: &Pitch, b: &Pitch) -> u8 {
    u8::try_from((a.midi() - b.midi()).unsigned_abs()).unwrap_or(u8::MAX)
}

/// Quality of the interval between two pitches.
pub fn interval_quality(a: &Pitch, b: &Pitch) -> Quality {
    let simple = simple_size(interval_size(a, b));
    let semis = semitones(a, b) % 12;
    match simple {
        // Perfect intervals: unison/octave, fourth, fifth.
        1 | 4 | 5 => {
            let base = match simple {
                1 => 0,
                4 => 5,
                _ => 7,
            };
            if semis == base {
                Quality::Perfect
            } else if semis == (base + 11) % 12 {
                Quality::Diminished
            } else {
                Quality::Augmented
            }
        }
        // Imperfect intervals: seconds, thirds, sixths, sevenths.
        _ => {
            let minor = match simple {
                2 => 1,
                3 => 3,
                6 => 8,
                _ => 10,
            };
            if semis == minor {
                Quality::Minor
            } else if semis == minor + 1 {
                Quality::Major
            } else if semis > minor {
                Quality::Augmented
            } else {
                Quality::Diminished
            }
        }
    }
}
