// Keys and modes.
//
// A key is a tonic pitch class plus a mode, parsed from strings like
// "C major", "D minor", or "F# dorian". The mode fixes the semitone
// pattern of the seven scale degrees above the tonic; the scale spelling
// assigns each degree its own letter, so D minor contains Bb, never A#.
//
// `step` is the diatonic transposition used to realize melodic moves: it
// slides a pitch along the key's scale by a signed interval size, keeping
// the spelling of the destination degree.

use crate::pitch::{Letter, Pitch, PitchClass, PitchError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The seven diatonic modes, each defined by its semitone pattern above the
/// tonic. "major" and "minor" parse as Ionian and Aeolian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
}

impl Mode {
    /// Semitone intervals from the tonic to each scale degree.
    pub fn intervals(self) -> [u8; 7] {
        match self {
            Mode::Ionian => [0, 2, 4, 5, 7, 9, 11],
            Mode::Dorian => [0, 2, 3, 5, 7, 9, 10],
            Mode::Phrygian => [0, 1, 3, 5, 7, 8, 10],
            Mode::Lydian => [0, 2, 4, 6, 7, 9, 11],
            Mode::Mixolydian => [0, 2, 4, 5, 7, 9, 10],
            Mode::Aeolian => [0, 2, 3, 5, 7, 8, 10],
            Mode::Locrian => [0, 1, 3, 5, 6, 8, 10],
        }
    }

    fn from_name(name: &str) -> Option<Mode> {
        match name.to_ascii_lowercase().as_str() {
            "major" | "ionian" => Some(Mode::Ionian),
            "dorian" => Some(Mode::Dorian),
            "phrygian" => Some(Mode::Phrygian),
            "lydian" => Some(Mode::Lydian),
            "mixolydian" => Some(Mode::Mixolydian),
            "minor" | "aeolian" => Some(Mode::Aeolian),
            "locrian" => Some(Mode::Locrian),
            _ => None,
        }
    }
}

/// A tonic pitch class and a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    tonic: PitchClass,
    mode: Mode,
}

impl Key {
    pub fn new(tonic: PitchClass, mode: Mode) -> Key {
        Key { tonic, mode }
    }

    /// C major, the conventional default key.
    pub fn c_major() -> Key {
        Key::new(PitchClass::new(Letter::C, 0), Mode::Ionian)
    }

    pub fn tonic(self) -> PitchClass {
        self.tonic
    }

    pub fn mode(self) -> Mode {
        self.mode
    }

    /// The seven scale degrees, spelled with one letter per degree.
    pub fn scale(self) -> [PitchClass; 7] {
        let intervals = self.mode.intervals();
        std::array::from_fn(|i| {
            let letter = self.tonic.letter().offset(i);
            let target = i16::from((self.tonic.semitone() + intervals[i]) % 12);
            let natural = i16::from(letter.natural_semitone());
            // Shortest accidental that spells this degree on this letter.
            let mut accidental = (target - natural).rem_euclid(12);
            if accidental > 6 {
                accidental -= 12;
            }
            PitchClass::new(letter, accidental as i8)
        })
    }

    /// Pitch class of a 1-based scale degree (1 = tonic, 2 = supertonic...).
    /// Degrees above 7 wrap.
    pub fn degree_pitch_class(self, degree: u8) -> PitchClass {
        self.scale()[usize::from(degree.max(1) - 1) % 7]
    }

    /// The key-signature accidental for a letter.
    fn accidental_for(self, letter: Letter) -> i8 {
        let scale = self.scale();
        scale
            .iter()
            .find(|pc| pc.letter() == letter)
            .map(|pc| pc.accidental())
            .unwrap_or(0)
    }

    /// Diatonic transposition: move `from` along this key's scale by a
    /// signed interval size (+2 = up a second, -3 = down a third, ±1 = stay).
    /// The result carries the octave implied by the destination staff
    /// position and the key's spelling for the destination letter.
    pub fn step(self, from: &Pitch, movement: i8) -> Pitch {
        let movement = i16::from(movement);
        let offset = (movement.abs().max(1) - 1) * movement.signum();
        let position = from.staff_position() + offset;
        let letter = Letter::from_index(position.rem_euclid(7) as usize);
        let octave = position.div_euclid(7) as i8;
        Pitch::new(
            PitchClass::new(letter, self.accidental_for(letter)),
            Some(octave),
        )
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.mode {
            Mode::Ionian => "major",
            Mode::Aeolian => "minor",
            Mode::Dorian => "dorian",
            Mode::Phrygian => "phrygian",
            Mode::Lydian => "lydian",
            Mode::Mixolydian => "mixolydian",
            Mode::Locrian => "locrian",
        };
        write!(f, "{} {}", self.tonic, mode)
    }
}

impl FromStr for Key {
    type Err = PitchError;

    fn from_str(s: &str) -> Result<Key, PitchError> {
        let malformed = || PitchError::MalformedKey(s.to_string());
        let mut parts = s.split_whitespace();
        let (Some(tonic), Some(mode), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed());
        };
        let tonic: PitchClass = tonic.parse().map_err(|_| malformed())?;
        let mode = Mode::from_name(mode).ok_or_else(malformed)?;
        Ok(Key::new(tonic, mode))
    }
}
