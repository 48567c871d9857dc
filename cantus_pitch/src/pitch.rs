// Pitch representation and parsing.
//
// A pitch string is a letter [A-G], an optional accidental (up to two sharps
// or two flats), and an optional octave number: "C4", "Eb3", "F#", "Dbb".
// A pitch without an octave denotes a pitch class; when it participates in
// height or interval arithmetic it sounds in octave 4.
//
// Two height measures coexist:
// - `midi()` is the sounding height in semitones (C4 = 60), used for
//   sorting and for quality arithmetic
// - `staff_position()` is the diatonic position (letter + octave, ignoring
//   accidentals), used for interval sizes
//
// Both treat the octave as starting at C, so B3 and C4 are adjacent.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Errors from the pitch and key parsing layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PitchError {
    /// The string is not a letter + optional accidental + optional octave.
    MalformedPitch(String),
    /// The string is not a pitch class and a known mode name.
    MalformedKey(String),
}

impl fmt::Display for PitchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PitchError::MalformedPitch(s) => write!(f, "malformed pitch: {s:?}"),
            PitchError::MalformedKey(s) => write!(f, "malformed key: {s:?}"),
        }
    }
}

impl std::error::Error for PitchError {}

/// A note letter. Ordered diatonically within an octave, C first, so that
/// letter arithmetic matches octave numbering (B3 is followed by C4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Diatonic index within the octave (C = 0, B = 6).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Letter {
        Letter::ALL[index % 7]
    }

    /// The letter `steps` diatonic positions above this one (wrapping).
    pub fn offset(self, steps: usize) -> Letter {
        Letter::from_index(self.index() + steps)
    }

    /// Semitones above C of the natural (unaltered) letter.
    pub fn natural_semitone(self) -> u8 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        };
        write!(f, "{c}")
    }
}

/// A pitch identity ignoring octave: letter plus accidental.
/// Accidental is in [-2, 2]: -1 = flat, +1 = sharp, ±2 = double.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PitchClass {
    letter: Letter,
    accidental: i8,
}

impl PitchClass {
    pub fn new(letter: Letter, accidental: i8) -> PitchClass {
        PitchClass { letter, accidental }
    }

    pub fn letter(self) -> Letter {
        self.letter
    }

    pub fn accidental(self) -> i8 {
        self.accidental
    }

    /// Semitones above C, wrapped into 0-11 (Cb wraps to 11).
    pub fn semitone(self) -> u8 {
        let s = i16::from(self.letter.natural_semitone()) + i16::from(self.accidental);
        s.rem_euclid(12) as u8
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter)?;
        let mark = if self.accidental < 0 { 'b' } else { '#' };
        for _ in 0..self.accidental.unsigned_abs() {
            write!(f, "{mark}")?;
        }
        Ok(())
    }
}

impl FromStr for PitchClass {
    type Err = PitchError;

    fn from_str(s: &str) -> Result<PitchClass, PitchError> {
        let pitch: Pitch = s.parse()?;
        if pitch.octave().is_some() {
            return Err(PitchError::MalformedPitch(s.to_string()));
        }
        Ok(pitch.pitch_class())
    }
}

impl Serialize for PitchClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PitchClass {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<PitchClass, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A pitch: a pitch class plus an optional octave number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    class: PitchClass,
    octave: Option<i8>,
}

/// Octave assumed when a pitch class participates in height arithmetic.
const DEFAULT_OCTAVE: i8 = 4;

impl Pitch {
    pub fn new(class: PitchClass, octave: Option<i8>) -> Pitch {
        Pitch { class, octave }
    }

    pub fn pitch_class(self) -> PitchClass {
        self.class
    }

    pub fn octave(self) -> Option<i8> {
        self.octave
    }

    fn sounding_octave(self) -> i8 {
        self.octave.unwrap_or(DEFAULT_OCTAVE)
    }

    /// Sounding height as a MIDI note number (C4 = 60). Computed from the
    /// spelling without wrapping, so Cb4 is 59, below C4.
    pub fn midi(self) -> i16 {
        12 * (i16::from(self.sounding_octave()) + 1)
            + i16::from(self.class.letter.natural_semitone())
            + i16::from(self.class.accidental)
    }

    /// Diatonic position: 7 per octave plus the letter index. Accidentals
    /// do not move a pitch's staff position.
    pub fn staff_position(self) -> i16 {
        7 * i16::from(self.sounding_octave()) + self.class.letter.index() as i16
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class)?;
        if let Some(octave) = self.octave {
            write!(f, "{octave}")?;
        }
        Ok(())
    }
}

impl FromStr for Pitch {
    type Err = PitchError;

    fn from_str(s: &str) -> Result<Pitch, PitchError> {
        let malformed = || PitchError::MalformedPitch(s.to_string());
        let mut chars = s.chars();
        let letter = chars.next().and_then(Letter::from_char).ok_or_else(malformed)?;

        let rest = chars.as_str();
        let marks = rest
            .chars()
            .take_while(|&c| c == '#' || c == 'b')
            .count();
        let (accidental_str, octave_str) = rest.split_at(marks);

        let accidental = match accidental_str {
            "" => 0,
            "#" => 1,
            "##" => 2,
            "b" => -1,
            "bb" => -2,
            _ => return Err(malformed()),
        };

        let octave = if octave_str.is_empty() {
            None
        } else {
            Some(octave_str.parse::<i8>().map_err(|_| malformed())?)
        };

        Ok(Pitch::new(PitchClass::new(letter, accidental), octave))
    }
}

impl Serialize for Pitch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pitch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Pitch, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Sort pitches by sounding height, low to high. Equal heights keep their
/// spelling order (B3 before Cb4); identical pitches keep input order.
pub fn sort_pitches(pitches: &[Pitch]) -> Vec<Pitch> {
    let mut sorted = pitches.to_vec();
    sorted.sort_by_key(|p| (p.midi(), p.staff_position()));
    sorted
}
