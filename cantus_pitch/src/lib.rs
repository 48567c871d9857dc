// Cantus Pitch
//
// Pitch, interval, and key arithmetic for species counterpoint tools.
// Everything here is pure value computation: no state, no IO.
//
// Architecture:
// - pitch.rs: Pitch and PitchClass parsing/formatting, sounding height,
//   height-stable pitch sorting
// - interval.rs: interval size (scale-step distance), quality (M/m/P/A/d),
//   and semitone distance between two pitches
// - key.rs: modes (ionian through locrian), key parsing ("D minor"),
//   scale spelling, and diatonic stepping
//
// Pitches are spelled, not tempered: Cb4 and B3 sound at the same height but
// are distinct pitches, and interval arithmetic respects the spelling
// (F4 to B4 is an augmented fourth, not "six semitones").

pub mod interval;
pub mod key;
pub mod pitch;

pub use interval::{Quality, interval_quality, interval_size, semitones, simple_size};
pub use key::{Key, Mode};
pub use pitch::{Letter, Pitch, PitchClass, PitchError, sort_pitches};
