// Cantus Firmus
//
// Interactive construction and validation of cantus firmus lines under
// species counterpoint rules. A CantusFirmus wraps a cantus_machine Guide
// with the counterpoint rule set: the line-shape grammar, the melodic
// filters, and the five-rule validity check for completed lines.
//
// Architecture:
// - shape.rs: the line grammar (open on the tonic, allowed melodic moves,
//   leap recovery by contrary step)
// - filters.rs: pattern-repetition, melodic-outline, and no-leap-back
//   filters (the interval-quality filter comes from cantus_machine)
// - cantus.rs: the CantusFirmus API and validator
// - midi.rs: MIDI file export of completed lines
//
// The caller drives construction note by note: query choices, choose one,
// pop to backtrack, and probe is_valid at any point.

pub mod cantus;
pub mod filters;
pub mod midi;
pub mod shape;

pub use cantus::{CantusFirmus, MAX_LENGTH, MIN_LENGTH};
pub use shape::{LineShape, LineState};
