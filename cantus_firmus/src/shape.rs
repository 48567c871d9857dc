// The line-shape grammar.
//
// Encodes the structural skeleton of a cantus firmus as a three-state
// machine, independent of concrete pitches:
//
//   Start --Degree(1)--> Open            a line opens on the tonic
//   Open  --Move(m)----> Open            for steps and thirds
//   Open  --Move(m)----> Recover*        for leaps of a 4th or larger
//   Recover* --Move(±2)--> Open          a leap is answered by a step
//                                        in the opposite direction
//
// Allowed melodic moves are seconds through sixths and the octave, in both
// directions. Sevenths are never offered. Everything finer-grained (pattern
// repetition, outline dissonance, leap-back, interval quality) belongs to
// the filter chain, not the grammar.

use cantus_machine::{Grammar, Symbol};
use serde::{Deserialize, Serialize};

/// Melodic moves a cantus firmus may use: seconds through sixths and the
/// octave, up or down.
const MOVES: [i8; 12] = [-8, -6, -5, -4, -3, -2, 2, 3, 4, 5, 6, 8];

/// Leaps of this size or larger demand stepwise recovery.
const LEAP: i8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineState {
    /// No notes yet; the only option is to open on the tonic.
    Start,
    /// Mid-line, free to take any allowed move.
    Open,
    /// The previous move was an upward leap; the next move must be a
    /// downward step.
    RecoverDown,
    /// The previous move was a downward leap; the next move must be an
    /// upward step.
    RecoverUp,
}

/// The cantus firmus grammar. Stateless; all structure lives in LineState.
pub struct LineShape;

impl Grammar for LineShape {
    type State = LineState;

    fn initial(&self) -> LineState {
        LineState::Start
    }

    fn symbols(&self, state: &LineState) -> Vec<Symbol> {
        match state {
            LineState::Start => vec![Symbol::Degree(1)],
            LineState::Open => MOVES.iter().map(|&m| Symbol::Move(m)).collect(),
            LineState::RecoverDown => vec![Symbol::Move(-2)],
            LineState::RecoverUp => vec![Symbol::Move(2)],
        }
    }

    fn transition(&self, state: &LineState, symbol: Symbol) -> Option<LineState> {
        match (state, symbol) {
            (LineState::Start, Symbol::Degree(1)) => Some(LineState::Open),
            (LineState::Open, Symbol::Move(m)) if MOVES.contains(&m) => Some(if m >= LEAP {
                LineState::RecoverDown
            } else if m <= -LEAP {
                LineState::RecoverUp
            } else {
                LineState::Open
            }),
            (LineState::RecoverDown, Symbol::Move(-2))
            | (LineState::RecoverUp, Symbol::Move(2)) => Some(LineState::Open),
            _ => None,
        }
    }
}
