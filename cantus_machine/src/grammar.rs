// The grammar boundary.
//
// A Grammar describes the abstract shape of a valid line: opaque states,
// and transitions labeled with abstract Symbols. The engine only ever calls
// `initial`, `symbols`, and `transition`. It never looks inside a state,
// so grammars stay decoupled from the engine's pitch vocabulary.
//
// Symbols are realized to concrete pitches by the Guide through its key:
// a Degree opens the line on a scale degree (as a pitch class, no octave),
// a Move steps diatonically from the previous note.

use serde::{Deserialize, Serialize};

/// An abstract transition label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    /// Open the line on a 1-based scale degree (1 = tonic).
    Degree(u8),
    /// Move from the previous note by a signed scale-step interval:
    /// +2 is up a second, -3 is down a third.
    Move(i8),
}

/// A structural state machine over Symbols.
///
/// `transition` must be pure and deterministic, and must return `None` for
/// any symbol not offered by `symbols` for that state. The symbol order
/// returned by `symbols` is the grammar's own enumeration order; the Guide
/// relies on it being stable for identical states.
pub trait Grammar {
    type State: Clone;

    /// The distinguished initial state, before any note has been chosen.
    fn initial(&self) -> Self::State;

    /// Symbols that label at least one transition out of `state`.
    fn symbols(&self, state: &Self::State) -> Vec<Symbol>;

    /// The state reached from `state` via `symbol`, or `None` if the
    /// transition is illegal.
    fn transition(&self, state: &Self::State, symbol: Symbol) -> Option<Self::State>;
}
