// Cantus Machine
//
// A grammar-driven guide engine for constrained melodic construction.
// A Guide owns a growing sequence of pitches (the construction) and, at
// every step, answers "what may come next?" by intersecting three
// independent gates:
//
// - a Grammar: an opaque state machine describing the abstract shape of a
//   valid line (states and transitions, no concrete pitches)
// - a Filter chain: an ordered set of predicates over (history, candidate),
//   combined by logical AND
// - the Guide's own constraints: maximum range and maximum length
//
// Architecture:
// - grammar.rs: the Grammar trait and the abstract Symbol vocabulary
// - filter.rs: the Filter trait plus the built-in interval-quality filter
// - guide.rs: the Guide itself (choose/pop/choices/lookahead/tonic)
// - tree.rs: ChoiceNode, the lookahead tree produced by Guide::lookahead
// - error.rs: GuideError
//
// The engine never inspects grammar states and never mutates on a failed
// operation: choose and pop either complete fully or leave the Guide
// byte-for-byte unchanged.

pub mod error;
pub mod filter;
pub mod grammar;
pub mod guide;
pub mod tree;

pub use error::GuideError;
pub use filter::{Filter, IntervalQualityFilter};
pub use grammar::{Grammar, Symbol};
pub use guide::Guide;
pub use tree::ChoiceNode;
