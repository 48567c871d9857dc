// The filter boundary.
//
// A Filter is a predicate over (construction so far, candidate next pitch).
// Filters only reject: a candidate is legal iff every filter in the Guide's
// chain allows it, so chain order never changes the result, only how early
// a rejection short-circuits.
//
// The interval-quality filter lives here because it is generic over any
// grammar; rule sets register it alongside their own domain filters.

use cantus_pitch::{Pitch, Quality, interval_quality};

/// A composable rejection rule over candidate continuations.
pub trait Filter {
    /// May `candidate` follow `line`? `line` is the whole construction in
    /// order; implementations may inspect arbitrary history.
    fn allows(&self, line: &[Pitch], candidate: &Pitch) -> bool;
}

/// Restricts the melodic interval from the previous note to the candidate
/// to a fixed set of qualities. With no previous note there is no interval
/// and everything is allowed.
pub struct IntervalQualityFilter {
    allowed: Vec<Quality>,
}

impl IntervalQualityFilter {
    pub fn new(allowed: impl IntoIterator<Item = Quality>) -> IntervalQualityFilter {
        IntervalQualityFilter {
            allowed: allowed.into_iter().collect(),
        }
    }
}

impl Filter for IntervalQualityFilter {
    fn allows(&self, line: &[Pitch], candidate: &Pitch) -> bool {
        let Some(last) = line.last() else {
            return true;
        };
        self.allowed.contains(&interval_quality(last, candidate))
    }
}
