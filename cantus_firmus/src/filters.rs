// Melodic filters for cantus firmus construction.
//
// Each filter is an independent rejection rule over (line so far, candidate
// next note); the guide combines them with logical AND. They only inspect
// history, never grammar state, so each can be tested and reused on its own.

use cantus_machine::Filter;
use cantus_pitch::{Pitch, Quality, interval_quality, interval_size, simple_size};

/// Rejects immediate repetition of two-note and three-note groups:
/// no `a b a b`, no `a b c a b c`.
pub struct PatternFilter;

impl Filter for PatternFilter {
    fn allows(&self, line: &[Pitch], candidate: &Pitch) -> bool {
        let n = line.len();
        if n >= 3 && line[n - 3] == line[n - 1] && line[n - 2] == *candidate {
            return false;
        }
        if n >= 5
            && line[n - 5] == line[n - 2]
            && line[n - 4] == line[n - 1]
            && line[n - 3] == *candidate
        {
            return false;
        }
        true
    }
}

/// Constrains melodic outlines: a monotone run may span at most `max_run`
/// notes, and the interval outlined from the run's first note to the
/// candidate must be consonant: not a seventh, not augmented or
/// diminished.
pub struct MelodicOutlineFilter {
    max_run: usize,
}

impl MelodicOutlineFilter {
    pub fn new(max_run: usize) -> MelodicOutlineFilter {
        MelodicOutlineFilter { max_run }
    }
}

impl Default for MelodicOutlineFilter {
    fn default() -> MelodicOutlineFilter {
        MelodicOutlineFilter::new(5)
    }
}

impl Filter for MelodicOutlineFilter {
    fn allows(&self, line: &[Pitch], candidate: &Pitch) -> bool {
        let Some(last) = line.last() else {
            return true;
        };
        let direction = (candidate.midi() - last.midi()).signum();
        if direction == 0 {
            return true;
        }

        // Walk back to the start of the monotone run the candidate extends.
        let mut start = line.len() - 1;
        while start > 0 {
            let step = (line[start].midi() - line[start - 1].midi()).signum();
            if step != direction {
                break;
            }
            start -= 1;
        }

        let run_notes = line.len() - start + 1; // candidate included
        if run_notes > self.max_run {
            return false;
        }

        let outlined = &line[start];
        if simple_size(interval_size(outlined, candidate)) == 7 {
            return false;
        }
        !matches!(
            interval_quality(outlined, candidate),
            Quality::Augmented | Quality::Diminished
        )
    }
}

/// Rejects returning to a note that was just left by a leap: no `1 3 1`.
pub struct NoLeapBackFilter;

impl Filter for NoLeapBackFilter {
    fn allows(&self, line: &[Pitch], candidate: &Pitch) -> bool {
        let n = line.len();
        if n < 2 {
            return true;
        }
        let left = &line[n - 2];
        interval_size(left, &line[n - 1]) < 3 || left != candidate
    }
}
