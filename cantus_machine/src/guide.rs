// The guide engine.
//
// A Guide owns one construction (the melody built so far) and tracks the
// grammar state reached after every note, as a stack: states[i] is the
// state after i notes, states[0] the grammar's initial state. The stack is
// the undo log: pop truncates both stacks and the prior state is simply
// the new top, with no recomputation.
//
// Legality is computed fresh on every query rather than cached: filters may
// inspect arbitrary history (leap-then-return patterns span three or more
// notes), so there is no per-note fact worth memoizing. A candidate must
// pass four independent gates:
//
//   grammar transition + length bound + range bound + every filter
//
// Lookahead explores hypothetical futures on a scratch copy of the
// construction; the live Guide is never mutated by a query.

use crate::error::GuideError;
use crate::filter::Filter;
use crate::grammar::{Grammar, Symbol};
use crate::tree::ChoiceNode;
use cantus_pitch::{Key, Pitch, PitchClass, interval_size};

pub struct Guide<G: Grammar> {
    grammar: G,
    key: Key,
    max_range: u8,
    max_length: usize,
    filters: Vec<Box<dyn Filter>>,
    line: Vec<Pitch>,
    /// states[i] = grammar state after i notes; never empty.
    states: Vec<G::State>,
}

impl<G: Grammar> Guide<G> {
    pub fn new(grammar: G, key: Key, max_range: u8, max_length: usize) -> Guide<G> {
        let initial = grammar.initial();
        Guide {
            grammar,
            key,
            max_range,
            max_length,
            filters: Vec::new(),
            line: Vec::new(),
            states: vec![initial],
        }
    }

    /// Append a filter to the chain. Order only affects how early a
    /// rejection short-circuits, never the result.
    pub fn add_filter<F: Filter + 'static>(&mut self, filter: F) {
        self.filters.push(Box::new(filter));
    }

    /// The melody built so far, in order.
    pub fn construction(&self) -> &[Pitch] {
        &self.line
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The fixed tonic pitch class of this guide's key.
    pub fn tonic(&self) -> PitchClass {
        self.key.tonic()
    }

    /// Append `pitch` to the construction. The pitch must be in the current
    /// set of next-note choices; a pitch-class choice (no octave) accepts
    /// any concrete octave of that class. Fails without mutating.
    pub fn choose(&mut self, pitch: &str) -> Result<(), GuideError> {
        let chosen: Pitch = pitch.parse()?;
        let matched = self
            .candidates(&self.line, self.current_state())
            .into_iter()
            .find(|(candidate, _)| candidate_accepts(candidate, &chosen));
        let Some((_, next_state)) = matched else {
            return Err(GuideError::IllegalChoice(chosen.to_string()));
        };
        self.line.push(chosen);
        self.states.push(next_state);
        Ok(())
    }

    /// Remove and return the last note, restoring the guide to its exact
    /// state before the corresponding choose.
    pub fn pop(&mut self) -> Result<Pitch, GuideError> {
        let Some(pitch) = self.line.pop() else {
            return Err(GuideError::EmptyConstruction);
        };
        self.states.pop();
        Ok(pitch)
    }

    /// All legal next pitches, sorted by sounding height. Empty means the
    /// construction is complete or cannot continue.
    pub fn choices(&self) -> Vec<Pitch> {
        self.candidates(&self.line, self.current_state())
            .into_iter()
            .map(|(pitch, _)| pitch)
            .collect()
    }

    /// Lookahead forest: each legal next pitch paired with its own
    /// continuations, `depth` levels deep. Purely exploratory; the guide
    /// is unchanged afterwards. Depth 0 is an empty forest.
    pub fn lookahead(&self, depth: usize) -> Vec<ChoiceNode> {
        let mut scratch = self.line.clone();
        self.explore(&mut scratch, self.current_state(), depth)
    }

    fn explore(&self, line: &mut Vec<Pitch>, state: &G::State, depth: usize) -> Vec<ChoiceNode> {
        if depth == 0 {
            return Vec::new();
        }
        self.candidates(line, state)
            .into_iter()
            .map(|(pitch, next_state)| {
                line.push(pitch);
                let next = self.explore(line, &next_state, depth - 1);
                line.pop();
                ChoiceNode { pitch, next }
            })
            .collect()
    }

    fn current_state(&self) -> &G::State {
        &self.states[self.states.len() - 1]
    }

    /// The legal continuations of `line` at `state`: every grammar symbol
    /// whose transition is legal, realized through the key, inside the
    /// range and length bounds, and allowed by the whole filter chain.
    fn candidates(&self, line: &[Pitch], state: &G::State) -> Vec<(Pitch, G::State)> {
        if line.len() >= self.max_length {
            return Vec::new();
        }
        let mut found: Vec<(Pitch, G::State)> = Vec::new();
        for symbol in self.grammar.symbols(state) {
            let Some(next_state) = self.grammar.transition(state, symbol) else {
                continue;
            };
            let Some(pitch) = self.realize(line, symbol) else {
                continue;
            };
            if !self.within_range(line, &pitch) {
                continue;
            }
            if !self.filters.iter().all(|f| f.allows(line, &pitch)) {
                continue;
            }
            found.push((pitch, next_state));
        }
        found.sort_by_key(|(pitch, _)| (pitch.midi(), pitch.staff_position()));
        found
    }

    /// Map an abstract symbol to a concrete pitch. Degrees realize as
    /// pitch classes; moves step diatonically from the last note (and are
    /// meaningless on an empty line).
    fn realize(&self, line: &[Pitch], symbol: Symbol) -> Option<Pitch> {
        match symbol {
            Symbol::Degree(degree) => Some(Pitch::new(self.key.degree_pitch_class(degree), None)),
            Symbol::Move(movement) => line.last().map(|last| self.key.step(last, movement)),
        }
    }

    /// Would adding `candidate` keep the line's overall span within the
    /// maximum range?
    fn within_range(&self, line: &[Pitch], candidate: &Pitch) -> bool {
        let mut lowest = *candidate;
        let mut highest = *candidate;
        for pitch in line {
            if pitch.midi() < lowest.midi() {
                lowest = *pitch;
            }
            if pitch.midi() > highest.midi() {
                highest = *pitch;
            }
        }
        interval_size(&lowest, &highest) <= self.max_range
    }
}

/// Does a candidate accept this chosen pitch? Exact pitches must match
/// exactly; a pitch-class candidate accepts any octave of its class.
fn candidate_accepts(candidate: &Pitch, chosen: &Pitch) -> bool {
    candidate == chosen
        || (candidate.octave().is_none() && candidate.pitch_class() == chosen.pitch_class())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Opens on the tonic, then moves by seconds and thirds forever.
    struct StepGrammar;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum StepState {
        Start,
        Going,
    }

    impl Grammar for StepGrammar {
        type State = StepState;

        fn initial(&self) -> StepState {
            StepState::Start
        }

        fn symbols(&self, state: &StepState) -> Vec<Symbol> {
            match state {
                StepState::Start => vec![Symbol::Degree(1)],
                StepState::Going => vec![
                    Symbol::Move(-3),
                    Symbol::Move(-2),
                    Symbol::Move(2),
                    Symbol::Move(3),
                ],
            }
        }

        fn transition(&self, state: &StepState, symbol: Symbol) -> Option<StepState> {
            match (state, symbol) {
                (StepState::Start, Symbol::Degree(1)) => Some(StepState::Going),
                (StepState::Going, Symbol::Move(m)) if matches!(m.abs(), 2 | 3) => {
                    Some(StepState::Going)
                }
                _ => None,
            }
        }
    }

    fn guide() -> Guide<StepGrammar> {
        Guide::new(StepGrammar, Key::c_major(), 5, 16)
    }

    fn formatted(pitches: &[Pitch]) -> Vec<String> {
        pitches.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn opens_on_the_tonic_pitch_class() {
        assert_eq!(formatted(&guide().choices()), ["C"]);
    }

    #[test]
    fn a_pitch_class_choice_accepts_any_octave() {
        let mut g = guide();
        g.choose("C4").unwrap();
        assert_eq!(formatted(g.construction()), ["C4"]);

        let mut g = guide();
        g.choose("C5").unwrap();
        assert_eq!(formatted(g.construction()), ["C5"]);
    }

    #[test]
    fn choices_are_sorted_by_height() {
        let mut g = guide();
        g.choose("C4").unwrap();
        assert_eq!(formatted(&g.choices()), ["A3", "B3", "D4", "E4"]);
    }

    #[test]
    fn illegal_choice_is_atomic() {
        let mut g = guide();
        g.choose("C4").unwrap();
        let before = formatted(g.construction());
        let choices_before = g.choices();

        let err = g.choose("F4").unwrap_err();
        assert_eq!(err, GuideError::IllegalChoice("F4".to_string()));
        assert_eq!(formatted(g.construction()), before);
        assert_eq!(g.choices(), choices_before);
    }

    #[test]
    fn malformed_pitches_propagate_unchanged() {
        let mut g = guide();
        let err = g.choose("Hb4").unwrap_err();
        assert!(matches!(err, GuideError::Pitch(_)));
        assert!(g.construction().is_empty());
    }

    #[test]
    fn pop_is_the_inverse_of_choose() {
        let mut g = guide();
        g.choose("C4").unwrap();
        let before = g.choices();

        g.choose("D4").unwrap();
        assert_eq!(g.pop().unwrap().to_string(), "D4");
        assert_eq!(formatted(g.construction()), ["C4"]);
        assert_eq!(g.choices(), before);
        assert_eq!(g.tonic().to_string(), "C");
    }

    #[test]
    fn pop_on_empty_fails_without_mutation() {
        let mut g = guide();
        assert_eq!(g.pop().unwrap_err(), GuideError::EmptyConstruction);
        assert_eq!(formatted(&g.choices()), ["C"]);
    }

    #[test]
    fn every_offered_choice_is_accepted_and_nothing_else() {
        let mut g = guide();
        g.choose("C4").unwrap();
        g.choose("E4").unwrap();

        for pitch in g.choices() {
            g.choose(&pitch.to_string()).unwrap();
            g.pop().unwrap();
        }
        for outside in ["C3", "F#4", "E4", "B4"] {
            assert!(
                matches!(g.choose(outside), Err(GuideError::IllegalChoice(_))),
                "expected {outside} to be rejected"
            );
        }
    }

    #[test]
    fn length_bound_empties_the_choice_set() {
        let mut g = Guide::new(StepGrammar, Key::c_major(), 5, 2);
        g.choose("C4").unwrap();
        g.choose("D4").unwrap();
        assert!(g.choices().is_empty());
        assert!(matches!(
            g.choose("E4"),
            Err(GuideError::IllegalChoice(_))
        ));
    }

    #[test]
    fn range_bound_prunes_wide_candidates() {
        let mut g = Guide::new(StepGrammar, Key::c_major(), 2, 16);
        g.choose("C4").unwrap();
        // Thirds would span a 3rd from C4, past the allowed 2nd.
        assert_eq!(formatted(&g.choices()), ["B3", "D4"]);
    }

    #[test]
    fn lookahead_does_not_mutate_the_guide() {
        let mut g = guide();
        g.choose("C4").unwrap();
        let construction_before = formatted(g.construction());
        let choices_before = g.choices();

        let forest = g.lookahead(3);
        assert_eq!(formatted(g.construction()), construction_before);
        assert_eq!(g.choices(), choices_before);

        let roots: Vec<Pitch> = forest.iter().map(|node| node.pitch).collect();
        assert_eq!(roots, choices_before);
    }

    #[test]
    fn lookahead_depth_zero_is_empty() {
        assert!(guide().lookahead(0).is_empty());
    }

    #[test]
    fn lookahead_serializes_as_a_tree_of_pitch_strings() {
        let mut g = Guide::new(StepGrammar, Key::c_major(), 2, 3);
        g.choose("C4").unwrap();
        let forest = g.lookahead(2);
        assert_eq!(
            serde_json::to_value(&forest).unwrap(),
            json!([
                { "pitch": "B3", "next": [{ "pitch": "C4", "next": [] }] },
                { "pitch": "D4", "next": [{ "pitch": "C4", "next": [] }] },
            ])
        );
    }
}
