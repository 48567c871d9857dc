// The CantusFirmus API and validator.
//
// Wraps a Guide configured with the line-shape grammar and the full
// counterpoint filter chain, and adds the five-rule validity check over
// completed lines. Construction is interactive: the caller queries
// choices, chooses a note, pops to backtrack, and probes is_valid at any
// point. Probing an unfinished line answers false, never errors.

use crate::filters::{MelodicOutlineFilter, NoLeapBackFilter, PatternFilter};
use crate::shape::LineShape;
use cantus_machine::{ChoiceNode, Guide, GuideError, IntervalQualityFilter};
use cantus_pitch::{Key, Pitch, PitchClass, PitchError, Quality, interval_size, sort_pitches};

/// Fewest notes a complete cantus firmus may have.
pub const MIN_LENGTH: usize = 8;
/// Most notes a complete cantus firmus may have. The guide's own maximum
/// length may be looser; a longer construction is simply never valid.
pub const MAX_LENGTH: usize = 16;

pub struct CantusFirmus {
    guide: Guide<LineShape>,
}

impl CantusFirmus {
    /// Create a cantus firmus machine for a key string like "D minor".
    /// `max_range` bounds the interval between the line's extremes
    /// (as an interval size: 10 = a tenth); `max_length` bounds how many
    /// notes may be chosen.
    pub fn new(key: &str, max_range: u8, max_length: usize) -> Result<CantusFirmus, PitchError> {
        Ok(CantusFirmus::in_key(key.parse()?, max_range, max_length))
    }

    /// Like `new`, for an already-parsed key.
    pub fn in_key(key: Key, max_range: u8, max_length: usize) -> CantusFirmus {
        let mut guide = Guide::new(LineShape, key, max_range, max_length);
        guide.add_filter(PatternFilter);
        guide.add_filter(MelodicOutlineFilter::default());
        guide.add_filter(NoLeapBackFilter);
        guide.add_filter(IntervalQualityFilter::new([
            Quality::Major,
            Quality::Minor,
            Quality::Perfect,
        ]));
        CantusFirmus { guide }
    }

    /// The line built so far, in order.
    pub fn construction(&self) -> &[Pitch] {
        self.guide.construction()
    }

    /// Append a pitch from the current choice set.
    pub fn choose(&mut self, pitch: &str) -> Result<(), GuideError> {
        self.guide.choose(pitch)
    }

    /// Remove and return the most recently chosen note.
    pub fn pop(&mut self) -> Result<Pitch, GuideError> {
        self.guide.pop()
    }

    /// All legal next notes, lowest first. Empty when the line is complete
    /// or cannot continue.
    pub fn choices(&self) -> Vec<Pitch> {
        self.guide.choices()
    }

    /// Legal continuations `depth` levels deep, as a forest of choice
    /// trees. Exploration never mutates the machine.
    pub fn lookahead(&self, depth: usize) -> Vec<ChoiceNode> {
        self.guide.lookahead(depth)
    }

    /// The tonic pitch class of this machine's key.
    pub fn tonic(&self) -> PitchClass {
        self.guide.tonic()
    }

    pub fn key(&self) -> &Key {
        self.guide.key()
    }

    /// Is the current line a complete, well-formed cantus firmus?
    ///
    /// Five rules, all required:
    /// 1. length within [MIN_LENGTH, MAX_LENGTH]
    /// 2. the last note is the tonic
    /// 3. a line that opens on the tonic closes on the very same pitch,
    ///    octave included (opening elsewhere reads as a counterpoint
    ///    against another line and skips this check)
    /// 4. the final note is approached by step
    /// 5. the climax is unique: the highest note appears once
    pub fn is_valid(&self) -> bool {
        let line = self.guide.construction();
        if line.len() < MIN_LENGTH || line.len() > MAX_LENGTH {
            return false;
        }
        let tonic = self.guide.tonic();
        let last = line[line.len() - 1];
        if last.pitch_class() != tonic {
            return false;
        }
        if line[0].pitch_class() == tonic && line[0] != last {
            return false;
        }
        if interval_size(&line[line.len() - 2], &last) != 2 {
            return false;
        }
        let sorted = sort_pitches(line);
        sorted[sorted.len() - 1] != sorted[sorted.len() - 2]
    }
}

impl Default for CantusFirmus {
    /// C major, a maximum range of a tenth, at most sixteen notes.
    fn default() -> CantusFirmus {
        CantusFirmus::in_key(Key::c_major(), 10, 16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes(pitches: &[Pitch]) -> Vec<String> {
        pitches.iter().map(ToString::to_string).collect()
    }

    fn build(cf: &mut CantusFirmus, line: &str) {
        for pitch in line.split_whitespace() {
            cf.choose(pitch)
                .unwrap_or_else(|e| panic!("choosing {pitch} in {line:?}: {e}"));
        }
    }

    #[test]
    fn a_fresh_machine_opens_on_the_tonic() {
        let mut cf = CantusFirmus::new("D minor", 6, 13).unwrap();
        assert!(cf.construction().is_empty());
        assert_eq!(cf.pop().unwrap_err(), GuideError::EmptyConstruction);
        assert_eq!(notes(&cf.choices()), ["D"]);
        assert!(!cf.is_valid());
    }

    #[test]
    fn second_note_choices_span_the_allowed_range() {
        let mut cf = CantusFirmus::new("D minor", 6, 13).unwrap();
        cf.choose("D4").unwrap();
        assert_eq!(
            notes(&cf.choices()),
            ["F3", "G3", "A3", "Bb3", "C4", "E4", "F4", "G4", "A4", "Bb4"]
        );
    }

    #[test]
    fn a_complete_d_minor_line_is_valid_and_exhausted() {
        let mut cf = CantusFirmus::new("D minor", 6, 13).unwrap();
        let line = "D4 E4 F4 C4 D4 F4 E4 G4 Bb3 C4 F4 E4 D4";
        build(&mut cf, line);

        assert_eq!(notes(cf.construction()), line.split_whitespace().collect::<Vec<_>>());
        assert!(cf.choices().is_empty());
        assert!(cf.is_valid());
        assert!(cf.lookahead(4).is_empty());
    }

    #[test]
    fn a_line_closing_in_the_wrong_octave_is_invalid() {
        let mut cf = CantusFirmus::new("C major", 10, 16).unwrap();
        build(&mut cf, "C4 G4 F4 D5 C5 G4 A4 B4 C5");
        assert!(!cf.is_valid());
    }

    #[test]
    fn octave_consistency_applies_when_opening_on_the_tonic() {
        let mut cf = CantusFirmus::default();
        build(&mut cf, "C5 A4 B4 G4 A4 F4 G4 E4 D4 C4");
        // Opens on C5, closes on C4: same pitch class, wrong octave.
        assert!(!cf.is_valid());
    }

    #[test]
    fn an_eight_note_arch_is_valid_and_its_prefix_is_not() {
        let mut cf = CantusFirmus::default();
        build(&mut cf, "C4 D4 E4 F4 G4 E4 D4");
        assert!(!cf.is_valid()); // seven notes is too short
        cf.choose("C4").unwrap();
        assert!(cf.is_valid());
    }

    #[test]
    fn seventeen_notes_are_never_valid() {
        // The guide allows up to 20 notes here, but the validator's own
        // bound still caps a cantus firmus at 16.
        let mut cf = CantusFirmus::new("C major", 10, 20).unwrap();
        build(
            &mut cf,
            "C4 D4 E4 F4 G4 F4 A4 G4 F4 E4 D4 F4 G4 E4 F4 D4 C4",
        );
        assert_eq!(cf.construction().len(), 17);
        assert!(!cf.is_valid());
        // Every other rule holds: retracting the tail down to 15 notes and
        // re-approaching the tonic is valid.
        cf.pop().unwrap();
        cf.pop().unwrap();
        cf.pop().unwrap();
        build(&mut cf, "D4 C4");
        assert_eq!(cf.construction().len(), 16);
        assert!(cf.is_valid());
    }

    #[test]
    fn a_tied_climax_is_invalid() {
        let mut cf = CantusFirmus::default();
        build(&mut cf, "C4 D4 E4 G4 F4 G4 E4 D4 C4");
        assert!(!cf.is_valid()); // G4 sounds twice at the top

        let mut cf = CantusFirmus::default();
        build(&mut cf, "C4 D4 E4 G4 F4 E4 D4 C4");
        assert!(cf.is_valid()); // same shape, single climax
    }

    #[test]
    fn a_leap_onto_the_final_is_invalid() {
        let mut cf = CantusFirmus::default();
        build(&mut cf, "C4 D4 E4 F4 G4 F4 E4 C4");
        assert!(!cf.is_valid()); // E4 to C4 is a third, not a step
    }

    #[test]
    fn closing_off_the_tonic_is_invalid() {
        let mut cf = CantusFirmus::default();
        build(&mut cf, "C4 D4 E4 F4 G4 F4 E4 D4");
        assert!(!cf.is_valid());
    }

    #[test]
    fn failed_choices_leave_the_machine_untouched() {
        let mut cf = CantusFirmus::new("D minor", 6, 13).unwrap();
        build(&mut cf, "D4 E4 F4");
        let before = notes(cf.construction());
        let choices_before = cf.choices();

        assert!(matches!(
            cf.choose("C#4"),
            Err(GuideError::IllegalChoice(_))
        ));
        assert!(matches!(cf.choose("banana"), Err(GuideError::Pitch(_))));
        assert_eq!(notes(cf.construction()), before);
        assert_eq!(cf.choices(), choices_before);
    }

    #[test]
    fn every_offered_choice_is_choosable_and_poppable() {
        let mut cf = CantusFirmus::new("D minor", 6, 13).unwrap();
        build(&mut cf, "D4 E4 F4 C4 D4");
        let before = notes(cf.construction());

        for pitch in cf.choices() {
            let name = pitch.to_string();
            cf.choose(&name).unwrap();
            assert_eq!(cf.pop().unwrap(), pitch);
            assert_eq!(notes(cf.construction()), before);
        }
    }

    #[test]
    fn lookahead_matches_interactive_choices() {
        let mut cf = CantusFirmus::new("D minor", 6, 13).unwrap();
        build(&mut cf, "D4 E4");
        let forest = cf.lookahead(2);

        let roots: Vec<Pitch> = forest.iter().map(|n| n.pitch).collect();
        assert_eq!(roots, cf.choices());

        // Each subtree agrees with what choosing its root would offer.
        for node in &forest {
            cf.choose(&node.pitch.to_string()).unwrap();
            let children: Vec<Pitch> = node.next.iter().map(|n| n.pitch).collect();
            assert_eq!(children, cf.choices());
            cf.pop().unwrap();
        }
    }

    #[test]
    fn the_default_machine_is_c_major() {
        let cf = CantusFirmus::default();
        assert_eq!(cf.tonic().to_string(), "C");
        assert_eq!(cf.key().to_string(), "C major");
        assert_eq!(notes(&cf.choices()), ["C"]);
    }

    #[test]
    fn the_opening_lookahead_serializes_for_callers() {
        let cf = CantusFirmus::new("D minor", 6, 13).unwrap();
        assert_eq!(
            serde_json::to_value(cf.lookahead(1)).unwrap(),
            serde_json::json!([{ "pitch": "D", "next": [] }])
        );
    }

    #[test]
    fn malformed_keys_are_rejected() {
        assert!(CantusFirmus::new("H major", 10, 16).is_err());
        assert!(CantusFirmus::new("C", 10, 16).is_err());
        assert!(CantusFirmus::new("C majorish", 10, 16).is_err());
    }
}
