// MIDI output for completed lines.
//
// Converts a pitch sequence into a Standard MIDI File for audition. One
// track, one channel, one quarter note per pitch. The file is derived from
// the construction, never read back.
//
// Uses the `midly` crate for MIDI writing.

use cantus_pitch::Pitch;
use midly::{
    Format, Header, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use std::path::Path;

/// Ticks per quarter note in MIDI output.
const TICKS_PER_QUARTER: u16 = 480;

/// Playback tempo in BPM (quarter notes per minute).
const TEMPO_BPM: u32 = 72;

/// Write a line to a MIDI file, one quarter note per pitch.
pub fn write_midi(line: &[Pitch], path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let smf = line_to_smf(line);
    let mut buf = Vec::new();
    smf.write(&mut buf)?;
    std::fs::write(path, &buf)?;
    Ok(())
}

/// Convert a line to an in-memory SMF.
fn line_to_smf(line: &[Pitch]) -> Smf<'static> {
    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    let channel = u4::new(0);
    let mut track: Track<'static> = Vec::new();
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::Tempo(u24::new(
            60_000_000 / TEMPO_BPM,
        ))),
    });
    // Choir aahs, to sit with vocal counterpoint.
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Midi {
            channel,
            message: MidiMessage::ProgramChange {
                program: u7::new(52),
            },
        },
    });

    for pitch in line {
        let key = u7::new(midi_key(pitch));
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOn {
                    key,
                    vel: u7::new(80),
                },
            },
        });
        track.push(TrackEvent {
            delta: u28::new(u32::from(TICKS_PER_QUARTER)),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOff {
                    key,
                    vel: u7::new(0),
                },
            },
        });
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
    });
    smf.tracks.push(track);
    smf
}

/// Sounding height clamped into the MIDI key range.
fn midi_key(pitch: &Pitch) -> u8 {
    u8::try_from(pitch.midi().clamp(0, 127)).unwrap_or(0)
}
