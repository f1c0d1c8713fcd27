//! Note naming in scientific pitch notation.
//!
//! Middle C (MIDI 60) is `C4`; MIDI 0 is `C-1`.

/// Chromatic pitch-class names, indexed by `note % 12`.
pub const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

#[inline]
pub fn pitch_class(note: u8) -> &'static str {
    PITCH_CLASSES[usize::from(note % 12)]
}

#[inline]
pub fn octave(note: u8) -> i8 {
    (note / 12) as i8 - 1
}

/// Pitch class plus octave, e.g. `"C#4"`.
pub fn note_name(note: u8) -> String {
    format!("{}{}", pitch_class(note), octave(note))
}
