//! MIDI keys without any notion of a pitch.

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::ops::RangeInclusive;

/// The range of keys addressable by MIDI note numbers.
pub const MIDI_KEYS: RangeInclusive<u8> = 0..=127;

/// A physical or logical key on a MIDI instrument.
///
/// Only the 128 keys addressable by MIDI are representable which is why [`PianoKey::from_midi_number`] is fallible.
///
/// # Examples
///
/// ```
/// # use tuning_tables::key::PianoKey;
/// assert_eq!(PianoKey::from_midi_number(69).unwrap().midi_number(), 69);
/// assert!(PianoKey::from_midi_number(128).is_none());
/// assert!(PianoKey::from_midi_number(-1).is_none());
/// ```
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PianoKey {
    midi_number: u8,
}

impl PianoKey {
    pub fn from_midi_number(midi_number: impl Into<i32>) -> Option<Self> {
        let midi_number: i32 = midi_number.into();
        u8::try_from(midi_number)
            .ok()
            .filter(|midi_number| MIDI_KEYS.contains(midi_number))
            .map(|midi_number| Self { midi_number })
    }

    pub fn midi_number(self) -> u8 {
        self.midi_number
    }

    /// Iterates over all keys from MIDI number 0 to 127.
    pub fn all() -> impl Iterator<Item = PianoKey> {
        MIDI_KEYS.map(|midi_number| PianoKey { midi_number })
    }

    /// Counts the number of keys [left inclusive, right exclusive) between `self` and `other`.
    pub fn num_keys_before(self, other: PianoKey) -> i32 {
        i32::from(other.midi_number) - i32::from(self.midi_number)
    }
}

impl Default for PianoKey {
    fn default() -> Self {
        Self { midi_number: 60 }
    }
}

impl Display for PianoKey {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.midi_number)
    }
}
