//! Absolute pitches and the reference that anchors a scale to them.

use crate::key::PianoKey;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::ops::Mul;
use std::str::FromStr;

/// The MIDI number of A4 which sounds at [`A4_PITCH`] in concert pitch.
pub const A4_MIDI_NUMBER: u8 = 69;

pub const A4_PITCH: Pitch = Pitch { hz: 440.0 };

#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Pitch {
    hz: f64,
}

impl Pitch {
    /// Creates a [`Pitch`] from a frequency in Hz.
    ///
    /// Returns [`None`] if `hz` is not a finite positive number.
    pub fn from_hz(hz: f64) -> Option<Pitch> {
        (hz.is_finite() && hz > 0.0).then_some(Pitch { hz })
    }

    pub fn as_hz(self) -> f64 {
        self.hz
    }

    /// The pitch of `key` in 12-EDO with A4 at 440 Hz.
    ///
    /// # Examples
    ///
    /// ```
    /// # use assert_approx_eq::assert_approx_eq;
    /// # use tuning_tables::key::PianoKey;
    /// # use tuning_tables::pitch::Pitch;
    /// let a3 = PianoKey::from_midi_number(57).unwrap();
    /// let c4 = PianoKey::from_midi_number(60).unwrap();
    /// assert_approx_eq!(Pitch::concert_pitch_of(a3).as_hz(), 220.0);
    /// assert_approx_eq!(Pitch::concert_pitch_of(c4).as_hz(), 261.625_565);
    /// ```
    pub fn concert_pitch_of(key: PianoKey) -> Pitch {
        let semitones_above_a4 = f64::from(key.midi_number()) - f64::from(A4_MIDI_NUMBER);
        A4_PITCH * (semitones_above_a4 / 12.0).exp2()
    }

    /// Absolute position in cents on the MIDI scale, i.e. MIDI note `n` in concert pitch is at `100 * n`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use assert_approx_eq::assert_approx_eq;
    /// # use tuning_tables::pitch::Pitch;
    /// assert_approx_eq!(Pitch::from_hz(440.0).unwrap().as_midi_cents(), 6900.0);
    /// assert_approx_eq!(Pitch::from_hz(880.0).unwrap().as_midi_cents(), 8100.0);
    /// ```
    pub fn as_midi_cents(self) -> f64 {
        f64::from(A4_MIDI_NUMBER) * 100.0 + (self.hz / A4_PITCH.hz).log2() * 1200.0
    }
}

impl Mul<f64> for Pitch {
    type Output = Pitch;

    fn mul(self, rhs: f64) -> Self::Output {
        Pitch { hz: self.hz * rhs }
    }
}

impl Display for Pitch {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:.3} Hz", self.hz)
    }
}

impl FromStr for Pitch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let freq = s
            .strip_suffix("Hz")
            .or_else(|| s.strip_suffix("hz"))
            .ok_or_else(|| "Must end with Hz or hz".to_string())?;
        freq.parse()
            .ok()
            .and_then(Pitch::from_hz)
            .ok_or_else(|| format!("Invalid frequency: '{freq}'"))
    }
}

/// The key sounding at a given pitch. Together with a scale, this defines the pitch of every key.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ReferencePitch {
    key: PianoKey,
    pitch: Pitch,
}

impl ReferencePitch {
    pub fn from_key(key: PianoKey) -> Self {
        Self::from_key_and_pitch(key, Pitch::concert_pitch_of(key))
    }

    pub fn from_key_and_pitch(key: PianoKey, pitch: Pitch) -> Self {
        Self { key, pitch }
    }

    pub fn key(&self) -> PianoKey {
        self.key
    }

    pub fn pitch(&self) -> Pitch {
        self.pitch
    }
}

/// Middle C at its concert pitch.
impl Default for ReferencePitch {
    fn default() -> Self {
        Self::from_key(PianoKey::default())
    }
}

impl Display for ReferencePitch {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}@{:.3}Hz", self.key, self.pitch.as_hz())
    }
}

impl FromStr for ReferencePitch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_key = |key: &str| {
            key.parse::<i32>()
                .ok()
                .and_then(PianoKey::from_midi_number)
                .ok_or_else(|| format!("Invalid note '{key}': Must be an integer between 0 and 127"))
        };

        match s.split_once('@') {
            Some((key, pitch)) => {
                let key = parse_key(key)?;
                let pitch = pitch
                    .parse()
                    .map_err(|e| format!("Invalid pitch '{pitch}': {e}"))?;
                Ok(ReferencePitch::from_key_and_pitch(key, pitch))
            }
            None => parse_key(s)
                .map(ReferencePitch::from_key)
                .map_err(|e| format!("{e}. Must be an expression of type 69 or 69@440Hz")),
        }
    }
}
