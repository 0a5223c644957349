//! Tuning table formats understood by synthesizers and audio tools.

use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use crate::key::PianoKey;
use crate::pitch::Pitch;
use crate::pitch::ReferencePitch;
use crate::scala::Scl;

/// Target formats a [`Scl`] can be rendered to.
///
/// # Examples
///
/// ```
/// # use tuning_tables::format::{Format, UnsupportedFormatError};
/// assert_eq!("Scala".parse::<Format>(), Ok(Format::Scala));
/// assert_eq!("fluidsynth".parse::<Format>(), Ok(Format::Fluidsynth));
/// assert_eq!(
///     "Midi".parse::<Format>(),
///     Err(UnsupportedFormatError { name: "Midi".to_owned() })
/// );
/// ```
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Format {
    /// Scala scale file (`.scl`).
    Scala,

    /// Frequency table for `timidity -Z`.
    Timidity,

    /// Csound GEN02 function table statement.
    Csound,

    /// Fluidsynth shell commands defining a tuning.
    Fluidsynth,
}

impl Format {
    pub const ALL: [Format; 4] = [
        Format::Scala,
        Format::Timidity,
        Format::Csound,
        Format::Fluidsynth,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Format::Scala => "Scala",
            Format::Timidity => "Timidity",
            Format::Csound => "Csound",
            Format::Fluidsynth => "Fluidsynth",
        }
    }

    pub fn renderer(self) -> &'static dyn Render {
        match self {
            Format::Scala => &ScalaRenderer,
            Format::Timidity => &TimidityRenderer,
            Format::Csound => &CsoundRenderer,
            Format::Fluidsynth => &FluidsynthRenderer,
        }
    }

    /// Renders `scl` anchored at `reference`. The result always ends with a single newline.
    pub fn render(self, scl: &Scl, reference: ReferencePitch) -> Result<String, RenderError> {
        self.renderer().render(scl, reference)
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = UnsupportedFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnsupportedFormatError { name: s.to_owned() })
    }
}

/// Renders a scale into the textual grammar of a single [`Format`].
pub trait Render {
    fn render(&self, scl: &Scl, reference: ReferencePitch) -> Result<String, RenderError>;
}

pub struct ScalaRenderer;

impl Render for ScalaRenderer {
    fn render(&self, scl: &Scl, _reference: ReferencePitch) -> Result<String, RenderError> {
        Ok(scl.export().to_string())
    }
}

pub struct TimidityRenderer;

impl Render for TimidityRenderer {
    fn render(&self, scl: &Scl, reference: ReferencePitch) -> Result<String, RenderError> {
        KeyPitches::new(scl, reference).map(|pitches| TimidityExport(&pitches).to_string())
    }
}

pub struct CsoundRenderer;

impl Render for CsoundRenderer {
    fn render(&self, scl: &Scl, reference: ReferencePitch) -> Result<String, RenderError> {
        KeyPitches::new(scl, reference).map(|pitches| CsoundExport(&pitches).to_string())
    }
}

pub struct FluidsynthRenderer;

impl Render for FluidsynthRenderer {
    fn render(&self, scl: &Scl, reference: ReferencePitch) -> Result<String, RenderError> {
        KeyPitches::new(scl, reference).map(|pitches| FluidsynthExport(&pitches).to_string())
    }
}

/// The pitch of every MIDI key, shared by all frequency-based formats.
struct KeyPitches<'a> {
    scl: &'a Scl,
    reference: ReferencePitch,
    pitches: Vec<(PianoKey, Pitch)>,
}

impl<'a> KeyPitches<'a> {
    fn new(scl: &'a Scl, reference: ReferencePitch) -> Result<Self, RenderError> {
        let pitches = PianoKey::all()
            .map(|key| {
                let pitch = scl
                    .pitch_of(key, reference)
                    .ok_or(RenderError::TrivialScale)?;
                Pitch::from_hz(pitch.as_hz())
                    .map(|pitch| (key, pitch))
                    .ok_or(RenderError::PitchOutOfRange(key))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self {
            scl,
            reference,
            pitches,
        })
    }

    fn write_header(&self, f: &mut Formatter, comment: &str) -> fmt::Result {
        writeln!(f, "{comment} {}", self.scl.description())?;
        writeln!(
            f,
            "{comment} {} notes per period, reference note {} at {:.3} Hz",
            self.scl.num_items(),
            self.reference.key(),
            self.reference.pitch().as_hz()
        )
    }
}

/// One frequency per line in 1/1000 Hz.
struct TimidityExport<'a, 'b>(&'a KeyPitches<'b>);

impl Display for TimidityExport<'_, '_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.0.write_header(f, "#")?;
        for (_, pitch) in &self.0.pitches {
            writeln!(f, "{}", (pitch.as_hz() * 1000.0).round() as u64)?;
        }
        Ok(())
    }
}

/// A single 128-entry function table without normalization.
struct CsoundExport<'a, 'b>(&'a KeyPitches<'b>);

impl Display for CsoundExport<'_, '_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.0.write_header(f, ";")?;
        write!(f, "f1 0 {} -2", self.0.pitches.len())?;
        for (_, pitch) in &self.0.pitches {
            write!(f, " {:.6}", pitch.as_hz())?;
        }
        writeln!(f)
    }
}

/// Shell commands for bank 0, program 0, selected on channel 0.
struct FluidsynthExport<'a, 'b>(&'a KeyPitches<'b>);

impl FluidsynthExport<'_, '_> {
    fn tuning_name(&self) -> String {
        let words = self
            .0
            .scl
            .description()
            .split_whitespace()
            .collect::<Vec<_>>();
        if words.is_empty() {
            "tuning".to_owned()
        } else {
            words.join("_")
        }
    }
}

impl Display for FluidsynthExport<'_, '_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.0.write_header(f, "#")?;
        writeln!(f, "tuning {} 0 0", self.tuning_name())?;
        for (key, pitch) in &self.0.pitches {
            writeln!(f, "tune 0 0 {} {:.6}", key, pitch.as_midi_cents())?;
        }
        writeln!(f, "settuning 0 0 0")
    }
}

/// Error reported when a [`Format`] name is not known.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnsupportedFormatError {
    pub name: String,
}

impl Display for UnsupportedFormatError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "unknown format '{}', expected one of {}",
            self.name,
            Format::ALL.map(Format::name).join(", ")
        )
    }
}

impl Error for UnsupportedFormatError {}

/// Error reported when a scale cannot be expressed in a given [`Format`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RenderError {
    /// The scale only consists of the unison, so there is no period to map keys onto.
    TrivialScale,

    /// The pitch of the given key is zero or not finite.
    PitchOutOfRange(PianoKey),
}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            RenderError::TrivialScale => {
                write!(f, "a scale without notes cannot be mapped to keys")
            }
            RenderError::PitchOutOfRange(key) => {
                write!(f, "the pitch of key {key} is out of range")
            }
        }
    }
}

impl Error for RenderError {}
