//! Interop with [Scala](http://www.huygens-fokker.org/scala/) tuning files.

mod import;

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::Read;

use crate::key::PianoKey;
use crate::key::MIDI_KEYS;
use crate::pitch::Pitch;
use crate::pitch::ReferencePitch;
use crate::value::PitchValue;

pub use self::import::*;

/// Scale format according to [http://www.huygens-fokker.org/scala/scl_format.html](http://www.huygens-fokker.org/scala/scl_format.html).
///
/// The pitch values are stored *including* the implicit unison at degree 0, i.e. a file declaring `N` notes results in `N+1` pitch values.
/// The last pitch value is the period of the scale.
///
/// # Examples
///
/// ```
/// # use tuning_tables::scala::Scl;
/// let scl = Scl::import(&b"! comment\n12-tone test\n3\n9/8\n5/4\n701.955"[..]).unwrap();
///
/// assert_eq!(scl.description(), "12-tone test");
/// assert_eq!(scl.pitch_values().len(), 4);
/// assert_eq!(scl.num_items(), 3);
/// assert_eq!(scl.export().to_string(), "12-tone test\n3\n9/8\n5/4\n701.9550\n");
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Scl {
    description: String,
    pitch_values: Vec<PitchValue>,
}

impl Scl {
    pub fn builder() -> SclBuilder {
        SclBuilder {
            pitch_values: vec![PitchValue::unison()],
        }
    }

    /// Line breaks are replaced by spaces s.t. the description always fits into a single line.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = single_line(description.into())
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// All pitch values, starting with the unison.
    pub fn pitch_values(&self) -> &[PitchValue] {
        &self.pitch_values
    }

    /// The number of pitch values excluding the unison, as declared in the file.
    pub fn num_items(&self) -> usize {
        self.pitch_values.len() - 1
    }

    pub fn period(&self) -> &PitchValue {
        // The unison is always present
        &self.pitch_values[self.num_items()]
    }

    /// Retrieves the pitch of `key` when `reference` is mapped to degree 0 and the scale is repeated at its period.
    ///
    /// Returns [`None`] if the scale consists of the unison only.
    ///
    /// # Examples
    ///
    /// ```
    /// # use assert_approx_eq::assert_approx_eq;
    /// # use tuning_tables::key::PianoKey;
    /// # use tuning_tables::pitch::{Pitch, ReferencePitch};
    /// # use tuning_tables::scala::Scl;
    /// let scl = Scl::import(&b"Major third\n2\n5/4\n2"[..]).unwrap();
    /// let reference = ReferencePitch::from_key_and_pitch(
    ///     PianoKey::from_midi_number(60).unwrap(),
    ///     Pitch::from_hz(200.0).unwrap(),
    /// );
    /// let pitch_of = |midi_number: i32| {
    ///     let key = PianoKey::from_midi_number(midi_number).unwrap();
    ///     scl.pitch_of(key, reference).unwrap().as_hz()
    /// };
    ///
    /// assert_approx_eq!(pitch_of(59), 125.0);
    /// assert_approx_eq!(pitch_of(60), 200.0);
    /// assert_approx_eq!(pitch_of(61), 250.0);
    /// assert_approx_eq!(pitch_of(62), 400.0);
    /// ```
    pub fn pitch_of(&self, key: PianoKey, reference: ReferencePitch) -> Option<Pitch> {
        let num_items = i32::try_from(self.num_items())
            .ok()
            .filter(|&num_items| num_items > 0)?;

        let degree = reference.key().num_keys_before(key);
        let num_periods = degree.div_euclid(num_items);
        let degree_within_period = degree.rem_euclid(num_items) as usize;

        let ratio = self.period().as_float().powi(num_periods)
            * self.pitch_values[degree_within_period].as_float();
        Some(reference.pitch() * ratio)
    }

    pub fn import(reader: impl Read) -> Result<Self, SclImportError> {
        import::import_scl(reader)
    }

    pub fn export(&self) -> SclExport<'_> {
        SclExport(self)
    }

    /// Derives a linear keyboard mapping spanning the full MIDI range with `reference` as middle note.
    pub fn export_kbm(&self, reference: ReferencePitch) -> KbmExport<'_> {
        KbmExport {
            scl: self,
            reference,
        }
    }
}

/// The empty scale which only consists of the unison.
impl Default for Scl {
    fn default() -> Self {
        Self::builder().build_with_description("")
    }
}

fn single_line(text: String) -> String {
    if text.contains(['\n', '\r']) {
        text.split(['\n', '\r'])
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        text
    }
}

pub struct SclBuilder {
    pitch_values: Vec<PitchValue>,
}

impl SclBuilder {
    /// # Panics
    ///
    /// Panics if `numer` or `denom` is zero.
    pub fn push_fraction(self, numer: u64, denom: u64) -> Self {
        let pitch_value = PitchValue::from_fraction(numer, denom)
            .unwrap_or_else(|| panic!("Ratio must be positive but was {numer}/{denom}"));
        self.push_pitch_value(pitch_value)
    }

    pub fn push_pitch_value(mut self, pitch_value: PitchValue) -> Self {
        self.pitch_values.push(pitch_value);
        self
    }

    pub fn num_items(&self) -> usize {
        self.pitch_values.len() - 1
    }

    pub fn build_with_description(self, description: impl Into<String>) -> Scl {
        Scl {
            description: single_line(description.into()),
            pitch_values: self.pitch_values,
        }
    }
}

pub struct SclExport<'a>(&'a Scl);

impl Display for SclExport<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "{}", self.0.description())?;
        writeln!(f, "{}", self.0.num_items())?;
        for pitch_value in &self.0.pitch_values()[1..] {
            writeln!(f, "{pitch_value}")?;
        }
        Ok(())
    }
}

/// Keyboard mapping according to [http://www.huygens-fokker.org/scala/help.htm#mappings](http://www.huygens-fokker.org/scala/help.htm#mappings).
///
/// Every key from MIDI number 0 to 127 is mapped linearly onto the scale, the reference key being degree 0.
pub struct KbmExport<'a> {
    scl: &'a Scl,
    reference: ReferencePitch,
}

impl Display for KbmExport<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let num_items = self.scl.num_items();
        writeln!(f, "{num_items}")?;
        writeln!(f, "{}", MIDI_KEYS.start())?;
        writeln!(f, "{}", MIDI_KEYS.end())?;
        writeln!(f, "{}", self.reference.key())?;
        writeln!(f, "{}", self.reference.key())?;
        writeln!(f, "{:.3}", self.reference.pitch().as_hz())?;
        writeln!(f, "{num_items}")?;
        for degree in 0..num_items {
            writeln!(f, "{degree}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Fraction;
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;

    fn reference(midi_number: i32, hz: f64) -> ReferencePitch {
        ReferencePitch::from_key_and_pitch(
            PianoKey::from_midi_number(midi_number).unwrap(),
            Pitch::from_hz(hz).unwrap(),
        )
    }

    #[test]
    fn export_scl() {
        let scl = Scl::builder()
            .push_fraction(9, 8)
            .push_fraction(10, 8)
            .push_pitch_value("701.955".parse().unwrap())
            .push_fraction(2, 1)
            .build_with_description("Custom scale");

        assert_eq!(
            scl.export().to_string().lines().collect::<Vec<_>>(),
            ["Custom scale", "4", "9/8", "5/4", "701.9550", "2/1"]
        );
    }

    #[test]
    fn export_scl_ends_with_single_newline() {
        let exported = Scl::builder()
            .push_fraction(3, 2)
            .build_with_description("Fifth")
            .export()
            .to_string();
        assert_eq!(exported, "Fifth\n1\n3/2\n");

        assert_eq!(Scl::default().export().to_string(), "\n0\n");
    }

    #[test]
    fn description_is_single_line() {
        let mut scl = Scl::default();
        scl.set_description("first line\nsecond line\r\nthird line");
        assert_eq!(scl.description(), "first line second line third line");

        let scl = Scl::builder().build_with_description("a\nb");
        assert_eq!(scl.export().to_string(), "a b\n0\n");
    }

    #[test]
    fn export_kbm() {
        let scl = Scl::builder()
            .push_fraction(9, 8)
            .push_fraction(5, 4)
            .push_fraction(2, 1)
            .build_with_description("4 entries");

        assert_eq!(
            scl.export_kbm(reference(69, 432.0))
                .to_string()
                .lines()
                .collect::<Vec<_>>(),
            ["3", "0", "127", "69", "69", "432.000", "3", "0", "1", "2"]
        );
    }

    #[test]
    fn export_kbm_of_trivial_scale() {
        assert_eq!(
            Scl::default()
                .export_kbm(ReferencePitch::default())
                .to_string(),
            "0\n0\n127\n60\n60\n261.626\n0\n"
        );
    }

    #[test]
    fn period_and_unison() {
        let scl = Scl::builder()
            .push_fraction(3, 2)
            .push_fraction(2, 1)
            .build_with_description("");
        assert_eq!(scl.pitch_values()[0], PitchValue::unison());
        assert_eq!(scl.period(), &PitchValue::Ratio(Fraction::new(2, 1)));
        assert_eq!(Scl::default().period(), &PitchValue::unison());
    }

    #[test]
    fn pitches_repeat_at_period() {
        let scl = Scl::builder()
            .push_pitch_value("100.0".parse().unwrap())
            .push_pitch_value("300.".parse().unwrap())
            .build_with_description("Non-octave");

        let pitch_of = |midi_number: i32| {
            scl.pitch_of(
                PianoKey::from_midi_number(midi_number).unwrap(),
                reference(69, 440.0),
            )
            .unwrap()
            .as_hz()
        };

        assert_approx_eq!(pitch_of(65), 440.0 / 2.0_f64.powf(600.0 / 1200.0));
        assert_approx_eq!(pitch_of(67), 440.0 / 2.0_f64.powf(300.0 / 1200.0));
        assert_approx_eq!(pitch_of(68), 440.0 / 2.0_f64.powf(200.0 / 1200.0));
        assert_approx_eq!(pitch_of(69), 440.0);
        assert_approx_eq!(pitch_of(70), 440.0 * 2.0_f64.powf(100.0 / 1200.0));
        assert_approx_eq!(pitch_of(71), 440.0 * 2.0_f64.powf(300.0 / 1200.0));
    }

    #[test]
    fn trivial_scale_has_no_pitches() {
        assert!(Scl::default()
            .pitch_of(PianoKey::default(), ReferencePitch::default())
            .is_none());
    }
}
