//! Exact pitch values as they appear in scale files.

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

/// Exact rational number used for ratio-based pitch values. Always stored in lowest terms.
pub type Fraction = num_rational::Ratio<u64>;

/// Minimum number of fractional digits used when formatting [`Cents`].
pub const CENTS_PRECISION: usize = 4;

/// A single degree of a scale, either given as an exact frequency ratio or as a cents value.
///
/// # Examples
///
/// ```
/// # use tuning_tables::value::PitchValue;
/// let fifth = "3/2".parse::<PitchValue>().unwrap();
/// assert!(fifth.is_ratio());
/// assert_eq!(fifth.to_string(), "3/2");
///
/// let tempered_fifth = "701.955".parse::<PitchValue>().unwrap();
/// assert!(tempered_fifth.is_cents());
/// assert_eq!(tempered_fifth.to_string(), "701.9550");
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PitchValue {
    Ratio(Fraction),
    Cents(Cents),
}

impl PitchValue {
    pub fn unison() -> Self {
        Self::Ratio(Fraction::from_integer(1))
    }

    /// Creates a reduced ratio. Returns [`None`] if `numer` or `denom` is zero.
    pub fn from_fraction(numer: u64, denom: u64) -> Option<Self> {
        (numer != 0 && denom != 0).then(|| Self::Ratio(Fraction::new(numer, denom)))
    }

    pub fn is_ratio(&self) -> bool {
        matches!(self, Self::Ratio(_))
    }

    pub fn is_cents(&self) -> bool {
        matches!(self, Self::Cents(_))
    }

    /// The linear frequency ratio of this value.
    ///
    /// This is the only place where pitch values are turned into binary floating point numbers.
    ///
    /// # Examples
    ///
    /// ```
    /// # use assert_approx_eq::assert_approx_eq;
    /// # use tuning_tables::value::PitchValue;
    /// assert_approx_eq!(PitchValue::from_fraction(5, 4).unwrap().as_float(), 1.25);
    /// assert_approx_eq!("1200.0".parse::<PitchValue>().unwrap().as_float(), 2.0);
    /// ```
    pub fn as_float(&self) -> f64 {
        match self {
            Self::Ratio(fraction) => *fraction.numer() as f64 / *fraction.denom() as f64,
            Self::Cents(cents) => (cents.as_f64() / 1200.0).exp2(),
        }
    }
}

impl Display for PitchValue {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Ratio(fraction) => write!(f, "{}/{}", fraction.numer(), fraction.denom()),
            Self::Cents(cents) => write!(f, "{cents}"),
        }
    }
}

/// Classifies the leading numeric token of a scale line.
///
/// Cents values (containing a `.`) take priority over ratios (`numer/denom`) which take priority over plain integers.
/// Any text following the numeric token is ignored.
impl FromStr for PitchValue {
    type Err = PitchValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim_start();
        if s.starts_with('-') {
            return Err(PitchValueError::NegativeValue);
        }

        let (integer, rest) = split_digits(s);
        if let Some(rest) = rest.strip_prefix('.') {
            let (fraction, _) = split_digits(rest);
            return Cents::from_digits(integer, fraction).map(PitchValue::Cents);
        }

        if integer.is_empty() {
            return Err(PitchValueError::Unclassified);
        }
        let numer = integer.parse().map_err(|_| PitchValueError::Numer)?;

        let denom = match rest.trim_start().strip_prefix('/') {
            Some(rest) => {
                let (denom, _) = split_digits(rest.trim_start());
                denom.parse().map_err(|_| PitchValueError::Denom)?
            }
            None => 1,
        };

        PitchValue::from_fraction(numer, denom).ok_or(PitchValueError::ZeroRatio)
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

/// A non-negative cents value stored as the exact decimal digits it was written with.
///
/// Leading zeros of the integer part and trailing zeros of the fractional part are insignificant and not stored.
#[derive(Clone, Debug)]
pub struct Cents {
    integer: String,
    fraction: String,
    value: f64,
}

impl Cents {
    fn from_digits(integer: &str, fraction: &str) -> Result<Self, PitchValueError> {
        if integer.is_empty() && fraction.is_empty() {
            return Err(PitchValueError::CentsValue);
        }

        let integer = integer.trim_start_matches('0');
        let fraction = fraction.trim_end_matches('0');
        let value = format!("0{integer}.{fraction}0")
            .parse()
            .map_err(|_| PitchValueError::CentsValue)?;

        Ok(Self {
            integer: integer.to_owned(),
            fraction: fraction.to_owned(),
            value,
        })
    }

    pub fn as_f64(&self) -> f64 {
        self.value
    }
}

impl PartialEq for Cents {
    fn eq(&self, other: &Self) -> bool {
        self.integer == other.integer && self.fraction == other.fraction
    }
}

impl Eq for Cents {}

/// Formats the exact digits, padded to at least [`CENTS_PRECISION`] fractional digits.
impl Display for Cents {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let integer = if self.integer.is_empty() {
            "0"
        } else {
            &self.integer
        };
        write!(
            f,
            "{integer}.{:0<width$}",
            self.fraction,
            width = CENTS_PRECISION
        )
    }
}

impl FromStr for Cents {
    type Err = PitchValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<PitchValue>()? {
            PitchValue::Cents(cents) => Ok(cents),
            PitchValue::Ratio(_) => Err(PitchValueError::CentsValue),
        }
    }
}

/// Specifies why a scale line could not be turned into a [`PitchValue`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PitchValueError {
    /// The line starts with a minus sign. Negative pitch values are not supported.
    NegativeValue,

    /// The line does not start with a number.
    Unclassified,

    /// Invalid cents value.
    CentsValue,

    /// Invalid or out-of-range numerator.
    Numer,

    /// Missing, invalid or out-of-range denominator.
    Denom,

    /// Numerator or denominator is zero.
    ZeroRatio,
}

impl Display for PitchValueError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let message = match self {
            Self::NegativeValue => "negative values are not supported",
            Self::Unclassified => "expected a cents value, a ratio or an integer",
            Self::CentsValue => "invalid cents value",
            Self::Numer => "invalid numerator",
            Self::Denom => "invalid denominator",
            Self::ZeroRatio => "ratio must be positive",
        };
        f.write_str(message)
    }
}

impl std::error::Error for PitchValueError {}
