use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;

use crate::scala::Scl;
use crate::scala::SclBuilder;
use crate::value::PitchValue;
use crate::value::PitchValueError;

pub(crate) fn import_scl(reader: impl Read) -> Result<Scl, SclImportError> {
    let mut importer = SclImporter::ExpectingDescription;

    for (line_number, line) in BufReader::new(reader).lines().enumerate() {
        if let SclImporter::Done(_) = importer {
            break;
        }
        let line = line?;
        let trimmed = line.trim();
        if trimmed.starts_with('!') || (trimmed.is_empty() && importer.skips_blank_lines()) {
            continue;
        }
        importer = importer.consume(line_number + 1, trimmed)?;
    }

    importer.finalize()
}

enum SclImporter {
    ExpectingDescription,
    ExpectingNumberOfNotes(String),
    ConsumingPitchLines {
        description: String,
        values_remaining: usize,
        builder: SclBuilder,
    },
    Done(Scl),
}

impl SclImporter {
    /// A blank line in place of the description is an empty description.
    fn skips_blank_lines(&self) -> bool {
        !matches!(self, SclImporter::ExpectingDescription)
    }

    fn consume(self, line_number: usize, line: &str) -> Result<Self, SclImportError> {
        Ok(match self {
            SclImporter::ExpectingDescription => {
                SclImporter::ExpectingNumberOfNotes(line.to_owned())
            }
            SclImporter::ExpectingNumberOfNotes(description) => {
                let num_notes = main_item(line)
                    .parse()
                    .map_err(|_| SclImportError::ParseError {
                        line_number,
                        kind: SclParseErrorKind::IntValue,
                    })?;
                SclImporter::consuming(description, num_notes, Scl::builder())
            }
            SclImporter::ConsumingPitchLines {
                description,
                values_remaining,
                builder,
            } => {
                let pitch_value =
                    line.parse::<PitchValue>()
                        .map_err(|err| SclImportError::ParseError {
                            line_number,
                            kind: SclParseErrorKind::PitchValue(err),
                        })?;
                SclImporter::consuming(
                    description,
                    values_remaining - 1,
                    builder.push_pitch_value(pitch_value),
                )
            }
            done @ SclImporter::Done(_) => done,
        })
    }

    fn consuming(description: String, values_remaining: usize, builder: SclBuilder) -> Self {
        if values_remaining == 0 {
            let scl = builder.build_with_description(description);
            log::debug!(
                "Imported scale '{}' with {} items",
                scl.description(),
                scl.num_items()
            );
            SclImporter::Done(scl)
        } else {
            SclImporter::ConsumingPitchLines {
                description,
                values_remaining,
                builder,
            }
        }
    }

    fn finalize(self) -> Result<Scl, SclImportError> {
        let error = match self {
            SclImporter::ExpectingDescription => SclStructuralError::ExpectingDescription,
            SclImporter::ExpectingNumberOfNotes(..) => SclStructuralError::ExpectingNumberOfNotes,
            SclImporter::ConsumingPitchLines {
                values_remaining,
                builder,
                ..
            } => SclStructuralError::InconsistentNumberOfNotes {
                expected: builder.num_items() + values_remaining,
                found: builder.num_items(),
            },
            SclImporter::Done(scl) => return Ok(scl),
        };
        Err(error.into())
    }
}

fn main_item(line: &str) -> &str {
    line.split_ascii_whitespace().next().unwrap_or("")
}

/// Error reported when importing an [`Scl`] fails.
#[derive(Debug)]
pub enum SclImportError {
    IoError(io::Error),
    ParseError {
        line_number: usize,
        kind: SclParseErrorKind,
    },
    StructuralError(SclStructuralError),
}

/// Specifies which kind of item is suspected to be malformed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SclParseErrorKind {
    /// Invalid or negative number of notes.
    IntValue,

    /// Invalid pitch value.
    PitchValue(PitchValueError),
}

/// Indicates that the structure of the imported [`Scl`] file is incomplete.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SclStructuralError {
    ExpectingDescription,
    ExpectingNumberOfNotes,
    InconsistentNumberOfNotes { expected: usize, found: usize },
}

impl From<io::Error> for SclImportError {
    fn from(v: io::Error) -> Self {
        Self::IoError(v)
    }
}

impl From<SclStructuralError> for SclImportError {
    fn from(v: SclStructuralError) -> Self {
        Self::StructuralError(v)
    }
}

impl Display for SclImportError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            SclImportError::IoError(err) => write!(f, "could not read scale: {err}"),
            SclImportError::ParseError {
                line_number,
                kind: SclParseErrorKind::IntValue,
            } => write!(f, "line {line_number}: invalid number of notes"),
            SclImportError::ParseError {
                line_number,
                kind: SclParseErrorKind::PitchValue(err),
            } => write!(f, "line {line_number}: {err}"),
            SclImportError::StructuralError(SclStructuralError::ExpectingDescription) => {
                write!(f, "description missing")
            }
            SclImportError::StructuralError(SclStructuralError::ExpectingNumberOfNotes) => {
                write!(f, "number of notes missing")
            }
            SclImportError::StructuralError(SclStructuralError::InconsistentNumberOfNotes {
                expected,
                found,
            }) => write!(f, "expected {expected} notes but found {found}"),
        }
    }
}

impl Error for SclImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SclImportError::IoError(err) => Some(err),
            SclImportError::ParseError {
                kind: SclParseErrorKind::PitchValue(err),
                ..
            } => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Fraction;

    fn ratio(numer: u64, denom: u64) -> PitchValue {
        PitchValue::Ratio(Fraction::new(numer, denom))
    }

    fn cents(cents: &str) -> PitchValue {
        PitchValue::Cents(cents.parse().unwrap())
    }

    #[test]
    fn import_scl() {
        let input = &b"!A comment
            ! A second comment
            Test scale
            7
            100.
            150.0 ignore any text
            !175.0 ignore comment
            200.0 .ignore dots

            6/5
            5 / 4 (ignore parentheses)
            3/2 /ignore additional slashes
            2"[..];

        let scl = Scl::import(input).unwrap();
        assert_eq!(scl.description(), "Test scale");
        assert_eq!(scl.num_items(), 7);
        assert_eq!(
            scl.pitch_values(),
            [
                ratio(1, 1),
                cents("100.0"),
                cents("150.0"),
                cents("200.0"),
                ratio(6, 5),
                ratio(5, 4),
                ratio(3, 2),
                ratio(2, 1),
            ]
        );
    }

    #[test]
    fn import_mixed_scale() {
        let scl = Scl::import(&b"! comment\n12-tone test\n3\n9/8\n5/4\n701.955"[..]).unwrap();
        assert_eq!(scl.description(), "12-tone test");
        assert_eq!(
            scl.pitch_values(),
            [ratio(1, 1), ratio(9, 8), ratio(5, 4), cents("701.955")]
        );
        assert!(scl.pitch_values()[3].is_cents());
        assert!(scl.pitch_values()[2].is_ratio());
    }

    #[test]
    fn import_empty_scale() {
        let scl = Scl::import(&b"No notes\n0\n"[..]).unwrap();
        assert_eq!(scl.description(), "No notes");
        assert_eq!(scl.pitch_values(), [ratio(1, 1)]);

        let scl = Scl::import(&b"No notes\n  0 notes\nignored\n"[..]).unwrap();
        assert_eq!(scl.pitch_values(), [ratio(1, 1)]);
    }

    #[test]
    fn ignore_lines_after_last_note() {
        let scl = Scl::import(&b"Fifth\n1\n3/2\n5/4\nnot a number\n-100.0"[..]).unwrap();
        assert_eq!(scl.pitch_values(), [ratio(1, 1), ratio(3, 2)]);
    }

    #[test]
    fn blank_description() {
        let scl = Scl::import(&b"! comment\n\n2\n3/2\n2/1"[..]).unwrap();
        assert_eq!(scl.description(), "");
        assert_eq!(scl.pitch_values(), [ratio(1, 1), ratio(3, 2), ratio(2, 1)]);

        let scl = Scl::import(&b"   \n0\n"[..]).unwrap();
        assert_eq!(scl.description(), "");
        assert_eq!(scl.pitch_values(), [ratio(1, 1)]);
    }

    #[test]
    fn export_with_blank_description_can_be_imported() {
        let scl = Scl::builder()
            .push_fraction(3, 2)
            .push_fraction(2, 1)
            .build_with_description("");
        let exported = scl.export().to_string();
        assert_eq!(exported, "\n2\n3/2\n2/1\n");

        assert_eq!(Scl::import(exported.as_bytes()).unwrap(), scl);
        assert_eq!(
            Scl::import(Scl::default().export().to_string().as_bytes()).unwrap(),
            Scl::default()
        );
    }

    #[test]
    fn description_may_contain_numbers_and_exclamation_marks() {
        let scl = Scl::import(&b"  3/2 is a fifth! \n1\n3/2"[..]).unwrap();
        assert_eq!(scl.description(), "3/2 is a fifth!");
    }

    #[test]
    fn windows_line_endings() {
        let scl = Scl::import(&b"! comment\r\nCRLF scale\r\n2\r\n3/2\r\n2\r\n"[..]).unwrap();
        assert_eq!(scl.description(), "CRLF scale");
        assert_eq!(scl.pitch_values(), [ratio(1, 1), ratio(3, 2), ratio(2, 1)]);
    }

    #[test]
    fn scl_parse_error() {
        assert!(matches!(
            Scl::import(&b"Bad number of notes\n3x\n100.0\n5/4\n2"[..]),
            Err(SclImportError::ParseError {
                line_number: 2,
                kind: SclParseErrorKind::IntValue
            })
        ));
        assert!(matches!(
            Scl::import(&b"Negative number of notes\n-3\n100.0\n5/4\n2"[..]),
            Err(SclImportError::ParseError {
                line_number: 2,
                kind: SclParseErrorKind::IntValue
            })
        ));
        assert!(matches!(
            Scl::import(&b"Negative cents value\n3\n-100.0\n5/4\n2"[..]),
            Err(SclImportError::ParseError {
                line_number: 3,
                kind: SclParseErrorKind::PitchValue(PitchValueError::NegativeValue)
            })
        ));
        assert!(matches!(
            Scl::import(&b"Unclassified\n3\n100.0\nfive/4\n2"[..]),
            Err(SclImportError::ParseError {
                line_number: 4,
                kind: SclParseErrorKind::PitchValue(PitchValueError::Unclassified)
            })
        ));
        assert!(matches!(
            Scl::import(&b"Denom is empty\n3\n100.0\n5/\n2"[..]),
            Err(SclImportError::ParseError {
                line_number: 4,
                kind: SclParseErrorKind::PitchValue(PitchValueError::Denom)
            })
        ));
        assert!(matches!(
            Scl::import(&b"Zero denom\n3\n100.0\n5/0\n2"[..]),
            Err(SclImportError::ParseError {
                line_number: 4,
                kind: SclParseErrorKind::PitchValue(PitchValueError::ZeroRatio)
            })
        ));
        assert!(matches!(
            Scl::import(&b"! comment\nLine numbers count comments\n\n1\nx"[..]),
            Err(SclImportError::ParseError {
                line_number: 5,
                kind: SclParseErrorKind::PitchValue(PitchValueError::Unclassified)
            })
        ));
    }

    #[test]
    fn scl_structural_error() {
        assert!(matches!(
            Scl::import(&b""[..]),
            Err(SclImportError::StructuralError(
                SclStructuralError::ExpectingDescription
            ))
        ));
        assert!(matches!(
            Scl::import(&b"! only comments\n!\n"[..]),
            Err(SclImportError::StructuralError(
                SclStructuralError::ExpectingDescription
            ))
        ));
        assert!(matches!(
            Scl::import(&b"Number of notes missing"[..]),
            Err(SclImportError::StructuralError(
                SclStructuralError::ExpectingNumberOfNotes
            ))
        ));
        assert!(matches!(
            Scl::import(&b"Truncated\n5\n100.0\n200.0\n300.0\n400.0\n"[..]),
            Err(SclImportError::StructuralError(
                SclStructuralError::InconsistentNumberOfNotes {
                    expected: 5,
                    found: 4
                }
            ))
        ));
        assert!(matches!(
            Scl::import(&b"Truncated by comment\n2\n100.0\n!200.0"[..]),
            Err(SclImportError::StructuralError(
                SclStructuralError::InconsistentNumberOfNotes {
                    expected: 2,
                    found: 1
                }
            ))
        ));
    }

    #[test]
    fn io_error_is_reported() {
        assert!(matches!(
            Scl::import(&b"Invalid UTF-8\n1\n\xff\xfe"[..]),
            Err(SclImportError::IoError(_))
        ));
    }

    #[test]
    fn error_messages() {
        let err = Scl::import(&b"Truncated\n2\n100.0"[..]).unwrap_err();
        assert_eq!(err.to_string(), "expected 2 notes but found 1");

        let err = Scl::import(&b"Negative\n1\n-3/2"[..]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 3: negative values are not supported"
        );
    }
}
