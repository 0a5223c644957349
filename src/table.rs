//! A scale anchored to a reference pitch, loaded from and saved to tuning files.

use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fs;
use std::fs::File;
use std::io;
use std::io::ErrorKind;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use crate::format::Format;
use crate::format::RenderError;
use crate::pitch::ReferencePitch;
use crate::scala::KbmExport;
use crate::scala::Scl;
use crate::scala::SclImportError;
use crate::value::PitchValue;

/// A [`Scl`] together with the [`ReferencePitch`] it is anchored to.
///
/// # Examples
///
/// ```
/// # use tuning_tables::format::Format;
/// # use tuning_tables::table::TuningTable;
/// let mut table = TuningTable::new();
/// table.read_scl(&b"! comment\n12-tone test\n3\n9/8\n5/4\n701.955"[..]).unwrap();
///
/// assert_eq!(table.description(), "12-tone test");
/// assert_eq!(table.scale().len(), 4);
/// assert_eq!(
///     table.render(Format::Scala).unwrap(),
///     "12-tone test\n3\n9/8\n5/4\n701.9550\n"
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TuningTable {
    scl: Scl,
    reference: ReferencePitch,
}

impl TuningTable {
    /// Creates an empty table containing the unison only, anchored at middle C.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_scl(scl: Scl, reference: ReferencePitch) -> Self {
        Self { scl, reference }
    }

    pub fn description(&self) -> &str {
        self.scl.description()
    }

    /// The scale including the unison at index 0.
    pub fn scale(&self) -> &[PitchValue] {
        self.scl.pitch_values()
    }

    pub fn scl(&self) -> &Scl {
        &self.scl
    }

    pub fn reference(&self) -> ReferencePitch {
        self.reference
    }

    pub fn set_reference(&mut self, reference: ReferencePitch) {
        self.reference = reference;
    }

    /// Replaces the scale and description with the content of `reader`.
    ///
    /// On failure, the table remains unmodified.
    pub fn read_scl(&mut self, reader: impl Read) -> Result<(), SclImportError> {
        self.scl = Scl::import(reader)?;
        Ok(())
    }

    /// Replaces the scale and description with the content of the Scala file at `path`.
    ///
    /// On failure, the table remains unmodified.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => LoadError::FileNotFound(path.to_owned()),
            _ => LoadError::IoError(err),
        })?;
        self.read_scl(file).map_err(|err| match err {
            SclImportError::IoError(err) => LoadError::IoError(err),
            err => LoadError::FormatError(err),
        })?;
        log::info!(
            "Loaded scale '{}' with {} items from {}",
            self.description(),
            self.scl.num_items(),
            path.display()
        );
        Ok(())
    }

    pub fn render(&self, format: Format) -> Result<String, RenderError> {
        format.render(&self.scl, self.reference)
    }

    /// The keyboard mapping accompanying the [`Format::Scala`] rendering.
    pub fn render_kbm(&self) -> KbmExport<'_> {
        self.scl.export_kbm(self.reference)
    }

    /// Writes the table to `path` in the given `format`.
    ///
    /// A keyboard mapping is written to `kbm_path` if provided, which is only supported for [`Format::Scala`].
    /// Nothing is written if the table cannot be rendered.
    pub fn save(
        &self,
        path: impl AsRef<Path>,
        format: Format,
        kbm_path: Option<&Path>,
    ) -> Result<(), SaveError> {
        let path = path.as_ref();
        if kbm_path.is_some() && format != Format::Scala {
            log::warn!("Refusing to write a keyboard mapping for {format} tables");
            return Err(SaveError::KbmWithoutScala(format));
        }

        let rendered = self.render(format)?;
        fs::write(path, rendered)?;
        log::info!("Saved {format} table to {}", path.display());

        if let Some(kbm_path) = kbm_path {
            fs::write(kbm_path, self.render_kbm().to_string())?;
            log::info!("Saved keyboard mapping to {}", kbm_path.display());
        }
        Ok(())
    }
}

/// Error reported when [`TuningTable::load`] fails.
#[derive(Debug)]
pub enum LoadError {
    FileNotFound(PathBuf),
    IoError(io::Error),
    FormatError(SclImportError),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            LoadError::FileNotFound(path) => write!(f, "file {} does not exist", path.display()),
            LoadError::IoError(err) => write!(f, "could not read file: {err}"),
            LoadError::FormatError(err) => write!(f, "malformed scl file: {err}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoadError::FileNotFound(_) => None,
            LoadError::IoError(err) => Some(err),
            LoadError::FormatError(err) => Some(err),
        }
    }
}

/// Error reported when [`TuningTable::save`] fails.
#[derive(Debug)]
pub enum SaveError {
    RenderError(RenderError),
    KbmWithoutScala(Format),
    IoError(io::Error),
}

impl From<RenderError> for SaveError {
    fn from(v: RenderError) -> Self {
        Self::RenderError(v)
    }
}

impl From<io::Error> for SaveError {
    fn from(v: io::Error) -> Self {
        Self::IoError(v)
    }
}

impl Display for SaveError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            SaveError::RenderError(err) => write!(f, "could not render table: {err}"),
            SaveError::KbmWithoutScala(format) => {
                write!(f, "keyboard mappings can only accompany Scala files, not {format}")
            }
            SaveError::IoError(err) => write!(f, "could not write file: {err}"),
        }
    }
}

impl Error for SaveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SaveError::RenderError(err) => Some(err),
            SaveError::KbmWithoutScala(_) => None,
            SaveError::IoError(err) => Some(err),
        }
    }
}
