use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tuning_tables::{format::Format, pitch::ReferencePitch, table::TuningTable};

use crate::{error::ResultExt, App, CliError, CliResult};

#[derive(Parser)]
pub(crate) struct ConvertOptions {
    /// The location of the scl file to convert
    scl_file_location: PathBuf,

    /// Target format: scala, timidity, csound or fluidsynth
    #[arg(long = "format", default_value = "scala")]
    format: Format,

    /// Reference note that should sound at its concert pitch or a custom pitch, e.g. 69@440Hz
    #[arg(long = "ref-note", env = "TUNING_TABLES_REF_NOTE", default_value = "60")]
    reference: ReferencePitch,

    /// Write a keyboard mapping file accompanying the Scala output
    #[arg(long = "kbm")]
    kbm_file_location: Option<PathBuf>,

    /// Write output to a file instead of stdout
    #[arg(long = "of")]
    output_file: Option<PathBuf>,
}

impl ConvertOptions {
    pub fn run(&self, app: &mut App) -> CliResult {
        let mut table = TuningTable::new();
        table.set_reference(self.reference);
        table
            .load(&self.scl_file_location)
            .handle_error::<CliError>("Could not load scale")?;
        log::debug!(
            "Converting '{}' to {} with reference {}",
            table.description(),
            self.format,
            self.reference
        );

        match &self.output_file {
            Some(output_file) => {
                table
                    .save(output_file, self.format, self.kbm_file_location.as_deref())
                    .handle_error::<CliError>("Could not save tuning table")?;
                app.errln(format_args!(
                    "Wrote {} table to {}",
                    self.format,
                    output_file.display()
                ))?;
            }
            None => {
                if self.kbm_file_location.is_some() && self.format != Format::Scala {
                    return Err(CliError::CommandError(format!(
                        "Keyboard mappings can only accompany Scala files, not {}",
                        self.format
                    )));
                }
                let rendered = table
                    .render(self.format)
                    .handle_error::<CliError>("Could not render tuning table")?;
                app.write(rendered)?;
                if let Some(kbm_file_location) = &self.kbm_file_location {
                    fs::write(kbm_file_location, table.render_kbm().to_string())?;
                }
            }
        }

        if let Some(kbm_file_location) = &self.kbm_file_location {
            app.errln(format_args!(
                "Wrote keyboard mapping to {}",
                kbm_file_location.display()
            ))?;
        }
        Ok(())
    }
}
