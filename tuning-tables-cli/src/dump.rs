use std::path::PathBuf;

use clap::Parser;
use tuning_tables::{pitch::ReferencePitch, table::TuningTable, value::PitchValue};

use crate::{error::ResultExt, App, CliError, CliResult};

#[derive(Parser)]
pub(crate) struct DumpOptions {
    /// The location of the scl file to display
    scl_file_location: PathBuf,

    /// Reference note that should sound at its concert pitch or a custom pitch, e.g. 69@440Hz
    #[arg(long = "ref-note", env = "TUNING_TABLES_REF_NOTE", default_value = "60")]
    reference: ReferencePitch,
}

impl DumpOptions {
    pub fn run(&self, app: &mut App) -> CliResult {
        let mut table = TuningTable::new();
        table.set_reference(self.reference);
        table
            .load(&self.scl_file_location)
            .handle_error::<CliError>("Could not load scale")?;

        app.writeln(table.description())?;
        for (degree, pitch_value) in table.scale().iter().enumerate() {
            let kind = match pitch_value {
                PitchValue::Ratio(_) => "ratio",
                PitchValue::Cents(_) => "cents",
            };
            let pitch = self.reference.pitch() * pitch_value.as_float();
            app.writeln(format_args!("{degree} | {pitch_value} | {kind} | {pitch}"))?;
        }
        Ok(())
    }
}
