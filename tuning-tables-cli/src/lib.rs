mod convert;
mod dump;
mod error;

use std::fmt::{self, Debug, Display};
use std::io::{self, Write};

use clap::{Parser, Subcommand};
use convert::ConvertOptions;
use dump::DumpOptions;

#[derive(Parser)]
#[command(
    name = "tuning-tables",
    version,
    about = "Convert Scala scale files into tuning tables"
)]
struct MainOptions {
    #[command(subcommand)]
    command: MainCommand,
}

#[derive(Subcommand)]
enum MainCommand {
    /// Convert a scl file into a Scala, Timidity, Csound or Fluidsynth tuning table
    #[command(name = "convert")]
    Convert(ConvertOptions),

    /// Display the degrees of a scl file
    #[command(name = "dump")]
    Dump(DumpOptions),
}

impl MainOptions {
    fn run(self) -> CliResult {
        let stdout = io::stdout();
        let stderr = io::stderr();

        let mut app = App {
            output: Box::new(stdout.lock()),
            error: Box::new(stderr.lock()),
        };

        self.command.run(&mut app)
    }
}

impl MainCommand {
    fn run(self, app: &mut App) -> CliResult {
        match self {
            MainCommand::Convert(options) => options.run(app),
            MainCommand::Dump(options) => options.run(app),
        }
    }
}

pub fn run_in_shell_env(args: impl IntoIterator<Item = String>) -> CliResult {
    let options = match MainOptions::try_parse_from(args) {
        Err(err) => {
            return if err.use_stderr() {
                Err(CliError::CommandError(err.to_string()))
            } else {
                print!("{err}");
                Ok(())
            };
        }
        Ok(options) => options,
    };

    options.run()
}

struct App<'a> {
    output: Box<dyn 'a + Write>,
    error: Box<dyn 'a + Write>,
}

impl App<'_> {
    pub fn write(&mut self, message: impl Display) -> io::Result<()> {
        write!(&mut self.output, "{message}")
    }

    pub fn writeln(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(&mut self.output, "{message}")
    }

    pub fn errln(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(&mut self.error, "{message}")
    }
}

pub type CliResult<T = ()> = Result<T, CliError>;

pub enum CliError {
    IoError(io::Error),
    CommandError(String),
}

impl Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::IoError(err) => write!(f, "IO error / {err}"),
            CliError::CommandError(err) => write!(f, "The command failed / {err}"),
        }
    }
}

impl From<String> for CliError {
    fn from(v: String) -> Self {
        CliError::CommandError(v)
    }
}

impl From<io::Error> for CliError {
    fn from(v: io::Error) -> Self {
        CliError::IoError(v)
    }
}
