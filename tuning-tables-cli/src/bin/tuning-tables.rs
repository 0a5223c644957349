use std::{env, io::ErrorKind};
use tuning_tables_cli::{self, CliError, CliResult};

fn main() -> CliResult {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match tuning_tables_cli::run_in_shell_env(env::args()) {
        // The BrokenPipe case occurs when stdout tries to communicate with a process that has already terminated.
        // Since conversions are idempotent, it is okay to ignore this error and terminate successfully.
        Err(CliError::IoError(err)) if err.kind() == ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}
