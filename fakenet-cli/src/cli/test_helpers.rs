//! Small helpers shared across CLI tests.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tempfile::TempDir;

use super::{Cli, CliError, Command, CommandOutput, GenerateCommand, OutputFormat, StrategyArg};
use super::{GenerateSummary, run_cli};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serialises tests that read or write process environment variables.
pub(super) fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn write_file(dir: &Path, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

/// `generate` arguments with every option at its default.
pub(super) fn generate_args(input: PathBuf) -> GenerateCommand {
    GenerateCommand {
        input,
        seeds: None,
        pruner: "keep-all".to_owned(),
        plugin_dirs: Vec::new(),
        prefix: String::new(),
        format: OutputFormat::Json,
        strategy: StrategyArg::Auto,
        require_connected: false,
    }
}

pub(super) fn generate(command: GenerateCommand) -> Result<GenerateSummary, CliError> {
    match run_cli(Cli {
        command: Command::Generate(command),
    })? {
        CommandOutput::Generate(summary) => Ok(summary),
        CommandOutput::Plugins(_) => panic!("generate must yield a summary"),
    }
}

pub(super) fn generate_expecting_error(command: GenerateCommand, panic_msg: &str) -> CliError {
    match generate(command) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
