//! Command-line interface for the fakenet generator.
//!
//! `generate` turns a triangulated point set into a pruned, relabeled
//! interaction graph. `plugins` lists the pruning strategies available to it.

mod commands;

pub use commands::{
    Cli, CliError, Command, CommandOutput, GenerateCommand, GenerateSummary, InputDocument,
    OutputFormat, PLUGIN_PATH_ENV, PluginListing, PluginsCommand, StrategyArg, render_output,
    run_cli,
};

#[cfg(test)]
mod test_helpers;
