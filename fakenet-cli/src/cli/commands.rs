//! Command implementations and argument parsing for the `fakenet` binary.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use fakenet_core::{
    Discovery, ExecutionStrategy, LabeledGraph, PipelineBuilder, PipelineError, PluginError,
    PluginInfo, PointSet, PointSetError, PruneEdges, PruneReport, Simplex, StrategyParameters,
    StrategyRegistry, Triangulation, discover,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{Span, field, info, instrument, warn};

/// Environment variable listing extra plugin locations.
pub const PLUGIN_PATH_ENV: &str = "FAKENET_PLUGIN_PATH";

const DEFAULT_PRUNER: &str = "keep-all";

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "fakenet", about = "Generate synthetic interaction networks.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Build, prune and relabel a graph from a triangulated point set.
    Generate(GenerateCommand),
    /// List built-in and discovered pruning strategies.
    Plugins(PluginsCommand),
}

/// Options accepted by the `generate` command.
#[derive(Debug, Args, Clone)]
pub struct GenerateCommand {
    /// JSON document with `points`, `simplices` and optionally `seeds`.
    pub input: PathBuf,

    /// Number of seed points, overriding the document's `seeds` field.
    #[arg(long)]
    pub seeds: Option<usize>,

    /// Pruning strategy: a discovered plugin name or a built-in strategy.
    #[arg(long, default_value = DEFAULT_PRUNER)]
    pub pruner: String,

    /// Extra directories or manifest files to scan for plugins.
    #[arg(long = "plugin-dir")]
    pub plugin_dirs: Vec<PathBuf>,

    /// Prefix for generated identifiers.
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// Output rendering.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// How the digraph builder schedules its work.
    #[arg(long, value_enum, default_value_t = StrategyArg::Auto)]
    pub strategy: StrategyArg,

    /// Fail when the built graph is not weakly connected.
    #[arg(long)]
    pub require_connected: bool,
}

/// Options accepted by the `plugins` command.
#[derive(Debug, Args, Clone, Default)]
pub struct PluginsCommand {
    /// Extra directories or manifest files to scan for plugins.
    #[arg(long = "plugin-dir")]
    pub plugin_dirs: Vec<PathBuf>,
}

/// Output renderings for `generate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The labeled graph as pretty-printed JSON.
    Json,
    /// One `source<TAB>target<TAB>weight` line per edge.
    Edges,
}

/// Command-line spelling of [`ExecutionStrategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Pick by input size.
    Auto,
    /// Single-threaded.
    Sequential,
    /// Rayon-backed.
    Parallel,
}

impl From<StrategyArg> for ExecutionStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Auto => Self::Auto,
            StrategyArg::Sequential => Self::Sequential,
            StrategyArg::Parallel => Self::Parallel,
        }
    }
}

/// Input document read by `generate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputDocument {
    /// Point coordinates ordered by increasing radius.
    pub points: Vec<Vec<f64>>,
    /// Simplices as point indices.
    pub simplices: Vec<Vec<usize>>,
    /// Number of leading seed points.
    #[serde(default)]
    pub seeds: Option<usize>,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading the input document failed.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The input document is not valid JSON of the expected shape.
    #[error("failed to parse `{path}`: {source}")]
    Parse {
        /// Path of the offending document.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
    /// Neither `--seeds` nor the document provided a seed count.
    #[error("`{path}` has no `seeds` field and `--seeds` was not given")]
    MissingSeeds {
        /// Path of the document.
        path: PathBuf,
    },
    /// The document's points are not a valid point set.
    #[error(transparent)]
    Points(#[from] PointSetError),
    /// No discovered plugin or built-in strategy has the requested name.
    #[error("unknown pruner `{name}`; available: {available}")]
    UnknownPruner {
        /// Requested name.
        name: String,
        /// Comma-separated names that would have been accepted.
        available: String,
    },
    /// A built-in strategy could not be constructed.
    #[error(transparent)]
    Plugin(#[from] PluginError),
    /// Generation failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl CliError {
    /// Returns the stable code of the underlying library error and, for
    /// pipeline failures, the code of the stage that failed.
    #[must_use]
    pub fn codes(&self) -> (Option<&'static str>, Option<&'static str>) {
        match self {
            Self::Plugin(err) => (Some(err.code().as_str()), None),
            Self::Pipeline(err) => (Some(err.code().as_str()), Some(err.detail_code())),
            _ => (None, None),
        }
    }
}

/// Result of `generate`.
#[derive(Debug, Clone)]
pub struct GenerateSummary {
    /// Pruned, relabeled graph.
    pub graph: LabeledGraph,
    /// What pruning did.
    pub report: PruneReport,
    /// Requested rendering.
    pub format: OutputFormat,
}

/// Result of `plugins`.
#[derive(Debug, Clone, Default)]
pub struct PluginListing {
    /// Registered built-in strategy names.
    pub builtin: Vec<String>,
    /// Plugins loaded from manifests.
    pub discovered: Vec<PluginInfo>,
    /// Candidates that failed to load, as `(path, code, message)`.
    pub failures: Vec<(PathBuf, &'static str, String)>,
}

/// Output of any command.
#[derive(Debug, Clone)]
pub enum CommandOutput {
    /// From `generate`.
    Generate(GenerateSummary),
    /// From `plugins`.
    Plugins(PluginListing),
}

/// Executes the command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when reading the input or generation fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use fakenet_cli::cli::{Cli, Command, CommandOutput, PluginsCommand, run_cli};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let cli = Cli { command: Command::Plugins(PluginsCommand::default()) };
/// let CommandOutput::Plugins(listing) = run_cli(cli)? else {
///     unreachable!("plugins yields a listing");
/// };
/// assert!(listing.builtin.iter().any(|name| name == "keep-all"));
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<CommandOutput, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Generate(command) => {
            span.record("command", field::display("generate"));
            run_generate(command).map(CommandOutput::Generate)
        }
        Command::Plugins(command) => {
            span.record("command", field::display("plugins"));
            Ok(CommandOutput::Plugins(run_plugins(&command)))
        }
    }
}

#[instrument(
    name = "cli.generate",
    err,
    skip(command),
    fields(input = field::Empty, pruner = field::Empty, seeds = field::Empty),
)]
pub(super) fn run_generate(command: GenerateCommand) -> Result<GenerateSummary, CliError> {
    let span = Span::current();
    span.record("input", field::display(command.input.display()));
    span.record("pruner", field::display(&command.pruner));

    let document = read_document(&command.input)?;
    let seeds = command
        .seeds
        .or(document.seeds)
        .ok_or_else(|| CliError::MissingSeeds {
            path: command.input.clone(),
        })?;
    span.record("seeds", seeds);
    let triangulation = into_triangulation(document)?;

    let pipeline = PipelineBuilder::new()
        .with_seed_count(seeds)
        .with_prefix(command.prefix)
        .with_execution_strategy(command.strategy.into())
        .require_connected(command.require_connected)
        .build()?;

    let registry = StrategyRegistry::builtin();
    let discovery = discover(&plugin_locations(command.plugin_dirs), &registry);
    let pruner = select_pruner(&command.pruner, &discovery, &registry)?;
    let output = pipeline.run(&triangulation, pruner.strategy())?;

    info!(
        nodes = output.graph.node_count(),
        edges = output.graph.edge_count(),
        removed = output.report.removed(),
        "graph generated"
    );
    Ok(GenerateSummary {
        graph: output.graph,
        report: output.report,
        format: command.format,
    })
}

#[instrument(name = "cli.plugins", skip(command))]
pub(super) fn run_plugins(command: &PluginsCommand) -> PluginListing {
    let registry = StrategyRegistry::builtin();
    let discovery = discover(&plugin_locations(command.plugin_dirs.clone()), &registry);
    PluginListing {
        builtin: registry.names().map(ToOwned::to_owned).collect(),
        failures: discovery
            .failures()
            .iter()
            .map(|failure| {
                (
                    failure.path.clone(),
                    failure.error.code().as_str(),
                    failure.error.to_string(),
                )
            })
            .collect(),
        discovered: discovery
            .into_plugins()
            .into_iter()
            .map(|plugin| plugin.info)
            .collect(),
    }
}

pub(super) fn read_document(path: &Path) -> Result<InputDocument, CliError> {
    let raw = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn into_triangulation(document: InputDocument) -> Result<Triangulation, CliError> {
    let points = PointSet::try_from_rows(document.points)?;
    let simplices = document.simplices.into_iter().map(Simplex::new).collect();
    Ok(Triangulation::new(points, simplices))
}

/// Command-line locations first, then `FAKENET_PLUGIN_PATH` entries.
pub(super) fn plugin_locations(mut locations: Vec<PathBuf>) -> Vec<PathBuf> {
    if let Some(raw) = env::var_os(PLUGIN_PATH_ENV) {
        locations.extend(env::split_paths(&raw).filter(|path| !path.as_os_str().is_empty()));
    }
    locations
}

/// Discovered plugins shadow built-in strategies of the same name.
pub(super) fn select_pruner<'a>(
    name: &str,
    discovery: &'a Discovery,
    registry: &StrategyRegistry,
) -> Result<Selected<'a>, CliError> {
    if let Some(plugin) = discovery.get(name) {
        return Ok(Selected::Discovered(plugin.strategy.as_ref()));
    }
    if registry.contains(name) {
        let strategy = registry.instantiate(name, &StrategyParameters::new())?;
        return Ok(Selected::Builtin(strategy));
    }
    let mut available: Vec<&str> = discovery
        .iter()
        .map(|plugin| plugin.info.name.as_str())
        .chain(registry.names())
        .collect();
    available.sort_unstable();
    available.dedup();
    warn!(pruner = name, "requested pruner is not available");
    Err(CliError::UnknownPruner {
        name: name.to_owned(),
        available: available.join(", "),
    })
}

/// A pruner borrowed from discovery or freshly built from the registry.
pub(super) enum Selected<'a> {
    Discovered(&'a dyn PruneEdges),
    Builtin(Box<dyn PruneEdges>),
}

impl Selected<'_> {
    pub(super) fn strategy(&self) -> &dyn PruneEdges {
        match self {
            Self::Discovered(strategy) => *strategy,
            Self::Builtin(strategy) => strategy.as_ref(),
        }
    }
}

/// Renders `output` to `writer`.
///
/// # Errors
/// Returns [`io::Error`] if writing or serialisation fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use fakenet_cli::cli::{CommandOutput, PluginListing, render_output};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let listing = PluginListing { builtin: vec!["keep-all".into()], ..Default::default() };
/// let mut buffer = Vec::new();
/// render_output(&CommandOutput::Plugins(listing), &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "builtin\tkeep-all\n");
/// # Ok(())
/// # }
/// ```
pub fn render_output(output: &CommandOutput, mut writer: impl Write) -> io::Result<()> {
    match output {
        CommandOutput::Generate(summary) => match summary.format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut writer, &summary.graph)?;
                writeln!(writer)
            }
            OutputFormat::Edges => {
                for edge in &summary.graph.edges {
                    writeln!(writer, "{}\t{}\t{}", edge.source, edge.target, edge.weight)?;
                }
                Ok(())
            }
        },
        CommandOutput::Plugins(listing) => {
            for name in &listing.builtin {
                writeln!(writer, "builtin\t{name}")?;
            }
            for info in &listing.discovered {
                let origin = info
                    .path
                    .as_deref()
                    .map_or_else(String::new, |path| path.display().to_string());
                writeln!(writer, "plugin\t{}\t{}\t{origin}", info.name, info.strategy)?;
            }
            for (path, code, message) in &listing.failures {
                writeln!(writer, "failed\t{}\t{code}\t{message}", path.display())?;
            }
            Ok(())
        }
    }
}
