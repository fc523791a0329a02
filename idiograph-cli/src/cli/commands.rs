//! Command implementations and argument parsing for the idiograph CLI.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use idiograph_core::{
    DEFAULT_MIN_WEIGHT, DecomposeError, DecomposerBuilder, Decomposition, IdiomGraph, OutputMode,
    SizePolicy, SubgraphView,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

const DEFAULT_GRAPH_PATH: &str = "idiom_graph.json";

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "idiograph", about = "Decompose a co-occurrence graph into study subgraphs.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Extract subgraphs from a co-occurrence graph file.
    Extract(ExtractCommand),
}

/// Options accepted by the `extract` command.
#[derive(Debug, Args, Clone)]
pub struct ExtractCommand {
    /// Path to the co-occurrence graph JSON file.
    #[arg(long = "graph", default_value = DEFAULT_GRAPH_PATH)]
    pub graph: PathBuf,

    /// Minimum weight an edge needs to survive filtering.
    #[arg(long = "min-weight", default_value_t = DEFAULT_MIN_WEIGHT)]
    pub min_weight: u64,

    /// Extraction flavour to run.
    #[command(subcommand)]
    pub flavour: ExtractFlavour,
}

/// Extraction flavours supported by the driver.
#[derive(Debug, Subcommand, Clone)]
pub enum ExtractFlavour {
    /// Write every component larger than a threshold to its own file.
    Large(LargeArgs),
    /// Merge mid-sized neighbour clusters into a single file.
    Clusters(ClustersArgs),
    /// Merge all components of one exact size into a single file.
    Trios(TriosArgs),
}

/// Large-component extraction arguments.
#[derive(Debug, Args, Clone)]
pub struct LargeArgs {
    /// Keep components with strictly more nodes than this.
    #[arg(long = "min-size", default_value_t = 10)]
    pub min_size: usize,

    /// Output file prefix; files are numbered from 1.
    #[arg(long = "output-prefix", default_value = "large_subgraph_")]
    pub output_prefix: String,
}

/// Neighbour-cluster extraction arguments.
#[derive(Debug, Args, Clone)]
pub struct ClustersArgs {
    /// Keep components with strictly more nodes than this.
    #[arg(long, default_value_t = 5)]
    pub lower: usize,

    /// Keep components with strictly fewer nodes than this.
    #[arg(long, default_value_t = 11)]
    pub upper: usize,

    /// Output file for the merged view.
    #[arg(long, default_value = "idioms_hexas.json")]
    pub output: PathBuf,
}

/// Trio extraction arguments.
#[derive(Debug, Args, Clone)]
pub struct TriosArgs {
    /// Keep components with exactly this many nodes.
    #[arg(long, default_value_t = 3)]
    pub size: usize,

    /// Output file for the merged view.
    #[arg(long, default_value = "idioms_trios.json")]
    pub output: PathBuf,
}

impl ExtractFlavour {
    /// Size policy and output mode this flavour configures the engine with.
    pub(super) fn configuration(&self) -> (SizePolicy, OutputMode) {
        match self {
            Self::Large(args) => (
                SizePolicy::Minimum { min: args.min_size },
                OutputMode::Separate,
            ),
            Self::Clusters(args) => (
                SizePolicy::Range {
                    lower: args.lower,
                    upper: args.upper,
                },
                OutputMode::Merged,
            ),
            Self::Trios(args) => (SizePolicy::Exact { size: args.size }, OutputMode::Merged),
        }
    }

    /// Destination for each emitted view, in emission order.
    fn output_paths(&self, views: usize) -> Vec<PathBuf> {
        match self {
            Self::Large(args) => (1..=views)
                .map(|sequence| PathBuf::from(format!("{}{sequence}.json", args.output_prefix)))
                .collect(),
            Self::Clusters(args) => vec![args.output.clone()],
            Self::Trios(args) => vec![args.output.clone()],
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Large(_) => "large",
            Self::Clusters(_) => "clusters",
            Self::Trios(_) => "trios",
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// File I/O failed while reading or writing.
    #[error("failed to access `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The graph file did not hold the expected interchange format.
    #[error("failed to parse `{path}`: {source}")]
    Parse {
        /// Path of the malformed graph file.
        path: PathBuf,
        /// Underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },
    /// Serializing a subgraph view to disk failed.
    #[error("failed to write `{path}`: {source}")]
    Serialize {
        /// Destination that could not be written.
        path: PathBuf,
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
    /// Core engine rejected the configuration or the graph.
    #[error(transparent)]
    Core(#[from] DecomposeError),
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExtractionSummary {
    /// Graph file the subgraphs were extracted from.
    pub graph: PathBuf,
    /// Number of components that satisfied the size policy.
    pub selected_components: usize,
    /// Total nodes across the emitted views.
    pub nodes: usize,
    /// Total edges across the emitted views.
    pub edges: usize,
    /// Files written, in emission order; empty when nothing qualified.
    pub outputs: Vec<PathBuf>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading, decomposing, or writing fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use idiograph_cli::cli::{Cli, Command, ExtractCommand, ExtractFlavour, TriosArgs, run_cli};
/// # use tempfile::TempDir;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = TempDir::new()?;
/// let graph = dir.path().join("graph.json");
/// std::fs::write(
///     &graph,
///     r#"{"nodes": [{"id": "A"}, {"id": "B"}, {"id": "C"}],
///         "edges": [{"source": "A", "target": "B", "weight": 4},
///                   {"source": "B", "target": "C", "weight": 4}]}"#,
/// )?;
/// let cli = Cli {
///     command: Command::Extract(ExtractCommand {
///         graph,
///         min_weight: 3,
///         flavour: ExtractFlavour::Trios(TriosArgs {
///             size: 3,
///             output: dir.path().join("trios.json"),
///         }),
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.selected_components, 1);
/// assert_eq!(summary.nodes, 3);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExtractionSummary, CliError> {
    match cli.command {
        Command::Extract(extract) => {
            Span::current().record("command", field::display("extract"));
            extract_command(extract)
        }
    }
}

#[instrument(
    name = "cli.extract",
    err,
    skip(command),
    fields(graph = field::Empty, min_weight = field::Empty, flavour = field::Empty),
)]
pub(super) fn extract_command(command: ExtractCommand) -> Result<ExtractionSummary, CliError> {
    let span = Span::current();
    span.record("graph", field::display(command.graph.display()));
    span.record("min_weight", field::display(command.min_weight));
    span.record("flavour", field::display(command.flavour.label()));

    let (policy, mode) = command.flavour.configuration();
    let decomposer = DecomposerBuilder::new()
        .with_min_weight(command.min_weight)
        .with_policy(policy)
        .with_output_mode(mode)
        .build()?;

    let graph = load_graph(&command.graph)?;
    let result = decomposer.run(&graph)?;

    let outputs = write_outputs(&command.flavour, &result)?;
    let summary = ExtractionSummary {
        graph: command.graph,
        selected_components: result.selected_components(),
        nodes: result.views().iter().map(|view| view.nodes.len()).sum(),
        edges: result.views().iter().map(|view| view.edges.len()).sum(),
        outputs,
    };
    info!(
        selected = summary.selected_components,
        nodes = summary.nodes,
        edges = summary.edges,
        files = summary.outputs.len(),
        "extraction completed"
    );
    Ok(summary)
}

/// Writes the assembled views to disk, one file per view.
///
/// An empty selection writes nothing, so callers can branch on the returned
/// list rather than finding an empty `{nodes: [], edges: []}` file later.
fn write_outputs(
    flavour: &ExtractFlavour,
    result: &Decomposition,
) -> Result<Vec<PathBuf>, CliError> {
    if result.is_empty() {
        return Ok(Vec::new());
    }
    let paths = flavour.output_paths(result.views().len());
    for (path, view) in paths.iter().zip(result.views()) {
        write_view(path, view)?;
    }
    Ok(paths)
}

fn load_graph(path: &Path) -> Result<IdiomGraph, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_view(path: &Path, view: &SubgraphView) -> Result<(), CliError> {
    let file = File::create(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, view).map_err(|source| CliError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Renders the execution summary for human consumption.
///
/// # Errors
/// Propagates any [`io::Error`] raised by `writer`.
///
/// # Examples
/// ```
/// # use std::io::Cursor;
/// # use std::path::PathBuf;
/// # use idiograph_cli::cli::{ExtractionSummary, render_summary};
/// let summary = ExtractionSummary {
///     graph: PathBuf::from("idiom_graph.json"),
///     selected_components: 0,
///     nodes: 0,
///     edges: 0,
///     outputs: vec![],
/// };
/// let mut buffer = Cursor::new(Vec::new());
/// render_summary(&summary, &mut buffer)?;
/// let text = String::from_utf8(buffer.into_inner())?;
/// assert!(text.contains("no qualifying components"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render_summary(summary: &ExtractionSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "graph: {}", summary.graph.display())?;
    writeln!(writer, "components selected: {}", summary.selected_components)?;
    writeln!(writer, "nodes: {}", summary.nodes)?;
    writeln!(writer, "edges: {}", summary.edges)?;
    if summary.outputs.is_empty() {
        writeln!(writer, "no qualifying components; nothing written")?;
    } else {
        for path in &summary.outputs {
            writeln!(writer, "wrote {}", path.display())?;
        }
    }
    Ok(())
}
