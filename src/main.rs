use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kintree::{
    config::Config,
    kinship::{extract_subtree, is_ancestor, is_relative, PersonGraph, PersonId},
    records::RecordParser,
    reports::{DotFormatter, JsonFormatter, ReportFormatter, ReportGenerator, TextFormatter},
    types::{QueryKind, QueryReport},
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "kintree")]
#[command(about = "Genealogy graph engine with depth-bounded kinship queries")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Person records file (defaults to the configured path)
    #[arg(short, long)]
    records: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a depth-bounded family tree around one person
    Extract {
        /// Record id of the tree root
        person: String,

        /// Traversal depth (defaults to the configured depth)
        #[arg(short, long)]
        depth: Option<usize>,

        /// Output format (json, text, dot)
        #[arg(short, long)]
        output: Option<String>,

        /// Output file path (defaults to stdout)
        #[arg(short = 'f', long)]
        output_file: Option<PathBuf>,
    },

    /// Test whether one person is an ancestor of another
    Ancestor {
        /// Record id of the candidate ancestor
        target: String,

        /// Record id of the person whose ancestry is searched
        person: String,

        /// Search depth (defaults to the configured depth)
        #[arg(short, long)]
        depth: Option<usize>,

        /// Output format (json, text)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Test whether two persons are blood relatives
    Relative {
        /// Record id of the first person
        person: String,

        /// Record id of the second person
        other: String,

        /// Search depth (defaults to the configured depth)
        #[arg(short, long)]
        depth: Option<usize>,

        /// Output format (json, text)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show statistics of the loaded records
    Stats,

    /// Initialize configuration file
    Init {
        /// Configuration file path
        #[arg(short = 'f', long, default_value = "kintree.yml")]
        config_file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level)?;

    let config = load_config(cli.config.as_ref())?;
    config.validate()?;

    let records_path = cli
        .records
        .clone()
        .unwrap_or_else(|| config.records.path.clone());

    match cli.command {
        Commands::Extract {
            person,
            depth,
            output,
            output_file,
        } => {
            extract_tree(&records_path, &person, depth, output, output_file, &config)?;
        }

        Commands::Ancestor {
            target,
            person,
            depth,
            output,
        } => {
            check_ancestor(&records_path, &target, &person, depth, output, &config)?;
        }

        Commands::Relative {
            person,
            other,
            depth,
            output,
        } => {
            check_relative(&records_path, &person, &other, depth, output, &config)?;
        }

        Commands::Stats => {
            show_stats(&records_path)?;
        }

        Commands::Init { config_file } => {
            init_config(config_file)?;
        }
    }

    Ok(())
}

/// Initialize tracing with the specified log level
fn init_tracing(log_level: &str) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(log_level))
        .context("Failed to create env filter")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true),
        )
        .with(env_filter)
        .init();

    Ok(())
}

/// Load configuration from file or fall back to environment overrides
fn load_config(config_path: Option<&PathBuf>) -> Result<Config> {
    if let Some(path) = config_path {
        if path.exists() {
            info!("Loading configuration from: {:?}", path);
            return Config::load_from_file(path)
                .with_context(|| format!("Failed to load config file: {:?}", path));
        }
        warn!("Configuration file not found: {:?}. Using defaults.", path);
    }

    Config::load_from_env()
}

fn load_graph(records_path: &PathBuf) -> Result<PersonGraph> {
    RecordParser::new(records_path).load()
}

/// Depth to use for a query, bounded by the configured maximum
fn effective_depth(requested: Option<usize>, config: &Config) -> usize {
    let depth = requested.unwrap_or(config.query.default_depth);
    if depth > config.query.max_depth {
        warn!(
            "Requested depth {} exceeds the configured maximum, using {}",
            depth, config.query.max_depth
        );
        config.query.max_depth
    } else {
        depth
    }
}

fn resolve_person(graph: &PersonGraph, external_id: &str) -> Result<PersonId> {
    graph
        .resolve(external_id)
        .with_context(|| format!("Person {} not found in the records", external_id))
}

fn formatter_for(format: &str) -> Result<Box<dyn ReportFormatter>> {
    match format.to_lowercase().as_str() {
        "json" => Ok(Box::new(JsonFormatter)),
        "text" => Ok(Box::new(TextFormatter)),
        "dot" => Ok(Box::new(DotFormatter)),
        _ => Err(anyhow::anyhow!("Unsupported format: {}", format)),
    }
}

/// Extract a depth-bounded tree and print or write it
fn extract_tree(
    records_path: &PathBuf,
    person: &str,
    depth: Option<usize>,
    output: Option<String>,
    output_file: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let mut graph = load_graph(records_path)?;
    let root = resolve_person(&graph, person)?;
    let depth = effective_depth(depth, config);

    info!("Extracting tree around {} at depth {}", person, depth);

    let root = extract_subtree(&mut graph, root, depth, |p| {
        let lifespan = p.lifespan();
        p.label = Some(if lifespan.is_empty() {
            p.name.clone()
        } else {
            format!("{} ({})", p.name, lifespan)
        });
    });

    let report = ReportGenerator::new().tree_report(&graph, root, depth);
    info!("Extracted {} persons", report.person_count);

    let format = output.unwrap_or_else(|| config.output.format.clone());
    let content = formatter_for(&format)?.format(&report)?;

    if let Some(path) = output_file {
        std::fs::write(&path, &content)
            .with_context(|| format!("Failed to write output to: {:?}", path))?;
        info!("Report written to: {:?}", path);
    } else {
        println!("{}", content);
    }

    Ok(())
}

/// Run the ancestor check and print the outcome
fn check_ancestor(
    records_path: &PathBuf,
    target: &str,
    person: &str,
    depth: Option<usize>,
    output: Option<String>,
    config: &Config,
) -> Result<()> {
    let graph = load_graph(records_path)?;
    let target_id = resolve_person(&graph, target)?;
    let person_id = resolve_person(&graph, person)?;
    let depth = effective_depth(depth, config);

    let outcome = is_ancestor(&graph, target_id, person_id, depth);
    let report = QueryReport::new(QueryKind::Ancestor, target, person, depth, outcome);

    output_query(&report, output.as_deref(), config, || {
        if outcome {
            format!("{} is an ancestor of {} (searched {} generations up)", target, person, depth)
        } else {
            format!("{} is not an ancestor of {} within {} generations", target, person, depth)
        }
    })
}

/// Run the blood-relative check and print the outcome
fn check_relative(
    records_path: &PathBuf,
    person: &str,
    other: &str,
    depth: Option<usize>,
    output: Option<String>,
    config: &Config,
) -> Result<()> {
    let mut graph = load_graph(records_path)?;
    let person_id = resolve_person(&graph, person)?;
    let other_id = resolve_person(&graph, other)?;
    let depth = effective_depth(depth, config);

    let outcome = is_relative(&mut graph, person_id, other_id, depth);
    let report = QueryReport::new(QueryKind::Relative, person, other, depth, outcome);

    output_query(&report, output.as_deref(), config, || {
        if outcome {
            format!("{} and {} are blood relatives (within {} steps)", person, other, depth)
        } else {
            format!("{} and {} are not blood relatives within {} steps", person, other, depth)
        }
    })
}

fn output_query<F>(
    report: &QueryReport,
    output: Option<&str>,
    config: &Config,
    text: F,
) -> Result<()>
where
    F: FnOnce() -> String,
{
    let format = output.unwrap_or(&config.output.format);
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(report)?),
        _ => println!("{}", text()),
    }
    Ok(())
}

/// Print statistics of the loaded records
fn show_stats(records_path: &PathBuf) -> Result<()> {
    let graph = load_graph(records_path)?;
    let stats = graph.statistics();

    println!("Records Statistics:");
    println!("  Persons: {}", stats.total_persons);
    println!("  Parent links: {}", stats.total_links);
    println!("  Founders (no recorded parents): {}", stats.founders);
    println!("  Childless: {}", stats.childless);
    println!("  Average degree: {:.2}", stats.average_degree);

    Ok(())
}

/// Initialize configuration file
fn init_config(config_file: PathBuf) -> Result<()> {
    if config_file.exists() {
        warn!("Configuration file already exists: {:?}", config_file);
        print!("Overwrite existing file? (y/N): ");
        use std::io::{self, Write};
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().to_lowercase().starts_with('y') {
            info!("Configuration initialization cancelled");
            return Ok(());
        }
    }

    Config::default()
        .save_to_file(&config_file)
        .with_context(|| format!("Failed to write configuration file: {:?}", config_file))?;

    info!("Configuration file created: {:?}", config_file);
    println!("Configuration file created: {:?}", config_file);
    println!("Edit this file to adjust depths, records path and output format.");

    Ok(())
}
