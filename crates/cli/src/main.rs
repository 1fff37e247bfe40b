//! Restgen CLI
//!
//! Command-line interface for turning Swagger/OpenAPI documents into typed
//! Angular client code.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use restgen_common::{ApiModel, CanonicalAction, GeneratorConfig};
use restgen_generator::{generate_client, GenerationSummary};
use restgen_parser::{run_batch, FailurePolicy, FileSource, SwaggerParser};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "restgen")]
#[command(version, about = "Generate typed REST clients from Swagger/OpenAPI documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ./restgen.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a document and display the resolved services
    #[command(after_help = "EXAMPLES:\n  \
        # Summarize a Swagger 2.0 document\n  \
        restgen parse --spec petstore.json\n\n  \
        # Dump the resolved model as JSON\n  \
        restgen parse --spec petstore.yaml --json")]
    Parse {
        /// Path to the document
        #[arg(short, long)]
        spec: PathBuf,

        /// Print the resolved model as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a client from a single document
    #[command(after_help = "EXAMPLES:\n  \
        restgen generate \\\n    \
        --spec petstore.json \\\n    \
        --output ./src/app/services")]
    Generate {
        /// Path to the document
        #[arg(short, long)]
        spec: PathBuf,

        /// Output directory (defaults to the config's destinationDir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Rewrite existing hand-editable model files
        #[arg(long)]
        overwrite_models: bool,
    },

    /// Generate clients from several documents, one after another
    #[command(after_help = "EXAMPLES:\n  \
        # Documents listed in restgen.yaml\n  \
        restgen batch\n\n  \
        # Explicit documents, keep going past failures\n  \
        restgen batch \\\n    \
        --specs users.json,orders.yaml \\\n    \
        --output ./services \\\n    \
        --continue-on-error")]
    Batch {
        /// Comma-separated list of document paths (defaults to the config's documents)
        #[arg(short, long, value_delimiter = ',')]
        specs: Option<Vec<PathBuf>>,

        /// Output directory (defaults to the config's destinationDir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Record failed documents and continue with the next one
        #[arg(long)]
        continue_on_error: bool,

        /// Rewrite existing hand-editable model files
        #[arg(long)]
        overwrite_models: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Parse { spec, json } => {
            parse_command(spec.as_path(), json, cli.verbose)?;
        }
        Commands::Generate {
            spec,
            output,
            overwrite_models,
        } => {
            let output = output.unwrap_or_else(|| config.destination_dir.clone());
            generate_command(
                spec.as_path(),
                output.as_path(),
                overwrite_models || config.overwrite_models,
                cli.verbose,
            )?;
        }
        Commands::Batch {
            specs,
            output,
            continue_on_error,
            overwrite_models,
        } => {
            let documents = specs.unwrap_or_else(|| config.documents.clone());
            let output = output.unwrap_or_else(|| config.destination_dir.clone());
            batch_command(
                &documents,
                output.as_path(),
                FailurePolicy::from_continue_flag(continue_on_error || config.continue_on_error),
                overwrite_models || config.overwrite_models,
            )?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "restgen=debug" } else { "restgen=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    match path {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => {
            let cwd = std::env::current_dir().context("Failed to read working directory")?;
            GeneratorConfig::discover(&cwd).context("Failed to load restgen.yaml")
        }
    }
}

fn parse_document(spec_path: &Path) -> Result<ApiModel> {
    let parser = SwaggerParser::from_file(spec_path)
        .with_context(|| format!("Failed to load {}", spec_path.display()))?;
    parser
        .parse()
        .with_context(|| format!("Failed to resolve {}", spec_path.display()))
}

fn parse_command(spec_path: &Path, json: bool, verbose: bool) -> Result<()> {
    let model = parse_document(spec_path)?;

    if json {
        let rendered = model.to_json().context("Failed to serialize model")?;
        println!("{}", rendered);
        return Ok(());
    }

    println!("{} Parsing document: {}", "→".cyan(), spec_path.display());
    println!("\n{}", "✓ Parse successful!".green().bold());
    println!("\n{}", "Resolved model:".bold());
    if let Some(title) = &model.title {
        println!("  Title: {}", title.yellow());
    }
    println!("  Definitions: {}", model.registry.definition_count());
    println!("  Parameters: {}", model.registry.parameter_count());
    println!("  Services: {}", model.services.len());

    println!("\n{}", "Services:".bold());
    for service in &model.services {
        let actions: Vec<&str> = service
            .methods
            .keys()
            .map(|action: &CanonicalAction| action.as_str())
            .collect();
        println!("  • {} ({})", service.path.cyan(), actions.join(", "));
        if verbose {
            if let Some(id) = &service.id_parameter {
                println!("    Id: {}", id.resolved_name(&model.registry));
            }
            for path in &service.source_paths {
                println!("    From: {}", path);
            }
        }
    }

    print_diagnostics(&model);
    Ok(())
}

fn print_diagnostics(model: &ApiModel) {
    if model.diagnostics.is_empty() {
        return;
    }
    println!(
        "\n{} {} diagnostic(s)",
        "⚠".yellow(),
        model.diagnostics.len()
    );
    for diagnostic in model.diagnostics.iter() {
        println!("  {}", diagnostic.to_string().yellow());
    }
}

fn generate_command(
    spec_path: &Path,
    output: &Path,
    overwrite_models: bool,
    verbose: bool,
) -> Result<()> {
    println!(
        "{} Generating client from: {}",
        "→".cyan(),
        spec_path.display()
    );

    let model = parse_document(spec_path)?;
    println!(
        "{} Resolved {} services, {} definitions",
        "✓".green(),
        model.services.len(),
        model.registry.definition_count()
    );
    print_diagnostics(&model);

    println!("{} Writing client files...", "→".cyan());
    let summary =
        generate_client(model, output, overwrite_models).context("Failed to generate client")?;

    println!("\n{}", "✓ Generation complete!".green().bold());
    print_summary(output, &summary, verbose);
    Ok(())
}

fn print_summary(output: &Path, summary: &GenerationSummary, verbose: bool) {
    println!(
        "  {} files written to {}",
        summary.written.len(),
        output.display()
    );
    if !summary.skipped.is_empty() {
        println!("  {} existing models kept", summary.skipped.len());
    }
    if verbose {
        for path in &summary.written {
            println!("  📄 {}", path.display());
        }
    }
}

fn batch_command(
    documents: &[PathBuf],
    output: &Path,
    policy: FailurePolicy,
    overwrite_models: bool,
) -> Result<()> {
    if documents.is_empty() {
        anyhow::bail!("No documents given: pass --specs or list them in restgen.yaml");
    }

    let locations: Vec<String> = documents
        .iter()
        .map(|path| path.display().to_string())
        .collect();
    println!(
        "{} Processing {} documents into {}",
        "→".cyan(),
        locations.len(),
        output.display()
    );

    tracing::debug!(documents = locations.len(), ?policy, "starting batch");
    let report = run_batch(&FileSource, &locations, policy, |model| {
        let source = model.source.clone();
        let summary = generate_client(model, output, overwrite_models)?;
        println!(
            "  {} {} ({} files)",
            "✓".green(),
            source,
            summary.written.len()
        );
        Ok(())
    })
    .context("Batch aborted")?;

    for failure in &report.failures {
        println!(
            "  {} {}: {}",
            "✗".red(),
            failure.location,
            failure.error
        );
    }

    if report.is_clean() {
        println!("\n{}", "✓ Batch complete!".green().bold());
    } else {
        println!(
            "\n{} {} of {} documents failed",
            "⚠".yellow().bold(),
            report.failures.len(),
            locations.len()
        );
    }
    Ok(())
}
