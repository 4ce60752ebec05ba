use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dagcheck_core::{content_digest, Config, Report, Severity};
use dagcheck_dbt::{
    catalog_adapter, manifest_adapter, supported_catalog_versions, supported_manifest_versions,
    ProjectGraph,
};
use dagcheck_engine::InsightRunner;

/// dagcheck - insight checks over dbt project metadata
#[derive(Parser)]
#[command(name = "dagcheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: dagcheck.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every configured insight against the project graph
    Check {
        /// Path to dbt manifest.json
        #[arg(short = 'f', long, default_value = "target/manifest.json")]
        manifest: PathBuf,

        /// Path to dbt catalog.json (enables catalog insights)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Output file for report.json
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Also output markdown report
        #[arg(short, long)]
        markdown: Option<PathBuf>,
    },

    /// List the built-in insights
    ListInsights,

    /// Show the artifact schema versions this build understands
    Versions,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new("dagcheck.toml").exists() {
        Config::from_file(Path::new("dagcheck.toml"))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    match cli.command {
        Commands::Check { manifest, catalog, output, markdown } => check_command(
            config,
            &manifest,
            catalog.as_deref(),
            &output,
            markdown.as_deref(),
            cli.verbose,
        ),
        Commands::ListInsights => {
            list_insights_command(config);
            Ok(())
        }
        Commands::Versions => {
            versions_command();
            Ok(())
        }
    }
}

/// A decoded artifact plus the digest of its raw bytes
struct Artifact {
    document: serde_json::Value,
    digest: String,
}

fn load_artifact(path: &Path) -> Result<Artifact> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document = serde_json::from_slice(&bytes)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    Ok(Artifact {
        document,
        digest: content_digest(&bytes),
    })
}

/// Check command - build the graph and evaluate insights
fn check_command(
    config: Config,
    manifest_path: &Path,
    catalog_path: Option<&Path>,
    output: &Path,
    markdown: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    if !manifest_path.exists() {
        return Err(anyhow::anyhow!(
            "Manifest not found at {}. Run 'dbt compile' or 'dbt build' first.",
            manifest_path.display()
        ));
    }

    if verbose {
        eprintln!("{} {}", "Loading manifest from:".cyan(), manifest_path.display());
    }
    let manifest = load_artifact(manifest_path)?;
    let manifest_digest = manifest.digest.clone();
    let manifest = manifest_adapter(manifest.document)?;

    let (catalog, catalog_digest) = match catalog_path {
        Some(path) => {
            if verbose {
                eprintln!("{} {}", "Loading catalog from:".cyan(), path.display());
            }
            let artifact = load_artifact(path)?;
            (Some(catalog_adapter(artifact.document)?), Some(artifact.digest))
        }
        None => (None, None),
    };

    if verbose {
        eprintln!("{}", "Building project graph...".cyan());
    }
    let graph = ProjectGraph::build(manifest.as_ref(), catalog)?;

    if verbose {
        eprintln!(
            "Graph has {} nodes and {} edges",
            graph.len(),
            graph.edge_count()
        );
    }

    let runner = InsightRunner::with_default_registry(config);
    let metadata = graph.metadata();
    let report = runner
        .run(&graph)?
        .with_timestamp()
        .with_metadata(json!({
            "dbt_version": metadata.dbt_version,
            "manifest_version": metadata.manifest_version,
            "catalog_version": metadata.catalog_version,
            "manifest_digest": manifest_digest,
            "catalog_digest": catalog_digest,
        }));

    report.save_to_file(output)?;

    if verbose {
        eprintln!("{} {}", "Report saved to:".green(), output.display());
    }

    if let Some(md_path) = markdown {
        std::fs::write(md_path, generate_markdown_report(&report))?;
        if verbose {
            eprintln!("{} {}", "Markdown report saved to:".green(), md_path.display());
        }
    }

    print_report_summary(&report);

    if report.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

fn list_insights_command(config: Config) {
    let runner = InsightRunner::with_default_registry(config);
    for meta in runner.insights() {
        let severity = runner
            .config()
            .severity
            .override_for(meta.alias)
            .unwrap_or(meta.default_severity);
        println!(
            "{} {} [{}, {}]",
            meta.alias.bold(),
            format!("({})", meta.name).dimmed(),
            meta.kind,
            severity
        );
        println!("    {}", meta.description);
    }
}

fn versions_command() {
    println!("{}", "Manifest schema versions:".bold());
    for version in supported_manifest_versions() {
        println!("  {}", version);
    }
    println!("{}", "Catalog schema versions:".bold());
    for version in supported_catalog_versions() {
        println!("  {}", version);
    }
}

fn print_report_summary(report: &Report) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "dbt Project Insight Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    if let Some(generated_at) = &report.generated_at {
        println!("Timestamp: {}", generated_at);
    }
    println!();

    println!("{}", "Summary:".bold());
    println!("  Nodes analyzed: {}", report.summary.nodes_analyzed);
    println!(
        "  Insights: {} run, {} skipped, {} failed",
        report.summary.insights_run, report.summary.insights_skipped, report.summary.insights_failed
    );
    println!("  Total findings: {}", report.summary.total);

    if report.summary.errors > 0 {
        println!("  Errors:   {}", report.summary.errors.to_string().red().bold());
    } else {
        println!("  Errors:   {}", report.summary.errors.to_string().green());
    }

    if report.summary.warnings > 0 {
        println!("  Warnings: {}", report.summary.warnings.to_string().yellow());
    } else {
        println!("  Warnings: {}", report.summary.warnings.to_string().green());
    }

    println!("  Info:     {}", report.summary.info);
    println!();

    if report.findings.is_empty() && report.is_complete() {
        println!("{}", "✓ No issues found!".green().bold());
    } else if report.findings.is_empty() {
        println!("{}", "No findings, but not every insight ran.".yellow());
    } else {
        println!("{}", "Findings:".bold());
        for finding in &report.findings {
            let severity_str = match finding.severity {
                Severity::Error => "ERROR".red().bold(),
                Severity::Warn => "WARN".yellow().bold(),
                Severity::Info => "INFO".cyan(),
            };

            println!("  [{}] {}: {}", severity_str, finding.alias, finding.message);
            if let Some(path) = &finding.path {
                println!("    at {}", path);
            }
            if !finding.recommendation.is_empty() {
                println!("    {}", finding.recommendation.dimmed());
            }
        }
    }

    if !report.skipped.is_empty() {
        println!();
        println!("{}", "Skipped:".bold());
        for skipped in &report.skipped {
            println!("  {} ({})", skipped.alias, skipped.reason);
        }
    }

    if !report.failures.is_empty() {
        println!();
        println!("{}", "Failed:".bold().red());
        for failure in &report.failures {
            println!("  {}: {}", failure.alias, failure.message);
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}

fn generate_markdown_report(report: &Report) -> String {
    let mut md = String::new();

    md.push_str("# dbt Project Insight Report\n\n");
    md.push_str(&format!("**Version:** {}\n\n", report.version));
    if let Some(generated_at) = &report.generated_at {
        md.push_str(&format!("**Timestamp:** {}\n\n", generated_at));
    }

    md.push_str("## Summary\n\n");
    md.push_str(&format!("- Nodes analyzed: {}\n", report.summary.nodes_analyzed));
    md.push_str(&format!("- Total findings: {}\n", report.summary.total));
    md.push_str(&format!("- Errors: {}\n", report.summary.errors));
    md.push_str(&format!("- Warnings: {}\n", report.summary.warnings));
    md.push_str(&format!("- Info: {}\n", report.summary.info));
    md.push('\n');

    if report.findings.is_empty() && report.is_complete() {
        md.push_str("✅ **No issues found!**\n\n");
    } else if report.findings.is_empty() {
        md.push_str("**No findings, but not every insight ran.**\n\n");
    } else {
        md.push_str("## Findings\n\n");

        for finding in &report.findings {
            let severity_emoji = match finding.severity {
                Severity::Error => "❌",
                Severity::Warn => "⚠️",
                Severity::Info => "ℹ️",
            };

            md.push_str(&format!(
                "### {} {} - {}\n\n",
                severity_emoji, finding.severity, finding.insight
            ));
            md.push_str(&format!("{}\n\n", finding.message));

            if let Some(path) = &finding.path {
                md.push_str(&format!("**Location:** {}\n\n", path));
            }
            if !finding.recommendation.is_empty() {
                md.push_str(&format!("**Recommendation:** {}\n\n", finding.recommendation));
            }
        }
    }

    if !report.skipped.is_empty() {
        md.push_str("## Skipped Insights\n\n");
        for skipped in &report.skipped {
            md.push_str(&format!("- `{}`: {}\n", skipped.alias, skipped.reason));
        }
        md.push('\n');
    }

    if !report.failures.is_empty() {
        md.push_str("## Failed Insights\n\n");
        for failure in &report.failures {
            md.push_str(&format!("- `{}`: {}\n", failure.alias, failure.message));
        }
        md.push('\n');
    }

    md
}
