use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use serde_json::json;

use epm_crypto::ContentHasher;
use epm_manifest::{CompilationEvent, CompilationFileSources, CompilationResult, PackageInput};
use epm_sdk::{explorer_link, EpmConfig, LocalFiles, TracingStatusSink, Workbench};
use epm_types::ContentUri;

use crate::cli::*;

const DEFAULT_CONFIG: &str = "epm.toml";

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Hash(args) => cmd_hash(args, &cli.format),
        Command::Publish(args) => cmd_publish(args, &config, &cli.format).await,
        Command::Import(args) => cmd_import(args, &config, &cli.format).await,
        Command::Config(_) => cmd_config(&config),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EpmConfig> {
    match path {
        Some(path) => EpmConfig::load(path).with_context(|| format!("loading {}", path.display())),
        None if Path::new(DEFAULT_CONFIG).exists() => {
            EpmConfig::load(DEFAULT_CONFIG).context("loading epm.toml")
        }
        None => Ok(EpmConfig::default()),
    }
}

async fn workbench(config: &EpmConfig) -> anyhow::Result<Workbench> {
    Workbench::connect(config, Arc::new(LocalFiles::new(".")), Arc::new(TracingStatusSink))
        .await
        .context("connecting services")
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn cmd_hash(args: HashArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let content = std::fs::read(&args.file).with_context(|| format!("reading {}", args.file.display()))?;
    let id = ContentHasher::hash(&content);
    match format {
        OutputFormat::Json => println!("{}", json!({"file": args.file, "cid": id.to_string()})),
        OutputFormat::Text => println!("{}  {}", id.to_string().yellow(), args.file.display()),
    }
    Ok(())
}

async fn cmd_publish(args: PublishArgs, config: &EpmConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let sources: CompilationFileSources = read_json(&args.input)?;
    let result: CompilationResult = read_json(&args.output)?;

    let bench = workbench(config).await?;
    bench.on_compilation_finished(CompilationEvent {
        file_name: sources.target.clone().unwrap_or_default(),
        sources,
        compiler_version: String::new(),
        result: Some(result),
    })?;

    let mut input = PackageInput::new(args.name, args.package_version);
    if let Some(authors) = &args.authors { input = input.with_authors(authors); }
    if let Some(license) = args.license { input = input.with_license(license); }
    if let Some(description) = args.description { input = input.with_description(description); }
    if let Some(keywords) = &args.keywords { input = input.with_keywords(keywords); }
    if let Some(url) = args.documentation { input = input.with_documentation(url); }
    if let Some(url) = args.repository { input = input.with_repository(url); }
    if let Some(url) = args.website { input = input.with_website(url); }
    let selected = if args.select.is_empty() {
        bench.contract_types().into_keys().collect()
    } else {
        args.select
    };
    for name in selected {
        input = input.select(name);
    }

    let published = bench.generate_manifest(&input).await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&published)?),
        OutputFormat::Text => {
            println!("{} Published {}", "✓".green().bold(), published.package_name.bold());
            println!("  URI: {}", published.uri.to_string().yellow());
            println!("  Explorer: {}", explorer_link(&published.uri).blue());
        }
    }
    Ok(())
}

async fn cmd_import(args: ImportArgs, config: &EpmConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let uri = ContentUri::parse(&args.uri).with_context(|| format!("invalid URI {}", args.uri))?;
    let mut bench = workbench(config).await?;
    if let Some(root) = args.root {
        bench = bench.with_import_root(root);
    }

    let package = bench.import_manifest(&uri).await?;
    if args.write {
        for source in &package.sources {
            bench.import_source(&source.original_path).await?;
        }
    }

    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&package)?);
        return Ok(());
    }

    println!(
        "{} {} {}",
        "Package".bold(),
        package.manifest.package_name.bold(),
        package.manifest.version.dimmed()
    );
    for source in &package.sources {
        let marker = if args.write { "wrote".green() } else { "pending".yellow() };
        println!("  {} {} → {}", marker, source.original_path, source.new_path.bold());
    }
    for group in &package.deployments {
        println!("  {} {}", "chain".cyan(), group.chain.label().bold());
        for (alias, deployment) in &group.deployments {
            println!("    {} {} @ {}", alias, deployment.contract_type.dimmed(), deployment.address);
        }
    }
    Ok(())
}

fn cmd_config(config: &EpmConfig) -> anyhow::Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
