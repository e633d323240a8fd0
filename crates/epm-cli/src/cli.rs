use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "epm",
    about = "epm: publish and import ethPM v2 packages",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (defaults to ./epm.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the content id of a file
    Hash(HashArgs),
    /// Build a manifest from solc output and store it
    Publish(PublishArgs),
    /// Fetch a manifest and list (or write) its sources
    Import(ImportArgs),
    /// Print the effective configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct HashArgs {
    pub file: PathBuf,
}

#[derive(Args)]
pub struct PublishArgs {
    /// solc standard-JSON input
    #[arg(long)]
    pub input: PathBuf,
    /// solc standard-JSON output
    #[arg(long)]
    pub output: PathBuf,
    #[arg(long)]
    pub name: String,
    #[arg(long = "version")]
    pub package_version: String,
    /// Comma separated
    #[arg(long)]
    pub authors: Option<String>,
    #[arg(long)]
    pub license: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Comma separated
    #[arg(long)]
    pub keywords: Option<String>,
    #[arg(long)]
    pub documentation: Option<String>,
    #[arg(long)]
    pub repository: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
    /// Contract types to include; every compiled one when omitted
    #[arg(long, value_delimiter = ',')]
    pub select: Vec<String>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// `ipfs://<cid>` or a bare CID
    pub uri: String,
    /// Directory imported sources go under
    #[arg(long)]
    pub root: Option<String>,
    /// Write every source instead of only listing them
    #[arg(long)]
    pub write: bool,
}

#[derive(Args)]
pub struct ConfigArgs {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hash() {
        let cli = Cli::try_parse_from(["epm", "hash", "Owned.json"]).unwrap();
        if let Command::Hash(args) = cli.command {
            assert_eq!(args.file, PathBuf::from("Owned.json"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_publish() {
        let cli = Cli::try_parse_from([
            "epm", "publish",
            "--input", "in.json", "--output", "out.json",
            "--name", "owned", "--version", "1.0.0",
            "--authors", "alice,bob", "--select", "Owned,Token",
        ])
        .unwrap();
        if let Command::Publish(args) = cli.command {
            assert_eq!(args.name, "owned");
            assert_eq!(args.package_version, "1.0.0");
            assert_eq!(args.authors.as_deref(), Some("alice,bob"));
            assert_eq!(args.select, ["Owned", "Token"]);
            assert!(args.license.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn publish_select_defaults_to_empty() {
        let cli = Cli::try_parse_from([
            "epm", "publish", "--input", "i", "--output", "o", "--name", "n", "--version", "1",
        ])
        .unwrap();
        if let Command::Publish(args) = cli.command {
            assert!(args.select.is_empty());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_import() {
        let cli = Cli::try_parse_from(["epm", "import", "ipfs://Qm", "--root", "vendor", "--write"]).unwrap();
        if let Command::Import(args) = cli.command {
            assert_eq!(args.uri, "ipfs://Qm");
            assert_eq!(args.root.as_deref(), Some("vendor"));
            assert!(args.write);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from(["epm", "config", "--config", "x.toml", "-v", "--format", "json"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert!(matches!(cli.format, OutputFormat::Json));
        assert!(matches!(cli.command, Command::Config(_)));
    }
}
