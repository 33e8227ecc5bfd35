pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "chatpress")]
#[command(about = "Turn shared ChatGPT conversations into PDFs", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/chatpress/config.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web UI
    Serve {
        /// Address to listen on (overrides the config file)
        #[arg(short, long)]
        bind: Option<String>,

        /// Open the UI in the default browser
        #[arg(long)]
        open: bool,
    },
    /// Check a share link and print its canonical form
    Validate {
        /// Share link to check
        url: String,
    },
    /// Extract a conversation as JSON
    Extract {
        /// Share link to extract
        url: String,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render a conversation to PDF
    Render(RenderArgs),
}

#[derive(Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: RenderSource,

    /// Where to write the PDF
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Leave out the "Extracted on" line
    #[arg(long)]
    pub no_metadata: bool,

    /// Use A4 paper instead of the configured page size
    #[arg(long)]
    pub a4: bool,

    /// Open the PDF once written
    #[arg(long)]
    pub open: bool,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct RenderSource {
    /// Extract from this share link first
    #[arg(long)]
    pub url: Option<String>,

    /// Read turns from a JSON file written by `extract`
    #[arg(long)]
    pub input: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_render_from_input() {
        let cli = Cli::try_parse_from([
            "chatpress",
            "render",
            "--input",
            "turns.json",
            "--no-metadata",
        ])
        .unwrap();

        match cli.command {
            Commands::Render(args) => {
                assert_eq!(args.source.input, Some(PathBuf::from("turns.json")));
                assert!(args.source.url.is_none());
                assert!(args.no_metadata);
                assert!(!args.a4);
                assert!(!args.open);
                assert!(args.output.is_none());
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_render_requires_exactly_one_source() {
        assert!(Cli::try_parse_from(["chatpress", "render"]).is_err());
        assert!(Cli::try_parse_from([
            "chatpress",
            "render",
            "--url",
            "https://chatgpt.com/share/abc",
            "--input",
            "turns.json",
        ])
        .is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from([
            "chatpress",
            "serve",
            "--config",
            "/tmp/chatpress.toml",
            "--bind",
            "0.0.0.0:9000",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/chatpress.toml")));
        match cli.command {
            Commands::Serve { bind, open } => {
                assert_eq!(bind.as_deref(), Some("0.0.0.0:9000"));
                assert!(!open);
            }
            _ => panic!("expected serve"),
        }
    }
}
