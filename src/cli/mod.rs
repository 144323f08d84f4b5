//! CLI interface for Salesdesk

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "salesdesk")]
#[command(version)]
#[command(
    about = "Session tokens and toast notifications for the sales desk dashboard",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new salesdesk.toml configuration file
    Init {
        /// Overwrite an existing file without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Generate CSRF tokens
    Token {
        /// How many tokens to generate
        #[arg(short, long, default_value = "1")]
        count: usize,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Start the application shell (HTTP API and notification stream)
    Serve {
        /// Host to bind to (defaults to the configured host)
        #[arg(long, env = "SALESDESK_HOST")]
        host: Option<String>,

        /// Port to listen on (defaults to the configured port)
        #[arg(short, long, env = "SALESDESK_PORT")]
        port: Option<u16>,
    },

    /// Print the effective configuration
    Config,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["salesdesk", "serve", "--port", "9000"]).unwrap();
        match cli.command {
            Commands::Serve { port, .. } => assert_eq!(port, Some(9000)),
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_token_defaults() {
        let cli = Cli::try_parse_from(["salesdesk", "token"]).unwrap();
        match cli.command {
            Commands::Token { count, format } => {
                assert_eq!(count, 1);
                assert!(matches!(format, OutputFormat::Text));
            }
            _ => panic!("expected token"),
        }
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
