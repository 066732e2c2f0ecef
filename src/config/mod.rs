pub mod env_config;
pub mod toml_config;

pub use toml_config::AppConfig;

use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "portfolio-api")]
#[command(about = "REST API behind the portfolio site and its admin dashboard")]
pub struct ServerCli {
    #[arg(long, short, help = "TOML config file; environment variables are used when omitted")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Override the listening port")]
    pub port: Option<u16>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    #[default]
    Serve,
    /// Create the admin user from the configured credentials and exit
    SeedAdmin,
}

impl ServerCli {
    pub fn command(&self) -> Command {
        self.command.unwrap_or_default()
    }

    /// Resolves the application config from the file (if given) or the environment,
    /// then applies command-line overrides.
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::from_env()?,
        };

        if let Some(port) = self.port {
            config.server.port = port;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_serve() {
        let cli = ServerCli::parse_from(["portfolio-api"]);
        assert_eq!(cli.command(), Command::Serve);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parses_seed_admin_and_overrides() {
        let cli = ServerCli::parse_from([
            "portfolio-api",
            "--config",
            "portfolio.toml",
            "--port",
            "9000",
            "--verbose",
            "seed-admin",
        ]);
        assert_eq!(cli.command(), Command::SeedAdmin);
        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.config, Some(PathBuf::from("portfolio.toml")));
        assert!(cli.verbose);
    }
}
