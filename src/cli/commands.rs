//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - validate: check one step's declared output
//! - check: gate a range of steps over outputs already on disk

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// stepgate - validate agent outputs and gate a sequential pipeline
#[derive(Parser, Debug)]
#[command(name = "stepgate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate the declared output of a single step
    Validate {
        /// Step number
        step: u32,
    },

    /// Gate steps in order, stopping at the first critical issue
    Check {
        /// First step to gate
        #[arg(short, long, default_value_t = 1)]
        from: u32,

        /// Last step to gate (defaults to the configured final step)
        #[arg(short, long)]
        to: Option<u32>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validate() {
        let cli = Cli::parse_from(["stepgate", "validate", "3"]);
        assert!(matches!(cli.command, Commands::Validate { step: 3 }));
        assert!(!cli.is_verbose());
    }

    #[test]
    fn test_parse_check_defaults() {
        let cli = Cli::parse_from(["stepgate", "check"]);
        assert!(matches!(cli.command, Commands::Check { from: 1, to: None }));
    }

    #[test]
    fn test_parse_check_range_with_globals() {
        let cli = Cli::parse_from(["stepgate", "check", "--from", "2", "--to", "5", "-v", "-c", "p.yml"]);
        assert!(matches!(cli.command, Commands::Check { from: 2, to: Some(5) }));
        assert!(cli.is_verbose());
        assert_eq!(cli.config, Some(PathBuf::from("p.yml")));
    }
}
