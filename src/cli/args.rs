use std::path::PathBuf;

use clap::Parser;

use crate::Commands;

/// Main CLI application arguments and command structure
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "Write, search, pin, and keep notes offline."
)]
pub struct Cli {
    /// Path to the configuration file
    #[clap(short = 'c', long, value_parser)]
    pub config: Option<PathBuf>,

    /// Directory where notes are stored
    #[clap(long, value_parser)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output mode
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands for the simplenotes application
    #[clap(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_subcommand_takes_no_flags() {
        let cli = Cli::try_parse_from(["simplenotes", "config"]).unwrap();
        assert!(matches!(cli.command, Commands::Config));
        assert!(Cli::try_parse_from(["simplenotes", "config", "--show"]).is_err());
    }

    #[test]
    fn global_options_parse_before_subcommand() {
        let cli =
            Cli::try_parse_from(["simplenotes", "--data-dir", "/tmp/n", "-v", "list", "-n", "3"])
                .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/n")));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::List { limit: 3, .. }));
    }
}
