use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Download new podcast episodes from a list of feeds
#[derive(Parser, Debug)]
#[command(name = "pod-dl")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    Download everything new from podcast_sources.txt:
        pod-dl

    Use other source and memory files:
        pod-dl --src feeds.txt --mem seen.txt

    Download to a specific directory:
        pod-dl -o ~/Podcasts

    Mark everything as downloaded without fetching it:
        pod-dl --dry

    Show what would be downloaded:
        pod-dl -l

For persistent options, create a config with 'pod-dl config --init'")]
pub struct Cli {
    /// File with podcast sources, one feed URL per line
    #[arg(short, long = "src", value_name = "FILE")]
    pub src: Option<PathBuf>,

    /// Memory file with already downloaded episode links
    #[arg(short, long = "mem", value_name = "FILE")]
    pub mem: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, visible_alias = "dump", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Add links to the memory file without downloading any files
    #[arg(short, long = "dry")]
    pub dry: bool,

    /// List pending episodes without downloading
    #[arg(short, long)]
    pub list: bool,

    /// Do not write ID3 tags to downloaded files
    #[arg(long)]
    pub no_tags: bool,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output (-vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// JSON output for scripting
    #[arg(long)]
    pub json: bool,

    /// Config file path
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show configuration
    Config {
        /// Write a sample config file to the standard location
        #[arg(long)]
        init: bool,
    },

    /// Show version information
    Version,
}

impl Cli {
    /// Parse arguments and handle special cases
    pub fn parse_and_validate() -> Self {
        let mut cli = Self::parse();

        // Adjust verbosity based on quiet flag
        if cli.quiet {
            cli.verbose = 0;
        }

        cli
    }

    /// Get the effective log level
    pub fn get_log_level(&self) -> &str {
        if let Some(ref level) = self.log_level {
            level
        } else {
            match self.verbose {
                0 if self.quiet => "error",
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Progress bars only make sense for a human watching the terminal
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }

    /// Get configuration overrides from CLI arguments
    pub fn get_config_overrides(&self) -> crate::config::ConfigOverrides {
        crate::config::ConfigOverrides {
            source_list: self.src.clone(),
            memory_file: self.mem.clone(),
            download_dir: self.output.clone(),
            dry_run: self.dry,
            no_tags: self.no_tags,
            log_level: self.log_level.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "pod-dl", "-s", "feeds.txt", "-m", "seen.txt", "-o", "out", "-d", "-vv",
        ])
        .unwrap();

        assert_eq!(cli.src, Some(PathBuf::from("feeds.txt")));
        assert_eq!(cli.mem, Some(PathBuf::from("seen.txt")));
        assert_eq!(cli.output, Some(PathBuf::from("out")));
        assert!(cli.dry);
        assert_eq!(cli.get_log_level(), "trace");
    }

    #[test]
    fn test_long_flags_and_dump_alias() {
        let cli = Cli::try_parse_from(["pod-dl", "--dry", "--dump", "episodes", "--json"]).unwrap();
        assert!(cli.dry);
        assert_eq!(cli.output, Some(PathBuf::from("episodes")));
        assert!(!cli.show_progress());

        let overrides = cli.get_config_overrides();
        assert!(overrides.dry_run);
        assert_eq!(overrides.download_dir, Some(PathBuf::from("episodes")));
    }

    #[test]
    fn test_rejects_unknown_arguments() {
        assert!(Cli::try_parse_from(["pod-dl", "--bogus"]).is_err());
        assert!(Cli::try_parse_from(["pod-dl", "unexpected-positional"]).is_err());
    }

    #[test]
    fn test_config_subcommand() {
        let cli = Cli::try_parse_from(["pod-dl", "config", "--init"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Config { init: true })));
    }
}
