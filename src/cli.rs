use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "brandprofiler")]
#[command(about = "Generates brand profiles for lead-list businesses from website scrapes with a search fallback")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Create the default configuration file at ./config/brandprofiler.toml
    #[arg(long, global = true)]
    pub init: bool,

    /// Lead sheet CSV file
    #[arg(long, default_value = "leads.csv", global = true)]
    pub input: String,

    /// Directory for generated profiles and the checkpoint file
    #[arg(long, default_value = "profiles", global = true)]
    pub output_dir: String,

    /// Configuration file (defaults to ./config/brandprofiler.toml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Verbose logging (-v for per-source detail, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show every lead with its processing status
    List,

    /// Generate the profile for one business (case-insensitive name substring)
    Generate {
        /// Company name, or any part of it
        name: String,
    },

    /// Force re-generation for one business, overwriting its profile
    Reset {
        /// Company name, or any part of it
        name: String,
    },

    /// Generate every pending profile that has a website and passes the rating floor
    All {
        /// Override the configured minimum rating
        #[arg(long)]
        min_rating: Option<f64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_generate_with_name() {
        let cli = Cli::try_parse_from(["brandprofiler", "generate", "Owl Cleaning"]).unwrap();
        match cli.command {
            Some(Commands::Generate { name }) => assert_eq!(name, "Owl Cleaning"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parses_all_with_min_rating() {
        let cli = Cli::try_parse_from(["brandprofiler", "all", "--min-rating", "4.0"]).unwrap();
        match cli.command {
            Some(Commands::All { min_rating }) => assert_eq!(min_rating, Some(4.0)),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_with_subcommand() {
        let cli = Cli::try_parse_from([
            "brandprofiler",
            "list",
            "--input",
            "other.csv",
            "--output-dir",
            "out",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.input, "other.csv");
        assert_eq!(cli.output_dir, "out");
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Some(Commands::List)));
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["brandprofiler", "list"]).unwrap();
        assert_eq!(cli.input, "leads.csv");
        assert_eq!(cli.output_dir, "profiles");
        assert_eq!(cli.verbose, 0);
        assert!(!cli.init);
    }
}
