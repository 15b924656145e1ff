use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rtve-scraper")]
#[command(about = "Scrape RTVE radio episode listings and the RNE programme catalog into CSV")]
pub struct Cli {
    /// TOML file with client and crawl settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Seconds to wait between consecutive requests
    #[arg(long, global = true)]
    pub delay: Option<f64>,

    /// User-Agent header to send
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Crawl a programme's episode listing and every episode page
    Episodes {
        /// Episode listing page (defaults to Discópolis)
        #[arg(long)]
        listing_url: Option<String>,

        /// CSV file to write
        #[arg(short, long, default_value = "discopolis_episodios.csv")]
        output: PathBuf,
    },

    /// Download the Radio Nacional programme catalog
    Programs {
        /// Catalog API endpoint
        #[arg(long)]
        api_url: Option<String>,

        /// CSV file to write
        #[arg(short, long, default_value = "rtve_programas.csv")]
        output: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episodes_defaults() {
        let cli = Cli::try_parse_from(["rtve-scraper", "episodes"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Episodes {
                listing_url: None,
                output: PathBuf::from("discopolis_episodios.csv"),
            }
        );
        assert!(cli.config.is_none());
        assert!(cli.delay.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "rtve-scraper",
            "programs",
            "--output",
            "out.csv",
            "--delay",
            "1.5",
            "--user-agent",
            "TestBot/0.1",
        ])
        .unwrap();

        assert_eq!(cli.delay, Some(1.5));
        assert_eq!(cli.user_agent.as_deref(), Some("TestBot/0.1"));
        assert_eq!(
            cli.command,
            Command::Programs {
                api_url: None,
                output: PathBuf::from("out.csv"),
            }
        );
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["rtve-scraper"]).is_err());
    }
}
