pub mod commands;
pub mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "brief")]
#[command(about = "RSS/article reader with text-to-speech", long_about = None, version)]
pub struct Cli {
    /// Configuration file (default: ~/.config/brief/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overrides the configured path
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Command to run once; starts the interactive shell when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Manage saved articles
    #[command(subcommand, visible_alias = "item")]
    Article(ArticleCommand),
    /// Manage RSS feed subscriptions
    #[command(subcommand, visible_alias = "rss")]
    Feed(FeedCommand),
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ArticleCommand {
    /// List all articles
    List,
    /// Read articles aloud (e.g. 1-3,5,7-10 or *)
    Read {
        #[arg(required = true)]
        selection: Vec<String>,
        /// Delete each article once it has been read
        #[arg(long)]
        after_read_delete: bool,
    },
    /// Open articles in a viewer
    Open {
        #[arg(required = true)]
        selection: Vec<String>,
    },
    /// Set the playback speed for this session
    SetSpeed {
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Delete articles (e.g. 2,4-6 or *)
    Delete {
        #[arg(required = true)]
        selection: Vec<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Download and save articles by URL
    Add {
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Export articles as JSON
    Export {
        #[arg(required = true)]
        selection: Vec<String>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum FeedCommand {
    /// List subscribed feeds
    List,
    /// Subscribe to feeds
    Add {
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Unsubscribe from feeds (e.g. 1,3 or *)
    Delete {
        #[arg(required = true)]
        selection: Vec<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Fetch new articles from feeds
    Fetch {
        /// Entries to consider per feed
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        count: u32,
        #[arg(required = true)]
        selection: Vec<String>,
    },
    /// Move a feed to another position
    Reorder { from: i64, to: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_fetch() {
        let cli = Cli::try_parse_from(["brief", "feed", "fetch", "3", "*"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Feed(FeedCommand::Fetch {
                count: 3,
                selection: vec!["*".into()]
            }))
        );
    }

    #[test]
    fn test_fetch_count_must_be_positive() {
        assert!(Cli::try_parse_from(["brief", "feed", "fetch", "0", "1"]).is_err());
    }

    #[test]
    fn test_aliases() {
        let cli = Cli::try_parse_from(["brief", "rss", "list"]).unwrap();
        assert_eq!(cli.command, Some(Command::Feed(FeedCommand::List)));

        let cli = Cli::try_parse_from(["brief", "item", "read", "1,3", "5-6", "--after-read-delete"])
            .unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Article(ArticleCommand::Read {
                selection: vec!["1,3".into(), "5-6".into()],
                after_read_delete: true,
            }))
        );
    }

    #[test]
    fn test_no_subcommand_means_shell() {
        let cli = Cli::try_parse_from(["brief", "--db", "/tmp/x.db"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
    }
}
