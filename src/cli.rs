use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Browse protobuf schemas and synthesize example payloads for their messages
#[derive(Parser, Debug, Clone)]
#[command(name = "protomock", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "PROTOMOCK_CONFIG", default_value = "protomock.toml")]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "PROTOMOCK_LOG_LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the messages and enums of the loaded schema files
    List(ListArgs),
    /// Print a mock payload for a message
    Mock(MockArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Schema descriptor files (replace the configured ones)
    pub schemas: Vec<String>,

    /// Print the listing as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct MockArgs {
    /// Schema descriptor files (replace the configured ones)
    pub schemas: Vec<String>,

    /// Message to synthesize, either `Name` or `package.Name`
    #[arg(short, long)]
    pub message: String,

    /// Package of the message; overrides a package given in --message
    #[arg(short, long)]
    pub package: Option<String>,

    /// Only look in the schema file with this path
    #[arg(short, long)]
    pub file: Option<String>,

    /// Print single-line JSON
    #[arg(long)]
    pub compact: bool,

    /// Reload and print again whenever a schema file changes
    #[arg(short, long)]
    pub watch: bool,
}

impl Command {
    pub fn schemas(&self) -> &[String] {
        match self {
            Command::List(args) => &args.schemas,
            Command::Mock(args) => &args.schemas,
        }
    }

    pub fn compact(&self) -> bool {
        matches!(self, Command::Mock(args) if args.compact)
    }
}

impl MockArgs {
    /// The `(package, name)` pair to look up.
    pub fn target(&self) -> (String, String) {
        let (package, name) = self
            .message
            .rsplit_once('.')
            .unwrap_or(("", self.message.as_str()));
        let package = self.package.as_deref().unwrap_or(package);
        (package.to_string(), name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["protomock", "list"]);
        assert_eq!(cli.config, PathBuf::from("protomock.toml"));
        assert!(cli.log_level.is_none());
        assert!(cli.command.schemas().is_empty());
        assert!(!cli.command.compact());
    }

    #[test]
    fn test_cli_mock_args() {
        let cli = Cli::parse_from([
            "protomock",
            "--config",
            "custom.toml",
            "--log-level",
            "debug",
            "mock",
            "a.json",
            "b.yaml",
            "--message",
            "shop.Order",
            "--file",
            "a.json",
            "--compact",
            "--watch",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert_eq!(cli.command.schemas(), ["a.json".to_string(), "b.yaml".to_string()]);
        assert!(cli.command.compact());
        let Command::Mock(args) = cli.command else {
            panic!("expected mock command");
        };
        assert_eq!(args.file, Some("a.json".to_string()));
        assert!(args.watch);
        assert_eq!(args.target(), ("shop".to_string(), "Order".to_string()));
    }

    #[test]
    fn test_mock_target() {
        let cli = Cli::parse_from(["protomock", "mock", "--message", "my.pkg.User"]);
        let Command::Mock(args) = cli.command else {
            panic!("expected mock command");
        };
        assert_eq!(args.target(), ("my.pkg".to_string(), "User".to_string()));

        let cli = Cli::parse_from(["protomock", "mock", "-m", "User", "-p", "app"]);
        let Command::Mock(args) = cli.command else {
            panic!("expected mock command");
        };
        assert_eq!(args.target(), ("app".to_string(), "User".to_string()));

        let cli = Cli::parse_from(["protomock", "mock", "-m", "shop.Order", "-p", "other"]);
        let Command::Mock(args) = cli.command else {
            panic!("expected mock command");
        };
        assert_eq!(args.target(), ("other".to_string(), "Order".to_string()));

        let cli = Cli::parse_from(["protomock", "mock", "-m", "Root"]);
        let Command::Mock(args) = cli.command else {
            panic!("expected mock command");
        };
        assert_eq!(args.target(), (String::new(), "Root".to_string()));
    }
}
