//! Command-line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use khabari_domain::{ApiKeyLocation, EditorSection};

/// Interactive HTTP request composer and executor
#[derive(Parser, Debug)]
#[command(name = "khabari")]
#[command(author, version, about = "HTTP API client with tabs and history", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "KHABARI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory for tabs, history and saved requests
    #[arg(long, global = true, env = "KHABARI_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Keep state in memory only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Edit the active tab and send its request
    Send(SendArgs),

    /// Inspect or edit request history
    #[command(subcommand)]
    History(HistoryCommand),

    /// Inspect or edit saved requests
    #[command(subcommand)]
    Saved(SavedCommand),

    /// Manage open tabs
    #[command(subcommand)]
    Tabs(TabsCommand),
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// `[METHOD] URL`; the method defaults to the tab's current one
    #[arg(value_name = "METHOD URL", num_args = 1..=2, required = true)]
    pub target: Vec<String>,

    /// Header as `Name: value` (repeatable); `Name:` removes it
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Request body
    #[arg(short = 'd', long = "data")]
    pub body: Option<String>,

    /// Pretty-print a JSON body before storing it on the tab
    #[arg(long)]
    pub format_body: bool,

    /// Query parameter as `key=value` (repeatable)
    #[arg(short = 'q', long = "query", value_parser = parse_pair)]
    pub query: Vec<(String, String)>,

    /// Drop the tab's auth configuration
    #[arg(long, conflicts_with_all = ["bearer", "basic", "api_key"])]
    pub no_auth: bool,

    /// Bearer token
    #[arg(long, conflicts_with_all = ["basic", "api_key"])]
    pub bearer: Option<String>,

    /// Basic credentials as `user:password`
    #[arg(long, value_parser = parse_credentials, conflicts_with = "api_key")]
    pub basic: Option<(String, String)>,

    /// API key as `name=value`
    #[arg(long, value_parser = parse_pair)]
    pub api_key: Option<(String, String)>,

    /// Where the API key goes
    #[arg(long, value_enum, default_value_t = KeyLocation::Header)]
    pub api_key_in: KeyLocation,

    /// Also add the request to saved requests
    #[arg(long)]
    pub save: bool,

    /// Print response headers
    #[arg(short = 'i', long = "include")]
    pub include_headers: bool,
}

/// API key placement accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KeyLocation {
    /// Send as a header
    Header,
    /// Append to the query string
    Query,
}

impl From<KeyLocation> for ApiKeyLocation {
    fn from(location: KeyLocation) -> Self {
        match location {
            KeyLocation::Header => Self::Header,
            KeyLocation::Query => Self::Query,
        }
    }
}

/// Editor sections accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Section {
    /// Query parameter rows
    Params,
    /// Header rows
    Headers,
    /// Auth configuration
    Auth,
    /// Request body
    Body,
}

impl From<Section> for EditorSection {
    fn from(section: Section) -> Self {
        match section {
            Section::Params => Self::Params,
            Section::Headers => Self::Headers,
            Section::Auth => Self::Auth,
            Section::Body => Self::Body,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// List history, newest first
    List,
    /// Remove every history item
    Clear,
    /// Load a history item into the active tab
    Select {
        /// Position in `history list`
        index: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum SavedCommand {
    /// List saved requests
    List,
    /// Save the active tab, or the history item at INDEX
    Add {
        /// Position in `history list`
        index: Option<usize>,
    },
    /// Remove saved requests by request id
    Remove {
        /// Request id shown by `saved list`
        request_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TabsCommand {
    /// List open tabs
    List,
    /// Open a new tab
    New,
    /// Close a tab
    Close {
        /// Tab id
        id: String,
    },
    /// Activate a tab
    Select {
        /// Tab id
        id: String,
    },
    /// Focus an editor section of the active tab
    Section {
        /// Section to focus
        #[arg(value_enum)]
        section: Section,
    },
}

/// Parses `Name: value`.
pub fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected 'Name: value', got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in '{raw}'"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Parses `key=value`; the value may be empty.
pub fn parse_pair(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected 'key=value', got '{raw}'"))?;
    Ok((key.to_string(), value.to_string()))
}

/// Parses `user:password`.
pub fn parse_credentials(raw: &str) -> Result<(String, String), String> {
    raw.split_once(':')
        .map(|(user, password)| (user.to_string(), password.to_string()))
        .ok_or_else(|| format!("expected 'user:password', got '{raw}'"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn header_parsing() {
        assert_eq!(
            parse_header("Content-Type: application/json").unwrap(),
            ("Content-Type".to_string(), "application/json".to_string())
        );
        assert_eq!(
            parse_header("X-Time: 12:30").unwrap(),
            ("X-Time".to_string(), "12:30".to_string())
        );
        assert!(parse_header("no colon").is_err());
        assert!(parse_header(": value").is_err());
    }

    #[test]
    fn pair_and_credential_parsing() {
        assert_eq!(parse_pair("q=").unwrap(), ("q".to_string(), String::new()));
        assert_eq!(parse_pair("a=b=c").unwrap(), ("a".to_string(), "b=c".to_string()));
        assert!(parse_pair("novalue").is_err());
        assert_eq!(
            parse_credentials("user:pa:ss").unwrap(),
            ("user".to_string(), "pa:ss".to_string())
        );
    }

    #[test]
    fn send_arguments() {
        let cli = Cli::try_parse_from([
            "khabari",
            "send",
            "POST",
            "https://api.test/items",
            "-H",
            "X-Id: 1",
            "-d",
            "{}",
            "--api-key",
            "key=v",
            "--api-key-in",
            "query",
        ])
        .unwrap();
        let Command::Send(args) = cli.command else {
            unreachable!("parsed a different command");
        };
        assert_eq!(args.target, vec!["POST", "https://api.test/items"]);
        assert_eq!(args.headers, vec![("X-Id".to_string(), "1".to_string())]);
        assert_eq!(args.api_key_in, KeyLocation::Query);
    }

    #[test]
    fn body_and_auth_flags() {
        let cli = Cli::try_parse_from([
            "khabari",
            "send",
            "https://x.test",
            "-H",
            "X-Old:",
            "--format-body",
            "--no-auth",
        ])
        .unwrap();
        let Command::Send(args) = cli.command else {
            unreachable!("parsed a different command");
        };
        assert!(args.format_body);
        assert!(args.no_auth);
        assert_eq!(args.headers, vec![("X-Old".to_string(), String::new())]);

        let result = Cli::try_parse_from([
            "khabari", "send", "https://x.test", "--no-auth", "--bearer", "t",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn tabs_section_argument() {
        let cli = Cli::try_parse_from(["khabari", "tabs", "section", "body"]).unwrap();
        let Command::Tabs(TabsCommand::Section { section }) = cli.command else {
            unreachable!("parsed a different command");
        };
        assert_eq!(EditorSection::from(section), EditorSection::Body);
    }

    #[test]
    fn conflicting_auth_is_rejected() {
        let result = Cli::try_parse_from([
            "khabari", "send", "https://x.test", "--bearer", "t", "--basic", "u:p",
        ]);
        assert!(result.is_err());
    }
}
