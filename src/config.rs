//! Configuration for the SWAN demo
//!
//! CLI arguments and environment variable handling using clap.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use crate::audit::AuditMode;

/// SWAN demo - site registry, access-node client and offer audit tools
#[derive(Parser, Debug, Clone)]
#[command(name = "swan-demo")]
#[command(about = "SWAN demo sites: offer audit trails and access-node calls")]
pub struct Args {
    /// Folder holding one sub-folder per site, named after its host
    #[arg(long, env = "SITES_DIR", default_value = "www")]
    pub sites_dir: PathBuf,

    /// Scheme used to reach access nodes
    #[arg(long, env = "SCHEME", default_value = "https")]
    pub scheme: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Access-node request timeout in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value = "30000")]
    pub request_timeout_ms: u64,

    /// JSON file listing registered OWID signers
    #[arg(long, env = "OWID_STORE")]
    pub owid_store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Load every site and report what was found
    Check,

    /// Render the audit table for an offer tree stored as JSON
    Audit {
        /// Offer tree file
        tree: PathBuf,

        #[arg(long, value_enum, default_value_t = Mode::Winner)]
        mode: Mode,

        /// OWID of the winning node; defaults to the first bid
        #[arg(long)]
        winner: Option<String>,
    },

    /// Ask a site's access node for a SWAN URL
    Url {
        /// Host of the calling site
        host: String,

        /// Access-node action, e.g. "update"
        #[arg(long, default_value = "update")]
        action: String,

        /// Path of the page making the request
        #[arg(long, default_value = "/")]
        path: String,

        /// Where the browser returns to; defaults to the page path
        #[arg(long)]
        return_url: Option<String>,
    },

    /// Render the page a site would serve for a path
    Page {
        host: String,

        /// Request target, e.g. "/index.html?stop"
        #[arg(default_value = "/")]
        target: String,

        /// Offer tree attached to the request
        #[arg(long)]
        offer: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Root to winner only
    Winner,
    /// Every participant
    Full,
}

impl From<Mode> for AuditMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Winner => AuditMode::WinnerPath,
            Mode::Full => AuditMode::FullTree,
        }
    }
}

impl Args {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.scheme != "http" && self.scheme != "https" {
            return Err(format!("SCHEME must be http or https, got '{}'", self.scheme));
        }

        if self.request_timeout_ms == 0 {
            return Err("REQUEST_TIMEOUT_MS must be greater than zero".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_and_subcommand() {
        let args = parse(&["swan-demo", "--scheme", "http", "audit", "tree.json", "--mode", "full"]);
        assert_eq!(args.scheme, "http");
        assert_eq!(args.request_timeout(), Duration::from_millis(30_000));
        match &args.command {
            Command::Audit { tree, mode, winner } => {
                assert_eq!(*tree, PathBuf::from("tree.json"));
                assert_eq!(AuditMode::from(*mode), AuditMode::FullTree);
                assert!(winner.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let args = parse(&["swan-demo", "--scheme", "ftp", "check"]);
        assert!(args.validate().is_err());

        let args = parse(&["swan-demo", "--scheme", "https", "--request-timeout-ms", "0", "check"]);
        assert!(args.validate().is_err());
    }
}
