//! CLI commands and argument parsing

use crate::auth::ApiVersion;
use crate::config::PartialSettings;
use crate::report::OutputFormat;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Query organization networks from a cloud director API
#[derive(Parser, Debug)]
#[command(name = "vcd-netquery")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (YAML)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// API server root URL
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Login user name
    #[arg(short, long, global = true)]
    pub username: Option<String>,

    /// Login organization
    #[arg(long, global = true)]
    pub org: Option<String>,

    /// API version, e.g. 29.0
    #[arg(long, global = true)]
    pub api_version: Option<ApiVersion>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Page through an organization's networks and report them
    Networks {
        /// Organization whose networks are listed
        #[arg(short, long)]
        target_org: Option<String>,

        /// Records per page
        #[arg(long)]
        page_size: Option<u32>,

        /// Query type
        #[arg(long)]
        query_type: Option<String>,

        /// Filter expression (defaults to orgName==<target-org>)
        #[arg(long)]
        filter: Option<String>,

        /// Report a failed login or page and keep going instead of aborting
        #[arg(long)]
        continue_on_error: bool,

        /// Output format
        #[arg(short, long, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,

        /// Dump every field of every record
        #[arg(long)]
        dump: bool,
    },

    /// Open and close a session
    Check,

    /// Print the effective settings
    Config,
}

impl Commands {
    /// Subcommand name as typed
    pub fn name(&self) -> &'static str {
        match self {
            Self::Networks { .. } => "networks",
            Self::Check => "check",
            Self::Config => "config",
        }
    }
}

impl Cli {
    /// Settings given on the command line
    pub fn overrides(&self) -> PartialSettings {
        let mut overrides = PartialSettings {
            server: self.server.clone(),
            username: self.username.clone(),
            org: self.org.clone(),
            api_version: self.api_version,
            accept_invalid_certs: self.insecure.then_some(true),
            ..PartialSettings::default()
        };

        if let Commands::Networks {
            target_org,
            page_size,
            query_type,
            filter,
            continue_on_error,
            ..
        } = &self.command
        {
            overrides.target_org.clone_from(target_org);
            overrides.page_size = *page_size;
            overrides.query_type.clone_from(query_type);
            overrides.filter.clone_from(filter);
            overrides.fail_fast = continue_on_error.then_some(false);
        }

        overrides
    }
}
