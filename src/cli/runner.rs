//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::Settings;
use crate::engine::QueryEngine;
use crate::error::Result;
use crate::http::HttpClient;
use crate::report::{OutputFormat, Reporter};
use anyhow::Context;
use std::io::{self, Write};
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the command to completion on a current-thread runtime.
    ///
    /// Failures carry the command name as context.
    pub fn run_blocking(&self) -> anyhow::Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to start async runtime")?;

        runtime
            .block_on(self.run())
            .with_context(|| format!("{} failed", self.cli.command.name()))
    }

    /// Run the CLI command, writing to stdout
    pub async fn run(&self) -> Result<()> {
        let mut stdout = io::stdout();
        self.run_with_output(&mut stdout).await
    }

    /// Run the CLI command, writing to `out`
    pub async fn run_with_output<W: Write>(&self, out: &mut W) -> Result<()> {
        match &self.cli.command {
            Commands::Networks { format, dump, .. } => self.networks(out, *format, *dump).await,
            Commands::Check => self.check(out).await,
            Commands::Config => self.show_config(out),
        }
    }

    /// Resolve settings from file, environment and flags
    fn settings(&self) -> Result<Settings> {
        let settings = Settings::load(self.cli.config.as_deref(), self.cli.overrides())?;
        debug!("Effective settings: {settings:?}");
        Ok(settings)
    }

    fn engine(settings: &Settings) -> Result<QueryEngine> {
        let client = HttpClient::with_config(settings.http_config())?;
        Ok(QueryEngine::new(client))
    }

    async fn networks<W: Write>(&self, out: &mut W, format: OutputFormat, dump: bool) -> Result<()> {
        let settings = self.settings()?;
        let config = settings.run_config()?;

        let report = Self::engine(&settings)?.run(&config).await?;

        Reporter::new(format).with_dump(dump).write(&report, out)
    }

    async fn check<W: Write>(&self, out: &mut W) -> Result<()> {
        let settings = self.settings()?;
        let config = settings.session_config();

        let scheme = Self::engine(&settings)?.check(&config).await?;

        writeln!(
            out,
            "Session OK: {}@{} on {} (API {}, {scheme} token)",
            settings.username, settings.org, settings.server, settings.api_version
        )?;
        Ok(())
    }

    fn show_config<W: Write>(&self, out: &mut W) -> Result<()> {
        let settings = self.settings()?;
        write!(out, "{}", settings.to_masked_yaml()?)?;
        Ok(())
    }
}
