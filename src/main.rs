//! `modlicense` — collect the license texts of a Go module's dependencies.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`config::load_config`]) and GitHub credentials from `.netrc` ([`credentials`]).
//! 3. List modules from the command line or `go list` ([`modules`]).
//! 4. For each module, in order:
//!    - discover its repository via `?go-get=1` ([`discovery`]);
//!    - fetch its license text ([`fetch`]), using URL rules per host ([`resolver`]);
//!    - append a block to stdout ([`report`]).
//!
//! A module that fails is reported on stderr and skipped.

mod cli;
mod config;
mod credentials;
mod discovery;
mod error;
mod fetch;
mod models;
mod modules;
mod report;
mod resolver;

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use config::{load_config, Settings};
use credentials::{load_credentials, netrc_path, GITHUB_HOST};
use fetch::{Fetcher, HttpFetcher};
use models::Credentials;
use report::Diagnostics;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let dir = cli.dir.canonicalize().unwrap_or_else(|_| cli.dir.clone());
    let config = load_config(&dir, cli.config.as_deref())?;

    let early = Diagnostics::new(cli.quiet);
    let github = read_github_credentials(&early);
    if !github.as_ref().is_some_and(Credentials::is_set) {
        early.warn(
            "no credentials set for GitHub API -- modlicense may be slower and less accurate",
        );
    }

    let mut modules = if cli.modules.is_empty() {
        modules::list_modules(&dir)?
    } else {
        cli.modules.clone()
    };
    if config.modules.include_stdlib
        && !cli.no_stdlib
        && !modules.iter().any(|m| m == modules::GO_STDLIB)
    {
        modules.push(modules::GO_STDLIB.to_string());
    }
    modules.retain(|m| !config.modules.skip.contains(m));

    let settings = Settings::new(config.throttle.clone(), github);
    let fetcher = HttpFetcher::new(&config.http)?;
    let diagnostics = if cli.quiet {
        early
    } else {
        Diagnostics::with_progress(modules.len())?
    };

    let mut stdout = std::io::stdout().lock();
    let mut resolved = 0;

    for module in &modules {
        diagnostics.begin(module);
        if let Some(license) = resolve_module(&fetcher, &settings, &diagnostics, module).await {
            report::write_entry(&mut stdout, module, &license)?;
            resolved += 1;
        }
        diagnostics.finish_one();
    }

    diagnostics.done(resolved, modules.len());

    Ok(())
}

/// Credentials are optional; an unreadable `.netrc` only costs the API path.
fn read_github_credentials(diagnostics: &Diagnostics) -> Option<Credentials> {
    let path = netrc_path()?;
    match load_credentials(&path, GITHUB_HOST) {
        Ok(creds) => creds,
        Err(err) => {
            diagnostics.warn(format!("{:#}", err));
            None
        }
    }
}

/// Discover and fetch one module's license, reporting any failure.
async fn resolve_module<F: Fetcher>(
    fetcher: &F,
    settings: &Settings,
    diagnostics: &Diagnostics,
    module: &str,
) -> Option<String> {
    let found = match discovery::lookup(fetcher, diagnostics, module).await {
        Ok(found) => {
            diagnostics.note(format!("go-import {}", found.location));
            found
        }
        Err(err) => {
            diagnostics.fail(format!("unable to lookup module {:?}: {}", module, err));
            return None;
        }
    };

    match fetch::get_license(
        fetcher,
        settings,
        diagnostics,
        module,
        &found.location,
        found.source.as_ref(),
    )
    .await
    {
        Ok(license) => Some(license),
        Err(err) => {
            diagnostics.fail(format!(
                "unable to find a license for module {:?}: {}",
                module, err
            ));
            None
        }
    }
}
