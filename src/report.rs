//! Stdout license blocks and stderr diagnostics.

use std::io::Write;

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

pub const DIVIDER_WIDTH: usize = 80;

/// Append one module's block: name, license text, divider, each followed by
/// a blank line.
pub fn write_entry<W: Write>(out: &mut W, module: &str, license: &str) -> Result<()> {
    let divider = "-".repeat(DIVIDER_WIDTH);
    write!(out, "{}\n\n{}\n\n{}\n\n", module, license.trim(), divider)?;
    out.flush()?;
    Ok(())
}

/// Progress and warning lines on stderr, drawn around an optional progress bar.
pub struct Diagnostics {
    bar: Option<ProgressBar>,
    quiet: bool,
}

impl Diagnostics {
    /// Plain stderr output; progress lines are dropped when `quiet`.
    pub fn new(quiet: bool) -> Self {
        Diagnostics { bar: None, quiet }
    }

    /// Stderr output with a progress bar over `total` modules.
    pub fn with_progress(total: usize) -> Result<Self> {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Ok(Diagnostics {
            bar: Some(bar),
            quiet: false,
        })
    }

    /// Start of work on a module.
    pub fn begin(&self, module: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(module.to_string());
        }
        if !self.quiet {
            self.line(format!("{} {}", ">".cyan(), module));
        }
    }

    /// Extra progress detail, dropped when quiet.
    pub fn note(&self, message: impl std::fmt::Display) {
        if !self.quiet {
            self.line(format!("  {}", message));
        }
    }

    /// End of work on a module, successful or not.
    pub fn finish_one(&self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    /// Non-fatal condition; always shown.
    pub fn warn(&self, message: impl std::fmt::Display) {
        self.line(format!("{} {}", "warning:".yellow().bold(), message));
    }

    /// A module that produced no license; always shown.
    pub fn fail(&self, message: impl std::fmt::Display) {
        self.line(format!("{} {}", "error:".red().bold(), message));
    }

    pub fn done(&self, resolved: usize, total: usize) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message("Done");
        }
        self.line(format!("resolved {} of {} modules", resolved, total));
    }

    fn line(&self, text: String) {
        match &self.bar {
            Some(bar) => bar.suspend(|| eprintln!("{}", text)),
            None => eprintln!("{}", text),
        }
    }
}
