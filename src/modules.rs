use std::path::Path;
use std::process::Command;

use anyhow::{anyhow, bail, Context, Result};

/// The Go standard library's repository, listed alongside dependencies.
pub const GO_STDLIB: &str = "github.com/golang/go";

/// All modules in the build list of the module at `dir`, excluding those the
/// main module does not actually need (test-only or other-OS dependencies).
pub fn list_modules(dir: &Path) -> Result<Vec<String>> {
    let stdout = run_go(dir, &["list", "-m", "all"])?;
    let mut names = Vec::new();

    for name in parse_go_list(&stdout)? {
        let why = run_go(dir, &["mod", "why", "-m", "-vendor", &name])?;
        if is_required(&name, &why)? {
            names.push(name);
        }
    }

    Ok(names)
}

fn run_go(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("go")
        .args(args)
        .current_dir(dir)
        .output()
        .with_context(|| format!("running go {}", args.join(" ")))?;

    if !output.status.success() {
        return Err(anyhow!(
            "go {} error: {}: {}",
            args.first().copied().unwrap_or_default(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parse `go list -m all`: the first line is the main module, every other
/// line is `<path> <version>[ => <replacement>]`.
pub fn parse_go_list(stdout: &str) -> Result<Vec<String>> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        bail!("empty go list output");
    }

    trimmed
        .lines()
        .skip(1)
        .map(|line| match line.split_once(' ') {
            Some((name, _version)) if !name.is_empty() => Ok(name.to_string()),
            _ => Err(anyhow!("invalid go list output format (line {:?})", line)),
        })
        .collect()
}

/// Parse `go mod why -m -vendor <name>`.
///
/// The first line echoes `# <name>`. A parenthesised second line such as
/// `(main module does not need module golang.org/x/text)` means the module
/// is not needed; anything else is an import chain.
pub fn is_required(name: &str, stdout: &str) -> Result<bool> {
    let mut lines = stdout.lines();
    let (Some(header), Some(reason)) = (lines.next(), lines.next()) else {
        bail!("unexpected go why output format");
    };

    if header.trim() != format!("# {}", name) {
        bail!("unexpected go why output format");
    }

    let reason = reason.trim();
    let not_needed = reason.len() > 2 && reason.starts_with('(') && reason.ends_with(')');
    Ok(!not_needed)
}
