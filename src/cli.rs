use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "modlicense",
    about = "Write the license texts of a Go module's dependencies to stdout",
    version
)]
pub struct Cli {
    /// Modules to look up; taken as the complete list (their dependencies are
    /// not examined). Defaults to the build list from `go list -m all`.
    #[arg(value_name = "MODULE")]
    pub modules: Vec<String>,

    /// Go module directory to list dependencies from
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Config file [default: ./.modlicense/config.toml, fallback ~/.config/modlicense/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Do not append the Go standard library to the module list
    #[arg(long)]
    pub no_stdlib: bool,

    /// Only print warnings and failures
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["modlicense"]).unwrap();
        assert!(cli.modules.is_empty());
        assert_eq!(cli.dir, PathBuf::from("."));
        assert!(!cli.no_stdlib);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_explicit_modules() {
        let cli = Cli::try_parse_from([
            "modlicense",
            "--no-stdlib",
            "-q",
            "golang.org/x/text",
            "github.com/pkg/errors",
        ])
        .unwrap();
        assert_eq!(cli.modules, vec!["golang.org/x/text", "github.com/pkg/errors"]);
        assert!(cli.no_stdlib);
        assert!(cli.quiet);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["modlicense", "-x", "golang.org/x/text"]).is_err());
    }
}
