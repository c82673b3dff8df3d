/// The only version-control system the resolver knows how to fetch from.
pub const SUPPORTED_VCS: &str = "git";

/// Parsed `go-import` directive: where the code for an import path lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocation {
    pub import_prefix: String,
    pub vcs: String,
    pub repo_root: String,
}

impl RepositoryLocation {
    /// Guess for a module that could not be discovered: assume the module
    /// path is itself a git host path.
    pub fn private_guess(module: &str) -> Self {
        RepositoryLocation {
            import_prefix: module.to_string(),
            vcs: SUPPORTED_VCS.to_string(),
            repo_root: format!("https://{}.git", module),
        }
    }

    /// Repository root with the given host prefix and any trailing `.git` removed.
    pub fn path_under(&self, prefix: &str) -> Option<&str> {
        self.repo_root
            .strip_prefix(prefix)
            .map(|rest| rest.strip_suffix(".git").unwrap_or(rest))
    }
}

impl std::fmt::Display for RepositoryLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.import_prefix, self.vcs, self.repo_root)
    }
}

/// Parsed `go-source` directive. The directory and file fields are URL
/// templates containing `{...}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBrowsing {
    pub import_prefix: String,
    pub home: String,
    pub directory: String,
    pub file: String,
}

/// Basic-auth pair for the GitHub API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub token: String,
}

impl Credentials {
    /// Both halves must be present for the pair to be usable.
    pub fn is_set(&self) -> bool {
        !self.username.is_empty() && !self.token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_guess() {
        let gi = RepositoryLocation::private_guess("example.org/bar");
        assert_eq!(gi.import_prefix, "example.org/bar");
        assert_eq!(gi.vcs, "git");
        assert_eq!(gi.repo_root, "https://example.org/bar.git");
    }

    #[test]
    fn test_path_under_strips_git_suffix() {
        let gi = RepositoryLocation {
            import_prefix: "example.org/foo".to_string(),
            vcs: "git".to_string(),
            repo_root: "https://github.com/example/foo.git".to_string(),
        };
        assert_eq!(gi.path_under("https://github.com/"), Some("example/foo"));
        assert_eq!(gi.path_under("https://gitlab.com/"), None);
    }

    #[test]
    fn test_credentials_need_both_halves() {
        assert!(!Credentials::default().is_set());
        let half = Credentials {
            username: "octocat".to_string(),
            token: String::new(),
        };
        assert!(!half.is_set());
        let full = Credentials {
            username: "octocat".to_string(),
            token: "ghp_x".to_string(),
        };
        assert!(full.is_set());
    }
}
