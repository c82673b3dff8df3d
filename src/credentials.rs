//! Credentials from the user's `.netrc`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::Credentials;

pub const GITHUB_HOST: &str = "github.com";

/// `$NETRC`, falling back to `~/.netrc`.
pub fn netrc_path() -> Option<PathBuf> {
    match std::env::var_os("NETRC") {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => dirs::home_dir().map(|home| home.join(".netrc")),
    }
}

/// Read the entry for `host`. A missing file means no credentials.
pub fn load_credentials(path: &Path, host: &str) -> Result<Option<Credentials>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!(".netrc read error: {}", path.display()))
        }
    };
    Ok(parse_netrc(&content, host))
}

#[derive(Default)]
struct Entry {
    machine: Option<String>,
    login: String,
    password: String,
}

/// Find the `machine <host>` entry and return its login/password.
///
/// `default` entries are not consulted; `macdef` bodies run until the next
/// blank line and are skipped. Comments may start anywhere on a line, but a
/// `#` inside a token (such as a password) is kept.
pub fn parse_netrc(content: &str, host: &str) -> Option<Credentials> {
    let mut entries: Vec<Entry> = Vec::new();
    let mut pending: Option<String> = None;
    let mut in_macdef = false;

    for line in content.lines() {
        if in_macdef {
            if line.trim().is_empty() {
                in_macdef = false;
            }
            continue;
        }
        // a token starting with `#` comments out the rest of the line
        for token in line
            .split_whitespace()
            .take_while(|token| !token.starts_with('#'))
        {
            if let Some(key) = pending.take() {
                let Some(entry) = entries.last_mut() else {
                    continue;
                };
                match key.as_str() {
                    "machine" => entry.machine = Some(token.to_string()),
                    "login" => entry.login = token.to_string(),
                    "password" => entry.password = token.to_string(),
                    _ => {}
                }
                continue;
            }

            match token {
                "machine" => {
                    entries.push(Entry::default());
                    pending = Some(token.to_string());
                }
                "default" => entries.push(Entry::default()),
                "login" | "password" | "account" => pending = Some(token.to_string()),
                "macdef" => {
                    in_macdef = true;
                    break;
                }
                _ => {}
            }
        }
    }

    entries
        .into_iter()
        .find(|e| e.machine.as_deref() == Some(host))
        .map(|e| Credentials {
            username: e.login,
            token: e.password,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_single_line_entries() {
        let content = "machine gitlab.com login alice password one\n\
                       machine github.com login octocat password ghp_secret\n";
        let creds = parse_netrc(content, GITHUB_HOST).unwrap();
        assert_eq!(creds.username, "octocat");
        assert_eq!(creds.token, "ghp_secret");
    }

    #[test]
    fn test_parse_multi_line_entry_with_macdef() {
        let content = "\
# personal
default login anonymous password guest

machine example.org
  login bob
macdef init
  cd /pub
  login nobody

machine github.com
  login octocat
  password ghp_secret
";
        let creds = parse_netrc(content, GITHUB_HOST).unwrap();
        assert_eq!(creds.username, "octocat");
        assert_eq!(creds.token, "ghp_secret");
    }

    #[test]
    fn test_trailing_comment_is_ignored() {
        let content = "machine github.com login octocat password ghp_secret # login for ci\n";
        let creds = parse_netrc(content, GITHUB_HOST).unwrap();
        assert_eq!(creds.username, "octocat");
        assert_eq!(creds.token, "ghp_secret");
    }

    #[test]
    fn test_hash_inside_password_is_kept() {
        let content = "machine github.com\n  login octocat # ci bot\n  password ghp#secret\n";
        let creds = parse_netrc(content, GITHUB_HOST).unwrap();
        assert_eq!(creds.username, "octocat");
        assert_eq!(creds.token, "ghp#secret");
    }

    #[test]
    fn test_missing_host() {
        let content = "machine gitlab.com login alice password one\n";
        assert!(parse_netrc(content, GITHUB_HOST).is_none());
        assert!(parse_netrc("default login a password b", GITHUB_HOST).is_none());
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent-netrc");
        assert!(load_credentials(&path, GITHUB_HOST).unwrap().is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "machine github.com login octocat password ghp_secret").unwrap();
        let creds = load_credentials(f.path(), GITHUB_HOST).unwrap().unwrap();
        assert!(creds.is_set());
    }
}
