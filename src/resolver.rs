//! Raw-content URLs for a single file in a module's repository.
//!
//! `git archive` is not widely served over HTTP, so each hosting provider
//! needs its own rule. Providers are matched by repository-root prefix in
//! [`PROVIDERS`] order; the first match wins.

use data_encoding::BASE64;

use crate::error::{DecodeError, ResolveError};
use crate::models::{RepositoryLocation, SourceBrowsing, SUPPORTED_VCS};

pub const GITHUB: &str = "https://github.com/";
const GITLAB: &str = "https://gitlab.com/";
const GOOGLESOURCE: &str = "https://go.googlesource.com/";
const SOURCEHUT: &str = "https://git.sr.ht/";
const GOPKG_IN: &str = "https://gopkg.in/";

/// How fetched bytes are turned into license text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoder {
    Identity,
    Base64,
}

impl Decoder {
    pub fn decode(self, raw: &str) -> Result<String, DecodeError> {
        match self {
            Decoder::Identity => Ok(raw.to_string()),
            Decoder::Base64 => decode_base64(raw),
        }
    }
}

/// Standard base64, ignoring embedded line breaks.
pub fn decode_base64(raw: &str) -> Result<String, DecodeError> {
    let compact: Vec<u8> = raw.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    let bytes = BASE64.decode(&compact)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Candidate URLs for one file, in the order they should be tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUrls {
    pub urls: Vec<String>,
    pub decoder: Decoder,
}

type ResolveFn =
    fn(&RepositoryLocation, Option<&SourceBrowsing>, &str) -> Result<FileUrls, ResolveError>;

/// A hosting provider recognised by its repository-root prefix.
pub struct Provider {
    pub prefix: &'static str,
    resolve: ResolveFn,
}

impl Provider {
    pub fn matches(&self, gi: &RepositoryLocation) -> bool {
        gi.repo_root.starts_with(self.prefix)
    }
}

/// Registered providers in priority order.
pub static PROVIDERS: &[Provider] = &[
    Provider {
        prefix: GOOGLESOURCE,
        resolve: resolve_googlesource,
    },
    Provider {
        prefix: SOURCEHUT,
        resolve: resolve_sourcehut,
    },
    Provider {
        prefix: GOPKG_IN,
        resolve: resolve_gopkg_in,
    },
    Provider {
        prefix: GITHUB,
        resolve: resolve_github,
    },
    Provider {
        prefix: GITLAB,
        resolve: resolve_gitlab,
    },
];

/// First registered provider hosting `gi`, if any.
pub fn provider_for(gi: &RepositoryLocation) -> Option<&'static Provider> {
    PROVIDERS.iter().find(|p| p.matches(gi))
}

/// Map a repository and a file name to the URLs that may serve that file.
pub fn resolve_file_urls(
    gi: &RepositoryLocation,
    gs: Option<&SourceBrowsing>,
    file: &str,
) -> Result<FileUrls, ResolveError> {
    if gi.vcs != SUPPORTED_VCS {
        return Err(ResolveError::UnsupportedVcs(gi.vcs.clone()));
    }

    match provider_for(gi) {
        Some(provider) => (provider.resolve)(gi, gs, file),
        None => Err(ResolveError::UnsupportedHost(gi.repo_root.clone())),
    }
}

/// Gitiles only serves plain files as base64.
fn resolve_googlesource(
    gi: &RepositoryLocation,
    _gs: Option<&SourceBrowsing>,
    file: &str,
) -> Result<FileUrls, ResolveError> {
    Ok(FileUrls {
        urls: vec![format!(
            "{}/+/refs/heads/master/{}?format=text",
            gi.repo_root, file
        )],
        decoder: Decoder::Base64,
    })
}

fn resolve_sourcehut(
    gi: &RepositoryLocation,
    _gs: Option<&SourceBrowsing>,
    file: &str,
) -> Result<FileUrls, ResolveError> {
    let dir = gi.repo_root.strip_suffix(".git").unwrap_or(&gi.repo_root);
    Ok(FileUrls {
        urls: vec![format!("{}/blob/master/{}", dir, file)],
        decoder: Decoder::Identity,
    })
}

/// gopkg.in redirects to GitHub, but the branch carrying the minor version
/// is only exposed through the `go-source` directory template, e.g.
/// `https://github.com/natefinch/lumberjack/tree/v2.1{/dir}`.
fn resolve_gopkg_in(
    gi: &RepositoryLocation,
    gs: Option<&SourceBrowsing>,
    file: &str,
) -> Result<FileUrls, ResolveError> {
    let Some(gs) = gs else {
        return Err(ResolveError::GopkgTemplate(gi.repo_root.clone()));
    };

    let (owner, repo, branch) = gopkg_branch(&gs.directory)
        .ok_or_else(|| ResolveError::GopkgTemplate(gs.directory.clone()))?;

    Ok(FileUrls {
        urls: vec![format!(
            "https://raw.githubusercontent.com/{}/{}/{}/{}",
            owner, repo, branch, file
        )],
        decoder: Decoder::Identity,
    })
}

/// Split `https://github.com/OWNER/REPO/tree/BRANCH{...}` into its parts.
fn gopkg_branch(directory: &str) -> Option<(&str, &str, &str)> {
    let dir = directory.strip_prefix(GITHUB)?;
    let mut parts = dir.splitn(4, '/');
    let owner = parts.next()?;
    let repo = parts.next()?;
    let _tree = parts.next()?;
    let rest = parts.next()?;
    let idx = rest.find('{')?;
    Some((owner, repo, &rest[..idx]))
}

// Repositories may use either default branch name and there is no cheap way
// to tell which, so both are offered: `main` first, `master` second.

fn resolve_github(
    gi: &RepositoryLocation,
    _gs: Option<&SourceBrowsing>,
    file: &str,
) -> Result<FileUrls, ResolveError> {
    let dir = gi.path_under(GITHUB).unwrap_or_default();
    Ok(FileUrls {
        urls: vec![
            format!("https://raw.githubusercontent.com/{}/main/{}", dir, file),
            format!("https://raw.githubusercontent.com/{}/master/{}", dir, file),
        ],
        decoder: Decoder::Identity,
    })
}

fn resolve_gitlab(
    gi: &RepositoryLocation,
    _gs: Option<&SourceBrowsing>,
    file: &str,
) -> Result<FileUrls, ResolveError> {
    let dir = gi.repo_root.strip_suffix(".git").unwrap_or(&gi.repo_root);
    Ok(FileUrls {
        urls: vec![
            format!("{}/-/raw/main/{}", dir, file),
            format!("{}/-/raw/master/{}", dir, file),
        ],
        decoder: Decoder::Identity,
    })
}
