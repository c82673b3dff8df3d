//! License lookup through the GitHub git trees/blobs API.
//!
//! One listing call shows every file at the repository root, so names can be
//! matched case-insensitively against a longer list than raw-URL guessing
//! could afford. Used only when credentials are available; anonymous API
//! access is limited to 50 requests per hour.

use std::time::Duration;

use serde::Deserialize;

use super::Fetcher;
use crate::error::ApiError;
use crate::models::{Credentials, RepositoryLocation, SUPPORTED_VCS};
use crate::resolver::{decode_base64, provider_for, GITHUB};

/// Candidate names in order of precedence, matched case-insensitively.
///
/// Ordering follows the go-license-detector dataset and pkg.go.dev's license
/// policy, preferring files with an actual copyright notice over verbatim
/// GPL copies.
pub const REPO_LICENSE_FILES: &[&str] = &[
    "NOTICE", // apache, must come first
    "NOTICE.txt",
    "LICENSE",
    "LICENSE.txt",
    "LICENSE.md",
    "LICENSE.markdown",
    "LICENSE.rst",
    "LICENCE",
    "LICENCE.txt",
    "LICENCE.md",
    "LICENCE.markdown",
    "LICENCE.rst",
    "COPYING",
    "COPYING.txt",
    "COPYRIGHT",
    "COPYRIGHT.txt",
    "MIT-LICENSE",
    "MIT-LICENSE.txt",
    "MIT-LICENCE",
    "MIT-LICENCE.txt",
];

#[derive(Debug, Deserialize)]
struct TreeResponse {
    #[serde(default)]
    tree: Vec<TreeEntry>,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
struct Blob {
    content: String,
    encoding: String,
}

/// Whether the API path applies to this repository at all.
pub fn is_github(gi: &RepositoryLocation) -> bool {
    gi.vcs == SUPPORTED_VCS && provider_for(gi).map(|p| p.prefix) == Some(GITHUB)
}

pub fn tree_url(gi: &RepositoryLocation) -> String {
    format!(
        "https://api.github.com/repos/{}/git/trees/HEAD",
        gi.path_under(GITHUB).unwrap_or_default()
    )
}

/// List the repository root at `HEAD` and fetch the highest-priority
/// license blob.
pub async fn license_from_tree<F: Fetcher>(
    fetcher: &F,
    creds: &Credentials,
    gi: &RepositoryLocation,
    delay: Duration,
) -> Result<String, ApiError> {
    // 5000 requests per hour once authenticated
    tokio::time::sleep(delay).await;

    let listing = fetcher
        .get(&tree_url(gi), Some(creds))
        .await
        .map_err(|source| ApiError::Listing {
            repo: gi.repo_root.clone(),
            source,
        })?;
    let response: TreeResponse = serde_json::from_str(&listing)?;

    let Some(entry) = pick_license_entry(&response.tree) else {
        return Err(ApiError::NoLicense);
    };

    let data = fetcher
        .get(&entry.url, Some(creds))
        .await
        .map_err(|source| ApiError::Blob {
            repo: gi.repo_root.clone(),
            source,
        })?;
    let blob: Blob = serde_json::from_str(&data)?;

    decode_blob(&blob)
}

fn pick_license_entry(tree: &[TreeEntry]) -> Option<&TreeEntry> {
    REPO_LICENSE_FILES.iter().find_map(|name| {
        tree.iter()
            .filter(|t| t.kind == "blob")
            .find(|t| t.path.eq_ignore_ascii_case(name))
    })
}

fn decode_blob(blob: &Blob) -> Result<String, ApiError> {
    if blob.encoding.eq_ignore_ascii_case("utf-8") {
        Ok(blob.content.trim().to_string())
    } else if blob.encoding.eq_ignore_ascii_case("base64") {
        Ok(decode_base64(&blob.content)?.trim().to_string())
    } else {
        Err(ApiError::UnknownEncoding(blob.encoding.clone()))
    }
}
