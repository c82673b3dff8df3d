use crate::config::Settings;
use crate::error::LicenseError;
use crate::models::{RepositoryLocation, SourceBrowsing};
use crate::report::Diagnostics;
use crate::resolver::resolve_file_urls;

use super::{github, Fetcher};

/// License file names tried against raw-content hosts, in order. Matching is
/// as case-sensitive as the host is, and every name costs a request per
/// candidate URL, so the list is kept short.
pub const HTTP_LICENSE_FILES: &[&str] = &[
    "NOTICE", // apache, must come first
    "LICENSE",
    "LICENSE.txt",
    "LICENSE.md",
    "COPYING",
    "COPYING.txt",
    "COPYING.md",
];

/// Find the license text for `module`.
///
/// With GitHub credentials, a GitHub-hosted repository is first asked for
/// its file listing. A failed API call falls through to URL guessing; a
/// listing that contains no license file is final.
pub async fn get_license<F: Fetcher>(
    fetcher: &F,
    settings: &Settings,
    diagnostics: &Diagnostics,
    module: &str,
    gi: &RepositoryLocation,
    gs: Option<&SourceBrowsing>,
) -> Result<String, LicenseError> {
    if let Some(creds) = settings.github_credentials() {
        if github::is_github(gi) {
            match github::license_from_tree(fetcher, creds, gi, settings.throttle.api_delay()).await
            {
                Ok(license) => return Ok(license),
                Err(err) if err.falls_through() => {
                    diagnostics.warn(format!("api.github.com error: {}", err));
                }
                Err(err) => return Err(LicenseError::Api(err)),
            }
        }
    }

    try_license_files(fetcher, settings, module, gi, gs, HTTP_LICENSE_FILES).await
}

/// Try each file name in order, and each candidate URL for it, returning the
/// first body that fetches and decodes.
///
/// A failed GET only disqualifies that URL. Resolver and decode failures end
/// the whole attempt.
pub async fn try_license_files<F: Fetcher>(
    fetcher: &F,
    settings: &Settings,
    module: &str,
    gi: &RepositoryLocation,
    gs: Option<&SourceBrowsing>,
    files: &[&str],
) -> Result<String, LicenseError> {
    for file in files {
        // be a good citizen
        tokio::time::sleep(settings.throttle.file_delay()).await;

        let resolved = resolve_file_urls(gi, gs, file).map_err(|source| LicenseError::Resolve {
            module: module.to_string(),
            source,
        })?;

        for url in &resolved.urls {
            let Ok(data) = fetcher.get(url, None).await else {
                continue;
            };

            let text = resolved
                .decoder
                .decode(&data)
                .map_err(|source| LicenseError::Decode {
                    url: url.clone(),
                    source,
                })?;
            return Ok(text.trim().to_string());
        }
    }

    Err(LicenseError::NotFound(module.to_string()))
}
