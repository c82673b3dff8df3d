//! Failure taxonomy for module lookup and license fetching.
//!
//! Transport errors only ever disqualify a single URL. Everything else is
//! reported per module by `main` and the run moves on to the next module.

use thiserror::Error;

/// A single GET that did not produce a body.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http status code {status} when downloading {url:?}")]
    Status { status: u16, url: String },
    #[error("request to {url:?} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Fetched content that could not be turned back into text.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("base64 decode error: {0}")]
    Base64(#[from] data_encoding::DecodeError),
}

/// No raw-content URL can be derived for the repository.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("vcs {0:?} not implemented")]
    UnsupportedVcs(String),
    #[error("repo {0:?} not supported (please open an issue)")]
    UnsupportedHost(String),
    #[error("gopkg.in parse error: cannot derive branch from {0:?}")]
    GopkgTemplate(String),
}

/// Discovery reached a host that answered but did not describe a module.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("unrecognised import {0:?} (no go-import meta tags)")]
    Unrecognised(String),
}

/// Failures on the GitHub tree/blob API path.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("trouble getting listing for {repo}: {source}")]
    Listing {
        repo: String,
        #[source]
        source: TransportError,
    },
    #[error("trouble getting blob for {repo}: {source}")]
    Blob {
        repo: String,
        #[source]
        source: TransportError,
    },
    #[error("json decode error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown encoding type {0:?}")]
    UnknownEncoding(String),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("no license found")]
    NoLicense,
}

impl ApiError {
    /// Whether the raw-URL strategy should still be tried after this error.
    ///
    /// An authoritative listing without a candidate, or a blob whose content
    /// cannot be decoded, ends the module. Transport and listing parse
    /// problems do not.
    pub fn falls_through(&self) -> bool {
        matches!(
            self,
            ApiError::Listing { .. } | ApiError::Blob { .. } | ApiError::Json(_)
        )
    }
}

/// Terminal failure to produce a license for one module.
#[derive(Debug, Error)]
pub enum LicenseError {
    #[error("no known license URL for module {module:?}: {source}")]
    Resolve {
        module: String,
        #[source]
        source: ResolveError,
    },
    #[error("error decoding {url:?}: {source}")]
    Decode {
        url: String,
        #[source]
        source: DecodeError,
    },
    #[error("api.github.com error: {0}")]
    Api(#[source] ApiError),
    #[error("no license found for module {0:?}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_fallthrough() {
        let listing = ApiError::Listing {
            repo: "https://github.com/example/foo".to_string(),
            source: TransportError::Status {
                status: 401,
                url: "https://api.github.com/repos/example/foo/git/trees/HEAD".to_string(),
            },
        };
        assert!(listing.falls_through());
        assert!(!ApiError::NoLicense.falls_through());
        assert!(!ApiError::UnknownEncoding("rot13".to_string()).falls_through());
    }

    #[test]
    fn test_messages_name_the_module() {
        let err = LicenseError::NotFound("example.org/foo".to_string());
        assert_eq!(err.to_string(), "no license found for module \"example.org/foo\"");

        let err = LicenseError::Resolve {
            module: "example.org/foo".to_string(),
            source: ResolveError::UnsupportedVcs("hg".to_string()),
        };
        assert!(err.to_string().contains("vcs \"hg\" not implemented"));
    }
}
