use crate::error::LookupError;
use crate::fetch::Fetcher;
use crate::models::{RepositoryLocation, SourceBrowsing};
use crate::report::Diagnostics;

use super::meta::{parse_go_import, parse_go_source};

/// Where a module's code lives, plus its source-browsing templates if the
/// host published them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovered {
    pub location: RepositoryLocation,
    pub source: Option<SourceBrowsing>,
}

fn discovery_url(path: &str) -> String {
    format!("https://{}?go-get=1", path)
}

/// The first three path segments, when the path is deeper than that.
///
/// `github.com/go-gl/glfw/v3.3/glfw` → `github.com/go-gl/glfw`
pub fn module_root(module: &str) -> Option<String> {
    let parts: Vec<&str> = module.split('/').collect();
    if parts.len() > 3 {
        Some(parts[..3].join("/"))
    } else {
        None
    }
}

/// Resolve `module` to its repository.
///
/// Transport failures fall back first to the module root, then to treating
/// the module path as a private git host path. A host that answers without
/// a `go-import` tag is an error.
pub async fn lookup<F: Fetcher>(
    fetcher: &F,
    diagnostics: &Diagnostics,
    module: &str,
) -> Result<Discovered, LookupError> {
    let mut response = fetcher.get(&discovery_url(module), None).await;

    if response.is_err() {
        if let Some(root) = module_root(module) {
            response = fetcher.get(&discovery_url(&root), None).await;
        }
    }

    let html = match response {
        Ok(html) => html,
        Err(err) => {
            // TODO: consult `go env GOPRIVATE` before trying the module root
            diagnostics.warn(format!(
                "{}; assuming private repository https://{}.git",
                err, module
            ));
            return Ok(Discovered {
                location: RepositoryLocation::private_guess(module),
                source: None,
            });
        }
    };

    let location =
        parse_go_import(&html).ok_or_else(|| LookupError::Unrecognised(module.to_string()))?;
    let source = parse_go_source(&html);

    Ok(Discovered { location, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::FakeFetcher;

    fn page(content: &str) -> String {
        format!(
            r#"<html><head><meta name="go-import" content="{}"></head></html>"#,
            content
        )
    }

    #[test]
    fn test_module_root() {
        assert_eq!(
            module_root("github.com/go-gl/glfw/v3.3/glfw").as_deref(),
            Some("github.com/go-gl/glfw")
        );
        assert_eq!(
            module_root("github.com/russross/blackfriday/v2").as_deref(),
            Some("github.com/russross/blackfriday")
        );
        assert_eq!(module_root("github.com/example/foo"), None);
        assert_eq!(module_root("example.org/bar"), None);
    }

    #[tokio::test]
    async fn test_direct_discovery() {
        let fetcher = FakeFetcher::new().with(
            "https://example.org/foo?go-get=1",
            &page("example.org/foo git https://github.com/example/foo"),
        );

        let found = lookup(&fetcher, &Diagnostics::new(true), "example.org/foo")
            .await
            .unwrap();
        assert_eq!(found.location.repo_root, "https://github.com/example/foo");
        assert_eq!(found.location.import_prefix, "example.org/foo");
        assert!(found.source.is_none());
        assert_eq!(fetcher.urls(), vec!["https://example.org/foo?go-get=1"]);
    }

    #[tokio::test]
    async fn test_source_directive_is_kept() {
        let html = r#"<meta name="go-import" content="gopkg.in/yaml.v3 git https://gopkg.in/yaml.v3">
<meta name="go-source" content="gopkg.in/yaml.v3 _ https://github.com/go-yaml/yaml/tree/v3.0.1{/dir} https://github.com/go-yaml/yaml/blob/v3.0.1{/dir}/{file}#L{line}">"#;
        let fetcher = FakeFetcher::new().with("https://gopkg.in/yaml.v3?go-get=1", html);

        let found = lookup(&fetcher, &Diagnostics::new(true), "gopkg.in/yaml.v3")
            .await
            .unwrap();
        let source = found.source.unwrap();
        assert_eq!(
            source.directory,
            "https://github.com/go-yaml/yaml/tree/v3.0.1{/dir}"
        );
    }

    #[tokio::test]
    async fn test_module_root_retry() {
        let fetcher = FakeFetcher::new().with(
            "https://github.com/go-gl/glfw?go-get=1",
            &page("github.com/go-gl/glfw git https://github.com/go-gl/glfw"),
        );

        let found = lookup(
            &fetcher,
            &Diagnostics::new(true),
            "github.com/go-gl/glfw/v3.3/glfw",
        )
        .await
        .unwrap();
        assert_eq!(found.location.repo_root, "https://github.com/go-gl/glfw");
        assert_eq!(
            fetcher.urls(),
            vec![
                "https://github.com/go-gl/glfw/v3.3/glfw?go-get=1",
                "https://github.com/go-gl/glfw?go-get=1",
            ]
        );
    }

    #[tokio::test]
    async fn test_private_guess_after_both_attempts_fail() {
        let fetcher = FakeFetcher::new();
        let found = lookup(&fetcher, &Diagnostics::new(true), "example.org/bar/baz/qux")
            .await
            .unwrap();
        assert_eq!(
            found.location,
            RepositoryLocation::private_guess("example.org/bar/baz/qux")
        );
        assert!(found.source.is_none());
        assert_eq!(fetcher.urls().len(), 2);
    }

    #[tokio::test]
    async fn test_private_guess_for_short_path() {
        let fetcher = FakeFetcher::new();
        let found = lookup(&fetcher, &Diagnostics::new(true), "example.org/bar")
            .await
            .unwrap();
        assert_eq!(found.location.repo_root, "https://example.org/bar.git");
        assert_eq!(found.location.vcs, "git");
        assert_eq!(fetcher.urls(), vec!["https://example.org/bar?go-get=1"]);
    }

    #[tokio::test]
    async fn test_response_without_directive_is_error() {
        let fetcher = FakeFetcher::new().with(
            "https://example.org/foo?go-get=1",
            "<html><body>parked domain</body></html>",
        );
        let err = lookup(&fetcher, &Diagnostics::new(true), "example.org/foo")
            .await
            .unwrap_err();
        assert!(matches!(&err, LookupError::Unrecognised(m) if m == "example.org/foo"));
    }
}
