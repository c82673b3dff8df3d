use std::sync::LazyLock;

use regex::Regex;

use crate::models::{RepositoryLocation, SourceBrowsing};

static GO_IMPORT: LazyLock<[Regex; 2]> = LazyLock::new(|| directive_patterns("go-import"));
static GO_SOURCE: LazyLock<[Regex; 2]> = LazyLock::new(|| directive_patterns("go-source"));

/// Extract the `go-import` directive from a `?go-get=1` response.
///
/// Returns `None` when no well-formed directive (exactly three tokens) is present.
pub fn parse_go_import(html: &str) -> Option<RepositoryLocation> {
    find_directive::<3>(html, &GO_IMPORT).map(|[import_prefix, vcs, repo_root]| {
        RepositoryLocation {
            import_prefix,
            vcs,
            repo_root,
        }
    })
}

/// Extract the `go-source` directive (exactly four tokens).
pub fn parse_go_source(html: &str) -> Option<SourceBrowsing> {
    find_directive::<4>(html, &GO_SOURCE).map(|[import_prefix, home, directory, file]| {
        SourceBrowsing {
            import_prefix,
            home,
            directory,
            file,
        }
    })
}

/// `<meta>` patterns for `name`, one per attribute order.
///
/// Parsing HTML with regex is wrong, but the tags are simple enough. Attribute
/// names are case-insensitive and `name`/`content` may come in either order
/// (git.sr.ht emits `content` first).
fn directive_patterns(name: &str) -> [Regex; 2] {
    let name_attr = format!(r#"name\s*=\s*"{}""#, regex::escape(name));
    let content_attr = r#"content\s*=\s*"(?P<content>[^"]*)""#;

    [
        format!(r#"(?i)<\s*meta\s+{}\s+{}\s*/?>"#, name_attr, content_attr),
        format!(r#"(?i)<\s*meta\s+{}\s+{}\s*/?>"#, content_attr, name_attr),
    ]
    .map(|pattern| Regex::new(&pattern).expect("meta tag pattern is valid"))
}

/// Find the first matching tag whose content has exactly `N`
/// whitespace-separated tokens.
fn find_directive<const N: usize>(html: &str, patterns: &[Regex; 2]) -> Option<[String; N]> {
    patterns.iter().find_map(|re| {
        re.captures_iter(html).find_map(|caps| {
            let tokens: Vec<String> = caps["content"]
                .split_whitespace()
                .map(str::to_string)
                .collect();
            <[String; N]>::try_from(tokens).ok()
        })
    })
}
