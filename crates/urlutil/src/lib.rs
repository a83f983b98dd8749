//! Pure string functions over URLs: normalization, domain extraction, the admission filter,
//! and link extraction from raw HTML text.

use once_cell::sync::Lazy;
use regex::Regex;

const BAD_EXTENSIONS: &[&str] = &["xml", "php", "js", "jpg", "png"];

const RESERVED_NAMESPACES: &[&str] = &[
    "Special",
    "User_talk",
    "User",
    "Wikipedia_talk",
    "Template",
    "MediaWiki",
    "Talk",
    "Wikipedia",
    "Help",
    "File",
];

static ANCHOR_HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<a\s[^>]*href\s*=\s*"([^"]*)""#).unwrap());

/// Returns the host portion of `u`: the substring before the first `/` following an optional
/// `http://`/`https://` scheme prefix.
pub fn domain(u: &str) -> String {
    let without_scheme = strip_scheme(u);
    match without_scheme.find('/') {
        Some(idx) => without_scheme[..idx].to_string(),
        None => without_scheme.to_string(),
    }
}

fn strip_scheme(u: &str) -> &str {
    if let Some(rest) = u.strip_prefix("https://") {
        rest
    } else if let Some(rest) = u.strip_prefix("http://") {
        rest
    } else {
        u
    }
}

/// Appends `.html` unless `u` already ends with `.html` (case-insensitive).
pub fn add_html_extension(u: &str) -> String {
    if u.len() >= 5 && u[u.len() - 5..].eq_ignore_ascii_case(".html") {
        u.to_string()
    } else {
        format!("{u}.html")
    }
}

/// Strips the scheme and any leading/trailing `/` from `u`.
pub fn preprocess(u: &str) -> String {
    strip_scheme(u).trim_matches('/').to_string()
}

/// The admission filter: same domain as `seed`, no disallowed extension, no fragment, no
/// reserved wiki-namespace prefix, no query string.
pub fn is_allowed(seed: &str, u: &str) -> bool {
    if domain(u) != domain(seed) {
        return false;
    }
    if has_bad_extension(u) {
        return false;
    }
    if u.contains('#') {
        return false;
    }
    if u.contains('?') {
        return false;
    }
    if has_reserved_namespace(u) {
        return false;
    }
    true
}

fn has_bad_extension(u: &str) -> bool {
    BAD_EXTENSIONS
        .iter()
        .any(|ext| u.to_ascii_lowercase().ends_with(&format!(".{ext}")))
}

fn has_reserved_namespace(u: &str) -> bool {
    let lower = u.to_ascii_lowercase();
    RESERVED_NAMESPACES
        .iter()
        .any(|ns| lower.contains(&format!("/{}:", ns.to_ascii_lowercase())))
}

fn has_scheme(u: &str) -> bool {
    if let Some(idx) = u.find("://") {
        u[..idx].chars().all(|c| c.is_ascii_alphanumeric())
    } else {
        false
    }
}

fn rtrim_slash(u: &str) -> &str {
    u.trim_end_matches('/')
}

/// Extracts URLs from `<a href="...">` matches in `html`, resolving relative links against
/// `base` in priority order: `mailto:` dropped; `//host/...` -> `http://host/...`; `/path` ->
/// `domain(base) + /path` (dropped if `base` has no domain); otherwise ->
/// `rtrim(base,'/') + '/' + link`. Absolute URLs keep their scheme.
pub fn extract_links(base: &str, html: &str) -> Vec<String> {
    let mut out = Vec::new();
    for caps in ANCHOR_HREF.captures_iter(html) {
        let link = &caps[1];
        if link.starts_with("mailto:") {
            continue;
        }
        if let Some(resolved) = resolve_link(base, link) {
            out.push(resolved);
        }
    }
    out
}

fn resolve_link(base: &str, link: &str) -> Option<String> {
    if has_scheme(link) {
        return Some(link.to_string());
    }
    if let Some(rest) = link.strip_prefix("//") {
        return Some(format!("http://{rest}"));
    }
    if let Some(path) = link.strip_prefix('/') {
        let base_domain = domain(base);
        if base_domain.is_empty() {
            return None;
        }
        return Some(format!("{base_domain}/{path}"));
    }
    Some(format!("{}/{}", rtrim_slash(base), link))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_strips_scheme_and_path() {
        assert_eq!(domain("http://example.org/a/b"), "example.org");
        assert_eq!(domain("example.org/a"), "example.org");
        assert_eq!(domain("example.org"), "example.org");
    }

    #[test]
    fn add_html_extension_is_case_insensitive_on_existing_suffix() {
        assert_eq!(add_html_extension("a/b"), "a/b.html");
        assert_eq!(add_html_extension("a/b.html"), "a/b.html");
        assert_eq!(add_html_extension("a/b.HTML"), "a/b.HTML");
    }

    #[test]
    fn preprocess_strips_scheme_and_surrounding_slashes() {
        assert_eq!(preprocess("http://example.org/a/"), "example.org/a");
        assert_eq!(preprocess("/example.org/a/"), "example.org/a");
    }

    #[test]
    fn is_allowed_rejects_other_domain_bad_extension_fragment_namespace_query() {
        let seed = "example.org/a";
        assert!(is_allowed(seed, "example.org/b"));
        assert!(!is_allowed(seed, "other.org/c"));
        assert!(!is_allowed(seed, "example.org/image.jpg"));
        assert!(!is_allowed(seed, "example.org/b#frag"));
        assert!(!is_allowed(seed, "example.org/b?x=1"));
        assert!(!is_allowed(seed, "example.org/Special:Foo"));
    }

    #[test]
    fn is_allowed_rejects_reserved_namespace_case_insensitively() {
        let seed = "example.org/a";
        assert!(!is_allowed(seed, "example.org/special:Foo"));
        assert!(!is_allowed(seed, "example.org/SPECIAL:Foo"));
    }

    #[test]
    fn extract_links_handles_all_resolution_priorities() {
        let html = r#"
            <a href="mailto:a@b.com">mail</a>
            <a href="//other.org/d">proto-rel</a>
            <a href="/b">root-rel</a>
            <a href="c">rel</a>
            <a href="http://absolute.org/e">abs</a>
        "#;
        let links = extract_links("example.org/a", html);
        assert_eq!(
            links,
            vec![
                "http://other.org/d".to_string(),
                "example.org/b".to_string(),
                "example.org/a/c".to_string(),
                "http://absolute.org/e".to_string(),
            ]
        );
    }

    #[test]
    fn extract_links_drops_root_relative_when_base_has_no_domain() {
        let links = extract_links("", r#"<a href="/b">x</a>"#);
        assert!(links.is_empty());
    }
}
