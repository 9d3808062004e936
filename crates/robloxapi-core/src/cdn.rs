//! Provenance checks for image URLs returned by the thumbnail API.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static CDN_HOST_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]{2}\.rbxcdn\.com$").expect("valid cdn host pattern"));

static CDN_PATH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/[A-Za-z0-9_\-./]+\.(?:png|jpe?g|webp)$").expect("valid cdn path pattern")
});

/// Checks whether a URL points to an image on the Roblox CDN.
///
/// The URL must use `https`, have a host like `tr.rbxcdn.com`, carry no
/// credentials, port, query or fragment, and have a path ending in an image
/// extension.
#[must_use]
pub fn is_roblox_cdn_url(candidate: &str) -> bool {
    let Ok(url) = Url::parse(candidate) else {
        return false;
    };

    url.scheme() == "https"
        && url.username().is_empty()
        && url.password().is_none()
        && url.port().is_none()
        && url.query().is_none()
        && url.fragment().is_none()
        && url.host_str().is_some_and(|h| CDN_HOST_PATTERN.is_match(h))
        && CDN_PATH_PATTERN.is_match(url.path())
        && !url.path().contains("//")
        && !candidate.contains(['?', '#'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_cdn_urls() {
        assert!(is_roblox_cdn_url(
            "https://tr.rbxcdn.com/30DAY-Avatar-7B1E1A9240F5DE0598D6FD97DBC8859F-Png/140/140/Avatar/Png/noFilter.png"
        ));
        assert!(is_roblox_cdn_url(
            "https://tr.rbxcdn.com/30DAY-Avatar-7B1E1A9240F5DE0598D6FD97DBC8859F-Png/140/140/Avatar/Png/noFilter.webp"
        ));
        assert!(is_roblox_cdn_url("https://t4.rbxcdn.com/abc/noFilter.jpeg"));
    }

    #[test]
    fn test_rejects_other_hosts_and_schemes() {
        assert!(!is_roblox_cdn_url("https://roblox.com/1234/"));
        assert!(!is_roblox_cdn_url("http://tr.rbxcdn.com/a/noFilter.png"));
        assert!(!is_roblox_cdn_url("https://tr.rbxcdn.com.evil.com/a/noFilter.png"));
        assert!(!is_roblox_cdn_url("https://evil.tr.rbxcdn.com/a/noFilter.png"));
        assert!(!is_roblox_cdn_url("not a url"));
    }

    #[test]
    fn test_rejects_query_fragment_port_and_credentials() {
        assert!(!is_roblox_cdn_url("https://tr.rbxcdn.com/a/noFilter.png?x=1"));
        assert!(!is_roblox_cdn_url("https://tr.rbxcdn.com/a/noFilter.png#top"));
        assert!(!is_roblox_cdn_url("https://tr.rbxcdn.com/a/noFilter.png?"));
        assert!(!is_roblox_cdn_url("https://tr.rbxcdn.com:8443/a/noFilter.png"));
        assert!(!is_roblox_cdn_url("https://user@tr.rbxcdn.com/a/noFilter.png"));
    }

    #[test]
    fn test_rejects_odd_paths() {
        assert!(!is_roblox_cdn_url("https://t0.rbxcdn.com///https://google.com/"));
        assert!(!is_roblox_cdn_url("https://tr.rbxcdn.com/a/noFilter"));
        assert!(!is_roblox_cdn_url("https://tr.rbxcdn.com/a/noFilter.svg"));
    }
}
