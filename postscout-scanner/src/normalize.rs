use url::Url;

/// Resolve an `href` found on `base` into a crawl key.
///
/// Returns `None` for in-page anchors, `mailto:` links, strings that do not
/// resolve against `base`, and anything whose hostname differs from
/// `seed_host`. The fragment is always stripped, so `/a` and `/a#top` map to
/// the same key.
pub fn normalize_link(href: &str, base: &Url, seed_host: &str) -> Option<Url> {
    if href.starts_with('#') || href.starts_with("mailto:") {
        return None;
    }

    let mut resolved = base.join(href).ok()?;

    if resolved.host_str() != Some(seed_host) {
        return None;
    }

    resolved.set_fragment(None);
    Some(resolved)
}

/// Parse a seed URL into the key format used for the frontier and visited set.
pub fn page_key(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim()).map_err(|e| format!("{}: {}", raw, e))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("{}: unsupported scheme '{}'", raw, url.scheme()));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(format!("{}: missing host", raw));
    }

    url.set_fragment(None);
    Ok(url)
}
