//! Input transforms applied as the candidate types.

/// Uppercase the first character and lowercase the rest ("sMITH" → "Smith").
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Prefix `https://` when a non-empty value lacks an http(s) scheme.
///
/// Idempotent: an already-prefixed value is returned unchanged (trimmed).
pub fn ensure_url_scheme(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Trim and collapse internal runs of whitespace to a single space.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_names() {
        assert_eq!(capitalize_first("smith"), "Smith");
        assert_eq!(capitalize_first("sMITH"), "Smith");
        assert_eq!(capitalize_first("élodie"), "Élodie");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn url_prefix_is_idempotent() {
        let once = ensure_url_scheme("example.com");
        assert_eq!(once, "https://example.com");
        assert_eq!(ensure_url_scheme(&once), "https://example.com");
    }

    #[test]
    fn url_prefix_keeps_existing_schemes() {
        assert_eq!(ensure_url_scheme("http://x.dev"), "http://x.dev");
        assert_eq!(ensure_url_scheme("HTTPS://X.dev"), "HTTPS://X.dev");
        assert_eq!(ensure_url_scheme("  github.com/jane "), "https://github.com/jane");
        assert_eq!(ensure_url_scheme("   "), "");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(collapse_whitespace("  London,   UK "), "London, UK");
        assert_eq!(collapse_whitespace("a\t\nb"), "a b");
    }
}
