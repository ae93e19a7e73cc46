//! First-touch capture of UTM parameters and the inbound `ref` token.

use tracing::{info, warn};
use url::Url;

use crate::store::KeyValueStore;
use crate::store::keys;

/// Query parameters carried over by [`preserve_query`].
const PRESERVED_PARAMS: &[&str] = &[
    "ref",
    keys::UTM_SOURCE,
    keys::UTM_MEDIUM,
    keys::UTM_CAMPAIGN,
    keys::UTM_TERM,
    keys::UTM_CONTENT,
];

/// What a single capture pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureOutcome {
    /// UTM parameters stored for the first time on this pass.
    pub utm_stored: Vec<(String, String)>,
    /// The inbound `ref` token, if it was stored on this pass.
    pub referred_by_stored: Option<String>,
    /// The URL with `ref` removed, when it had one. Front ends replace
    /// the visible location with this so the token is not re-shared.
    pub cleaned_url: Option<Url>,
}

/// Capture attribution from a landing URL. Runs once per page load.
///
/// Each UTM value and the `ref` token are persisted only if nothing is
/// stored under their key yet; later visits never overwrite them. Storage
/// failures are logged and skipped.
pub fn capture_attribution(store: &dyn KeyValueStore, url: &Url) -> CaptureOutcome {
    let mut outcome = CaptureOutcome::default();

    for key in keys::UTM_KEYS {
        let Some(value) = query_value(url, key) else {
            continue;
        };
        match store.set_if_absent(key, &value) {
            Ok(true) => outcome.utm_stored.push((key.to_string(), value)),
            Ok(false) => {}
            Err(e) => warn!(key, error = %e, "Failed to persist campaign attribution"),
        }
    }

    if let Some(token) = query_value(url, "ref") {
        match store.set_if_absent(keys::REF_FROM, &token) {
            Ok(true) => outcome.referred_by_stored = Some(token),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Failed to persist referred-by token"),
        }
    }
    if url.query_pairs().any(|(k, _)| k == "ref") {
        outcome.cleaned_url = Some(strip_param(url, "ref"));
    }

    if !outcome.utm_stored.is_empty() || outcome.referred_by_stored.is_some() {
        info!(
            utm = outcome.utm_stored.len(),
            referred = outcome.referred_by_stored.is_some(),
            "Captured attribution"
        );
    }
    outcome
}

/// Build an internal link to `path` that keeps the referral and UTM
/// parameters of `current`.
pub fn preserve_query(path: &str, current: &Url) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for key in PRESERVED_PARAMS {
        if let Some(value) = query_value(current, key) {
            serializer.append_pair(key, &value);
            any = true;
        }
    }
    if any {
        format!("{path}?{}", serializer.finish())
    } else {
        path.to_string()
    }
}

/// Attribution stored on this device, attached to the final submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attribution {
    pub referral_token: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
}

impl Attribution {
    /// Read stored attribution. Unreadable keys count as absent.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let read = |key: &str| match store.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!(key, error = %e, "Failed to read attribution");
                None
            }
        };
        Self {
            referral_token: read(keys::REF_FROM),
            utm_source: read(keys::UTM_SOURCE),
            utm_medium: read(keys::UTM_MEDIUM),
            utm_campaign: read(keys::UTM_CAMPAIGN),
        }
    }
}

/// First non-empty value of a query parameter.
fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, v)| k == key && !v.is_empty())
        .map(|(_, v)| v.into_owned())
}

fn strip_param(url: &Url, key: &str) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let mut cleaned = url.clone();
    if kept.is_empty() {
        cleaned.set_query(None);
    } else {
        cleaned.query_pairs_mut().clear().extend_pairs(kept);
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn ref_is_stored_once_and_never_overwritten() {
        let store = MemoryStore::new();
        let first = capture_attribution(&store, &url("https://talentwharf.com/apply?ref=abc123"));
        assert_eq!(first.referred_by_stored.as_deref(), Some("abc123"));

        let later = capture_attribution(&store, &url("https://talentwharf.com/apply?ref=xyz999"));
        assert_eq!(later.referred_by_stored, None);
        assert_eq!(store.get(keys::REF_FROM).unwrap().as_deref(), Some("abc123"));
    }

    #[test]
    fn ref_is_stripped_from_the_visible_url() {
        let store = MemoryStore::new();
        let outcome = capture_attribution(
            &store,
            &url("https://talentwharf.com/apply?utm_source=x&ref=abc123#form"),
        );
        let cleaned = outcome.cleaned_url.unwrap();
        assert_eq!(cleaned.as_str(), "https://talentwharf.com/apply?utm_source=x#form");

        // Still stripped on a repeat visit, even though nothing is stored
        let again = capture_attribution(&store, &url("https://talentwharf.com/?ref=zzz"));
        assert_eq!(again.cleaned_url.unwrap().as_str(), "https://talentwharf.com/");
    }

    #[test]
    fn empty_ref_is_stripped_but_not_stored() {
        let store = MemoryStore::new();
        let outcome = capture_attribution(
            &store,
            &url("https://talentwharf.com/apply?ref=&utm_source=x"),
        );
        assert_eq!(outcome.referred_by_stored, None);
        assert_eq!(store.get(keys::REF_FROM).unwrap(), None);
        assert_eq!(
            outcome.cleaned_url.unwrap().as_str(),
            "https://talentwharf.com/apply?utm_source=x"
        );
    }

    #[test]
    fn utm_is_first_touch() {
        let store = MemoryStore::new();
        let first = capture_attribution(
            &store,
            &url("https://talentwharf.com/?utm_source=newsletter&utm_medium=email&utm_term="),
        );
        assert_eq!(first.utm_stored.len(), 2);
        assert_eq!(first.cleaned_url, None);

        capture_attribution(&store, &url("https://talentwharf.com/?utm_source=twitter&utm_campaign=launch"));
        assert_eq!(store.get("utm_source").unwrap().as_deref(), Some("newsletter"));
        assert_eq!(store.get("utm_campaign").unwrap().as_deref(), Some("launch"));
        assert_eq!(store.get("utm_term").unwrap(), None);
    }

    #[test]
    fn unavailable_storage_still_strips_ref() {
        let store = MemoryStore::unavailable();
        let outcome = capture_attribution(&store, &url("https://talentwharf.com/?ref=abc123"));
        assert_eq!(outcome.referred_by_stored, None);
        assert!(outcome.cleaned_url.is_some());
    }

    #[test]
    fn attribution_reads_first_touch_values() {
        let store = MemoryStore::new();
        capture_attribution(
            &store,
            &url("https://talentwharf.com/?ref=abc123&utm_source=uni&utm_campaign=autumn"),
        );
        let attribution = Attribution::load(&store);
        assert_eq!(attribution.referral_token.as_deref(), Some("abc123"));
        assert_eq!(attribution.utm_source.as_deref(), Some("uni"));
        assert_eq!(attribution.utm_medium, None);
        assert_eq!(attribution.utm_campaign.as_deref(), Some("autumn"));
    }

    #[test]
    fn preserve_query_keeps_only_attribution_params() {
        let current = url("https://talentwharf.com/?ref=abc&utm_source=x&page=2");
        assert_eq!(preserve_query("/apply", &current), "/apply?ref=abc&utm_source=x");
        assert_eq!(preserve_query("/apply", &url("https://talentwharf.com/")), "/apply");
    }
}
