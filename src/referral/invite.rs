//! Personal referral token and the invite link built from it.

use rand::Rng;
use rand::distributions::Alphanumeric;
use tracing::{info, warn};
use url::form_urlencoded::byte_serialize;

use crate::store::KeyValueStore;
use crate::store::keys;

const TOKEN_PREFIX: &str = "tw_";
const TOKEN_CHARS: usize = 8;

const SHARE_TITLE: &str = "Apply to Talent Wharf";
const SHARE_TEXT: &str =
    "I'm applying to Talent Wharf (invite-only for top uni engineers). Use my link to apply:";

/// Return this device's referral token, minting and persisting one on first use.
///
/// Once stored the token is never regenerated. If storage is unavailable
/// the freshly minted token is still returned for this session.
pub fn ensure_ref_token(store: &dyn KeyValueStore) -> String {
    match store.get(keys::REF_TOKEN) {
        Ok(Some(token)) if !token.is_empty() => return token,
        Ok(_) => {}
        Err(e) => warn!(error = %e, "Failed to read referral token"),
    }

    let token = mint_token();
    match store.set(keys::REF_TOKEN, &token) {
        Ok(()) => info!(token = %token, "Minted referral token"),
        Err(e) => warn!(error = %e, "Failed to persist referral token"),
    }
    token
}

fn mint_token() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_CHARS)
        .map(char::from)
        .collect();
    format!("{TOKEN_PREFIX}{suffix}")
}

/// A shareable invite link plus the fallbacks offered when native sharing
/// is unavailable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteLink {
    pub token: String,
    pub url: String,
}

impl InviteLink {
    /// `<origin>?ref=<token>`.
    pub fn new(origin: &str, token: impl Into<String>) -> Self {
        let token = token.into();
        let url = format!("{}?ref={}", origin.trim_end_matches('/'), token);
        Self { token, url }
    }

    /// Invite link for this device, minting the token if needed.
    pub fn for_device(store: &dyn KeyValueStore, origin: &str) -> Self {
        Self::new(origin, ensure_ref_token(store))
    }

    /// Title used for native share sheets.
    pub fn share_title(&self) -> &'static str {
        SHARE_TITLE
    }

    /// Message body used by every share target.
    pub fn share_message(&self) -> String {
        format!("{SHARE_TEXT} {}", self.url)
    }

    /// WhatsApp fallback link.
    pub fn whatsapp_url(&self) -> String {
        format!("https://wa.me/?text={}", encode(&self.share_message()))
    }

    /// Email fallback link.
    pub fn mailto_url(&self) -> String {
        format!(
            "mailto:?subject={}&body={}",
            encode(SHARE_TITLE),
            encode(&self.share_message())
        )
    }
}

/// Percent-encode for a query value, with spaces as `%20` rather than `+`.
fn encode(s: &str) -> String {
    byte_serialize(s.as_bytes()).collect::<String>().replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn token_shape() {
        let token = mint_token();
        assert!(token.starts_with("tw_"));
        let suffix = &token[3..];
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn token_is_minted_once_per_device() {
        let store = MemoryStore::new();
        let first = ensure_ref_token(&store);
        let second = ensure_ref_token(&store);
        assert_eq!(first, second);
        assert_eq!(store.get(keys::REF_TOKEN).unwrap(), Some(first));
    }

    #[test]
    fn existing_token_is_reused() {
        let store = MemoryStore::new();
        store.set(keys::REF_TOKEN, "tw_AbCd1234").unwrap();
        assert_eq!(ensure_ref_token(&store), "tw_AbCd1234");
    }

    #[test]
    fn unavailable_storage_still_yields_a_token() {
        let store = MemoryStore::unavailable();
        assert!(ensure_ref_token(&store).starts_with("tw_"));
    }

    #[test]
    fn invite_link_format() {
        let link = InviteLink::new("https://talentwharf.com/", "tw_AbCd1234");
        assert_eq!(link.url, "https://talentwharf.com?ref=tw_AbCd1234");
    }

    #[test]
    fn share_fallbacks_are_encoded() {
        let link = InviteLink::new("https://talentwharf.com", "tw_AbCd1234");
        let whatsapp = link.whatsapp_url();
        assert!(whatsapp.starts_with("https://wa.me/?text=I%27m%20applying"));
        assert!(whatsapp.contains("https%3A%2F%2Ftalentwharf.com%3Fref%3Dtw_AbCd1234"));
        assert!(!whatsapp.contains(' '));

        let mailto = link.mailto_url();
        assert!(mailto.starts_with("mailto:?subject=Apply%20to%20Talent%20Wharf&body="));
    }
}
