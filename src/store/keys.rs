//! Storage keys shared by the draft store and attribution capture.

/// Merged form draft (JSON).
pub const FORM_DRAFT: &str = "talent-wharf-form-data";
/// Personal referral token minted for this device.
pub const REF_TOKEN: &str = "tw_ref_token";
/// Inbound referral token this device arrived with.
pub const REF_FROM: &str = "tw_ref_from";

pub const UTM_SOURCE: &str = "utm_source";
pub const UTM_MEDIUM: &str = "utm_medium";
pub const UTM_CAMPAIGN: &str = "utm_campaign";
pub const UTM_TERM: &str = "utm_term";
pub const UTM_CONTENT: &str = "utm_content";

/// UTM query parameters captured with first-touch semantics. The storage
/// key is the parameter name itself.
pub const UTM_KEYS: &[&str] = &[UTM_SOURCE, UTM_MEDIUM, UTM_CAMPAIGN, UTM_TERM, UTM_CONTENT];
