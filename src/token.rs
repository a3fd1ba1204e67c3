//! Session token codec.
//!
//! Reads the payload segment of a compact JWT issued by the API. The
//! signature is never checked here: the backend re-validates the token on
//! every request, so the decoded claims are only a read-only projection used
//! to gate session restoration and to seed the user profile at login.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Deserializer};
use time::OffsetDateTime;

/// Identity claims carried in the token payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenClaims {
    /// Subject, the numeric user id rendered as a string.
    #[serde(default, deserialize_with = "string_or_number")]
    pub sub: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub roll_number: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_super_admin: bool,
    /// Expiry in seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<f64>,
}

impl TokenClaims {
    /// Expiry as an instant, when the token carries a representable one.
    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        let exp = self.exp?;
        if !exp.is_finite() {
            return None;
        }
        OffsetDateTime::from_unix_timestamp(exp.trunc() as i64).ok()
    }

    /// Numeric user id from the subject claim.
    pub fn user_id(&self) -> Option<i64> {
        self.sub.as_deref()?.trim().parse().ok()
    }
}

/// Decodes the payload of `token`.
///
/// Returns `None` for anything that is not a well-formed compact token with a
/// JSON object payload.
pub fn decode(token: &str) -> Option<TokenClaims> {
    let mut segments = token.split('.');
    let _header = segments.next()?;
    let payload = segments.next()?;

    // Accept both alphabets and optional padding.
    let normalized: String = payload
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            c => c,
        })
        .collect();

    let bytes = URL_SAFE_NO_PAD.decode(normalized.as_bytes()).ok()?;
    match serde_json::from_slice(&bytes).ok()? {
        value @ serde_json::Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    }
}

/// Whether `token` decodes and has not expired yet.
pub fn is_valid(token: &str) -> bool {
    is_valid_at(token, OffsetDateTime::now_utc())
}

/// Whether `token` decodes and its expiry is strictly after `now`.
pub fn is_valid_at(token: &str, now: OffsetDateTime) -> bool {
    let Some(exp) = decode(token).and_then(|claims| claims.exp) else {
        return false;
    };
    let now_millis = (now.unix_timestamp_nanos() / 1_000_000) as f64;
    exp * 1000.0 > now_millis
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => Some(s),
        Some(Raw::Number(n)) => Some(n.to_string()),
        None => None,
    })
}
