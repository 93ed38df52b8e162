//! Session token handling.
//!
//! Preferences are namespaced by the user behind the session token. The
//! token is a JWT whose payload carries the user id in the `sub` claim;
//! anything unparseable falls back to a shared default namespace rather
//! than failing, since preferences are best-effort.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

pub const DEFAULT_USER_KEY: &str = "default";

/// Extract the preference namespace for the given session token.
pub fn user_key(token: Option<&str>) -> String {
    token
        .and_then(subject_claim)
        .unwrap_or_else(|| DEFAULT_USER_KEY.to_string())
}

fn subject_claim(token: &str) -> Option<String> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.as_bytes()).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    match claims.get("sub")? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt(claims: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.as_bytes());
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn extracts_string_subject() {
        let token = jwt(r#"{"sub":"user-42","exp":1893456000}"#);
        assert_eq!(user_key(Some(&token)), "user-42");
    }

    #[test]
    fn extracts_numeric_subject() {
        let token = jwt(r#"{"sub":42}"#);
        assert_eq!(user_key(Some(&token)), "42");
    }

    #[test]
    fn falls_back_on_missing_or_malformed_tokens() {
        assert_eq!(user_key(None), DEFAULT_USER_KEY);
        assert_eq!(user_key(Some("not-a-jwt")), DEFAULT_USER_KEY);
        assert_eq!(user_key(Some("a.b.c")), DEFAULT_USER_KEY);
        let token = jwt(r#"{"name":"no subject here"}"#);
        assert_eq!(user_key(Some(&token)), DEFAULT_USER_KEY);
    }
}
