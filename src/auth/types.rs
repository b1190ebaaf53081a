use serde::{Deserialize, Serialize};

/// Access-token claims issued by the external identity provider. Only `sub`
/// is used for ownership; the rest is carried for logging.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String, // opaque caller id
    pub exp: usize,  // expiry (unix)
    #[serde(default)]
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::Claims;

    #[test]
    fn tolerates_provider_specific_extras() {
        let claims: Claims = serde_json::from_value(json!({
            "sub": "5f0c6a1e-user",
            "exp": 1_900_000_000u64,
            "aud": "authenticated",
            "role": "authenticated",
            "session_id": "ignored",
            "app_metadata": { "provider": "email" }
        }))
        .expect("claims should parse");

        assert_eq!(claims.sub, "5f0c6a1e-user");
        assert_eq!(claims.iat, 0);
        assert_eq!(claims.aud.as_deref(), Some("authenticated"));
        assert!(claims.email.is_none());
    }
}
