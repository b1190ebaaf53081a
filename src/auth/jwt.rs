use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::Claims;
use crate::{config::AuthConfig, error::AppError};

#[derive(Clone)]
pub struct JwtKeys {
    pub enc: EncodingKey,
    pub dec: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret),
            dec: DecodingKey::from_secret(secret),
        }
    }
}

/// Verifies HS256 access tokens against the provider's shared secret.
#[derive(Clone)]
pub struct JwtVerifier {
    keys: JwtKeys,
    validation: Validation,
}

impl JwtVerifier {
    pub fn from_config(cfg: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = cfg.leeway_secs;
        match cfg.audience.as_deref() {
            Some(audience) => {
                validation.set_required_spec_claims(&["exp", "sub", "aud"]);
                validation.set_audience(&[audience]);
            }
            None => {
                validation.set_required_spec_claims(&["exp", "sub"]);
                validation.validate_aud = false;
            }
        }

        Self {
            keys: JwtKeys::from_secret(cfg.jwt_secret.as_bytes()),
            validation,
        }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.keys.dec, &self.validation)?;
        if data.claims.sub.trim().is_empty() {
            return Err(AppError::unauthorized("Token subject is empty"));
        }
        Ok(data.claims)
    }
}

pub fn now_unix() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as usize)
        .unwrap_or_default()
}

pub fn encode_token(keys: &JwtKeys, claims: &Claims) -> Result<String, AppError> {
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".into());

    encode(&header, claims, &keys.enc)
        .map_err(|err| AppError::internal_with_source("token encoding failed", err))
}

pub fn make_claims(sub: &str, ttl_secs: usize) -> Claims {
    let iat = now_unix();
    Claims {
        sub: sub.to_string(),
        exp: iat + ttl_secs,
        iat,
        aud: None,
        email: None,
        role: None,
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::unauthorized(format!("Invalid or expired token: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::{JwtKeys, JwtVerifier, encode_token, make_claims, now_unix};
    use crate::{config::AuthConfig, error::ErrorCode};

    const SECRET: &str = "unit-test-secret";

    fn auth_config(audience: Option<&str>) -> AuthConfig {
        AuthConfig {
            jwt_secret: SECRET.to_string(),
            audience: audience.map(str::to_string),
            leeway_secs: 0,
        }
    }

    #[test]
    fn makes_claims_with_expected_subject_and_ttl() {
        let claims = make_claims("owner-1", 60);

        assert_eq!(claims.sub, "owner-1");
        assert_eq!(claims.exp.saturating_sub(claims.iat), 60);
    }

    #[test]
    fn verifies_token_signed_with_same_secret() {
        let verifier = JwtVerifier::from_config(&auth_config(None));
        let claims = make_claims("owner-1", 600);
        let token = encode_token(verifier.keys(), &claims).expect("token should encode");

        let verified = verifier.verify(&token).expect("token should verify");
        assert_eq!(verified, claims);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let verifier = JwtVerifier::from_config(&auth_config(None));
        let token = encode_token(
            &JwtKeys::from_secret(b"someone-else"),
            &make_claims("owner-1", 600),
        )
        .expect("token should encode");

        let err = verifier.verify(&token).expect_err("signature should not match");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert!(err.message().starts_with("Invalid or expired token:"));
    }

    #[test]
    fn rejects_expired_token() {
        let verifier = JwtVerifier::from_config(&auth_config(None));
        let mut claims = make_claims("owner-1", 0);
        claims.exp = now_unix().saturating_sub(120);
        let token = encode_token(verifier.keys(), &claims).expect("token should encode");

        let err = verifier.verify(&token).expect_err("token should be expired");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[test]
    fn enforces_configured_audience() {
        let verifier = JwtVerifier::from_config(&auth_config(Some("authenticated")));

        let mut claims = make_claims("owner-1", 600);
        let missing = encode_token(verifier.keys(), &claims).expect("token should encode");
        assert!(verifier.verify(&missing).is_err());

        claims.aud = Some("anon".to_string());
        let other = encode_token(verifier.keys(), &claims).expect("token should encode");
        assert!(verifier.verify(&other).is_err());

        claims.aud = Some("authenticated".to_string());
        let matching = encode_token(verifier.keys(), &claims).expect("token should encode");
        assert!(verifier.verify(&matching).is_ok());
    }

    #[test]
    fn rejects_empty_subject() {
        let verifier = JwtVerifier::from_config(&auth_config(None));
        let token = encode_token(verifier.keys(), &make_claims("  ", 600))
            .expect("token should encode");

        let err = verifier.verify(&token).expect_err("blank subject should fail");
        assert_eq!(err.message(), "Token subject is empty");
    }
}
