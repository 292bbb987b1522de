use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Represents the claims encoded within an issued token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the account's username.
    pub sub: String,
    /// Expiration timestamp (seconds since epoch) for the token.
    pub exp: i64,
}

// Decoding goes through a laxer shape so a payload without `sub` is reported
// as a missing subject rather than a deserialization failure.
#[derive(Debug, Deserialize)]
struct RawClaims {
    sub: Option<String>,
    exp: i64,
}

/// Why a presented token is not currently trustworthy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// The signature does not match the service secret, or the token is not
    /// parseable at all.
    InvalidSignature,
    /// The claims carry no subject.
    MissingSubject,
    /// The expiry timestamp is in the past.
    Expired,
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VerifyError::InvalidSignature => write!(f, "invalid token signature"),
            VerifyError::MissingSubject => write!(f, "token has no subject claim"),
            VerifyError::Expired => write!(f, "token has expired"),
        }
    }
}

/// Signing and verification keys, built once at startup from the configured
/// secret and injected wherever tokens are minted or checked.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    default_ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, default_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            default_ttl,
        }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(
            &config.jwt_secret,
            Duration::minutes(config.token_ttl_minutes),
        )
    }

    /// Issues a signed token asserting `subject` until `ttl` from now.
    ///
    /// When `ttl` is `None` the service-wide default applies. The result is a
    /// self-contained string; nothing is stored server-side.
    pub fn issue(&self, subject: &str, ttl: Option<Duration>) -> Result<String, AppError> {
        let expiration = Utc::now() + ttl.unwrap_or(self.default_ttl);

        let claims = Claims {
            sub: subject.to_string(),
            exp: expiration.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies a token string and resolves it to its subject.
    ///
    /// Checks run in order and short-circuit: signature, subject presence,
    /// expiry. Expiry is checked here rather than left to the JWT library so
    /// a token that is both subject-less and expired reports the missing
    /// subject first.
    pub fn verify(&self, token: &str) -> Result<String, VerifyError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::new();

        // A token that cannot be parsed is as untrustworthy as one with a
        // bad signature; both land in the same bucket.
        let data = decode::<RawClaims>(token, &self.decoding, &validation)
            .map_err(|_| VerifyError::InvalidSignature)?;

        let subject = data.claims.sub.ok_or(VerifyError::MissingSubject)?;

        if data.claims.exp < Utc::now().timestamp() {
            return Err(VerifyError::Expired);
        }

        Ok(subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_keys() -> TokenKeys {
        TokenKeys::new("test_secret_for_gen_verify", Duration::minutes(30))
    }

    #[test]
    fn test_token_issue_and_verify() {
        let keys = test_keys();
        let token = keys.issue("alice", None).unwrap();
        let subject = keys.verify(&token).unwrap();
        assert_eq!(subject, "alice");
    }

    #[test]
    fn test_token_expiration() {
        let keys = test_keys();
        // A negative ttl puts the expiry in the past while the signature
        // stays valid.
        let expired_token = keys.issue("bob", Some(Duration::minutes(-5))).unwrap();

        assert_eq!(keys.verify(&expired_token), Err(VerifyError::Expired));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let keys = test_keys();
        let token = keys.issue("carol", None).unwrap();

        // Flip one character in the signature segment.
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        assert_eq!(parts.len(), 3);
        let sig = parts[2].clone();
        let replacement = if sig.ends_with('A') { "B" } else { "A" };
        parts[2] = format!("{}{}", &sig[..sig.len() - 1], replacement);
        let tampered = parts.join(".");

        assert_eq!(keys.verify(&tampered), Err(VerifyError::InvalidSignature));
    }

    #[test]
    fn test_token_without_subject() {
        let keys = test_keys();
        let exp = (Utc::now() + Duration::minutes(5)).timestamp();
        let claims = serde_json::json!({ "exp": exp });
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test_secret_for_gen_verify".as_bytes()),
        )
        .unwrap();

        assert_eq!(keys.verify(&token), Err(VerifyError::MissingSubject));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let keys = test_keys();
        assert_eq!(
            keys.verify("not-a-token-at-all"),
            Err(VerifyError::InvalidSignature)
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let keys = test_keys();
        let other_keys = TokenKeys::new("a_completely_different_secret", Duration::minutes(30));
        let token = other_keys.issue("dave", None).unwrap();

        assert_eq!(keys.verify(&token), Err(VerifyError::InvalidSignature));
    }
}
