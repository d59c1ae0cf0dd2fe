//! Session Tokens
//!
//! Stateless JWT sessions signed with a shared HMAC secret. Nothing is stored
//! server-side: a token is valid while its signature checks out and the
//! current time is inside `[nbf, exp]`.
//!
//! Only the HMAC family (HS256/HS384/HS512) is accepted when validating.
//! A token whose header names any other algorithm is rejected, which closes
//! the algorithm substitution hole.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims embedded in every session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub user_name: String,
    pub role: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Not before (unix seconds)
    pub nbf: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Token is invalid")]
    Invalid,

    #[error("Token signing failed: {0}")]
    Signing(String),
}

pub type TokenResult<T> = Result<T, TokenError>;

/// Issues and validates session tokens for one secret
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenService {
    /// A lifetime too large for `Duration` saturates; issuing then fails
    /// with [`TokenError::Signing`].
    pub fn new(secret: &str, expire_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime: Duration::try_hours(expire_hours).unwrap_or(Duration::MAX),
        }
    }

    /// Issue a token valid from now for the configured lifetime
    pub fn issue(&self, user_id: i64, user_name: &str, role: &str) -> TokenResult<String> {
        self.issue_at(user_id, user_name, role, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(
        &self,
        user_id: i64,
        user_name: &str,
        role: &str,
        now: DateTime<Utc>,
    ) -> TokenResult<String> {
        let expires_at = now
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| TokenError::Signing("expiry is out of range".to_string()))?;

        let claims = Claims {
            user_id,
            user_name: user_name.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature and time window, returning the claims
    pub fn validate(&self, token: &str) -> TokenResult<Claims> {
        if token.is_empty() {
            return Err(TokenError::Invalid);
        }

        let data = decode::<Claims>(token, &self.decoding_key, &validation()).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => {
                    tracing::debug!(error = %e, "Token rejected");
                    TokenError::Invalid
                }
            }
        })?;

        Ok(data.claims)
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"[REDACTED]")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
    validation.leeway = 0;
    validation.validate_nbf = true;
    validation.set_required_spec_claims(&["exp", "nbf", "iat"]);
    validation
}

/// One-shot issue with a raw secret
pub fn issue(
    user_id: i64,
    user_name: &str,
    role: &str,
    secret: &str,
    expire_hours: i64,
) -> TokenResult<String> {
    TokenService::new(secret, expire_hours).issue(user_id, user_name, role)
}

/// One-shot validate with a raw secret
pub fn validate(token: &str, secret: &str) -> TokenResult<Claims> {
    TokenService::new(secret, 0).validate(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    const SECRET: &str = "test-secret-please-change";

    #[test]
    fn test_issue_then_validate() {
        let service = TokenService::new(SECRET, 24);
        let token = service.issue(42, "alice", "manager").unwrap();

        let claims = service.validate(&token).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.user_name, "alice");
        assert_eq!(claims.role, "manager");
        assert!(Utc::now().timestamp() < claims.exp);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert_eq!(claims.nbf, claims.iat);
    }

    #[test]
    fn test_one_shot_functions() {
        let token = issue(7, "bob", "user", SECRET, 1).unwrap();
        let claims = validate(&token, SECRET).unwrap();
        assert_eq!(claims.user_id, 7);
    }

    #[test]
    fn test_expired_token() {
        let service = TokenService::new(SECRET, 1);
        let issued = Utc::now() - Duration::hours(2);
        let token = service.issue_at(1, "alice", "user", issued).unwrap();

        assert_eq!(service.validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_not_yet_valid_token() {
        let service = TokenService::new(SECRET, 1);
        let future = Utc::now() + Duration::minutes(30);
        let token = service.issue_at(1, "alice", "user", future).unwrap();

        assert_eq!(service.validate(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_wrong_secret() {
        let token = TokenService::new(SECRET, 1).issue(1, "alice", "user").unwrap();
        let other = TokenService::new("another-secret", 1);

        assert_eq!(other.validate(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_empty_and_malformed() {
        let service = TokenService::new(SECRET, 1);
        assert_eq!(service.validate(""), Err(TokenError::Invalid));
        assert_eq!(service.validate("not.a.token"), Err(TokenError::Invalid));
        assert_eq!(service.validate("garbage"), Err(TokenError::Invalid));
    }

    #[test]
    fn test_accepts_other_hmac_algorithms() {
        let service = TokenService::new(SECRET, 1);
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: 3,
            user_name: "carol".into(),
            role: "operator".into(),
            iat: now,
            nbf: now,
            exp: now + 600,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(service.validate(&token).unwrap(), claims);
    }

    #[test]
    fn test_rejects_unsigned_algorithm() {
        let service = TokenService::new(SECRET, 1);
        let now = Utc::now().timestamp();
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(
            r#"{{"user_id":1,"user_name":"x","role":"administrator","iat":{now},"nbf":{now},"exp":{}}}"#,
            now + 600
        ));
        let forged = format!("{header}.{payload}.");

        assert_eq!(service.validate(&forged), Err(TokenError::Invalid));
    }

    #[test]
    fn test_rejects_asymmetric_header() {
        let service = TokenService::new(SECRET, 1);
        let token = service.issue(1, "alice", "user").unwrap();
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        parts[0] = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);

        assert_eq!(service.validate(&parts.join(".")), Err(TokenError::Invalid));
    }

    #[test]
    fn test_huge_lifetime_fails_to_issue() {
        for hours in [10_000_000_000, i64::MAX] {
            let service = TokenService::new(SECRET, hours);
            assert!(matches!(
                service.issue(1, "alice", "user"),
                Err(TokenError::Signing(_))
            ));
        }
    }

    #[test]
    fn test_debug_redacts_secret() {
        let service = TokenService::new(SECRET, 1);
        assert!(!format!("{:?}", service).contains(SECRET));
    }
}
