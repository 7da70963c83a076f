//! Session token issuing and parsing
//!
//! Tokens are HS256-signed JWTs carrying the session id and a snapshot of the
//! user's identity. Keys are derived once and shared behind `Arc`.

use super::AuthError;
use apiboy_shared::{Identity, User, UserRole};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Lifetime of a session token
pub const SESSION_LIFETIME_DAYS: i64 = 30;

/// The only accepted signing algorithm
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Session token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Session id, the key of the server-side session record
    pub jti: String,
    /// User id
    pub sub: String,
    pub iss: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub user_name: String,
    pub user_email: String,
    pub user_role: UserRole,
}

impl SessionClaims {
    /// Claims for a session of `user` issued at `issued_at`
    pub fn new(session_id: &str, user: &User, issuer: &str, issued_at: DateTime<Utc>) -> Self {
        Self {
            jti: session_id.to_string(),
            sub: user.id.clone(),
            iss: issuer.to_string(),
            iat: issued_at.timestamp(),
            nbf: issued_at.timestamp(),
            exp: (issued_at + Duration::days(SESSION_LIFETIME_DAYS)).timestamp(),
            user_name: user.name.clone(),
            user_email: user.email.clone(),
            user_role: user.role,
        }
    }

    pub fn identity(&self) -> Identity {
        Identity {
            session_id: self.jti.clone(),
            user_id: self.sub.clone(),
            name: self.user_name.clone(),
            email: self.user_email.clone(),
            role: self.user_role,
        }
    }
}

/// Pre-computed signing keys
#[derive(Clone)]
struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// Signs and verifies session tokens
///
/// Cheap to clone; create once at startup.
#[derive(Clone)]
pub struct SessionTokenCodec {
    keys: JwtKeys,
    issuer: String,
    validation: Arc<Validation>,
}

impl SessionTokenCodec {
    pub fn new(secret: &str, issuer: &str) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);

        Self {
            keys: JwtKeys::new(secret),
            issuer: issuer.to_string(),
            validation: Arc::new(validation),
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Sign a token for `user` bound to `session_id`, issued now
    pub fn issue_for(&self, session_id: &str, user: &User) -> Result<String, AuthError> {
        let claims = SessionClaims::new(session_id, user, &self.issuer, Utc::now());
        self.issue(&claims)
    }

    /// Sign arbitrary claims
    pub fn issue(&self, claims: &SessionClaims) -> Result<String, AuthError> {
        encode(&Header::new(ALGORITHM), claims, &self.keys.encoding).map_err(AuthError::Signing)
    }

    /// Verify signature, algorithm, issuer and time window, then decode
    pub fn parse(&self, token: &str) -> Result<SessionClaims, AuthError> {
        decode::<SessionClaims>(token, &self.keys.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(format!("{:?}", e.kind())))
    }
}
