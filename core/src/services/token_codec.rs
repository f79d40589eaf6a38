//! JWT issuing and verification for the access/refresh token pair.
//!
//! Both flavors are HS256-signed with the same base64-decoded secret and
//! validated against the configured issuer and audience with a small
//! clock-skew leeway. Access tokens carry the holder's roles; refresh
//! tokens carry the session family and use the durable session row id as
//! their `jti`.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use hg_shared::config::JwtConfig;

use crate::domain::entities::subject::AuthSubject;
use crate::domain::entities::token::{Claims, TYP_ACCESS, TYP_REFRESH};
use crate::errors::{DomainError, DomainResult, TokenError};

/// Stateless JWT encoder/decoder shared by the auth flows and the
/// request-authentication middleware.
pub struct TokenCodec {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Build a codec from the JWT configuration.
    ///
    /// Fails when the configured secret is not valid base64.
    pub fn new(config: JwtConfig) -> DomainResult<Self> {
        let encoding_key = EncodingKey::from_base64_secret(&config.secret_base64)
            .map_err(|e| DomainError::Internal {
                message: format!("Invalid JWT secret: {}", e),
            })?;
        let decoding_key = DecodingKey::from_base64_secret(&config.secret_base64)
            .map_err(|e| DomainError::Internal {
                message: format!("Invalid JWT secret: {}", e),
            })?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.leeway = config.leeway_seconds;

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// Sign a fresh access token for the subject.
    ///
    /// `sub` is the phone number, `jti` a random id, and the subject's
    /// current roles and token version are embedded.
    pub fn issue_access(&self, subject: &AuthSubject) -> DomainResult<String> {
        let now = Utc::now();
        let claims = Claims {
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            sub: subject.phone.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.config.access_token_seconds())).timestamp(),
            jti: Uuid::new_v4().to_string(),
            typ: TYP_ACCESS.to_string(),
            uid: subject.user_id,
            roles: Some(subject.role_names()),
            fid: None,
            ver: subject.token_version,
        };
        self.encode(&claims)
    }

    /// Sign a refresh token bound to a session row.
    ///
    /// `jti` must be the session row id and `family_id` its family; the
    /// refresh path later resolves the row by `jti`.
    pub fn issue_refresh(
        &self,
        subject: &AuthSubject,
        jti: &str,
        family_id: &str,
    ) -> DomainResult<String> {
        let now = Utc::now();
        let claims = Claims {
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            sub: subject.user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.config.refresh_token_seconds())).timestamp(),
            jti: jti.to_string(),
            typ: TYP_REFRESH.to_string(),
            uid: subject.user_id,
            roles: None,
            fid: Some(family_id.to_string()),
            ver: subject.token_version,
        };
        self.encode(&claims)
    }

    /// Verify signature, issuer, audience, and expiry, then require the
    /// access shape
    pub fn verify_access(&self, token: &str) -> DomainResult<Claims> {
        let claims = self.decode(token)?;
        if !claims.is_access() {
            return Err(TokenError::TokenUnsupported.into());
        }
        Ok(claims)
    }

    /// Verify signature, issuer, audience, and expiry, then require the
    /// refresh shape
    pub fn verify_refresh(&self, token: &str) -> DomainResult<Claims> {
        let claims = self.decode(token)?;
        if !claims.is_refresh() {
            return Err(TokenError::TokenUnsupported.into());
        }
        Ok(claims)
    }

    /// Access token lifetime in seconds
    pub fn access_ttl_seconds(&self) -> i64 {
        self.config.access_token_seconds()
    }

    /// Refresh token lifetime in seconds
    pub fn refresh_ttl_seconds(&self) -> i64 {
        self.config.refresh_token_seconds()
    }

    /// SHA-256 hex of a raw token, the only credential form ever stored
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn encode(&self, claims: &Claims) -> DomainResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            DomainError::Internal {
                message: format!("Failed to sign token: {}", e),
            }
        })
    }

    fn decode(&self, token: &str) -> DomainResult<Claims> {
        let data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                    ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                        TokenError::TokenUnsupported
                    }
                    _ => TokenError::TokenInvalid,
                }
            })?;
        Ok(data.claims)
    }
}
