use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use time::Duration;
use tracing::debug;

use crate::{
    auth::claims::{Claims, TokenKind, TokenPair},
    clock::Clock,
    config::{JwtConfig, TokenClassConfig},
};

/// Why a token was refused. Never exposed past the identity layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// Bad signature, wrong algorithm, wrong issuer/audience or not a JWT at all.
    Signature,
    Expired,
    /// Signed for the other token class.
    ClassMismatch,
    MissingSubject,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid(InvalidReason),
    #[error("token signing failed: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),
}

impl TokenError {
    pub fn reason(&self) -> Option<InvalidReason> {
        match self {
            TokenError::Invalid(reason) => Some(*reason),
            TokenError::Encode(_) => None,
        }
    }
}

#[derive(Clone)]
struct ClassKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl ClassKeys {
    fn from_config(cfg: &TokenClassConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            algorithm: cfg.algorithm,
            ttl: Duration::minutes(cfg.ttl_minutes),
        }
    }
}

/// Issues and verifies access/refresh JWTs. Each class has its own secret,
/// algorithm and lifetime; expiry is checked against the injected clock.
#[derive(Clone)]
pub struct TokenService {
    access: ClassKeys,
    refresh: ClassKeys,
    issuer: String,
    audience: String,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(config: &JwtConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            access: ClassKeys::from_config(&config.access),
            refresh: ClassKeys::from_config(&config.refresh),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            clock,
        }
    }

    fn keys(&self, kind: TokenKind) -> &ClassKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    pub fn issue(&self, kind: TokenKind, email: &str) -> Result<String, TokenError> {
        let keys = self.keys(kind);
        let now = self.clock.now();
        let exp = now + keys.ttl;
        let claims = Claims {
            email: Some(email.to_owned()),
            iat: now.unix_timestamp(),
            exp: exp.unix_timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            kind,
        };
        let token = encode(&Header::new(keys.algorithm), &claims, &keys.encoding)
            .map_err(TokenError::Encode)?;
        debug!(kind = ?kind, exp = claims.exp, "jwt signed");
        Ok(token)
    }

    pub fn issue_pair(&self, email: &str) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.issue(TokenKind::Access, email)?,
            refresh_token: self.issue(TokenKind::Refresh, email)?,
        })
    }

    pub fn verify(&self, kind: TokenKind, token: &str) -> Result<Claims, TokenError> {
        let keys = self.keys(kind);
        let mut validation = Validation::new(keys.algorithm);
        // exp is compared against self.clock below
        validation.validate_exp = false;
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));

        let claims = decode::<Claims>(token, &keys.decoding, &validation)
            .map_err(|e| {
                debug!(kind = ?kind, error = %e, "jwt rejected");
                TokenError::Invalid(InvalidReason::Signature)
            })?
            .claims;

        if claims.kind != kind {
            debug!(expected = ?kind, got = ?claims.kind, "jwt class mismatch");
            return Err(TokenError::Invalid(InvalidReason::ClassMismatch));
        }
        if self.clock.now().unix_timestamp() >= claims.exp {
            debug!(kind = ?kind, exp = claims.exp, "jwt expired");
            return Err(TokenError::Invalid(InvalidReason::Expired));
        }

        debug!(kind = ?kind, "jwt verified");
        Ok(claims)
    }

    /// Verifies a refresh token and mints a fresh pair for the same subject.
    /// The presented refresh token stays valid until its own expiry.
    pub fn refresh(&self, refresh_token: &str) -> Result<(Claims, TokenPair), TokenError> {
        let claims = self.verify(TokenKind::Refresh, refresh_token)?;
        let email = claims
            .email
            .as_deref()
            .ok_or(TokenError::Invalid(InvalidReason::MissingSubject))?;
        let pair = self.issue_pair(email)?;
        Ok((claims, pair))
    }
}
