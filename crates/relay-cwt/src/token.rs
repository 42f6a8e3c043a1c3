//! Token assembly.
//!
//! The free functions mirror the wire-level operations; [`TokenIssuer`]
//! bundles the signing identity (key, key id, issuer) for callers that issue
//! many tokens with the same configuration.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use relay_core::SigningConfig;

use crate::claims::{build_claims, build_protected_header};
use crate::constants::DEFAULT_ISSUER;
use crate::cose::CoseMac0;
use crate::error::CwtError;
use crate::keys::HmacKey;
use crate::mac::compute_mac;
use crate::scope::{compute_scope, Authorization, Resource};

/// Current time in whole seconds since the epoch.
pub fn now_seconds() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}

/// Issue a token that is valid for `ttl_seconds` from now.
///
/// A ttl of zero yields a token that is already expired; expiry policy is
/// left to relying parties.
pub fn generate_token(
    key: &[u8],
    key_id: &str,
    issuer: &str,
    subject: &str,
    audience: &str,
    scope: &str,
    ttl_seconds: u64,
) -> Result<String, CwtError> {
    let issued_at = now_seconds();
    generate_token_at(
        key,
        key_id,
        issuer,
        subject,
        audience,
        scope,
        issued_at,
        issued_at.saturating_add(ttl_seconds),
    )
}

/// Issue a token with explicit timestamps.
///
/// Output is byte-for-byte identical for identical inputs.
#[allow(clippy::too_many_arguments)]
pub fn generate_token_at(
    key: &[u8],
    key_id: &str,
    issuer: &str,
    subject: &str,
    audience: &str,
    scope: &str,
    issued_at: u64,
    expiry: u64,
) -> Result<String, CwtError> {
    let payload = build_claims(issuer, subject, audience, issued_at, expiry, scope).to_cbor()?;
    let protected = build_protected_header(key_id).to_cbor()?;
    let tag = compute_mac(&protected, &payload, key)?;

    let cwt = CoseMac0 {
        protected,
        payload,
        tag,
    }
    .to_cwt()?;

    tracing::debug!(
        kid = key_id,
        sub = subject,
        scope = scope,
        exp = expiry,
        "Issued token"
    );

    Ok(URL_SAFE_NO_PAD.encode(cwt))
}

/// Issue a document token with scope `doc:<doc_id>:<perm>`.
#[allow(clippy::too_many_arguments)]
pub fn generate_doc_token(
    key: &[u8],
    key_id: &str,
    issuer: &str,
    doc_id: &str,
    user_id: &str,
    audience: &str,
    authorization: &str,
    ttl_seconds: u64,
) -> Result<String, CwtError> {
    let scope = compute_scope(
        &Resource::document(doc_id),
        Authorization::from(authorization),
    );
    generate_token(key, key_id, issuer, user_id, audience, &scope, ttl_seconds)
}

/// Issue a file token with scope `file:<file_hash>:<doc_id>:<perm>`.
#[allow(clippy::too_many_arguments)]
pub fn generate_file_token(
    key: &[u8],
    key_id: &str,
    issuer: &str,
    doc_id: &str,
    user_id: &str,
    audience: &str,
    authorization: &str,
    ttl_seconds: u64,
    file_hash: &str,
) -> Result<String, CwtError> {
    let scope = compute_scope(
        &Resource::file(file_hash, doc_id),
        Authorization::from(authorization),
    );
    generate_token(key, key_id, issuer, user_id, audience, &scope, ttl_seconds)
}

/// What a single token should grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    /// User id (sub).
    pub subject: String,
    /// Provider base URL (aud).
    pub audience: String,
    pub resource: Resource,
    pub authorization: Authorization,
    pub ttl_seconds: u64,
}

impl TokenRequest {
    pub fn new(
        subject: impl Into<String>,
        audience: impl Into<String>,
        resource: Resource,
        authorization: Authorization,
        ttl_seconds: u64,
    ) -> Self {
        Self {
            subject: subject.into(),
            audience: audience.into(),
            resource,
            authorization,
            ttl_seconds,
        }
    }
}

/// An encoded token and the facts it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// base64url token string.
    pub token: String,
    pub scope: String,
    pub issued_at: u64,
    pub expires_at: u64,
}

/// Issues tokens under a fixed signing identity.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    key: HmacKey,
    key_id: String,
    issuer: String,
}

impl TokenIssuer {
    /// Create an issuer using [`DEFAULT_ISSUER`].
    pub fn new(key: HmacKey, key_id: impl Into<String>) -> Self {
        if key.is_empty() {
            tracing::warn!("Issuing tokens with an empty HMAC key");
        }
        Self {
            key,
            key_id: key_id.into(),
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }

    /// Create an issuer from signing configuration.
    ///
    /// The key is resolved from the environment or key file and decoded from
    /// base64; key id and issuer fall back to their defaults.
    pub fn from_config(config: &SigningConfig) -> Result<Self, CwtError> {
        let key = HmacKey::from_base64(&config.resolve_key()?)?;
        Ok(Self::new(key, config.resolve_key_id()).with_issuer(config.resolve_issuer()))
    }

    /// Override the issuer claim.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Issue a token starting now.
    pub fn issue(&self, request: &TokenRequest) -> Result<IssuedToken, CwtError> {
        self.issue_at(request, now_seconds())
    }

    /// Issue a token with an explicit issued-at time.
    pub fn issue_at(
        &self,
        request: &TokenRequest,
        issued_at: u64,
    ) -> Result<IssuedToken, CwtError> {
        let scope = compute_scope(&request.resource, request.authorization);
        let expires_at = issued_at.saturating_add(request.ttl_seconds);

        let token = generate_token_at(
            self.key.as_bytes(),
            &self.key_id,
            &self.issuer,
            &request.subject,
            &request.audience,
            &scope,
            issued_at,
            expires_at,
        )?;

        Ok(IssuedToken {
            token,
            scope,
            issued_at,
            expires_at,
        })
    }
}
