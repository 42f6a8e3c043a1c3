//! Token grants: an issued token plus the endpoints it is valid for.

use serde::Serialize;
use url::Url;

use crate::error::CwtError;
use crate::scope::Authorization;
use crate::token::IssuedToken;

/// WebSocket and HTTP base URLs of a relay provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderUrls {
    pub ws: String,
    pub http: String,
}

impl ProviderUrls {
    /// Resolve a provider URL that may lack a scheme.
    ///
    /// The HTTP scheme follows the WebSocket scheme: plain `ws` pairs with
    /// `http`, anything else with `https`.
    pub fn resolve(provider_url: &str, ws_scheme: &str) -> Result<Self, CwtError> {
        let parsed = match Url::parse(provider_url) {
            Ok(url) if url.has_host() => url,
            _ => Url::parse(&format!("http://{provider_url}")).map_err(|e| {
                CwtError::InvalidProviderUrl {
                    url: provider_url.to_string(),
                    message: e.to_string(),
                }
            })?,
        };

        let host = parsed.host_str().ok_or_else(|| CwtError::InvalidProviderUrl {
            url: provider_url.to_string(),
            message: "missing host".to_string(),
        })?;
        // `Url::port` hides a scheme's default port; keep any port the caller wrote.
        let port = if has_explicit_port(provider_url) {
            parsed.port_or_known_default()
        } else {
            None
        };
        let authority = match port {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        let path = parsed.path().trim_end_matches('/');

        let http_scheme = if ws_scheme == "ws" { "http" } else { "https" };

        Ok(Self {
            ws: format!("{ws_scheme}://{authority}{path}"),
            http: format!("{http_scheme}://{authority}{path}"),
        })
    }
}

/// Whether the authority of `text` ends in `:<digits>`.
fn has_explicit_port(text: &str) -> bool {
    let rest = text.split_once("://").map_or(text, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, host_port)| host_port);
    match host_port.rsplit_once(':') {
        Some((_, port)) => !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// Metadata echoed back for file tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub file_hash: String,
    pub content_type: String,
    pub content_length: i64,
}

/// Response body handed to clients after a token is issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenGrant {
    /// WebSocket endpoint of the document.
    pub url: String,
    /// HTTP base endpoint of the document.
    pub base_url: String,
    pub doc_id: String,
    pub token: String,
    pub authorization: Authorization,
    /// Expiry in seconds since the epoch.
    pub expiry_time: u64,
    #[serde(flatten)]
    pub file: Option<FileMetadata>,
}

impl TokenGrant {
    /// Build the grant for a document token.
    pub fn for_document(
        issued: &IssuedToken,
        provider_url: &str,
        ws_scheme: &str,
        doc_id: &str,
        authorization: Authorization,
    ) -> Result<Self, CwtError> {
        let urls = ProviderUrls::resolve(provider_url, ws_scheme)?;
        Ok(Self {
            url: format!("{}/d/{}/ws", urls.ws, doc_id),
            base_url: format!("{}/d/{}", urls.http, doc_id),
            doc_id: doc_id.to_string(),
            token: issued.token.clone(),
            authorization,
            expiry_time: issued.expires_at,
            file: None,
        })
    }

    /// Build the grant for a file token.
    pub fn for_file(
        issued: &IssuedToken,
        provider_url: &str,
        ws_scheme: &str,
        doc_id: &str,
        authorization: Authorization,
        file: FileMetadata,
    ) -> Result<Self, CwtError> {
        let mut grant = Self::for_document(issued, provider_url, ws_scheme, doc_id, authorization)?;
        grant.file = Some(file);
        Ok(grant)
    }
}
