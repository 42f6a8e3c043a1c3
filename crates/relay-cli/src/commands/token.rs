//! Token issuance commands.
//!
//! `relay token doc` - Issue a document token and print its grant.
//! `relay token file` - Issue a file token and print its grant.

use anyhow::Context;
use relay_core::RelayConfig;
use relay_cwt::{
    Authorization, FileMetadata, HmacKey, IssuedToken, Resource, TokenGrant, TokenIssuer,
    TokenRequest,
};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Inputs shared by document and file tokens.
#[derive(Debug, Clone)]
pub struct IssueOptions {
    pub config: PathBuf,
    pub key: Option<String>,
    pub doc_id: String,
    pub user: String,
    pub audience: String,
    pub authorization: String,
    pub ttl: Option<String>,
}

/// Load the config file, or defaults when it does not exist.
fn load_config(path: &Path) -> anyhow::Result<RelayConfig> {
    if !path.exists() {
        warn!(config = %path.display(), "Config file not found, using defaults");
        return Ok(RelayConfig::default());
    }
    RelayConfig::from_file(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Resolve the HMAC key from `--key` or the signing configuration.
///
/// The key string can be:
/// - A path to a file containing a base64 key
/// - A base64 key directly
fn resolve_issuer(config: &RelayConfig, key: Option<&str>) -> anyhow::Result<TokenIssuer> {
    let Some(key_str) = key else {
        return TokenIssuer::from_config(&config.signing).context(
            "HMAC key not configured. Pass --key, set RELAY_HMAC_KEY, or set signing.key_file",
        );
    };

    let path = Path::new(key_str);
    let key = if path.exists() {
        HmacKey::load_from_file(path)
            .with_context(|| format!("Failed to load HMAC key from file: {}", path.display()))?
    } else {
        HmacKey::from_base64(key_str).context("Failed to parse HMAC key. Expected base64")?
    };

    Ok(TokenIssuer::new(key, config.signing.resolve_key_id())
        .with_issuer(config.signing.resolve_issuer()))
}

/// Parse a TTL like "1h", "30m", "90s" or a bare number of seconds.
fn parse_ttl(s: &str) -> anyhow::Result<u64> {
    let s = s.trim().to_lowercase();

    let (value, unit) = if let Some(days) = s.strip_suffix('d') {
        (days, 86_400)
    } else if let Some(hours) = s.strip_suffix('h') {
        (hours, 3_600)
    } else if let Some(minutes) = s.strip_suffix('m') {
        (minutes, 60)
    } else if let Some(seconds) = s.strip_suffix('s') {
        (seconds, 1)
    } else {
        (s.as_str(), 1)
    };

    value
        .parse::<u64>()?
        .checked_mul(unit)
        .context("TTL overflows")
}

fn issue(
    opts: &IssueOptions,
    resource: Resource,
) -> anyhow::Result<(RelayConfig, IssuedToken, Authorization)> {
    let config = load_config(&opts.config)?;
    let issuer = resolve_issuer(&config, opts.key.as_deref())?;

    let ttl_seconds = match &opts.ttl {
        Some(ttl) => parse_ttl(ttl).with_context(|| format!("Invalid TTL: {ttl}"))?,
        None => config.token.ttl_seconds,
    };
    let authorization = Authorization::from(opts.authorization.as_str());

    let request = TokenRequest::new(
        &opts.user,
        &opts.audience,
        resource,
        authorization,
        ttl_seconds,
    );
    let issued = issuer.issue(&request).context("Failed to generate token")?;

    Ok((config, issued, authorization))
}

/// Issue a document token and build its grant.
pub fn doc_grant(opts: &IssueOptions) -> anyhow::Result<TokenGrant> {
    let (config, issued, authorization) = issue(opts, Resource::document(&opts.doc_id))?;

    TokenGrant::for_document(
        &issued,
        &opts.audience,
        &config.provider.resolve_ws_scheme(),
        &opts.doc_id,
        authorization,
    )
    .context("Invalid provider URL")
}

/// Issue a file token and build its grant.
pub fn file_grant(opts: &IssueOptions, file: FileMetadata) -> anyhow::Result<TokenGrant> {
    let resource = Resource::file(&file.file_hash, &opts.doc_id);
    let (config, issued, authorization) = issue(opts, resource)?;

    TokenGrant::for_file(
        &issued,
        &opts.audience,
        &config.provider.resolve_ws_scheme(),
        &opts.doc_id,
        authorization,
        file,
    )
    .context("Invalid provider URL")
}

/// Issue a document token and print the grant as JSON.
pub fn doc(opts: IssueOptions) -> anyhow::Result<()> {
    let grant = doc_grant(&opts)?;
    println!("{}", serde_json::to_string_pretty(&grant)?);
    Ok(())
}

/// Issue a file token and print the grant as JSON.
pub fn file(opts: IssueOptions, file: FileMetadata) -> anyhow::Result<()> {
    let grant = file_grant(&opts, file)?;
    println!("{}", serde_json::to_string_pretty(&grant)?);
    Ok(())
}
