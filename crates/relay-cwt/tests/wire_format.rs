//! Wire-format tests for relay tokens.
//!
//! Tokens are decoded here the way an independent verifier would: base64url,
//! tag 61, tag 17, then the 4-element COSE_Mac0 array, with the MAC
//! recomputed from the decoded bytes.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use minicbor::data::Type;
use minicbor::Decoder;
use pretty_assertions::assert_eq;
use relay_cwt::{
    generate_doc_token, generate_file_token, generate_token_at, Authorization, HmacKey, Resource,
    TokenIssuer, TokenRequest,
};
use sha2::Sha256;
use std::collections::BTreeMap;

const KEY: &[u8] = b"test_key_1234567890123456789012";
const KEY_ID: &str = "test-key-id";
const AUDIENCE: &str = "https://relay.example.com";

/// Decoded COSE_Mac0 parts.
struct Mac0 {
    protected: Vec<u8>,
    unprotected_len: u64,
    payload: Vec<u8>,
    tag: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
enum Claim {
    Text(String),
    Uint(u64),
    Int(i64),
    Bytes(Vec<u8>),
}

fn doc_token(authorization: &str) -> String {
    generate_doc_token(
        KEY,
        KEY_ID,
        "relay-control-plane",
        "doc123",
        "user1",
        AUDIENCE,
        authorization,
        3600,
    )
    .unwrap()
}

fn tags(token: &str) -> (u64, u64) {
    let raw = URL_SAFE_NO_PAD.decode(token).expect("token must be base64url");
    let mut dec = Decoder::new(&raw);
    let outer = dec.tag().expect("outer tag").as_u64();
    let inner = dec.tag().expect("inner tag").as_u64();
    (outer, inner)
}

fn decode_mac0(token: &str) -> Mac0 {
    let raw = URL_SAFE_NO_PAD.decode(token).expect("token must be base64url");
    let mut dec = Decoder::new(&raw);
    assert_eq!(dec.tag().unwrap().as_u64(), 61);
    assert_eq!(dec.tag().unwrap().as_u64(), 17);
    assert_eq!(dec.array().unwrap(), Some(4));

    let protected = dec.bytes().unwrap().to_vec();
    let unprotected_len = dec.map().unwrap().expect("definite map");
    let payload = dec.bytes().unwrap().to_vec();
    let tag = dec.bytes().unwrap().to_vec();
    assert_eq!(dec.position(), raw.len(), "trailing bytes");

    Mac0 {
        protected,
        unprotected_len,
        payload,
        tag,
    }
}

fn decode_map(bytes: &[u8]) -> BTreeMap<i64, Claim> {
    let mut dec = Decoder::new(bytes);
    let len = dec.map().unwrap().expect("definite map");
    let mut out = BTreeMap::new();
    for _ in 0..len {
        let key = dec.i64().unwrap();
        let value = match dec.datatype().unwrap() {
            Type::String => Claim::Text(dec.str().unwrap().to_string()),
            Type::Bytes => Claim::Bytes(dec.bytes().unwrap().to_vec()),
            Type::U8 | Type::U16 | Type::U32 | Type::U64 => Claim::Uint(dec.u64().unwrap()),
            _ => Claim::Int(dec.i64().unwrap()),
        };
        assert!(out.insert(key, value).is_none(), "duplicate key {key}");
    }
    assert_eq!(dec.position(), bytes.len());
    out
}

fn recompute_mac(protected: &[u8], payload: &[u8], key: &[u8]) -> Vec<u8> {
    let mut input = Vec::new();
    {
        let mut enc = minicbor::Encoder::new(&mut input);
        enc.array(4).unwrap();
        enc.str("MAC0").unwrap();
        enc.bytes(protected).unwrap();
        enc.bytes(&[]).unwrap(); // external_aad
        enc.bytes(payload).unwrap();
    }

    let mut mac = Hmac::<Sha256>::new_from_slice(key).unwrap();
    mac.update(&input);
    mac.finalize().into_bytes()[..8].to_vec()
}

fn scope_of(token: &str) -> String {
    match decode_map(&decode_mac0(token).payload).remove(&-80201) {
        Some(Claim::Text(scope)) => scope,
        other => panic!("scope claim missing or not text: {other:?}"),
    }
}

#[test]
fn token_decodes_to_cwt_and_cose_mac0_tags() {
    assert_eq!(tags(&doc_token("full")), (61, 17));
}

#[test]
fn cose_mac0_has_four_elements_with_empty_unprotected_map() {
    let mac0 = decode_mac0(&doc_token("full"));
    assert_eq!(mac0.unprotected_len, 0);
    assert_eq!(mac0.tag.len(), 8);
}

#[test]
fn protected_header_has_alg_and_kid_only() {
    let header = decode_map(&decode_mac0(&doc_token("full")).protected);
    assert_eq!(header.keys().copied().collect::<Vec<_>>(), vec![1, 4]);
    assert_eq!(header[&1], Claim::Uint(4));
    assert_eq!(header[&4], Claim::Bytes(KEY_ID.as_bytes().to_vec()));
}

#[test]
fn claims_have_exact_key_set() {
    let claims = decode_map(&decode_mac0(&doc_token("full")).payload);
    assert_eq!(
        claims.keys().copied().collect::<Vec<_>>(),
        vec![-80201, 1, 2, 3, 4, 6]
    );
    assert_eq!(claims[&1], Claim::Text("relay-control-plane".to_string()));
    assert_eq!(claims[&2], Claim::Text("user1".to_string()));
    assert_eq!(claims[&3], Claim::Text(AUDIENCE.to_string()));

    let (Claim::Uint(exp), Claim::Uint(iat)) = (&claims[&4], &claims[&6]) else {
        panic!("exp/iat must be unsigned integers");
    };
    assert_eq!(exp - iat, 3600);
}

#[test]
fn claims_are_written_in_ascending_declared_order() {
    let payload = decode_mac0(&doc_token("full")).payload;
    let mut dec = Decoder::new(&payload);
    let len = dec.map().unwrap().unwrap();
    let mut keys = Vec::new();
    for _ in 0..len {
        keys.push(dec.i64().unwrap());
        dec.skip().unwrap();
    }
    assert_eq!(keys, vec![1, 2, 3, 4, 6, -80201]);
}

#[test]
fn doc_scope_formats() {
    assert_eq!(scope_of(&doc_token("full")), "doc:doc123:rw");
    assert_eq!(scope_of(&doc_token("read-only")), "doc:doc123:r");
}

#[test]
fn file_scope_formats() {
    let cases = [
        ("full", "file:abc123:doc456:rw"),
        ("read-only", "file:abc123:doc456:r"),
    ];
    for (auth, expected) in cases {
        let token = generate_file_token(
            KEY,
            KEY_ID,
            "relay-control-plane",
            "doc456",
            "user1",
            AUDIENCE,
            auth,
            3600,
            "abc123",
        )
        .unwrap();
        assert_eq!(scope_of(&token), expected, "authorization {auth}");
    }
}

#[test]
fn mac_recomputes_from_decoded_parts() {
    for token in [doc_token("full"), doc_token("read-only")] {
        let mac0 = decode_mac0(&token);
        assert_eq!(recompute_mac(&mac0.protected, &mac0.payload, KEY), mac0.tag);
    }
}

#[test]
fn mac_recomputes_for_empty_key() {
    let token = generate_token_at(&[], "", "", "", "", "", 0, 0).unwrap();
    let mac0 = decode_mac0(&token);
    assert_eq!(recompute_mac(&mac0.protected, &mac0.payload, &[]), mac0.tag);
}

#[test]
fn different_key_changes_only_the_tag() {
    let token = |key: &[u8]| {
        generate_token_at(key, KEY_ID, "iss", "u", AUDIENCE, "doc:d:rw", 10, 20).unwrap()
    };
    let a = decode_mac0(&token(KEY));
    let b = decode_mac0(&token(b"another key"));

    assert_eq!(a.protected, b.protected);
    assert_eq!(a.payload, b.payload);
    assert_ne!(a.tag, b.tag);
}

#[test]
fn issuer_tokens_verify_with_configured_key() {
    let key = HmacKey::generate(32);
    let issuer = TokenIssuer::new(key.clone(), "k1").with_issuer("custom-issuer");
    let request = TokenRequest::new(
        "user9",
        AUDIENCE,
        Resource::file("h1", "d1"),
        Authorization::Full,
        60,
    );
    let issued = issuer.issue_at(&request, 1_700_000_000).unwrap();

    let mac0 = decode_mac0(&issued.token);
    assert_eq!(recompute_mac(&mac0.protected, &mac0.payload, key.as_bytes()), mac0.tag);

    let claims = decode_map(&mac0.payload);
    assert_eq!(claims[&1], Claim::Text("custom-issuer".to_string()));
    assert_eq!(claims[&4], Claim::Uint(1_700_000_060));
    assert_eq!(claims[&6], Claim::Uint(1_700_000_000));
    assert_eq!(claims[&-80201], Claim::Text("file:h1:d1:rw".to_string()));
}
