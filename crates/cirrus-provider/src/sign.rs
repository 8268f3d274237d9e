//! Request signing
//!
//! The provider authenticates write calls with an `api_signature` computed
//! over the request parameters: sort the keys, join as `key=value` pairs
//! with `&`, append the API secret, and hex-encode the SHA-256 digest.
//! Empty values are excluded before signing.

use sha2::{Digest, Sha256};

/// Compute the signature for a set of request parameters.
///
/// `params` are the (key, value) pairs that will be sent alongside the
/// signature itself; `api_key`, `signature`, and empty values are never
/// part of the signed string.
pub fn sign_request(params: &[(&str, String)], api_secret: &str) -> String {
    let mut pairs: Vec<(&str, &str)> = params
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| (*k, v.as_str()))
        .collect();
    pairs.sort();

    let joined = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}
