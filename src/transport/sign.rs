//! RPC-style request signing (signature version 1.0, HMAC-SHA1).
//!
//! The canonical form is byte exact: parameters are sorted by key, form
//! encoded, and then corrected so that a space is `%20`, `*` is `%2A` and `~`
//! stays literal. Only `A-Z a-z 0-9 - _ . ~` survive unescaped.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use hmac::{Hmac, Mac};
use log::debug;
use sha1::Sha1;

use crate::transport::params::{ParamLayers, Params, Priority, SIGNATURE};

type HmacSha1 = Hmac<Sha1>;

pub const FORMAT: &str = "JSON";
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";
pub const SIGNATURE_VERSION: &str = "1.0";
const HTTP_METHOD: &str = "POST";
const NONCE_BYTES: usize = 8;

/// Protocol parameters shared by every action.
#[derive(Debug, Clone)]
pub struct CommonParams<'a> {
    action: &'a str,
    version: &'a str,
    access_key_id: &'a str,
    nonce: String,
    timestamp: String,
}

impl<'a> CommonParams<'a> {
    /// Common parameters with a fresh nonce and the current UTC timestamp.
    pub fn fresh(action: &'a str, version: &'a str, access_key_id: &'a str) -> Self {
        Self {
            action,
            version,
            access_key_id,
            nonce: generate_nonce(),
            timestamp: timestamp_now(),
        }
    }

    #[cfg(test)]
    pub fn fixed(
        action: &'a str,
        version: &'a str,
        access_key_id: &'a str,
        nonce: &str,
        timestamp: &str,
    ) -> Self {
        Self {
            action,
            version,
            access_key_id,
            nonce: nonce.to_owned(),
            timestamp: timestamp.to_owned(),
        }
    }

    fn into_params(self) -> Params {
        Params::new()
            .with("Action", self.action)
            .with("Version", self.version)
            .with("Format", FORMAT)
            .with("AccessKeyId", self.access_key_id)
            .with("SignatureMethod", SIGNATURE_METHOD)
            .with("SignatureNonce", self.nonce)
            .with("SignatureVersion", SIGNATURE_VERSION)
            .with("Timestamp", self.timestamp)
    }
}

/// A complete parameter set: sorted parameters followed by `Signature`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedParams {
    pairs: Vec<(String, String)>,
}

impl SignedParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn signature(&self) -> &str {
        self.get(SIGNATURE).unwrap_or_default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }
}

/// Merge the common layer under the action layers, canonicalize and sign.
pub fn sign(secret: &str, common: CommonParams<'_>, layers: ParamLayers) -> SignedParams {
    let action = common.action;
    let merged = layers.layer(Priority::Common, common.into_params()).merge();

    let string_to_sign = string_to_sign(&canonical_query(&merged));
    debug!(
        "signing {action} with {} parameters, string-to-sign is {} bytes",
        merged.len(),
        string_to_sign.len()
    );
    let signature = compute_signature(secret, &string_to_sign);

    let mut pairs: Vec<(String, String)> = merged.into_iter().collect();
    pairs.push((SIGNATURE.to_owned(), signature));
    SignedParams { pairs }
}

/// Percent-encode a single key or value per the vendor's table.
pub fn percent_encode(value: &str) -> String {
    let form: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
    correct_form_encoding(&form)
}

/// `key=value&...` over an already sorted map.
pub fn canonical_query(params: &BTreeMap<String, String>) -> String {
    let form = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish();
    correct_form_encoding(&form)
}

/// `POST&%2F&{encoded query}`.
pub fn string_to_sign(canonical_query: &str) -> String {
    format!(
        "{HTTP_METHOD}&{}&{}",
        percent_encode("/"),
        percent_encode(canonical_query)
    )
}

/// Base64 HMAC-SHA1 of the string-to-sign, keyed with `{secret}&`.
pub fn compute_signature(secret: &str, string_to_sign: &str) -> String {
    let key = format!("{secret}&");
    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(string_to_sign.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

// Form encoding writes a space as `+`, leaves `*` alone and escapes `~`.
// A literal `+` is already `%2B` at this point, so the replacements cannot collide.
fn correct_form_encoding(form: &str) -> String {
    form.replace('+', "%20")
        .replace('*', "%2A")
        .replace("%7E", "~")
}

fn generate_nonce() -> String {
    hex::encode(rand::random::<[u8; NONCE_BYTES]>())
}

fn timestamp_now() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
