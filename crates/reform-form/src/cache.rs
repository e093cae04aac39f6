//! Storage-safe obfuscation of form values.
//!
//! `encode` is JSON, then a repeating-key XOR with the secret, then standard
//! padded base64. This keeps casual readers and stray edits out of the stored
//! draft; it is not encryption.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::location::Location;

/// Repeating-key XOR over bytes. An empty key leaves the input unchanged.
///
/// Pairs UTF-8 bytes, not UTF-16 code units as a browser `btoa` cipher does.
/// The two agree only when both payload and secret are ASCII; drafts holding
/// Latin-1 text or written with a non-ASCII secret by such a cipher will not
/// decode here.
pub fn xor(input: &[u8], key: &[u8]) -> Vec<u8> {
    if key.is_empty() {
        return input.to_vec();
    }
    input
        .iter()
        .zip(key.iter().cycle())
        .map(|(a, b)| a ^ b)
        .collect()
}

/// JSON, then [`xor`] with `secret`'s UTF-8 bytes, then padded base64.
pub fn encode<T: Serialize + ?Sized>(value: &T, secret: &str) -> Result<String> {
    let json = serde_json::to_string(value)?;
    Ok(STANDARD.encode(xor(json.as_bytes(), secret.as_bytes())))
}

pub fn decode<T: DeserializeOwned>(text: &str, secret: &str) -> Result<T> {
    let bytes = STANDARD.decode(text.trim())?;
    let json = String::from_utf8(xor(&bytes, secret.as_bytes()))?;
    Ok(serde_json::from_str(&json)?)
}

/// Cache slot for the current location: its path, without query or fragment.
pub fn cache_key(location: &dyn Location) -> String {
    strip_query(&location.pathname()).to_string()
}

pub(crate) fn strip_query(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}
