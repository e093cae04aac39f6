use thiserror::Error;

/// Why a cached payload could not be turned back into form values, or why
/// values could not be encoded.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cached payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("deobfuscated payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("cached payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum FormError {
    #[error("initial values could not be serialized: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("form values do not match the requested type: {0}")]
    Deserialize(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CacheError>;
