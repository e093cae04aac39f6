use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// `inject` found no provider and no fallback was given.
    #[error("Injection `{symbol}` not found. Component must be used within {expected}")]
    Missing { symbol: String, expected: String },
}

pub type Result<T> = std::result::Result<T, ContextError>;
