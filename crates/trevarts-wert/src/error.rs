use thiserror::Error;

/// Errors returned while building a Wert session.
#[derive(Debug, Error)]
pub enum WertError {
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("signing error: {0}")]
    Signing(String),

    /// Only raised while loading the partner key at start-up.
    #[error("invalid private key: {0}")]
    InvalidKey(String),
}

impl WertError {
    /// True for errors the caller can fix by resubmitting different input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, WertError::InvalidQuantity(_))
    }
}
