use alloy::primitives::Address;
use std::env;
use wert::Ed25519SessionSigner;

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_RATE_LIMIT_RPM: u64 = 120;

/// Process-wide settings, read and validated once at start-up.
#[derive(Clone)]
pub struct ServerConfig {
    /// Wert partner id echoed in every session
    pub partner_id: String,
    /// Partner signing key, loaded from `WERT_PRIVATE_KEY`
    pub signer: Ed25519SessionSigner,
    /// NFT sale contract the widget calls
    pub contract: Address,
    /// Server port
    pub port: u16,
    /// CORS allowed origins (empty = any origin)
    pub allowed_origins: Vec<String>,
    /// Rate limit requests per minute per IP
    pub rate_limit_rpm: u64,
    /// Bearer token required for /metrics
    pub metrics_token: Option<String>,
    /// Serve /metrics without a token when none is configured
    pub public_metrics: bool,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("partner_id", &self.partner_id)
            .field("signer", &self.signer)
            .field("contract", &self.contract)
            .field("port", &self.port)
            .field("allowed_origins", &self.allowed_origins)
            .field("rate_limit_rpm", &self.rate_limit_rpm)
            .field(
                "metrics_token",
                &self.metrics_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("public_metrics", &self.public_metrics)
            .finish()
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup. Missing required values fail
    /// here instead of on the first request.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let partner_id =
            var("WERT_PARTNER_ID").ok_or(ConfigError::MissingRequired("WERT_PARTNER_ID"))?;

        let private_key =
            var("WERT_PRIVATE_KEY").ok_or(ConfigError::MissingRequired("WERT_PRIVATE_KEY"))?;
        let signer = Ed25519SessionSigner::from_hex(&private_key)
            .map_err(|e| ConfigError::InvalidKey(e.to_string()))?;

        let contract_str =
            var("NFT_CONTRACT").ok_or(ConfigError::MissingRequired("NFT_CONTRACT"))?;
        let contract: Address = contract_str
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(contract_str.clone()))?;
        if contract == Address::ZERO {
            return Err(ConfigError::InvalidAddress(contract_str));
        }

        let port = match var("PORT") {
            Some(p) => p
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber("PORT", p))?,
            None => DEFAULT_PORT,
        };

        let rate_limit_rpm = match var("RATE_LIMIT_RPM") {
            Some(r) => match r.parse::<u64>() {
                Ok(0) | Err(_) => return Err(ConfigError::InvalidNumber("RATE_LIMIT_RPM", r)),
                Ok(n) => n,
            },
            None => DEFAULT_RATE_LIMIT_RPM,
        };

        let allowed_origins: Vec<String> = var("ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let metrics_token = var("METRICS_TOKEN");

        let public_metrics = var("WERT_PUBLIC_METRICS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        if allowed_origins.is_empty() {
            tracing::warn!("ALLOWED_ORIGINS not set — session endpoint accepts any origin");
        }

        Ok(Self {
            partner_id,
            signer,
            contract,
            port,
            allowed_origins,
            rate_limit_rpm,
            metrics_token,
            public_metrics,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingRequired(&'static str),

    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid value for {0}: {1}")]
    InvalidNumber(&'static str, String),
}
