use wert::{SessionService, SolCallEncoder, WidgetProfile};

use crate::config::ServerConfig;

/// Shared application state. Immutable after start-up.
pub struct AppState {
    pub sessions: SessionService,
    /// Bearer token for /metrics.
    pub metrics_token: Option<Vec<u8>>,
    pub public_metrics: bool,
}

impl AppState {
    pub fn new(sessions: SessionService) -> Self {
        Self {
            sessions,
            metrics_token: None,
            public_metrics: false,
        }
    }

    /// Production state: default widget profile, `sol!` encoder, ed25519 signer.
    pub fn from_config(config: &ServerConfig) -> Self {
        let sessions = SessionService::new(
            WidgetProfile::default(),
            config.partner_id.clone(),
            config.contract,
            SolCallEncoder,
            config.signer.clone(),
        );
        Self {
            sessions,
            metrics_token: config.metrics_token.clone().map(String::into_bytes),
            public_metrics: config.public_metrics,
        }
    }
}
