//! Infrastructure wiring: stores and the credential gate.

use std::sync::Arc;

use thiserror::Error;

use lumora_auth::{CredentialError, CredentialGate, GateConfig, StaticKey};
use lumora_infra::{
    AccountStore, ChildStore, InMemoryAccountStore, InMemoryChildStore, PostgresStore, StoreError,
    connect_postgres,
};

use crate::config::{AppConfig, AuthConfig};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("credential gate: {0}")]
    Gate(#[from] CredentialError),

    #[error("store: {0}")]
    Store(#[from] StoreError),
}

/// Shared stores handed to every handler.
#[derive(Clone)]
pub struct AppServices {
    pub accounts: Arc<dyn AccountStore>,
    pub children: Arc<dyn ChildStore>,
}

impl AppServices {
    pub fn in_memory() -> Self {
        Self {
            accounts: Arc::new(InMemoryAccountStore::new()),
            children: Arc::new(InMemoryChildStore::new()),
        }
    }
}

/// The credential check protecting non-public routes.
#[derive(Clone)]
pub enum AuthBackend {
    Token(CredentialGate),
    ApiKey(StaticKey),
}

pub fn build_auth(config: &AppConfig) -> Result<AuthBackend, StartupError> {
    Ok(match &config.auth {
        AuthConfig::Token { signing_keys } => {
            let gate_config = GateConfig::new(signing_keys.clone()).with_bcrypt_cost(config.bcrypt_cost);
            AuthBackend::Token(CredentialGate::new(gate_config)?)
        }
        AuthConfig::ApiKey { key } => AuthBackend::ApiKey(key.clone()),
    })
}

/// Postgres when `DATABASE_URL` is set, otherwise in-memory (dev/test).
///
/// An unreachable database fails startup instead of being logged and ignored.
pub async fn build_services(config: &AppConfig) -> Result<AppServices, StartupError> {
    let Some(url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; using in-memory stores (data is lost on restart)");
        return Ok(AppServices::in_memory());
    };

    let pool = connect_postgres(url, config.store_timeout).await?;
    let store = Arc::new(PostgresStore::new(pool, config.store_timeout));
    store.ensure_schema().await?;
    tracing::info!("connected to postgres");

    Ok(AppServices {
        accounts: store.clone(),
        children: store,
    })
}
