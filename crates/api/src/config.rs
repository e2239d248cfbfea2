//! Process configuration, read once at startup and immutable afterwards.
//!
//! Values are looked up through a caller-supplied function so tests can feed a
//! map instead of mutating the process environment. A local `.env` file fills
//! in anything the process environment leaves unset.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use lumora_auth::{SigningKey, SigningKeys, StaticKey, DEFAULT_COST};
use lumora_observability::LogFormat;

const DEV_JWT_SECRET: &str = "lumora-dev-secret-do-not-use-in-production";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_KEY_ID: &str = "primary";

/// Dotenv file read by [`AppConfig::load`], relative to the working directory.
pub const DOTENV_FILE: &str = ".env";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(var: &'static str, reason: impl ToString) -> Self {
        Self::Invalid {
            var,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl core::fmt::Display for Environment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Environment::Development => f.write_str("development"),
            Environment::Production => f.write_str("production"),
        }
    }
}

/// How protected routes authenticate callers. The two modes never combine.
#[derive(Debug, Clone)]
pub enum AuthConfig {
    /// Per-account bearer tokens issued by `/login`.
    Token { signing_keys: SigningKeys },
    /// One shared key presented in `x-api-key`.
    ApiKey { key: StaticKey },
}

impl AuthConfig {
    pub fn mode(&self) -> &'static str {
        match self {
            AuthConfig::Token { .. } => "token",
            AuthConfig::ApiKey { .. } => "api_key",
        }
    }
}

pub struct AppConfig {
    pub environment: Environment,
    pub host: IpAddr,
    pub port: u16,
    pub auth: AuthConfig,
    /// Postgres URL; `None` selects the in-memory stores.
    pub database_url: Option<String>,
    pub store_timeout: Duration,
    pub bcrypt_cost: u32,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Process environment layered over `./.env` (used by the binary).
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_env_with_file(Path::new(DOTENV_FILE))
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Variables already set in the process win over the file. A missing file
    /// is not an error.
    pub fn from_env_with_file(path: &Path) -> Result<Self, ConfigError> {
        let file = read_dotenv(path)?;
        Self::from_lookup(|name| std::env::var(name).ok().or_else(|| file.get(name).cloned()))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        // NODE_ENV is honoured for deployments that still set it.
        let environment = match get("APP_ENV").or_else(|| get("NODE_ENV")).as_deref() {
            None | Some("development") | Some("dev") | Some("test") => Environment::Development,
            Some("production") | Some("prod") => Environment::Production,
            Some(other) => return Err(ConfigError::invalid("APP_ENV", format!("unknown environment '{other}'"))),
        };

        let host = match get("HOST") {
            Some(h) => h.parse().map_err(|e| ConfigError::invalid("HOST", e))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match get("PORT") {
            Some(p) => p.parse().map_err(|e| ConfigError::invalid("PORT", e))?,
            None => DEFAULT_PORT,
        };

        let auth = match get("AUTH_MODE").as_deref() {
            None | Some("token") => AuthConfig::Token {
                signing_keys: signing_keys(&get, environment)?,
            },
            Some("api_key") => {
                let raw = get("API_KEY").ok_or(ConfigError::Missing("API_KEY"))?;
                AuthConfig::ApiKey {
                    key: StaticKey::new(raw).map_err(|e| ConfigError::invalid("API_KEY", e))?,
                }
            }
            Some(other) => {
                return Err(ConfigError::invalid(
                    "AUTH_MODE",
                    format!("'{other}' (expected 'token' or 'api_key')"),
                ));
            }
        };

        let store_timeout = match get("STORE_TIMEOUT_MS") {
            Some(ms) => {
                let ms: u64 = ms.parse().map_err(|e| ConfigError::invalid("STORE_TIMEOUT_MS", e))?;
                if ms == 0 {
                    return Err(ConfigError::invalid("STORE_TIMEOUT_MS", "must be greater than zero"));
                }
                Duration::from_millis(ms)
            }
            None => Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS),
        };

        let bcrypt_cost = match get("BCRYPT_COST") {
            Some(c) => c.parse().map_err(|e| ConfigError::invalid("BCRYPT_COST", e))?,
            None => DEFAULT_COST,
        };

        let log_format = match get("LOG_FORMAT") {
            Some(f) => f.parse().map_err(|e| ConfigError::invalid("LOG_FORMAT", e))?,
            None => LogFormat::default(),
        };

        Ok(Self {
            environment,
            host,
            port,
            auth,
            database_url: get("DATABASE_URL"),
            store_timeout,
            bcrypt_cost,
            log_format,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// `JWT_SECRET` (+ `JWT_KEY_ID`) is the signing key; `JWT_PREVIOUS_KEYS`
/// lists retired keys as `kid:secret` pairs separated by commas.
fn signing_keys<G>(get: &G, environment: Environment) -> Result<SigningKeys, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let secret = match get("JWT_SECRET") {
        Some(s) => s,
        None if environment.is_production() => return Err(ConfigError::Missing("JWT_SECRET")),
        None => {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        }
    };
    let kid = get("JWT_KEY_ID").unwrap_or_else(|| DEFAULT_KEY_ID.to_string());

    let current = SigningKey::new(kid, secret.into_bytes()).map_err(|e| ConfigError::invalid("JWT_SECRET", e))?;
    let mut keys = SigningKeys::new(current);

    if let Some(previous) = get("JWT_PREVIOUS_KEYS") {
        for entry in previous.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (kid, secret) = entry
                .split_once(':')
                .ok_or_else(|| ConfigError::invalid("JWT_PREVIOUS_KEYS", "entries must look like kid:secret"))?;
            let key = SigningKey::new(kid.trim(), secret.as_bytes().to_vec())
                .map_err(|e| ConfigError::invalid("JWT_PREVIOUS_KEYS", e))?;
            keys = keys
                .with_previous(key)
                .map_err(|e| ConfigError::invalid("JWT_PREVIOUS_KEYS", e))?;
        }
    }

    Ok(keys)
}

fn read_dotenv(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    match dotenvy::from_path_iter(path) {
        Ok(entries) => entries
            .collect::<Result<HashMap<_, _>, _>>()
            .map_err(|e| ConfigError::invalid(DOTENV_FILE, e)),
        Err(e) if e.not_found() => Ok(HashMap::new()),
        Err(e) => Err(ConfigError::invalid(DOTENV_FILE, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_to_development_token_mode() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.environment, Environment::Development);
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.auth.mode(), "token");
        assert_eq!(cfg.bcrypt_cost, 10);
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.store_timeout, Duration::from_secs(5));
    }

    #[test]
    fn production_requires_jwt_secret() {
        let err = config(&[("APP_ENV", "production")]).err().unwrap();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));

        let err = config(&[("NODE_ENV", "production")]).err().unwrap();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));

        assert!(config(&[("APP_ENV", "production"), ("JWT_SECRET", "s3cret")]).is_ok());
    }

    #[test]
    fn api_key_mode_requires_key() {
        let err = config(&[("AUTH_MODE", "api_key")]).err().unwrap();
        assert!(matches!(err, ConfigError::Missing("API_KEY")));

        let cfg = config(&[("AUTH_MODE", "api_key"), ("API_KEY", "k")]).unwrap();
        match cfg.auth {
            AuthConfig::ApiKey { key } => assert!(key.check("k")),
            other => panic!("unexpected auth config: {}", other.mode()),
        }
    }

    #[test]
    fn previous_keys_are_parsed() {
        let cfg = config(&[
            ("JWT_SECRET", "current"),
            ("JWT_KEY_ID", "2026"),
            ("JWT_PREVIOUS_KEYS", "2025:old-one, 2024:older:with-colon"),
        ])
        .unwrap();
        let AuthConfig::Token { signing_keys } = cfg.auth else {
            panic!("expected token mode");
        };
        let kids: Vec<&str> = signing_keys.iter().map(|k| k.kid()).collect();
        assert_eq!(kids, vec!["2026", "2025", "2024"]);
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("AUTH_MODE", "both")]).is_err());
        assert!(config(&[("APP_ENV", "staging")]).is_err());
        assert!(config(&[("STORE_TIMEOUT_MS", "0")]).is_err());
        assert!(config(&[("LOG_FORMAT", "xml")]).is_err());
        assert!(config(&[("JWT_PREVIOUS_KEYS", "no-colon")]).is_err());
        assert!(config(&[("JWT_SECRET", "a"), ("JWT_PREVIOUS_KEYS", "primary:dup")]).is_err());
    }

    #[test]
    fn dotenv_file_fills_unset_variables() {
        let path = std::env::temp_dir().join(format!("lumora-{}.env", uuid::Uuid::now_v7()));
        std::fs::write(&path, "# local overrides\nLUMORA_UNUSED=1\nBCRYPT_COST=5\nLOG_FORMAT=pretty\n").unwrap();

        let cfg = AppConfig::from_env_with_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(cfg.bcrypt_cost, 5);
        assert_eq!(cfg.log_format, LogFormat::Pretty);
    }

    #[test]
    fn missing_dotenv_file_is_ignored() {
        let path = std::env::temp_dir().join(format!("lumora-missing-{}.env", uuid::Uuid::now_v7()));
        assert!(AppConfig::from_env_with_file(&path).is_ok());
    }
}
