//! Gateway configuration
//!
//! Loaded with figment in this order, later sources winning:
//! built-in defaults, an optional TOML file, `PORT`, `HOTSPOT_`-prefixed
//! variables (`HOTSPOT_ROUTER__TIMEOUT_SECS`) and finally the credential
//! variables listed in [`CREDENTIAL_ENV`].
//!
//! Credentials are taken verbatim. figment's `Env` provider parses values,
//! which would turn a password of `007` into the integer `7`.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use hotspot_routeros::RestConfig;
use serde::{Deserialize, Serialize};

use crate::AdminError;

/// Variables read as plain strings, with the config key each one sets.
/// Later entries win, so `HOTSPOT_` names override the deployment's plain names.
pub const CREDENTIAL_ENV: &[(&str, &str)] = &[
    ("MIKROTIK_HOST", "router.host"),
    ("MIKROTIK_USERNAME", "router.username"),
    ("MIKROTIK_PASSWORD", "router.password"),
    ("ADMIN_USERNAME", "admin.username"),
    ("ADMIN_PASSWORD", "admin.password"),
    ("HOTSPOT_ROUTER__HOST", "router.host"),
    ("HOTSPOT_ROUTER__USERNAME", "router.username"),
    ("HOTSPOT_ROUTER__PASSWORD", "router.password"),
    ("HOTSPOT_ADMIN__USERNAME", "admin.username"),
    ("HOTSPOT_ADMIN__PASSWORD", "admin.password"),
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminIdentity {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Address to bind, the port is taken from `port`
    pub listen_addr: String,
    pub port: u16,
    pub admin: AdminIdentity,
    pub router: RestConfig,
    /// Directory generated reports are written to and served from
    pub report_dir: PathBuf,
    /// Delay between rows of a bulk import, 0 disables pacing
    pub import_pacing_ms: u64,
    /// Session lifetime, 0 keeps a token valid until the next login
    pub session_ttl_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            port: 3000,
            admin: AdminIdentity::default(),
            router: RestConfig::default(),
            report_dir: PathBuf::from("./public/download/report"),
            import_pacing_ms: 1000,
            session_ttl_secs: 86400,
        }
    }
}

impl GatewayConfig {
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(GatewayConfig::default()));
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment
            .merge(Env::raw().only(&["PORT"]))
            .merge(Env::prefixed("HOTSPOT_").split("__"));

        for (name, key) in CREDENTIAL_ENV {
            if let Ok(value) = std::env::var(name) {
                figment = figment.merge(Serialized::default(key, value));
            }
        }
        figment
    }

    pub fn load(config_file: Option<&Path>) -> Result<Self, AdminError> {
        let config: GatewayConfig = Self::figment(config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AdminError> {
        if self.admin.username.is_empty() {
            return Err(AdminError::Config("admin username must be set (ADMIN_USERNAME)".to_string()));
        }
        if self.admin.password.is_empty() {
            return Err(AdminError::Config("admin password must be set (ADMIN_PASSWORD)".to_string()));
        }
        if self.router.host.is_empty() {
            return Err(AdminError::Config("router host must be set (MIKROTIK_HOST)".to_string()));
        }
        if self.port == 0 {
            return Err(AdminError::Config("port must not be 0".to_string()));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AdminError> {
        format!("{}:{}", self.listen_addr, self.port)
            .parse()
            .map_err(|e| AdminError::Config(format!("invalid listen address: {}", e)))
    }

    pub fn import_pacing(&self) -> Duration {
        Duration::from_millis(self.import_pacing_ms)
    }

    pub fn session_ttl(&self) -> Option<Duration> {
        (self.session_ttl_secs > 0).then(|| Duration::from_secs(self.session_ttl_secs))
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    fn valid() -> GatewayConfig {
        GatewayConfig {
            admin: AdminIdentity {
                username: "admin".to_string(),
                password: "secret".to_string(),
            },
            router: RestConfig {
                host: "192.168.88.1".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.import_pacing(), Duration::from_secs(1));
        assert_eq!(config.session_ttl(), Some(Duration::from_secs(86400)));
        assert_eq!(config.router.scheme, "https");
    }

    #[test]
    fn validate_requires_identity_and_router() {
        assert!(valid().validate().is_ok());

        let mut config = valid();
        config.admin.password.clear();
        assert!(matches!(config.validate(), Err(AdminError::Config(_))));

        let mut config = valid();
        config.router.host.clear();
        assert!(matches!(config.validate(), Err(AdminError::Config(_))));
    }

    #[test]
    fn zero_ttl_disables_expiry() {
        let mut config = valid();
        config.session_ttl_secs = 0;
        assert_eq!(config.session_ttl(), None);
    }

    #[test]
    fn socket_addr_combines_listen_and_port() {
        let mut config = valid();
        config.listen_addr = "127.0.0.1".to_string();
        config.port = 8081;
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8081");
    }

    #[test]
    fn toml_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "hotspot.toml",
                r#"
port = 4100
import_pacing_ms = 250

[admin]
username = "operator"
password = "pw"

[router]
host = "10.0.0.1"
scheme = "http"
port = 8728
"#,
            )?;

            let config: GatewayConfig = GatewayConfig::figment(Some(Path::new("hotspot.toml"))).extract()?;
            assert_eq!(config.port, 4100);
            assert_eq!(config.import_pacing_ms, 250);
            assert_eq!(config.admin.username, "operator");
            assert_eq!(config.router.port, Some(8728));
            assert_eq!(config.router.timeout_secs, 30);
            assert!(config.validate().is_ok());
            Ok(())
        });
    }

    #[test]
    fn env_credentials_are_taken_verbatim() {
        Jail::expect_with(|jail| {
            jail.set_env("ADMIN_USERNAME", "admin");
            jail.set_env("ADMIN_PASSWORD", "007");
            jail.set_env("MIKROTIK_HOST", "192.168.88.1");
            jail.set_env("MIKROTIK_USERNAME", "true");
            jail.set_env("MIKROTIK_PASSWORD", "1.50");
            jail.set_env("PORT", "8080");

            let config: GatewayConfig = GatewayConfig::figment(None).extract()?;
            assert_eq!(config.admin.username, "admin");
            assert_eq!(config.admin.password, "007");
            assert_eq!(config.router.host, "192.168.88.1");
            assert_eq!(config.router.username, "true");
            assert_eq!(config.router.password, "1.50");
            assert_eq!(config.port, 8080);
            Ok(())
        });
    }

    #[test]
    fn env_password_that_looks_like_an_array() {
        Jail::expect_with(|jail| {
            jail.set_env("ADMIN_PASSWORD", "[x]");
            jail.set_env("HOTSPOT_ROUTER__PASSWORD", "{a}");

            let config: GatewayConfig = GatewayConfig::figment(None).extract()?;
            assert_eq!(config.admin.password, "[x]");
            assert_eq!(config.router.password, "{a}");
            Ok(())
        });
    }

    #[test]
    fn prefixed_env_overrides_plain_names() {
        Jail::expect_with(|jail| {
            jail.create_file("hotspot.toml", "[admin]\npassword = \"from-file\"\n")?;
            jail.set_env("ADMIN_PASSWORD", "plain");
            jail.set_env("HOTSPOT_ADMIN__PASSWORD", "0042");
            jail.set_env("HOTSPOT_IMPORT_PACING_MS", "250");
            jail.set_env("HOTSPOT_SESSION_TTL_SECS", "0");
            jail.set_env("HOTSPOT_ROUTER__TIMEOUT_SECS", "5");

            let config: GatewayConfig = GatewayConfig::figment(Some(Path::new("hotspot.toml"))).extract()?;
            assert_eq!(config.admin.password, "0042");
            assert_eq!(config.import_pacing(), Duration::from_millis(250));
            assert_eq!(config.session_ttl(), None);
            assert_eq!(config.router.timeout_secs, 5);
            Ok(())
        });
    }
}
