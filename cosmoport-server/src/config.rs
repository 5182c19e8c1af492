//! Server configuration loaded from the environment.

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UI_ORIGINS: &str = "http://127.0.0.1:4200,http://localhost:4200";

/// Listener and CORS settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Browser origins allowed by CORS.
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Build the configuration from `COSMOPORT_*` environment variables.
    pub fn from_env() -> Result<Self, String> {
        let host = std::env::var("COSMOPORT_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match std::env::var("COSMOPORT_PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| format!("COSMOPORT_PORT must be a u16 number, got {raw:?}"))?,
            Err(_) => DEFAULT_PORT,
        };
        let origins = std::env::var("COSMOPORT_UI_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_UI_ORIGINS.to_string());
        Ok(Self {
            host,
            port,
            allowed_origins: parse_origins(&origins),
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::env_lock;

    struct EnvGuard {
        key: &'static str,
        prev: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: Option<&str>) -> Self {
            let prev = std::env::var(key).ok();
            match value {
                Some(value) => unsafe { std::env::set_var(key, value) },
                None => unsafe { std::env::remove_var(key) },
            }
            Self { key, prev }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(prev) = self.prev.take() {
                unsafe { std::env::set_var(self.key, prev) };
            } else {
                unsafe { std::env::remove_var(self.key) };
            }
        }
    }

    #[test]
    fn defaults_apply_when_unset() {
        let _lock = env_lock();
        let _host = EnvGuard::set("COSMOPORT_HOST", None);
        let _port = EnvGuard::set("COSMOPORT_PORT", None);
        let _origins = EnvGuard::set("COSMOPORT_UI_ORIGINS", None);

        let config = ServerConfig::from_env().expect("config");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.allowed_origins.len(), 2);
    }

    #[test]
    fn overrides_are_parsed() {
        let _lock = env_lock();
        let _host = EnvGuard::set("COSMOPORT_HOST", Some("0.0.0.0"));
        let _port = EnvGuard::set("COSMOPORT_PORT", Some("9090"));
        let _origins = EnvGuard::set("COSMOPORT_UI_ORIGINS", Some(" https://fleet.test , ,"));

        let config = ServerConfig::from_env().expect("config");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9090);
        assert_eq!(config.allowed_origins, vec!["https://fleet.test".to_string()]);
    }

    #[test]
    fn invalid_port_is_reported() {
        let _lock = env_lock();
        let _port = EnvGuard::set("COSMOPORT_PORT", Some("ninety"));
        let err = ServerConfig::from_env().expect_err("invalid port");
        assert!(err.contains("COSMOPORT_PORT"));
    }
}
