use serde::Deserialize;

/// Runtime configuration. Environment variables win; an optional TOML file
/// (`GATEWAY_CONFIG_FILE`) supplies defaults below them.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: String, // "server" or "stdio"
    pub port: u16,
    pub enable_sse: bool,
    pub heartbeat_secs: u64,
    pub call_timeout_secs: u64,
    pub cortex_base_url: Option<String>,
    pub backend: BackendSettings,
}

/// Connection settings for the externally launched Snowflake-style backend
/// process. Only the supervisor reads these; request handling never does.
#[derive(Debug, Clone, Default)]
pub struct BackendSettings {
    pub command: Option<String>,
    pub account: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub warehouse: Option<String>,
    pub database: Option<String>,
    pub schema: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    mode: Option<String>,
    port: Option<u16>,
    enable_sse: Option<bool>,
    heartbeat_secs: Option<u64>,
    call_timeout_secs: Option<u64>,
    cortex_base_url: Option<String>,
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        let file = match env_nonempty("GATEWAY_CONFIG_FILE") {
            Some(path) => match std::fs::read_to_string(&path) {
                Ok(raw) => toml::from_str::<FileConfig>(&raw).unwrap_or_else(|e| {
                    tracing::warn!(path = %path, error = %e, "ignoring unparseable config file");
                    FileConfig::default()
                }),
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "ignoring unreadable config file");
                    FileConfig::default()
                }
            },
            None => FileConfig::default(),
        };

        let mode = env_nonempty("MODE")
            .or(file.mode)
            .unwrap_or_else(|| "server".into());
        let port = env_nonempty("PORT")
            .and_then(|s| s.parse::<u16>().ok())
            .or(file.port)
            .unwrap_or(8000);
        let enable_sse = env_nonempty("ENABLE_SSE")
            .map(|v| v != "0" && v.to_ascii_lowercase() != "false")
            .or(file.enable_sse)
            .unwrap_or(true);
        let heartbeat_secs = env_nonempty("SSE_HEARTBEAT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .or(file.heartbeat_secs)
            .unwrap_or(30);
        let call_timeout_secs = env_nonempty("TOOL_CALL_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .or(file.call_timeout_secs)
            .unwrap_or(30);
        let cortex_base_url = env_nonempty("CORTEX_BASE_URL").or(file.cortex_base_url);

        Self {
            mode,
            port,
            enable_sse,
            heartbeat_secs,
            call_timeout_secs,
            cortex_base_url,
            backend: BackendSettings::from_env(),
        }
    }
}

impl BackendSettings {
    pub fn from_env() -> Self {
        Self {
            command: env_nonempty("BACKEND_COMMAND"),
            account: env_nonempty("SNOWFLAKE_ACCOUNT"),
            user: env_nonempty("SNOWFLAKE_USER"),
            password: env_nonempty("SNOWFLAKE_PASSWORD"),
            warehouse: env_nonempty("SNOWFLAKE_WAREHOUSE"),
            database: env_nonempty("SNOWFLAKE_DATABASE"),
            schema: env_nonempty("SNOWFLAKE_SCHEMA"),
            role: env_nonempty("SNOWFLAKE_ROLE"),
        }
    }

    /// CLI arguments forwarded to the backend process, in the order its
    /// launcher expects them.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        let pairs = [
            ("--account", &self.account),
            ("--user", &self.user),
            ("--warehouse", &self.warehouse),
            ("--database", &self.database),
            ("--schema", &self.schema),
            ("--role", &self.role),
            ("--password", &self.password),
        ];
        for (flag, value) in pairs {
            if let Some(v) = value {
                args.push(flag.to_string());
                args.push(v.clone());
            }
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear_env() {
        for k in [
            "MODE",
            "PORT",
            "ENABLE_SSE",
            "SSE_HEARTBEAT_SECS",
            "TOOL_CALL_TIMEOUT_SECS",
            "CORTEX_BASE_URL",
            "GATEWAY_CONFIG_FILE",
            "BACKEND_COMMAND",
        ] {
            env::remove_var(k);
        }
    }

    #[test]
    #[serial]
    fn defaults_to_server_on_8000_with_sse() {
        clear_env();
        let cfg = Config::from_env();
        assert_eq!(cfg.mode, "server");
        assert_eq!(cfg.port, 8000);
        assert!(cfg.enable_sse);
        assert_eq!(cfg.heartbeat_secs, 30);
        assert_eq!(cfg.call_timeout_secs, 30);
        assert!(cfg.cortex_base_url.is_none());
    }

    #[test]
    #[serial]
    fn parses_env_overrides() {
        clear_env();
        env::set_var("MODE", "stdio");
        env::set_var("PORT", "9090");
        env::set_var("ENABLE_SSE", "0");
        env::set_var("SSE_HEARTBEAT_SECS", "5");
        env::set_var("CORTEX_BASE_URL", "http://cortex:9000");
        let cfg = Config::from_env();
        assert_eq!(cfg.mode, "stdio");
        assert_eq!(cfg.port, 9090);
        assert!(!cfg.enable_sse);
        assert_eq!(cfg.heartbeat_secs, 5);
        assert_eq!(cfg.cortex_base_url.as_deref(), Some("http://cortex:9000"));
        clear_env();
    }

    #[test]
    #[serial]
    fn file_overlay_sits_below_env() {
        clear_env();
        let dir = std::env::temp_dir();
        let path = dir.join("cortex-gateway-test-config.toml");
        std::fs::write(&path, "port = 7070\nenable_sse = false\n").unwrap();
        env::set_var("GATEWAY_CONFIG_FILE", &path);
        env::set_var("PORT", "7171");
        let cfg = Config::from_env();
        // env wins over file; file wins over default
        assert_eq!(cfg.port, 7171);
        assert!(!cfg.enable_sse);
        clear_env();
        let _ = std::fs::remove_file(path);
    }

    #[test]
    #[serial]
    fn backend_args_follow_launcher_order() {
        clear_env();
        let s = BackendSettings {
            account: Some("ACC".into()),
            warehouse: Some("WH".into()),
            ..Default::default()
        };
        assert_eq!(s.to_args(), vec!["--account", "ACC", "--warehouse", "WH"]);
    }
}
