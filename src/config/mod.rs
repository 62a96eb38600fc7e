// Configuration module entry point
// Loads layered configuration and holds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{
    Config, GithubConfig, HealthConfig, HttpConfig, LoggingConfig, PerformanceConfig,
    RoutesConfig, ServerConfig,
};

/// Environment variable prefix, e.g. `AUTOINDEX_GITHUB__OWNER`
const ENV_PREFIX: &str = "AUTOINDEX";

/// Fallback secret name for the upstream token
const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

type Builder = config::ConfigBuilder<config::builder::DefaultState>;

impl Config {
    /// Load configuration from specified file path (extension optional)
    /// A missing file is not an error; environment variables override it
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            );

        Self::from_builder(builder, std::env::var(TOKEN_ENV_VAR).ok())
    }

    /// Apply defaults, deserialize and validate
    fn from_builder(
        builder: Builder,
        fallback_token: Option<String>,
    ) -> Result<Self, config::ConfigError> {
        let settings = with_defaults(builder)?.build()?;
        let mut cfg: Self = settings.try_deserialize()?;
        cfg.github.token = resolve_token(cfg.github.token.take(), fallback_token);
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.github.owner.trim().is_empty() {
            return Err(config::ConfigError::Message(format!(
                "github.owner must be set ({ENV_PREFIX}_GITHUB__OWNER)"
            )));
        }
        if self.github.repo.trim().is_empty() {
            return Err(config::ConfigError::Message(format!(
                "github.repo must be set ({ENV_PREFIX}_GITHUB__REPO)"
            )));
        }
        if self.github.branch.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "github.branch must not be empty".to_string(),
            ));
        }
        let api_base = url::Url::parse(&self.github.api_base).map_err(|e| {
            config::ConfigError::Message(format!(
                "Invalid github.api_base '{}': {e}",
                self.github.api_base
            ))
        })?;
        if api_base.cannot_be_a_base() {
            return Err(config::ConfigError::Message(format!(
                "github.api_base '{}' cannot carry a path",
                self.github.api_base
            )));
        }
        self.get_socket_addr().map_err(config::ConfigError::Message)?;
        Ok(())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

fn with_defaults(builder: Builder) -> Result<Builder, config::ConfigError> {
    builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("logging.level", "info")?
        .set_default("logging.access_log", true)?
        .set_default("logging.access_log_format", "combined")?
        .set_default("performance.keep_alive_timeout", 75)?
        .set_default("performance.read_timeout", 30)?
        .set_default("performance.write_timeout", 30)?
        .set_default("http.server_name", "gh-autoindex")?
        .set_default("http.enable_cors", false)?
        .set_default("github.owner", "")?
        .set_default("github.repo", "")?
        .set_default("github.branch", "main")?
        .set_default("github.api_base", "https://api.github.com")?
        .set_default("github.user_agent", "gh-autoindex")?
        .set_default("github.timeout_secs", 30)
}

/// Configured token wins; an empty value counts as absent
fn resolve_token(configured: Option<String>, fallback: Option<String>) -> Option<String> {
    configured
        .filter(|t| !t.trim().is_empty())
        .or_else(|| fallback.filter(|t| !t.trim().is_empty()))
}

#[cfg(test)]
impl Config {
    /// Configuration bound to `octo/pics@main` behind a mock API base
    pub fn for_tests(api_base: &str) -> Self {
        let toml = format!(
            "[github]\nowner = \"octo\"\nrepo = \"pics\"\napi_base = \"{api_base}\"\ntimeout_secs = 5\n\
             [logging]\naccess_log = false\n"
        );
        let builder = config::Config::builder()
            .add_source(config::File::from_str(&toml, config::FileFormat::Toml));
        Self::from_builder(builder, None).expect("test configuration must load")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_toml(toml: &str, fallback_token: Option<&str>) -> Result<Config, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml));
        Config::from_builder(builder, fallback_token.map(String::from))
    }

    #[test]
    fn test_defaults_applied() {
        let cfg = load_toml("[github]\nowner = \"octo\"\nrepo = \"pics\"\n", None).unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.github.branch, "main");
        assert_eq!(cfg.github.api_base, "https://api.github.com");
        assert_eq!(cfg.github.timeout_secs, 30);
        assert!(cfg.github.token.is_none());
        assert!(cfg.routes.health.enabled);
        assert_eq!(cfg.routes.health.liveness_path, "/healthz");
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.github.target(), "octo/pics@main");
    }

    #[test]
    fn test_missing_owner_rejected() {
        let err = load_toml("[github]\nrepo = \"pics\"\n", None).unwrap_err();
        assert!(err.to_string().contains("github.owner"));
    }

    #[test]
    fn test_missing_repo_rejected() {
        let err = load_toml("[github]\nowner = \"octo\"\n", None).unwrap_err();
        assert!(err.to_string().contains("github.repo"));
    }

    #[test]
    fn test_invalid_api_base_rejected() {
        let toml = "[github]\nowner = \"octo\"\nrepo = \"pics\"\napi_base = \"not a url\"\n";
        let err = load_toml(toml, None).unwrap_err();
        assert!(err.to_string().contains("api_base"));
    }

    #[test]
    fn test_invalid_listen_address_rejected() {
        let toml = "[server]\nhost = \"not-an-ip\"\n[github]\nowner = \"octo\"\nrepo = \"pics\"\n";
        assert!(load_toml(toml, None).is_err());
    }

    #[test]
    fn test_token_fallback() {
        let cfg = load_toml("[github]\nowner = \"o\"\nrepo = \"r\"\n", Some("from-env")).unwrap();
        assert_eq!(cfg.github.token.as_deref(), Some("from-env"));

        let toml = "[github]\nowner = \"o\"\nrepo = \"r\"\ntoken = \"from-file\"\n";
        let cfg = load_toml(toml, Some("from-env")).unwrap();
        assert_eq!(cfg.github.token.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_empty_token_is_absent() {
        assert_eq!(resolve_token(Some(String::new()), None), None);
        assert_eq!(resolve_token(Some("  ".to_string()), Some(String::new())), None);
        assert_eq!(
            resolve_token(Some(String::new()), Some("t".to_string())),
            Some("t".to_string())
        );
    }
}
