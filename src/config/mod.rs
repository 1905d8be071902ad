mod types;

pub use types::*;

use crate::Result;
use std::env;
use tracing::debug;

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    debug!("Loading configuration from: {}", config_path);

    let config_str = tokio::fs::read_to_string(&config_path).await?;
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_base_url_parses_as_empty() {
        let config: Config = serde_yaml::from_str("client:\n  logs:\n    level: debug\n").unwrap();
        assert_eq!(config.api.base_url, "");
        assert_eq!(config.client.logs.level, "debug");
        assert_eq!(config.client.identity_path, "identity.json");
    }

    #[test]
    fn full_config_round_trip() {
        let yaml = r#"
api:
  base_url: "http://localhost:8787"
client:
  identity_path: "/tmp/dinebot-id.json"
  logs:
    level: warn
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8787");
        assert_eq!(config.client.identity_path, "/tmp/dinebot-id.json");
        assert_eq!(config.client.logs.level, "warn");
    }
}
