use std::path::Path;

use super::{AppConfig, ConfigError};

/// Load configuration from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_config() {
        let result = load_config("/nonexistent/config.yaml");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_config_invalid_yaml() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let temp_file = temp_dir.path().join("config.yaml");
        std::fs::write(&temp_file, "invalid: yaml: content: [").unwrap();

        let result = load_config(&temp_file);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_valid() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let temp_file = temp_dir.path().join("config.yaml");

        let config_content = r#"
server:
  port: 9000
  host: "127.0.0.1"

upstream:
  url: "https://generativelanguage.googleapis.com"
  timeout_seconds: 120

retrieval:
  store_path: "style_db"
  top_k: 5
"#;
        std::fs::write(&temp_file, config_content).unwrap();

        let config = load_config(&temp_file).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.upstream.timeout_seconds, 120);
        assert_eq!(config.retrieval.top_k, 5);
        // not listed in the file, so the defaults apply
        assert_eq!(config.server.allowed_origins.len(), 2);
        assert_eq!(
            config.retrieval.default_embedding_model,
            "models/text-embedding-004"
        );
    }

    #[test]
    fn test_load_config_partial_sections() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let temp_file = temp_dir.path().join("config.yaml");

        std::fs::write(&temp_file, "server:\n  port: 8080\n").unwrap();

        let config = load_config(&temp_file).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.upstream.timeout_seconds, 300);
    }

    #[test]
    fn test_load_config_with_api_key() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let temp_file = temp_dir.path().join("config.yaml");

        std::fs::write(&temp_file, "upstream:\n  api_key: \"file-key\"\n").unwrap();

        let config = load_config(&temp_file).unwrap();
        assert_eq!(
            config.upstream.api_key.as_ref().map(|k| k.expose()),
            Some("file-key")
        );
    }
}
