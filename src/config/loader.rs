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
    use crate::renderer::Axis;

    #[test]
    fn test_load_missing_config() {
        let result = load_config("/nonexistent/config.yaml");
        assert!(matches!(result.unwrap_err(), ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_config_invalid_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invalid.yaml");
        std::fs::write(&path, "render: [width: oops").unwrap();

        let result = load_config(&path);
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let config_content = r#"
render:
  width: 80
  height: 40
  steps: 24
  axis: x
  ramp: " .:#"
  flip_vertical: true
  parallel: true

gif:
  scale: 4
  delay_ms: 50
  speed: 20
"#;
        std::fs::write(&path, config_content).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.render.width, 80);
        assert_eq!(config.render.height, 40);
        assert_eq!(config.render.steps, 24);
        assert_eq!(config.render.axis, Axis::X);
        assert_eq!(config.render.ramp, " .:#");
        assert!(config.render.flip_vertical);
        assert!(config.render.parallel);
        assert_eq!(config.gif.scale, 4);
        assert_eq!(config.gif.delay_ms, 50);
        assert_eq!(config.gif.speed, 20);
    }

    #[test]
    fn test_load_config_minimal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "render:\n  width: 40\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.render.width, 40);
        assert_eq!(config.render.height, 60);
        assert_eq!(config.gif, super::super::GifConfig::default());
    }

    #[test]
    fn test_load_config_unknown_axis() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "render:\n  axis: w\n").unwrap();

        assert!(matches!(load_config(&path).unwrap_err(), ConfigError::Parse(_)));
    }
}
