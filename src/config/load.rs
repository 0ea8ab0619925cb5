//! Configuration loading from files and the environment.
//!
//! The YAML file is read first; environment variables prefixed with `QUIRE_`
//! override it, using `__` between nested keys (`QUIRE_SITE__OUTPUT=dist`).

use std::collections::HashMap;
use std::path::Path;

use super::{Config, ConfigError, DEFAULT_CONFIG_FILE};

const ENV_PREFIX: &str = "QUIRE";

impl Config {
    /// Load the config from the command line argument, defaulting to `quire.yaml`
    pub async fn load_from_arg(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config_file = config_file.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
        let config_file = if config_file.is_relative() {
            std::env::current_dir()
                .map_err(ConfigError::CwdFailure)?
                .join(config_file)
        } else {
            config_file.to_path_buf()
        };

        Self::load_from_file(&config_file)
    }

    /// Load the config from a file path, applying overrides from the process
    /// environment.
    pub(crate) fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Load the config from a file path. When `env` is given it is used in
    /// place of the process environment.
    pub(crate) fn load_with_env(
        path: &Path,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let path_str = path
            .as_os_str()
            .to_str()
            .ok_or_else(|| ConfigError::EncodePath(path.to_path_buf()))?;

        let config = config::Config::builder()
            .add_source(config::File::new(path_str, config::FileFormat::Yaml))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize::<Config>()?;

        config.validate()?;
        tracing::debug!(path = %path.display(), site = %config.site.name, "Loaded config");
        Ok(config)
    }

    /// Check the values serde cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "invalid config: 'site.name' must not be empty".to_string(),
            ));
        }
        if self.markdown.heading_offset > 5 {
            return Err(ConfigError::Validation(format!(
                "invalid config: 'markdown.heading_offset' must be between 0 and 5, got {}",
                self.markdown.heading_offset
            )));
        }
        if !self.content.url_prefix.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "invalid config: 'content.url_prefix' must start with '/', got '{}'",
                self.content.url_prefix
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn write_config(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_minimal_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "site:\n  name: Kinds\n");

        let config = Config::load_with_env(&path, Some(HashMap::new())).unwrap();

        assert_eq!(config.site.name, "Kinds");
        assert_eq!(config.site.url, None);
        assert_eq!(config.site.output, PathBuf::from("_site"));
        assert_eq!(config.content.path, PathBuf::from("posts"));
        assert_eq!(config.content.url_prefix, "/posts");
        assert_eq!(config.theme.path, None);
        assert_eq!(config.markdown.heading_offset, 1);
        assert!(!config.markdown.smart_punctuation);
    }

    #[test]
    fn test_load_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
site:
  name: Kinds
  url: https://example.org
  output: public
content:
  path: articles
  url_prefix: /articles
theme:
  path: ./theme
markdown:
  heading_offset: 2
  smart_punctuation: true
"#,
        );

        let config = Config::load_with_env(&path, Some(HashMap::new())).unwrap();

        assert_eq!(config.site.url.as_deref(), Some("https://example.org"));
        assert_eq!(config.site.output, PathBuf::from("public"));
        assert_eq!(config.content.path, PathBuf::from("articles"));
        assert_eq!(config.content.url_prefix, "/articles");
        assert_eq!(config.theme.path, Some(PathBuf::from("./theme")));
        assert_eq!(config.markdown.heading_offset, 2);
        assert!(config.markdown.smart_punctuation);
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "site:\n  name: Kinds\n  output: _site\n");

        let env = HashMap::from([
            ("QUIRE_SITE__OUTPUT".to_string(), "dist".to_string()),
            ("QUIRE_MARKDOWN__HEADING_OFFSET".to_string(), "0".to_string()),
        ]);
        let config = Config::load_with_env(&path, Some(env)).unwrap();

        assert_eq!(config.site.output, PathBuf::from("dist"));
        assert_eq!(config.markdown.heading_offset, 0);
    }

    #[test]
    fn test_missing_site_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "content:\n  path: posts\n");

        let err = Config::load_with_env(&path, Some(HashMap::new())).unwrap_err();
        assert!(matches!(err, ConfigError::Deserialize(_)));
    }

    #[test]
    fn test_blank_site_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "site:\n  name: \"  \"\n");

        let err = Config::load_with_env(&path, Some(HashMap::new())).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_heading_offset_out_of_range_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "site:\n  name: Kinds\nmarkdown:\n  heading_offset: 6\n",
        );

        let err = Config::load_with_env(&path, Some(HashMap::new())).unwrap_err();
        assert!(err.to_string().contains("heading_offset"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yaml");

        assert!(Config::load_with_env(&path, Some(HashMap::new())).is_err());
    }
}
