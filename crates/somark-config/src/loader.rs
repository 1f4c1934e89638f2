//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let mut config: Config = toml::from_str(&expanded)?;
        Self::expand_paths(&mut config);
        Ok(config)
    }

    /// Load an explicit file, or the default file when it exists, or defaults.
    ///
    /// A missing default file is not an error; a missing explicit one is.
    pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load(&path),
                _ => Ok(Config::default()),
            },
        }
    }

    /// `~/.somark/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".somark").join("config.toml"))
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();

        for cap in ENV_VAR.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    fn expand_paths(config: &mut Config) {
        for path in [
            &mut config.browser.chrome_path,
            &mut config.browser.profile_dir,
            &mut config.logging.dir,
        ]
        .into_iter()
        .flatten()
        {
            let expanded = Self::expand_path(&path.to_string_lossy());
            *path = PathBuf::from(expanded);
        }
    }

    /// Expand shell-style paths (e.g., `~/.somark`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.browser.debug_port, 9222);
        assert_eq!(config.marking.depth, 99);
    }

    #[test]
    fn test_load_full_config() {
        let content = r#"
            [browser]
            debug_port = 9333
            headless = false
            chrome_path = "/opt/chrome/chrome"

            [batch]
            concurrency = 8
            start = 100
            total = 500
            fixed_viewport = true

            [marking]
            depth = 3

            [logging]
            level = "debug"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.browser.debug_port, 9333);
        assert!(!config.browser.headless);
        assert_eq!(config.browser.chrome_path, Some(PathBuf::from("/opt/chrome/chrome")));
        assert_eq!(config.batch.concurrency, 8);
        assert_eq!(config.batch.start, 100);
        assert_eq!(config.batch.total, 500);
        assert!(config.batch.fixed_viewport);
        assert_eq!(config.marking.depth, 3);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[batch]").unwrap();
        writeln!(file, "concurrency = 2").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.batch.concurrency, 2);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/somark.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_or_default_explicit_missing_is_error() {
        let result = ConfigLoader::load_or_default(Some(Path::new("/nonexistent/somark.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[marking]\ndepth = 5").unwrap();

        let config = ConfigLoader::load_or_default(Some(file.path())).unwrap();
        assert_eq!(config.marking.depth, 5);
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("concurrency = [unclosed");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_load_wrong_type() {
        let result = ConfigLoader::load_str("[batch]\nconcurrency = \"many\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("SOMARK_TEST_CHROME", "/usr/bin/chromium");
        }
        let config = ConfigLoader::load_str("[browser]\nchrome_path = \"${SOMARK_TEST_CHROME}\"\n").unwrap();
        assert_eq!(config.browser.chrome_path, Some(PathBuf::from("/usr/bin/chromium")));
        unsafe {
            std::env::remove_var("SOMARK_TEST_CHROME");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${SOMARK_NONEXISTENT_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let content = "value = \"no variables here\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, content);
    }

    #[test]
    fn test_tilde_paths_expanded() {
        let config = ConfigLoader::load_str("[logging]\ndir = \"~/somark-logs\"\n").unwrap();
        let dir = config.logging.dir.unwrap();
        assert!(!dir.to_string_lossy().starts_with('~'));
        assert!(dir.ends_with("somark-logs"));
    }

    #[test]
    fn test_expand_path_no_tilde() {
        let path = "/usr/local/bin";
        assert_eq!(ConfigLoader::expand_path(path), path);
    }

    #[test]
    fn test_default_path() {
        if let Some(path) = ConfigLoader::default_path() {
            assert!(path.ends_with(".somark/config.toml"));
        }
    }
}
