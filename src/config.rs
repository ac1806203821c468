use crate::audio::quality::QualityThresholds;
use crate::defaults;
use crate::error::{LectometroError, Result};
use crate::scoring::FluencyThresholds;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub texts: TextsConfig,
    pub quality: QualityThresholds,
    pub fluency: FluencyThresholds,
}

/// HTTP service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub max_upload_mb: usize,
}

/// Canonical text location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextsConfig {
    /// Directory holding `fluidez_2A.txt` and `fluidez_2B.txt`
    pub dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: defaults::BIND_ADDR.to_string(),
            max_upload_mb: defaults::MAX_UPLOAD_MB,
        }
    }
}

impl Default for TextsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(defaults::TEXTS_DIR),
        }
    }
}

impl ServerConfig {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Missing fields use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LectometroError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                LectometroError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Invalid TOML is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(LectometroError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            other => other,
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - LECTOMETRO_BIND → server.bind
    /// - LECTOMETRO_TEXTS_DIR → texts.dir
    /// - LECTOMETRO_MAX_UPLOAD_MB → server.max_upload_mb
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(bind) = std::env::var("LECTOMETRO_BIND")
            && !bind.is_empty()
        {
            self.server.bind = bind;
        }

        if let Ok(dir) = std::env::var("LECTOMETRO_TEXTS_DIR")
            && !dir.is_empty()
        {
            self.texts.dir = PathBuf::from(dir);
        }

        if let Ok(value) = std::env::var("LECTOMETRO_MAX_UPLOAD_MB")
            && !value.is_empty()
        {
            match value.parse() {
                Ok(mb) => self.server.max_upload_mb = mb,
                Err(_) => tracing::warn!(
                    value = %value,
                    "Ignoring LECTOMETRO_MAX_UPLOAD_MB: not a whole number"
                ),
            }
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/lectometro/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lectometro")
            .join("config.toml")
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        fn invalid(key: &str, message: &str) -> LectometroError {
            LectometroError::ConfigInvalidValue {
                key: key.to_string(),
                message: message.to_string(),
            }
        }

        if self.server.bind.trim().is_empty() {
            return Err(invalid("server.bind", "must not be empty"));
        }
        if self.server.max_upload_mb == 0 {
            return Err(invalid("server.max_upload_mb", "must be positive"));
        }
        if !(self.quality.min_duration_secs >= 0.0) {
            return Err(invalid("quality.min_duration_secs", "must not be negative"));
        }
        if !(self.quality.min_rms >= 0.0) {
            return Err(invalid("quality.min_rms", "must not be negative"));
        }
        if !(self.fluency.min_scorable_duration_secs >= 0.0) {
            return Err(invalid(
                "fluency.min_scorable_duration_secs",
                "must not be negative",
            ));
        }
        if !(self.fluency.regular_min_wpm > 0.0) {
            return Err(invalid("fluency.regular_min_wpm", "must be positive"));
        }
        if !(self.fluency.regular_min_wpm < self.fluency.bueno_min_wpm) {
            return Err(invalid(
                "fluency.bueno_min_wpm",
                "must be greater than fluency.regular_min_wpm",
            ));
        }
        Ok(())
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| LectometroError::Other(format!("Failed to serialize config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to serialize tests that modify environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    // SAFETY: These helpers are only used in tests with ENV_LOCK held,
    // ensuring no concurrent access to environment variables.
    fn set_env(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) }
    }

    fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) }
    }

    fn clear_lectometro_env() {
        remove_env("LECTOMETRO_BIND");
        remove_env("LECTOMETRO_TEXTS_DIR");
        remove_env("LECTOMETRO_MAX_UPLOAD_MB");
    }

    fn write_config(contents: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        temp_file
    }

    #[test]
    fn test_default_config_has_correct_values() {
        let config = Config::default();

        assert_eq!(config.server.bind, "127.0.0.1:8000");
        assert_eq!(config.server.max_upload_mb, 25);
        assert_eq!(config.texts.dir, PathBuf::from("texts"));

        assert_eq!(config.quality.min_duration_secs, 2.0);
        assert_eq!(config.quality.min_rms, 0.005);

        assert_eq!(config.fluency.bueno_min_wpm, 85.0);
        assert_eq!(config.fluency.regular_min_wpm, 55.0);
        assert_eq!(config.fluency.min_scorable_duration_secs, 0.1);

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let temp_file = write_config(
            r#"
            [server]
            bind = "0.0.0.0:9000"
            max_upload_mb = 10

            [texts]
            dir = "/srv/lectometro/textos"

            [quality]
            min_duration_secs = 3.0
            min_rms = 0.01

            [fluency]
            bueno_min_wpm = 90.0
            regular_min_wpm = 60.0
            min_scorable_duration_secs = 0.5
        "#,
        );

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.server.max_upload_mb, 10);
        assert_eq!(config.server.max_upload_bytes(), 10 * 1024 * 1024);
        assert_eq!(config.texts.dir, PathBuf::from("/srv/lectometro/textos"));
        assert_eq!(config.quality.min_duration_secs, 3.0);
        assert_eq!(config.quality.min_rms, 0.01);
        assert_eq!(config.fluency.bueno_min_wpm, 90.0);
        assert_eq!(config.fluency.regular_min_wpm, 60.0);
        assert_eq!(config.fluency.min_scorable_duration_secs, 0.5);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let temp_file = write_config(
            r#"
            [fluency]
            bueno_min_wpm = 100.0
        "#,
        );

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.fluency.bueno_min_wpm, 100.0);
        assert_eq!(config.fluency.regular_min_wpm, 55.0);
        assert_eq!(config.quality, QualityThresholds::default());
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn test_load_missing_file_is_not_found_error() {
        let result = Config::load(Path::new("/tmp/nonexistent_lectometro_config_12345.toml"));
        assert!(matches!(
            result,
            Err(LectometroError::ConfigFileNotFound { .. })
        ));
    }

    #[test]
    fn test_load_or_default_returns_default_for_missing_file() {
        let missing_path = Path::new("/tmp/nonexistent_lectometro_config_12345.toml");
        let config = Config::load_or_default(missing_path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let temp_file = write_config(
            r#"
            [server
            bind = "broken
        "#,
        );

        assert!(matches!(
            Config::load(temp_file.path()),
            Err(LectometroError::Config(_))
        ));
        assert!(Config::load_or_default(temp_file.path()).is_err());
    }

    #[test]
    fn test_env_override_bind_and_texts() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_lectometro_env();

        set_env("LECTOMETRO_BIND", "0.0.0.0:8080");
        set_env("LECTOMETRO_TEXTS_DIR", "/data/textos");
        let config = Config::default().with_env_overrides();

        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.texts.dir, PathBuf::from("/data/textos"));
        assert_eq!(config.server.max_upload_mb, 25);

        clear_lectometro_env();
    }

    #[test]
    fn test_env_override_upload_limit() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_lectometro_env();

        set_env("LECTOMETRO_MAX_UPLOAD_MB", "5");
        assert_eq!(Config::default().with_env_overrides().server.max_upload_mb, 5);

        set_env("LECTOMETRO_MAX_UPLOAD_MB", "lots");
        assert_eq!(
            Config::default().with_env_overrides().server.max_upload_mb,
            25
        );

        clear_lectometro_env();
    }

    #[test]
    fn test_env_override_empty_string_ignored() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_lectometro_env();

        set_env("LECTOMETRO_BIND", "");
        let config = Config::default().with_env_overrides();
        assert_eq!(config.server.bind, "127.0.0.1:8000");

        clear_lectometro_env();
    }

    #[test]
    fn test_validate_rejects_inverted_scale() {
        let mut config = Config::default();
        config.fluency.regular_min_wpm = 90.0;

        match config.validate() {
            Err(LectometroError::ConfigInvalidValue { key, .. }) => {
                assert_eq!(key, "fluency.bueno_min_wpm")
            }
            other => panic!("expected ConfigInvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_bad_limits() {
        let mut config = Config::default();
        config.server.max_upload_mb = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.quality.min_rms = -1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.quality.min_duration_secs = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_to_toml_roundtrips() {
        let mut config = Config::default();
        config.server.bind = "0.0.0.0:1234".to_string();
        config.fluency.bueno_min_wpm = 95.5;

        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("[fluency]"));
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_default_path_ends_with_config_toml() {
        let path = Config::default_path();
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("lectometro"));
        assert!(path_str.ends_with("config.toml"));
    }
}
