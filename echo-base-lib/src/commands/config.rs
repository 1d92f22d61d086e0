use crate::Result;
use crate::fetch::DEFAULT_ENDPOINT;
use crate::records::DEFAULT_MAX_REFERENCE_DEPTH;
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked up in the input directory
pub const CONFIG_FILE_NAME: &str = "echo_base.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the Star Wars API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Maximum time to wait for a single request
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// How many references deep `homeworld` and `species` are followed
    #[serde(default = "default_max_reference_depth")]
    pub max_reference_depth: usize,

    /// The planet catalog, relative to the input directory
    #[serde(default = "default_planets_input")]
    pub planets_input: Utf8PathBuf,

    /// The Echo Base seed document, relative to the input directory
    #[serde(default = "default_echo_base_input")]
    pub echo_base_input: Utf8PathBuf,

    /// The uninhabited planets list, relative to the output directory
    #[serde(default = "default_planets_output")]
    pub planets_output: Utf8PathBuf,

    /// The assembled Echo Base document, relative to the output directory
    #[serde(default = "default_echo_base_output")]
    pub echo_base_output: Utf8PathBuf,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

const fn default_max_reference_depth() -> usize {
    DEFAULT_MAX_REFERENCE_DEPTH
}

fn default_planets_input() -> Utf8PathBuf {
    Utf8PathBuf::from("swapi_planets-v1p0.json")
}

fn default_echo_base_input() -> Utf8PathBuf {
    Utf8PathBuf::from("swapi_echo_base-v1p0.json")
}

fn default_planets_output() -> Utf8PathBuf {
    Utf8PathBuf::from("swapi_planets_uninhabited-v1p1.json")
}

fn default_echo_base_output() -> Utf8PathBuf {
    Utf8PathBuf::from("swapi_echo_base-v1p1.json")
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit `config_path`, `echo_base.toml` in `input_dir` is used if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds invalid values
    pub fn load(input_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading echo-base configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = input_dir.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    // No config file found, use defaults
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading echo-base configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Replace the endpoint, checking the new value
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Result<Self> {
        self.endpoint = endpoint.into();
        self.validate()?;
        Ok(self)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an HTTP(S) URL, a limit is zero, or a file name is empty
    fn validate(&self) -> Result<()> {
        let endpoint = Url::parse(&self.endpoint).into_app_err_with(|| format!("endpoint '{}' is not a valid URL", self.endpoint))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(app_err!("endpoint '{}' must use http or https, got '{}'", self.endpoint, endpoint.scheme()));
        }

        if self.request_timeout.is_zero() {
            return Err(app_err!("request_timeout must be greater than zero"));
        }

        if self.max_reference_depth == 0 {
            return Err(app_err!("max_reference_depth must be at least 1"));
        }

        for (key, path) in [
            ("planets_input", &self.planets_input),
            ("echo_base_input", &self.echo_base_input),
            ("planets_output", &self.planets_output),
            ("echo_base_output", &self.echo_base_output),
        ] {
            if path.as_str().is_empty() {
                return Err(app_err!("{key} must not be empty"));
            }
        }

        if self.planets_output == self.echo_base_output {
            return Err(app_err!(
                "planets_output and echo_base_output must differ, both are '{}'",
                self.planets_output
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf8_dir(dir: &tempfile::TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
    }

    #[test]
    fn test_default_config_matches_field_defaults() {
        let from_empty: Config = toml::from_str("").unwrap();
        assert_eq!(from_empty, Config::default());
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.max_reference_depth, DEFAULT_MAX_REFERENCE_DEPTH);
        assert_eq!(config.planets_output, "swapi_planets_uninhabited-v1p1.json");
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let config = Config {
            endpoint: "not a url".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            endpoint: "ftp://swapi.dev/api".to_string(),
            ..Config::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("http"));
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let config = Config {
            request_timeout: Duration::ZERO,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            max_reference_depth: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_or_clashing_paths() {
        let config = Config {
            planets_input: Utf8PathBuf::new(),
            ..Config::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("planets_input"));

        let config = Config {
            echo_base_output: Utf8PathBuf::from("swapi_planets_uninhabited-v1p1.json"),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_endpoint() {
        let config = Config::default().with_endpoint("http://127.0.0.1:8080/api").unwrap();
        assert_eq!(config.endpoint, "http://127.0.0.1:8080/api");

        assert!(Config::default().with_endpoint("swapi").is_err());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_without_file_uses_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = Config::load(&utf8_dir(&temp_dir), None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_from_input_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = utf8_dir(&temp_dir);
        fs::write(dir.join(CONFIG_FILE_NAME), "request_timeout = \"5s\"\nmax_reference_depth = 2\n").unwrap();

        let config = Config::load(&dir, None).unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.max_reference_depth, 2);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_explicit_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = utf8_dir(&temp_dir);
        let path = dir.join("custom.toml");
        fs::write(&path, "planets_output = \"planets.json\"\n").unwrap();

        let config = Config::load(Utf8Path::new("/nonexistent"), Some(&path)).unwrap();
        assert_eq!(config.planets_output, "planets.json");
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_explicit_missing_path_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = utf8_dir(&temp_dir).join("missing.toml");
        let err = Config::load(Utf8Path::new("."), Some(&path)).unwrap_err();
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_rejects_unknown_keys() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = utf8_dir(&temp_dir);
        fs::write(dir.join(CONFIG_FILE_NAME), "retries = 3\n").unwrap();

        assert!(Config::load(&dir, None).is_err());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_rejects_invalid_values() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = utf8_dir(&temp_dir);
        fs::write(dir.join(CONFIG_FILE_NAME), "max_reference_depth = 0\n").unwrap();

        assert!(Config::load(&dir, None).is_err());
    }
}
