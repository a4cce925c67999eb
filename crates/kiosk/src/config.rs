use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{ConfigError, Environment, File, FileFormat};
use lazy_static::lazy_static;
use serde::Deserialize;
use tracing::info;
use visitor_pass::endpoint::DEFAULT_REGISTRATION_PATH;
use visitor_pass::{EndpointError, HttpEndpoint};

use crate::cli::Cli;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_TITLE: &str = "VISITOR REGISTRATION";
pub const DEFAULT_SUBTITLE: &str =
    "UNIVERSITY OF SCIENCE AND TECHNOLOGY OF SOUTHERN PHILIPPINES MONITORING SYSTEM";

const CONFIG_FILES: [(&str, FileFormat); 2] = [
    ("config.json5", FileFormat::Json5),
    ("config.toml", FileFormat::Toml),
];

#[derive(Clone, Debug, Deserialize)]
pub struct EndpointConfig {
    pub base_url: String,
    pub path: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UiConfig {
    /// Ticks per second.
    pub tick_rate: f64,
    /// Frames per second.
    pub frame_rate: f64,
    pub title: String,
    pub subtitle: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PassConfig {
    /// Edge length of exported SVG passes in pixels.
    pub qr_size: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub config_dir: PathBuf,
    pub endpoint: EndpointConfig,
    pub ui: UiConfig,
    pub pass: PassConfig,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase();
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", *PROJECT_NAME))
            .ok()
            .map(PathBuf::from);
}

impl Config {
    /// Resolve the config directory and load all layers.
    ///
    /// Directory precedence: `--config-dir`, `KIOSK_CONFIG`, `default_dir`.
    pub fn new(default_dir: &Path, cli: &Cli) -> Result<Self, ConfigError> {
        let config_dir = cli
            .config_dir
            .clone()
            .or_else(|| CONFIG_FOLDER.clone())
            .unwrap_or_else(|| default_dir.to_path_buf());
        Self::load(&config_dir, cli.endpoint.as_deref(), None)
    }

    /// Defaults, then config files in `config_dir`, then `KIOSK__*`
    /// environment variables, then the CLI endpoint override.
    ///
    /// `env` replaces the process environment when given.
    pub fn load(
        config_dir: &Path,
        endpoint_override: Option<&str>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("config_dir", config_dir.to_string_lossy().as_ref())?
            .set_default("endpoint.base_url", DEFAULT_BASE_URL)?
            .set_default("endpoint.path", DEFAULT_REGISTRATION_PATH)?
            .set_default("endpoint.timeout_secs", 10_i64)?
            .set_default("ui.tick_rate", 4.0)?
            .set_default("ui.frame_rate", 30.0)?
            .set_default("ui.title", DEFAULT_TITLE)?
            .set_default("ui.subtitle", DEFAULT_SUBTITLE)?
            .set_default("pass.qr_size", 250_i64)?;

        let mut found_config = false;
        for (file, format) in &CONFIG_FILES {
            let path = config_dir.join(file);
            if path.exists() {
                found_config = true;
            }
            builder = builder.add_source(File::from(path).format(*format).required(false));
        }
        if !found_config {
            info!(dir = %config_dir.display(), "no config file found, using defaults");
        }

        builder = builder
            .add_source(
                Environment::with_prefix(&PROJECT_NAME)
                    .prefix_separator("__")
                    .separator("__")
                    .source(env),
            )
            .set_override_option("endpoint.base_url", endpoint_override)?;

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.ui.tick_rate > 0.0 && self.ui.frame_rate > 0.0) {
            return Err(ConfigError::Message(
                "ui.tick_rate and ui.frame_rate must be positive".into(),
            ));
        }
        if self.endpoint.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "endpoint.timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn endpoint_timeout(&self) -> Duration {
        Duration::from_secs(self.endpoint.timeout_secs)
    }

    /// HTTP client for the configured registration endpoint.
    pub fn http_endpoint(&self) -> Result<HttpEndpoint, EndpointError> {
        HttpEndpoint::with_options(
            &self.endpoint.base_url,
            &self.endpoint.path,
            self.endpoint_timeout(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn no_env() -> Option<HashMap<String, String>> {
        Some(HashMap::new())
    }

    #[test]
    fn defaults_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(dir.path(), None, no_env()).unwrap();

        assert_eq!(cfg.config_dir, dir.path());
        assert_eq!(cfg.endpoint.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.endpoint.path, "/api/visitors/register");
        assert_eq!(cfg.endpoint.timeout_secs, 10);
        assert_eq!(cfg.ui.title, DEFAULT_TITLE);
        assert_eq!(cfg.pass.qr_size, 250);
        assert_eq!(
            cfg.http_endpoint().unwrap().url().as_str(),
            "http://127.0.0.1:8080/api/visitors/register"
        );
    }

    #[test]
    fn json5_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.json5"),
            r#"{
                // gate 2 kiosk
                endpoint: { base_url: "https://visitors.example.edu", timeout_secs: 3 },
                ui: { title: "GATE 2" },
            }"#,
        )
        .unwrap();

        let cfg = Config::load(dir.path(), None, no_env()).unwrap();

        assert_eq!(cfg.endpoint.base_url, "https://visitors.example.edu");
        assert_eq!(cfg.endpoint.timeout_secs, 3);
        assert_eq!(cfg.ui.title, "GATE 2");
        assert_eq!(cfg.ui.subtitle, DEFAULT_SUBTITLE);
    }

    #[test]
    fn toml_beats_json5_env_beats_files_cli_beats_all() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.json5"),
            r#"{ pass: { qr_size: 300 }, endpoint: { path: "/json5" } }"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "[endpoint]\npath = \"/toml\"\nbase_url = \"http://toml.local\"\n",
        )
        .unwrap();
        let env = HashMap::from([(
            "KIOSK__ENDPOINT__BASE_URL".to_string(),
            "http://env.local".to_string(),
        )]);

        let cfg = Config::load(dir.path(), None, Some(env.clone())).unwrap();
        assert_eq!(cfg.pass.qr_size, 300);
        assert_eq!(cfg.endpoint.path, "/toml");
        assert_eq!(cfg.endpoint.base_url, "http://env.local");

        let cfg = Config::load(dir.path(), Some("http://cli.local"), Some(env)).unwrap();
        assert_eq!(cfg.endpoint.base_url, "http://cli.local");
    }

    #[test]
    fn non_positive_rates_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "[ui]\ntick_rate = 0.0\n").unwrap();

        assert!(Config::load(dir.path(), None, no_env()).is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let env = HashMap::from([(
            "KIOSK__ENDPOINT__TIMEOUT_SECS".to_string(),
            "0".to_string(),
        )]);

        let err = Config::load(dir.path(), None, Some(env)).unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }
}
