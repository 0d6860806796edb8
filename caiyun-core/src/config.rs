use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    client::{Client, ClientBuilder},
    options::{ClientOption, Language, UnitSystem},
};

/// Forecast defaults stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastSettings {
    pub hourly_steps: Option<i64>,
    pub daily_steps: Option<i64>,
    pub alert: Option<bool>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// token = "..."
/// location = "121.6544,25.1552"
/// lang = "en_US"
///
/// [forecast]
/// daily_steps = 7
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub token: Option<String>,

    /// `"longitude,latitude"`.
    pub location: Option<String>,

    pub api_version: Option<String>,

    /// Overrides the public endpoint host.
    pub base_url: Option<String>,

    pub lang: Option<Language>,
    pub unit: Option<UnitSystem>,

    #[serde(default)]
    pub forecast: ForecastSettings,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "caiyun", "caiyun-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Token and location, both required to build a client.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let token = non_empty(&self.token).ok_or_else(|| {
            anyhow!(
                "No API token configured.\n\
                 Hint: run `caiyun configure` and enter your token."
            )
        })?;
        let location = non_empty(&self.location).ok_or_else(|| {
            anyhow!(
                "No location configured.\n\
                 Hint: run `caiyun configure` or pass `--location <lon,lat>`."
            )
        })?;

        Ok((token, location))
    }

    /// Stored settings as client options, in a fixed order.
    pub fn client_options(&self) -> Vec<ClientOption> {
        let mut options = Vec::new();

        if let Some(version) = non_empty(&self.api_version) {
            options.push(ClientOption::version(version));
        }
        if let Some(lang) = self.lang {
            options.push(ClientOption::language(lang));
        }
        if let Some(unit) = self.unit {
            options.push(ClientOption::unit(unit));
        }
        if let Some(steps) = self.forecast.hourly_steps {
            options.push(ClientOption::hourly_steps(Some(steps)));
        }
        if let Some(steps) = self.forecast.daily_steps {
            options.push(ClientOption::daily_steps(Some(steps)));
        }
        if let Some(alert) = self.forecast.alert {
            options.push(ClientOption::alert(Some(alert)));
        }

        options
    }

    /// Builder preloaded with the stored credentials and options. Callers can
    /// append more options; those win over the stored ones.
    pub fn client_builder(&self) -> Result<ClientBuilder> {
        let (token, location) = self.credentials()?;

        let mut builder = Client::builder(token, location).options(self.client_options());
        if let Some(base_url) = non_empty(&self.base_url) {
            builder = builder.base_url(base_url);
        }

        Ok(builder)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> Config {
        Config {
            token: Some("TOKEN".into()),
            location: Some("121.6544,25.1552".into()),
            ..Default::default()
        }
    }

    #[test]
    fn credentials_error_when_token_missing() {
        let cfg = Config::default();
        let err = cfg.credentials().unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No API token configured"));
        assert!(msg.contains("Hint: run `caiyun configure`"));
    }

    #[test]
    fn credentials_error_when_location_blank() {
        let cfg = Config {
            location: Some("   ".into()),
            ..configured()
        };
        let err = cfg.credentials().unwrap_err();

        assert!(err.to_string().contains("No location configured"));
    }

    #[test]
    fn credentials_present() {
        let cfg = configured();
        assert_eq!(cfg.credentials().unwrap(), ("TOKEN", "121.6544,25.1552"));
    }

    #[test]
    fn client_options_follow_stored_settings() {
        let cfg = Config {
            api_version: Some("v2.6".into()),
            lang: Some(Language::EnGb),
            unit: Some(UnitSystem::Si),
            forecast: ForecastSettings {
                hourly_steps: Some(500),
                daily_steps: None,
                alert: Some(true),
            },
            ..configured()
        };

        assert_eq!(
            cfg.client_options(),
            vec![
                ClientOption::Version("v2.6".into()),
                ClientOption::Language(Language::EnGb),
                ClientOption::Unit(UnitSystem::Si),
                ClientOption::HourlySteps(360),
                ClientOption::Alert(true),
            ]
        );
    }

    #[test]
    fn later_options_override_stored_ones() {
        let cfg = Config {
            lang: Some(Language::Ja),
            base_url: Some("https://api.example.test".into()),
            ..configured()
        };

        let client = cfg
            .client_builder()
            .unwrap()
            .option(ClientOption::language(Language::EnUs))
            .build();

        assert_eq!(client.config().language, Language::EnUs);
        assert_eq!(
            client.realtime_target(),
            "https://api.example.test/v2.5/TOKEN/121.6544,25.1552/realtime.json?lang=en_US&unit=metric"
        );
    }

    #[test]
    fn load_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_keeps_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config {
            lang: Some(Language::ZhTw),
            unit: Some(UnitSystem::Imperial),
            forecast: ForecastSettings {
                daily_steps: Some(7),
                ..Default::default()
            },
            ..configured()
        };
        cfg.save_to(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("lang = \"zh_TW\""));
        assert!(written.contains("unit = \"imperial\""));

        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "lang = \"martian\"").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
