//! Client configuration and the options that build it.
//!
//! Options are applied in the order they are given; a later option wins over
//! an earlier one touching the same field. Version, language and unit system
//! fall back to their defaults only when no option set them.

use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, fmt, str::FromStr};
use thiserror::Error;

pub const DEFAULT_API_VERSION: &str = "v2.5";

pub const DEFAULT_HOURLY_STEPS: u16 = 48;
pub const MIN_HOURLY_STEPS: u16 = 1;
pub const MAX_HOURLY_STEPS: u16 = 360;

pub const DEFAULT_DAILY_STEPS: u8 = 5;
pub const MIN_DAILY_STEPS: u8 = 1;
pub const MAX_DAILY_STEPS: u8 = 15;

/// Error returned when a language or unit system name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}', expected one of: {expected}")]
pub struct ParseOptionError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

/// Response language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    /// Simplified Chinese.
    #[default]
    #[serde(rename = "zh_CN")]
    ZhCn,
    /// Traditional Chinese.
    #[serde(rename = "zh_TW")]
    ZhTw,
    #[serde(rename = "en_US")]
    EnUs,
    #[serde(rename = "en_GB")]
    EnGb,
    #[serde(rename = "ja")]
    Ja,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::ZhCn => "zh_CN",
            Language::ZhTw => "zh_TW",
            Language::EnUs => "en_US",
            Language::EnGb => "en_GB",
            Language::Ja => "ja",
        }
    }

    pub const fn all() -> &'static [Language] {
        &[
            Language::ZhCn,
            Language::ZhTw,
            Language::EnUs,
            Language::EnGb,
            Language::Ja,
        ]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept both `zh_CN` and `zh-cn` spellings.
        let normalized = s.replace('-', "_").to_lowercase();
        Language::all()
            .iter()
            .copied()
            .find(|lang| lang.as_str().to_lowercase() == normalized)
            .ok_or_else(|| ParseOptionError {
                kind: "language",
                value: s.to_string(),
                expected: "zh_CN, zh_TW, en_US, en_GB, ja",
            })
    }
}

/// Unit system used for every numeric field of the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitSystem {
    #[default]
    #[serde(rename = "metric")]
    Metric,
    #[serde(rename = "imperial")]
    Imperial,
    /// Scientific units (`SI`).
    #[serde(rename = "SI")]
    Si,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
            UnitSystem::Si => "SI",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Metric, UnitSystem::Imperial, UnitSystem::Si]
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitSystem::all()
            .iter()
            .copied()
            .find(|unit| unit.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseOptionError {
                kind: "unit system",
                value: s.to_string(),
                expected: "metric, imperial, SI",
            })
    }
}

/// Normalise a requested hourly step count into `1..=360`.
///
/// `None` selects the service default of 48 before clamping. Out-of-range
/// values are corrected, never rejected.
pub fn clamp_hourly_steps(steps: Option<i64>) -> u16 {
    let steps = steps.unwrap_or(i64::from(DEFAULT_HOURLY_STEPS));
    // Bounded by the clamp, the cast cannot truncate.
    steps.clamp(i64::from(MIN_HOURLY_STEPS), i64::from(MAX_HOURLY_STEPS)) as u16
}

/// Normalise a requested daily step count into `1..=15`.
///
/// `None` selects the service default of 5 before clamping.
pub fn clamp_daily_steps(steps: Option<i64>) -> u8 {
    let steps = steps.unwrap_or(i64::from(DEFAULT_DAILY_STEPS));
    steps.clamp(i64::from(MIN_DAILY_STEPS), i64::from(MAX_DAILY_STEPS)) as u8
}

/// A single named setting applied while building a [`crate::Client`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientOption {
    Version(String),
    Language(Language),
    Unit(UnitSystem),
    /// Clamped to `1..=360` when applied.
    HourlySteps(u16),
    /// Clamped to `1..=15` when applied.
    DailySteps(u8),
    Alert(bool),
}

impl ClientOption {
    pub fn version(version: impl Into<String>) -> Self {
        ClientOption::Version(version.into())
    }

    pub fn language(lang: Language) -> Self {
        ClientOption::Language(lang)
    }

    pub fn unit(unit: UnitSystem) -> Self {
        ClientOption::Unit(unit)
    }

    /// Hourly steps for the forecast target; defaults to 48, range `1..=360`.
    pub fn hourly_steps(steps: Option<i64>) -> Self {
        ClientOption::HourlySteps(clamp_hourly_steps(steps))
    }

    /// Daily steps for the forecast target; defaults to 5, range `1..=15`.
    pub fn daily_steps(steps: Option<i64>) -> Self {
        ClientOption::DailySteps(clamp_daily_steps(steps))
    }

    /// Whether forecast replies include weather alerts; defaults to `false`.
    pub fn alert(include: Option<bool>) -> Self {
        ClientOption::Alert(include.unwrap_or(false))
    }
}

/// Forecast parameters baked into the forecast base target at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ForecastDefaults {
    pub hourly_steps: Option<u16>,
    pub daily_steps: Option<u8>,
    pub include_alerts: bool,
}

/// Fully resolved client configuration. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_version: String,
    pub language: Language,
    pub unit: UnitSystem,
    pub forecast_defaults: ForecastDefaults,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_options(std::iter::empty::<ClientOption>())
    }
}

impl ClientConfig {
    /// Apply `options` in order on top of an empty configuration, then fill
    /// whatever is still unset with its default.
    pub fn from_options<I>(options: I) -> Self
    where
        I: IntoIterator,
        I::Item: Borrow<ClientOption>,
    {
        let mut pending = PendingConfig::default();
        for option in options {
            pending.apply(option.borrow());
        }
        pending.resolve()
    }
}

/// In-progress configuration: fields stay `None` until an option sets them.
#[derive(Debug, Default)]
struct PendingConfig {
    api_version: Option<String>,
    language: Option<Language>,
    unit: Option<UnitSystem>,
    forecast_defaults: ForecastDefaults,
}

impl PendingConfig {
    fn apply(&mut self, option: &ClientOption) {
        match option {
            ClientOption::Version(version) => self.api_version = Some(version.clone()),
            ClientOption::Language(lang) => self.language = Some(*lang),
            ClientOption::Unit(unit) => self.unit = Some(*unit),
            // Variants can be built directly, so clamp again here.
            ClientOption::HourlySteps(steps) => {
                self.forecast_defaults.hourly_steps =
                    Some(clamp_hourly_steps(Some(i64::from(*steps))));
            }
            ClientOption::DailySteps(steps) => {
                self.forecast_defaults.daily_steps =
                    Some(clamp_daily_steps(Some(i64::from(*steps))));
            }
            ClientOption::Alert(include) => self.forecast_defaults.include_alerts = *include,
        }
    }

    fn resolve(self) -> ClientConfig {
        ClientConfig {
            api_version: self
                .api_version
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            language: self.language.unwrap_or_default(),
            unit: self.unit.unwrap_or_default(),
            forecast_defaults: self.forecast_defaults,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_options() {
        let cfg = ClientConfig::default();

        assert_eq!(cfg.api_version, "v2.5");
        assert_eq!(cfg.language, Language::ZhCn);
        assert_eq!(cfg.unit, UnitSystem::Metric);
        assert_eq!(cfg.forecast_defaults, ForecastDefaults::default());
        assert!(!cfg.forecast_defaults.include_alerts);
    }

    #[test]
    fn last_option_wins() {
        let cfg = ClientConfig::from_options([
            ClientOption::language(Language::EnUs),
            ClientOption::unit(UnitSystem::Imperial),
            ClientOption::language(Language::Ja),
            ClientOption::version("v2.6"),
            ClientOption::hourly_steps(Some(24)),
            ClientOption::hourly_steps(Some(12)),
        ]);

        assert_eq!(cfg.language, Language::Ja);
        assert_eq!(cfg.unit, UnitSystem::Imperial);
        assert_eq!(cfg.api_version, "v2.6");
        assert_eq!(cfg.forecast_defaults.hourly_steps, Some(12));
        assert_eq!(cfg.forecast_defaults.daily_steps, None);
    }

    #[test]
    fn untouched_fields_keep_defaults() {
        let cfg = ClientConfig::from_options([ClientOption::unit(UnitSystem::Si)]);

        assert_eq!(cfg.unit, UnitSystem::Si);
        assert_eq!(cfg.language, Language::ZhCn);
        assert_eq!(cfg.api_version, DEFAULT_API_VERSION);
    }

    #[test]
    fn applying_same_option_twice_is_idempotent() {
        let once = ClientConfig::from_options([ClientOption::alert(Some(true))]);
        let twice = ClientConfig::from_options([ClientOption::alert(Some(true)), ClientOption::alert(Some(true))]);
        assert_eq!(once, twice);
    }

    #[test]
    fn hourly_steps_clamping() {
        assert_eq!(ClientOption::hourly_steps(None), ClientOption::HourlySteps(48));
        assert_eq!(ClientOption::hourly_steps(Some(0)), ClientOption::HourlySteps(1));
        assert_eq!(ClientOption::hourly_steps(Some(1000)), ClientOption::HourlySteps(360));
        assert_eq!(ClientOption::hourly_steps(Some(-5)), ClientOption::HourlySteps(1));
        assert_eq!(ClientOption::hourly_steps(Some(360)), ClientOption::HourlySteps(360));
    }

    #[test]
    fn daily_steps_clamping() {
        assert_eq!(ClientOption::daily_steps(None), ClientOption::DailySteps(5));
        assert_eq!(ClientOption::daily_steps(Some(20)), ClientOption::DailySteps(15));
        assert_eq!(ClientOption::daily_steps(Some(-3)), ClientOption::DailySteps(1));
        assert_eq!(ClientOption::daily_steps(Some(7)), ClientOption::DailySteps(7));
    }

    #[test]
    fn raw_step_variants_are_clamped_when_applied() {
        let cfg = ClientConfig::from_options([
            ClientOption::HourlySteps(9999),
            ClientOption::DailySteps(0),
        ]);
        assert_eq!(cfg.forecast_defaults.hourly_steps, Some(360));
        assert_eq!(cfg.forecast_defaults.daily_steps, Some(1));

        let cfg = ClientConfig::from_options([
            ClientOption::HourlySteps(0),
            ClientOption::DailySteps(200),
        ]);
        assert_eq!(cfg.forecast_defaults.hourly_steps, Some(1));
        assert_eq!(cfg.forecast_defaults.daily_steps, Some(15));
    }

    #[test]
    fn alert_without_argument_is_false() {
        assert_eq!(ClientOption::alert(None), ClientOption::Alert(false));
        assert_eq!(ClientOption::alert(Some(true)), ClientOption::Alert(true));
    }

    #[test]
    fn empty_version_falls_back_to_default() {
        let cfg = ClientConfig::from_options([ClientOption::version("")]);
        assert_eq!(cfg.api_version, DEFAULT_API_VERSION);
    }

    #[test]
    fn language_parse_roundtrip() {
        for lang in Language::all() {
            let parsed: Language = lang.as_str().parse().expect("roundtrip should succeed");
            assert_eq!(*lang, parsed);
        }
        assert_eq!("en-us".parse::<Language>(), Ok(Language::EnUs));
    }

    #[test]
    fn unknown_language_error() {
        let err = "klingon".parse::<Language>().unwrap_err();
        assert!(err.to_string().contains("unknown language 'klingon'"));
    }

    #[test]
    fn unit_parse_is_case_insensitive() {
        assert_eq!("si".parse::<UnitSystem>(), Ok(UnitSystem::Si));
        assert_eq!("Metric".parse::<UnitSystem>(), Ok(UnitSystem::Metric));
        assert!("furlongs".parse::<UnitSystem>().is_err());
    }

    #[test]
    fn wire_spelling_matches_as_str() {
        let json = serde_json::to_string(&Language::EnGb).unwrap();
        assert_eq!(json, "\"en_GB\"");
        let json = serde_json::to_string(&UnitSystem::Si).unwrap();
        assert_eq!(json, "\"SI\"");
    }
}
