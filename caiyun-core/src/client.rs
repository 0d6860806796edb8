//! The weather client and its builder.

use std::{fmt, sync::Arc};

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::{
    error::CaiyunError,
    http::{HttpExecutor, ReqwestExecutor, execute_get, redact_token},
    model::{ForecastReply, RealtimeReply},
    options::{ClientConfig, ClientOption},
    query::{self, ForecastOverrides, apply_overrides},
};

pub const DEFAULT_BASE_URL: &str = "https://api.caiyunapp.com";

/// Collects options and collaborators for a [`Client`].
#[derive(Debug)]
pub struct ClientBuilder {
    token: String,
    coordinates: String,
    options: Vec<ClientOption>,
    base_url: String,
    http: Option<Arc<dyn HttpExecutor>>,
}

impl ClientBuilder {
    /// Append one option; options are applied in the order they were added.
    pub fn option(mut self, option: ClientOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn options(mut self, options: impl IntoIterator<Item = ClientOption>) -> Self {
        self.options.extend(options);
        self
    }

    /// Point the client at another host, e.g. a mock server.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the default pooled `reqwest` transport.
    pub fn http_executor(mut self, http: Arc<dyn HttpExecutor>) -> Self {
        self.http = Some(http);
        self
    }

    /// Resolve the configuration and assemble both base targets.
    ///
    /// Never fails: token and coordinates are not validated, so a bad value
    /// only shows up as an error status when a query is made.
    pub fn build(self) -> Client {
        let config = ClientConfig::from_options(&self.options);
        let base = self.base_url.trim_end_matches('/');
        let prefix = format!(
            "{base}/{}/{}/{}",
            config.api_version, self.token, self.coordinates
        );

        let mut common = vec![
            (query::LANG.to_string(), config.language.as_str().to_string()),
            (query::UNIT.to_string(), config.unit.as_str().to_string()),
        ];
        let realtime_target = format!(
            "{prefix}/realtime.json?{}",
            query::encode_query(common.clone())
        );

        let defaults = config.forecast_defaults;
        if let Some(steps) = defaults.hourly_steps {
            common.push((query::HOURLY_STEPS.to_string(), steps.to_string()));
        }
        if let Some(steps) = defaults.daily_steps {
            common.push((query::DAILY_STEPS.to_string(), steps.to_string()));
        }
        common.push((query::ALERT.to_string(), defaults.include_alerts.to_string()));
        let forecast_target = format!("{prefix}/weather.json?{}", query::encode_query(common));

        let http = self
            .http
            .unwrap_or_else(|| Arc::new(ReqwestExecutor::new()));

        Client {
            inner: Arc::new(Inner {
                config,
                realtime_target,
                forecast_target,
                http,
            }),
        }
    }
}

/// Client for the realtime and forecast endpoints.
///
/// Read-only after construction and cheap to clone; clones share the same
/// targets and transport, so one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

struct Inner {
    config: ClientConfig,
    realtime_target: String,
    forecast_target: String,
    http: Arc<dyn HttpExecutor>,
}

impl fmt::Debug for Inner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inner")
            .field("config", &self.config)
            .field("realtime_target", &redact_token(&self.realtime_target))
            .field("forecast_target", &redact_token(&self.forecast_target))
            .field("http", &self.http)
            .finish()
    }
}

impl Client {
    /// Start building a client for `coordinates` (`"longitude,latitude"`).
    pub fn builder(token: impl Into<String>, coordinates: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            token: token.into(),
            coordinates: coordinates.into(),
            options: Vec::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http: None,
        }
    }

    /// Build a client against the public service with the default transport.
    pub fn new(
        token: impl Into<String>,
        coordinates: impl Into<String>,
        options: impl IntoIterator<Item = ClientOption>,
    ) -> Self {
        Self::builder(token, coordinates).options(options).build()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Target of the realtime endpoint, exactly as it is requested.
    pub fn realtime_target(&self) -> &str {
        &self.inner.realtime_target
    }

    /// Forecast base target carrying the build-time defaults.
    pub fn forecast_target(&self) -> &str {
        &self.inner.forecast_target
    }

    /// Target a forecast call with `overrides` would request.
    pub fn forecast_target_with(&self, overrides: Option<&ForecastOverrides>) -> String {
        apply_overrides(&self.inner.forecast_target, overrides)
    }

    /// Fetch current conditions.
    #[instrument(skip(self), err)]
    pub async fn realtime(&self) -> Result<RealtimeReply, CaiyunError> {
        let body = execute_get(self.inner.http.as_ref(), &self.inner.realtime_target).await?;
        decode(body)
    }

    /// Fetch the forecast, optionally overriding step counts and alerts for
    /// this call only.
    #[instrument(skip(self), err)]
    pub async fn forecast(
        &self,
        overrides: Option<&ForecastOverrides>,
    ) -> Result<ForecastReply, CaiyunError> {
        let target = self.forecast_target_with(overrides);
        let body = execute_get(self.inner.http.as_ref(), &target).await?;
        decode(body)
    }
}

fn decode<T: DeserializeOwned>(body: Bytes) -> Result<T, CaiyunError> {
    serde_json::from_slice(&body).map_err(|source| CaiyunError::SchemaMismatch { source, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::FakeExecutor;
    use crate::options::{Language, UnitSystem};

    const FORECAST_SAMPLE: &str = include_str!("../tests/fixtures/forecast.json");
    const REALTIME_SAMPLE: &str = include_str!("../tests/fixtures/realtime.json");

    fn client_with(http: Arc<FakeExecutor>, options: Vec<ClientOption>) -> Client {
        Client::builder("abc", "121,31")
            .base_url("https://api.example.test")
            .options(options)
            .http_executor(http)
            .build()
    }

    #[test]
    fn default_realtime_target() {
        let client = client_with(Arc::new(FakeExecutor::default()), vec![]);

        assert_eq!(
            client.realtime_target(),
            "https://api.example.test/v2.5/abc/121,31/realtime.json?lang=zh_CN&unit=metric"
        );
        assert_eq!(
            client.forecast_target(),
            "https://api.example.test/v2.5/abc/121,31/weather.json?lang=zh_CN&unit=metric&alert=false"
        );
    }

    #[test]
    fn default_base_url_is_public_service() {
        let client = Client::new("abc", "121,31", []);
        assert!(
            client
                .realtime_target()
                .starts_with("https://api.caiyunapp.com/v2.5/abc/121,31/realtime.json")
        );
    }

    #[test]
    fn options_shape_both_targets() {
        let client = client_with(
            Arc::new(FakeExecutor::default()),
            vec![
                ClientOption::version("v2.6"),
                ClientOption::language(Language::EnUs),
                ClientOption::unit(UnitSystem::Imperial),
                ClientOption::hourly_steps(Some(1000)),
                ClientOption::daily_steps(None),
                ClientOption::alert(Some(true)),
            ],
        );

        assert_eq!(
            client.realtime_target(),
            "https://api.example.test/v2.6/abc/121,31/realtime.json?lang=en_US&unit=imperial"
        );
        assert_eq!(
            client.forecast_target(),
            "https://api.example.test/v2.6/abc/121,31/weather.json?lang=en_US&unit=imperial&hourlysteps=360&dailysteps=5&alert=true"
        );
        assert_eq!(client.config().forecast_defaults.hourly_steps, Some(360));
    }

    #[test]
    fn raw_step_options_are_clamped_in_target() {
        let client = client_with(
            Arc::new(FakeExecutor::default()),
            vec![ClientOption::HourlySteps(9999), ClientOption::DailySteps(0)],
        );

        assert!(
            client
                .forecast_target()
                .ends_with("&hourlysteps=360&dailysteps=1&alert=false")
        );
    }

    #[test]
    fn debug_output_hides_token() {
        let client = Client::builder("SECRETTOKEN", "121,31")
            .http_executor(Arc::new(FakeExecutor::default()))
            .build();

        let debug = format!("{client:?}");

        assert!(!debug.contains("SECRETTOKEN"), "token leaked: {debug}");
        assert!(debug.contains("/v2.5/***/121,31/realtime.json"));
    }

    #[test]
    fn trailing_slash_on_base_url_is_trimmed() {
        let client = Client::builder("abc", "121,31")
            .base_url("http://127.0.0.1:8080/")
            .http_executor(Arc::new(FakeExecutor::default()))
            .build();

        assert!(client.realtime_target().starts_with("http://127.0.0.1:8080/v2.5/abc/"));
    }

    #[tokio::test]
    async fn realtime_requests_stored_target() {
        let http = Arc::new(FakeExecutor::replying(REALTIME_SAMPLE));
        let client = client_with(http.clone(), vec![]);

        let reply = client.realtime().await.expect("realtime should succeed");

        assert_eq!(reply.result.realtime.skycon, "PARTLY_CLOUDY_NIGHT");
        assert_eq!(http.requested(), vec![client.realtime_target().to_string()]);
    }

    #[tokio::test]
    async fn forecast_overrides_win_over_build_time_defaults() {
        let http = Arc::new(FakeExecutor::replying(FORECAST_SAMPLE));
        let client = client_with(
            http.clone(),
            vec![
                ClientOption::hourly_steps(Some(100)),
                ClientOption::daily_steps(Some(10)),
                ClientOption::alert(Some(false)),
            ],
        );
        let overrides = ForecastOverrides::new()
            .hourly_steps(Some(6))
            .daily_steps(Some(3))
            .include_alerts(true);

        client.forecast(Some(&overrides)).await.expect("forecast should succeed");

        let requested = http.requested();
        assert_eq!(requested.len(), 1);
        assert!(requested[0].contains("hourlysteps=6&dailysteps=3&alert=true"));
    }

    #[tokio::test]
    async fn forecast_without_overrides_resets_alert() {
        let http = Arc::new(FakeExecutor::replying(FORECAST_SAMPLE));
        let client = client_with(
            http.clone(),
            vec![ClientOption::daily_steps(Some(7)), ClientOption::alert(Some(true))],
        );

        client.forecast(None).await.expect("forecast should succeed");

        assert!(client.forecast_target().ends_with("dailysteps=7&alert=true"));
        assert!(http.requested()[0].ends_with("dailysteps=7&alert=false"));
    }

    #[tokio::test]
    async fn overrides_do_not_persist_between_calls() {
        let http = Arc::new(FakeExecutor::replying(FORECAST_SAMPLE));
        let client = client_with(http.clone(), vec![]);
        let base = client.forecast_target().to_string();

        let overrides = ForecastOverrides::new().hourly_steps(Some(12)).include_alerts(true);
        client.forecast(Some(&overrides)).await.unwrap();
        client.forecast(None).await.unwrap();

        let requested = http.requested();
        assert!(requested[0].contains("hourlysteps=12"));
        assert!(!requested[1].contains("hourlysteps"));
        assert_eq!(requested[1], base);
        assert_eq!(client.forecast_target(), base);
    }

    #[tokio::test]
    async fn concurrent_calls_keep_their_own_parameters() {
        let http = Arc::new(FakeExecutor::replying(FORECAST_SAMPLE));
        let client = client_with(http.clone(), vec![]);

        let a = ForecastOverrides::new().hourly_steps(Some(6)).include_alerts(true);
        let b = ForecastOverrides::new().daily_steps(Some(9));

        let (first, second) = {
            let (ca, cb) = (client.clone(), client.clone());
            tokio::join!(
                tokio::spawn(async move { ca.forecast(Some(&a)).await.map(|_| ()) }),
                tokio::spawn(async move { cb.forecast(Some(&b)).await.map(|_| ()) }),
            )
        };
        first.unwrap().unwrap();
        second.unwrap().unwrap();

        let requested = http.requested();
        assert_eq!(requested.len(), 2);
        let with_hourly = requested.iter().find(|u| u.contains("hourlysteps=6")).unwrap();
        let with_daily = requested.iter().find(|u| u.contains("dailysteps=9")).unwrap();
        assert!(with_hourly.ends_with("alert=true"));
        assert!(!with_hourly.contains("dailysteps"));
        assert!(with_daily.ends_with("alert=false"));
        assert!(!with_daily.contains("hourlysteps"));
    }

    #[tokio::test]
    async fn remote_failure_is_not_schema_mismatch() {
        let body = r#"{"status":"failed","error":"quota exceeded"}"#;
        let client = client_with(Arc::new(FakeExecutor::replying(body)), vec![]);

        let err = client.forecast(None).await.unwrap_err();

        assert!(matches!(err, CaiyunError::RemoteStatus { .. }), "got {err:?}");
        assert_eq!(err.body_text().as_deref(), Some(body));
    }

    #[tokio::test]
    async fn wrong_payload_shape_is_schema_mismatch() {
        let body = r#"{"status":"ok","result":{"realtime":{"temperature":"hot"}}}"#;
        let client = client_with(Arc::new(FakeExecutor::replying(body)), vec![]);

        let err = client.realtime().await.unwrap_err();

        assert!(matches!(err, CaiyunError::SchemaMismatch { .. }), "got {err:?}");
        assert_eq!(err.body_text().as_deref(), Some(body));
    }

    #[tokio::test]
    async fn forecast_without_minutely_decodes() {
        let body = r#"{"status":"ok","result":{"forecast_keypoint":"晴","daily":{"status":"ok"}}}"#;
        let client = client_with(Arc::new(FakeExecutor::replying(body)), vec![]);

        let reply = client.forecast(None).await.expect("partial reply should decode");

        assert!(reply.result.minutely.is_none());
        assert_eq!(reply.result.daily.map(|d| d.status).as_deref(), Some("ok"));
    }
}
