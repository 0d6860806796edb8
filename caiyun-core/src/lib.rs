//! Client library for the Caiyun ("Colorful Clouds") weather API.
//!
//! This crate defines:
//! - Client options and the client builder
//! - The realtime and forecast queries with their status-envelope checks
//! - Typed reply documents for both endpoints
//! - On-disk configuration used by the `caiyun` binary
//!
//! ```no_run
//! use caiyun_core::{Client, ClientOption, ForecastOverrides, Language};
//!
//! # async fn run() -> Result<(), caiyun_core::CaiyunError> {
//! let client = Client::new(
//!     "TOKEN",
//!     "121.6544,25.1552",
//!     [ClientOption::language(Language::EnUs)],
//! );
//!
//! let now = client.realtime().await?;
//! println!("{} °C", now.result.realtime.temperature);
//!
//! let overrides = ForecastOverrides::new().daily_steps(Some(7));
//! let forecast = client.forecast(Some(&overrides)).await?;
//! println!("{}", forecast.result.forecast_keypoint);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod options;
pub mod query;

pub use client::{Client, ClientBuilder, DEFAULT_BASE_URL};
pub use config::{Config, ForecastSettings};
pub use error::{BoxError, CaiyunError};
pub use http::{HttpExecutor, ReqwestExecutor, TransportConfig};
pub use model::{ForecastReply, RealtimeReply, Reply};
pub use options::{ClientConfig, ClientOption, ForecastDefaults, Language, UnitSystem};
pub use query::ForecastOverrides;
