//! Typed reply documents.
//!
//! Every struct decodes with `#[serde(default)]`: fields missing on the wire
//! keep their zero value and unknown fields are ignored. Whole sections that
//! the service may omit are `Option`s instead.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod forecast;
pub mod realtime;

pub use forecast::{
    Alert, AlertAdcode, AlertContent, Astro, AstroTime, Daily, DailyAirQuality, DailyAqi,
    DailyLifeIndex, DailyLifeIndexEntry, DailyPm25, ForecastResult, Hourly, HourlyAirQuality,
    HourlyWind, Minutely,
};
pub use realtime::{
    AirQuality, AirQualityDescription, Comfort, LifeIndex, LocalPrecipitation,
    NearestPrecipitation, Precipitation, Realtime, RealtimeResult, Ultraviolet,
};

/// Reply of the realtime (current conditions) endpoint.
pub type RealtimeReply = Reply<RealtimeResult>;

/// Reply of the weather (forecast) endpoint.
pub type ForecastReply = Reply<ForecastResult>;

/// Envelope shared by both endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reply<R> {
    pub status: String,
    pub api_version: String,
    pub api_status: String,
    pub lang: String,
    pub unit: String,
    /// `[latitude, longitude]` as echoed by the service.
    pub location: Vec<f64>,
    /// Server time of this reply, seconds since the Unix epoch (UTC).
    pub server_time: i64,
    /// Offset of the location's time zone in seconds, e.g. 28800 for UTC+8.
    pub tzshift: i64,
    pub timezone: String,
    pub result: R,
}

impl<R> Reply<R> {
    pub fn server_time_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.server_time, 0)
    }

    /// Fixed offset of the location's time zone, from `tzshift`.
    pub fn utc_offset(&self) -> Option<FixedOffset> {
        i32::try_from(self.tzshift)
            .ok()
            .and_then(FixedOffset::east_opt)
    }

    /// Server time expressed in the location's time zone.
    pub fn local_server_time(&self) -> Option<DateTime<FixedOffset>> {
        let offset = self.utc_offset()?;
        self.server_time_utc().map(|t| t.with_timezone(&offset))
    }
}

/// Wind speed and direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wind {
    /// km/h in the metric unit system.
    pub speed: f64,
    /// Degrees clockwise from north.
    pub direction: f64,
}

/// A value given for both the Chinese and the US standard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Aqi<T> {
    pub chn: T,
    pub usa: T,
}

/// One sample of an hourly series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimedValue<T> {
    pub datetime: String,
    pub value: T,
}

impl<T> TimedValue<T> {
    pub fn parsed_datetime(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(&self.datetime)
    }
}

/// A single value attached to a day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatedValue<T> {
    pub date: String,
    pub value: T,
}

impl<T> DatedValue<T> {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

/// Daily aggregate of a quantity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyStats<T> {
    pub date: String,
    pub max: T,
    pub min: T,
    pub avg: T,
}

impl<T> DailyStats<T> {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

/// Parse the service's `2019-10-19T22:00+08:00` timestamps (RFC 3339 also
/// accepted).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M%:z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
}

/// Day of a daily entry; its `date` is either a bare date or a timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    parse_timestamp(raw)
        .map(|dt| dt.date_naive())
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}
