use serde::{Deserialize, Serialize};

use super::{Aqi, DailyStats, DatedValue, TimedValue, Wind, parse_date, parse_timestamp};
use super::realtime::Realtime;

/// `result` of the weather (forecast) endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastResult {
    pub realtime: Option<Realtime>,
    pub minutely: Option<Minutely>,
    pub hourly: Option<Hourly>,
    pub daily: Option<Daily>,
    /// Only present when alerts were requested.
    pub alert: Option<Alert>,
    pub primary: i32,
    /// Free-text summary of the coming hours.
    pub forecast_keypoint: String,
}

/// Precipitation nowcast at minute granularity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Minutely {
    pub status: String,
    pub datasource: String,
    /// Intensity for each of the next 120 minutes.
    pub precipitation_2h: Vec<f64>,
    /// Intensity for each of the next 60 minutes.
    pub precipitation: Vec<f64>,
    /// Precipitation probability per half hour.
    pub probability: Vec<f64>,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hourly {
    pub status: String,
    pub description: String,
    pub precipitation: Vec<TimedValue<f64>>,
    pub temperature: Vec<TimedValue<f64>>,
    pub wind: Vec<HourlyWind>,
    pub humidity: Vec<TimedValue<f64>>,
    pub cloudrate: Vec<TimedValue<f64>>,
    pub skycon: Vec<TimedValue<String>>,
    pub pressure: Vec<TimedValue<f64>>,
    pub visibility: Vec<TimedValue<f64>>,
    pub dswrf: Vec<TimedValue<f64>>,
    pub air_quality: HourlyAirQuality,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HourlyWind {
    pub datetime: String,
    pub speed: f64,
    pub direction: f64,
}

impl HourlyWind {
    pub fn parsed_datetime(&self) -> Option<chrono::DateTime<chrono::FixedOffset>> {
        parse_timestamp(&self.datetime)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HourlyAirQuality {
    pub aqi: Vec<TimedValue<Aqi<i32>>>,
    pub pm25: Vec<TimedValue<i32>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Daily {
    pub status: String,
    pub astro: Vec<Astro>,
    pub precipitation: Vec<DailyStats<f64>>,
    pub temperature: Vec<DailyStats<f64>>,
    pub wind: Vec<DailyStats<Wind>>,
    pub humidity: Vec<DailyStats<f64>>,
    pub cloudrate: Vec<DailyStats<f64>>,
    pub pressure: Vec<DailyStats<f64>>,
    pub visibility: Vec<DailyStats<f64>>,
    pub dswrf: Vec<DailyStats<f64>>,
    pub air_quality: DailyAirQuality,
    pub skycon: Vec<DatedValue<String>>,
    /// Daytime phenomenon (08h-20h).
    pub skycon_08h_20h: Vec<DatedValue<String>>,
    /// Night-time phenomenon (20h-32h).
    pub skycon_20h_32h: Vec<DatedValue<String>>,
    pub life_index: DailyLifeIndex,
}

/// Sunrise and sunset of one day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Astro {
    pub date: String,
    pub sunrise: AstroTime,
    pub sunset: AstroTime,
}

impl Astro {
    pub fn parsed_date(&self) -> Option<chrono::NaiveDate> {
        parse_date(&self.date)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AstroTime {
    /// Local wall-clock time, `HH:MM`.
    pub time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyAirQuality {
    pub aqi: Vec<DailyAqi>,
    pub pm25: Vec<DailyPm25>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyAqi {
    pub date: String,
    pub max: Aqi<i32>,
    pub avg: Aqi<f64>,
    pub min: Aqi<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyPm25 {
    pub date: String,
    pub max: i32,
    pub avg: f64,
    pub min: i32,
}

/// Life indices per day. The service names two of them in camelCase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyLifeIndex {
    pub ultraviolet: Vec<DailyLifeIndexEntry>,
    #[serde(rename = "carWashing")]
    pub car_washing: Vec<DailyLifeIndexEntry>,
    pub dressing: Vec<DailyLifeIndexEntry>,
    pub comfort: Vec<DailyLifeIndexEntry>,
    #[serde(rename = "coldRisk")]
    pub cold_risk: Vec<DailyLifeIndexEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyLifeIndexEntry {
    pub date: String,
    /// Level as a string, e.g. `"3"`.
    pub index: String,
    pub desc: String,
}

/// Weather alerts for the location's administrative areas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Alert {
    pub status: String,
    pub content: Vec<AlertContent>,
    pub adcodes: Vec<AlertAdcode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertContent {
    pub province: String,
    pub city: String,
    pub county: String,
    pub location: String,
    pub status: String,
    /// Four-digit code: alert type followed by severity level.
    pub code: String,
    pub title: String,
    pub description: String,
    pub source: String,
    pub adcode: String,
    #[serde(rename = "regionId")]
    pub region_id: String,
    #[serde(rename = "alertId")]
    pub alert_id: String,
    /// Publication time, seconds since the Unix epoch.
    pub pubtimestamp: f64,
    pub latlon: Vec<f64>,
    pub request_status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertAdcode {
    pub adcode: i64,
    pub name: String,
}
