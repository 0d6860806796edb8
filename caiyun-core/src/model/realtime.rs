use serde::{Deserialize, Serialize};

use super::{Aqi, Wind};

/// `result` of the realtime endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimeResult {
    pub realtime: Realtime,
    pub primary: i32,
}

/// Current conditions. Also embedded in the forecast reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Realtime {
    pub status: String,
    pub temperature: f64,
    pub apparent_temperature: f64,
    pub pressure: f64,
    /// Relative humidity, `0.0..=1.0`.
    pub humidity: f64,
    /// Cloud cover, `0.0..=1.0`.
    pub cloudrate: f64,
    /// Main weather phenomenon code, e.g. `CLEAR_DAY` or `LIGHT_RAIN`.
    pub skycon: String,
    pub visibility: f64,
    /// Downward short-wave radiation flux.
    pub dswrf: f64,
    pub wind: Wind,
    pub precipitation: Precipitation,
    pub air_quality: AirQuality,
    pub life_index: LifeIndex,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Precipitation {
    pub nearest: NearestPrecipitation,
    pub local: LocalPrecipitation,
}

/// Closest precipitation band.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NearestPrecipitation {
    pub status: String,
    pub distance: f64,
    /// Radar precipitation intensity.
    pub intensity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalPrecipitation {
    pub status: String,
    pub intensity: f64,
    /// Source of the local observation (`radar`, `GFS`, ...).
    pub datasource: String,
}

/// Pollutant mass concentrations plus AQI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirQuality {
    pub pm25: f64,
    pub pm10: f64,
    pub o3: f64,
    pub no2: f64,
    pub so2: f64,
    pub co: f64,
    pub aqi: Aqi<f64>,
    pub description: AirQualityDescription,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirQualityDescription {
    pub chn: String,
    pub usa: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeIndex {
    pub ultraviolet: Ultraviolet,
    pub comfort: Comfort,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ultraviolet {
    pub index: f64,
    pub desc: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comfort {
    pub index: i32,
    pub desc: String,
}
