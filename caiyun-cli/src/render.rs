//! Human-readable output for replies.

use std::fmt::{self, Write};

use caiyun_core::{ForecastReply, RealtimeReply};

/// Readable name for a `skycon` phenomenon code.
pub fn skycon_label(code: &str) -> &str {
    match code {
        "CLEAR_DAY" | "CLEAR_NIGHT" => "Clear",
        "PARTLY_CLOUDY_DAY" | "PARTLY_CLOUDY_NIGHT" => "Partly cloudy",
        "CLOUDY" => "Cloudy",
        "LIGHT_HAZE" => "Light haze",
        "MODERATE_HAZE" => "Moderate haze",
        "HEAVY_HAZE" => "Heavy haze",
        "LIGHT_RAIN" => "Light rain",
        "MODERATE_RAIN" => "Moderate rain",
        "HEAVY_RAIN" => "Heavy rain",
        "STORM_RAIN" => "Storm rain",
        "FOG" => "Fog",
        "LIGHT_SNOW" => "Light snow",
        "MODERATE_SNOW" => "Moderate snow",
        "HEAVY_SNOW" => "Heavy snow",
        "STORM_SNOW" => "Storm snow",
        "DUST" => "Dust",
        "SAND" => "Sand",
        "WIND" => "Wind",
        other => other,
    }
}

fn local_time(reply_time: Option<chrono::DateTime<chrono::FixedOffset>>) -> String {
    reply_time
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown time".to_string())
}

pub fn realtime(reply: &RealtimeReply) -> Result<String, fmt::Error> {
    let rt = &reply.result.realtime;
    let mut out = String::new();

    writeln!(
        out,
        "{} ({}, {})",
        local_time(reply.local_server_time()),
        reply.timezone,
        reply.unit
    )?;
    writeln!(
        out,
        "{}: {:.1}° (feels like {:.1}°)",
        skycon_label(&rt.skycon),
        rt.temperature,
        rt.apparent_temperature
    )?;
    writeln!(
        out,
        "Humidity {:.0}%  Cloud cover {:.0}%  Visibility {:.1}",
        rt.humidity * 100.0,
        rt.cloudrate * 100.0,
        rt.visibility
    )?;
    writeln!(
        out,
        "Wind {:.1} from {:.0}°  Pressure {:.0}",
        rt.wind.speed, rt.wind.direction, rt.pressure
    )?;
    writeln!(
        out,
        "AQI {:.0} ({})  PM2.5 {:.0}",
        rt.air_quality.aqi.chn, rt.air_quality.description.chn, rt.air_quality.pm25
    )?;
    if !rt.life_index.comfort.desc.is_empty() {
        writeln!(
            out,
            "Comfort: {}  UV: {}",
            rt.life_index.comfort.desc, rt.life_index.ultraviolet.desc
        )?;
    }

    Ok(out)
}

pub fn forecast(reply: &ForecastReply) -> Result<String, fmt::Error> {
    let result = &reply.result;
    let mut out = String::new();

    writeln!(
        out,
        "{} ({})",
        local_time(reply.local_server_time()),
        reply.timezone
    )?;
    if !result.forecast_keypoint.is_empty() {
        writeln!(out, "{}", result.forecast_keypoint)?;
    }
    if let Some(minutely) = &result.minutely {
        if !minutely.description.is_empty() {
            writeln!(out, "Next two hours: {}", minutely.description)?;
        }
    }

    if let Some(daily) = &result.daily {
        writeln!(out)?;
        for (i, temp) in daily.temperature.iter().enumerate() {
            let day = temp
                .parsed_date()
                .map(|d| d.format("%a %m-%d").to_string())
                .unwrap_or_else(|| temp.date.clone());
            let sky = daily
                .skycon
                .get(i)
                .map(|s| skycon_label(&s.value))
                .unwrap_or("-");
            let rain = daily.precipitation.get(i).map(|p| p.avg).unwrap_or_default();

            writeln!(
                out,
                "{day:<10} {sky:<14} {:>5.1}° / {:>5.1}°  precip {rain:.2}",
                temp.min, temp.max
            )?;
        }
    }

    if let Some(alert) = &result.alert {
        for content in &alert.content {
            writeln!(out, "\n[ALERT] {}", content.title)?;
        }
    }

    Ok(out)
}
