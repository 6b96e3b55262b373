use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::FetchError;

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    #[error("latitude {0} is outside -90..=90")]
    Latitude(f64),
    #[error("longitude {0} is outside -180..=180")]
    Longitude(f64),
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        // NaN fails `contains`, so it is rejected here as well.
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::Latitude(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::Longitude(lon));
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

/// Location permission state as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthorizationStatus {
    NotDetermined,
    Denied,
    Authorized,
    /// Restricted or anything the platform adds later.
    Other,
}

impl AuthorizationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorizationStatus::NotDetermined => "not-determined",
            AuthorizationStatus::Denied => "denied",
            AuthorizationStatus::Authorized => "authorized",
            AuthorizationStatus::Other => "other",
        }
    }
}

impl std::fmt::Display for AuthorizationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display-ready snapshot of one weather response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub location_name: String,
    pub temperature_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_mps: f64,
    pub description: String,
    pub icon: String,
    pub icon_url: String,
    pub fetched_at: DateTime<Utc>,
}

/// Default image host template; `{icon}` is replaced with the icon id.
pub const DEFAULT_ICON_URL_TEMPLATE: &str = "https://openweathermap.org/img/wn/{icon}@2x.png";

/// Build the icon image URL for `icon` from `template`.
pub fn icon_url(template: &str, icon: &str) -> Result<String, FetchError> {
    if icon.is_empty() {
        return Err(FetchError::InvalidUrl("empty icon identifier".to_string()));
    }

    let raw = template.replace("{icon}", icon);
    let url = Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(format!("{raw}: {e}")))?;

    Ok(url.into())
}

/// The six detail tiles shown under the main weather block, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherDetail {
    CurrentTemp,
    MaxTemp,
    MinTemp,
    FeelsLikeTemp,
    Humidity,
    Wind,
}

impl WeatherDetail {
    pub const fn all() -> &'static [WeatherDetail] {
        &[
            WeatherDetail::CurrentTemp,
            WeatherDetail::MaxTemp,
            WeatherDetail::MinTemp,
            WeatherDetail::FeelsLikeTemp,
            WeatherDetail::Humidity,
            WeatherDetail::Wind,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            WeatherDetail::CurrentTemp => "현재 온도",
            WeatherDetail::MaxTemp => "최고 온도",
            WeatherDetail::MinTemp => "최저 온도",
            WeatherDetail::FeelsLikeTemp => "체감 온도",
            WeatherDetail::Humidity => "습도",
            WeatherDetail::Wind => "풍속",
        }
    }

    pub fn value(&self, record: &WeatherRecord) -> f64 {
        match self {
            WeatherDetail::CurrentTemp => record.temperature_c,
            WeatherDetail::MaxTemp => record.temp_max_c,
            WeatherDetail::MinTemp => record.temp_min_c,
            WeatherDetail::FeelsLikeTemp => record.feels_like_c,
            WeatherDetail::Humidity => record.humidity_pct,
            WeatherDetail::Wind => record.wind_speed_mps,
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            WeatherDetail::Humidity => "%",
            WeatherDetail::Wind => "m/s",
            _ => "°C",
        }
    }

    /// Value with one decimal and unit suffix, e.g. `21.5°C`.
    pub fn format(&self, record: &WeatherRecord) -> String {
        format!("{:.1}{}", self.value(record), self.unit())
    }
}
