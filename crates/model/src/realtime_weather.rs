use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utility::id::Id;
use validator::Validate;

use crate::{
    location::Location,
    validation::{ValidateOrdered, ValidationErrors},
};

/// The client supplied part of a weather report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// degree celsius
    pub temperature: i32,
    /// percent
    pub humidity: i32,
    /// percent
    pub precipitation: i32,
    /// km/h
    pub wind_speed: i32,
    pub status: String,
}

/// The current weather of a location. Each location has at most one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealtimeWeather {
    pub location_code: Id<Location>,
    pub temperature: i32,
    pub humidity: i32,
    pub precipitation: i32,
    pub wind_speed: i32,
    pub status: String,
    pub last_updated: DateTime<Utc>,
}

impl RealtimeWeather {
    pub fn new(
        location_code: Id<Location>,
        reading: WeatherReading,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            location_code,
            temperature: reading.temperature,
            humidity: reading.humidity,
            precipitation: reading.precipitation,
            wind_speed: reading.wind_speed,
            status: reading.status,
            last_updated,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RealtimeWeatherForm {
    #[validate(
        required(message = "Temperature cannot be null"),
        range(
            min = -50,
            max = 50,
            message = "Temperature must be in the range of -50 to 50 Celsius degree"
        )
    )]
    pub temperature: Option<i32>,
    #[validate(
        required(message = "Humidity cannot be null"),
        range(
            min = 0,
            max = 100,
            message = "Humidity must be in the range of 0 to 100 percentage"
        )
    )]
    pub humidity: Option<i32>,
    #[validate(
        required(message = "Precipitation cannot be null"),
        range(
            min = 0,
            max = 100,
            message = "Precipitation must be in the range of 0 to 100 percentage"
        )
    )]
    pub precipitation: Option<i32>,
    #[validate(
        required(message = "Wind speed cannot be null"),
        range(
            min = 0,
            max = 200,
            message = "Wind speed must be in the range of 0 to 200 km/h"
        )
    )]
    pub wind_speed: Option<i32>,
    #[validate(
        required(message = "Status cannot be null"),
        length(min = 3, max = 50, message = "Status must be in between 3-50 characters")
    )]
    pub status: Option<String>,
}

impl ValidateOrdered for RealtimeWeatherForm {
    const FIELDS: &'static [&'static str] = &[
        "temperature",
        "humidity",
        "precipitation",
        "wind_speed",
        "status",
    ];
}

impl RealtimeWeatherForm {
    pub fn into_reading(self) -> Result<WeatherReading, ValidationErrors> {
        self.validate_ordered()?;
        Ok(WeatherReading {
            temperature: self.temperature.unwrap_or_default(),
            humidity: self.humidity.unwrap_or_default(),
            precipitation: self.precipitation.unwrap_or_default(),
            wind_speed: self.wind_speed.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
        })
    }
}
