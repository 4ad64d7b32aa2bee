use chrono::{DateTime, Utc};
use model::{realtime_weather::RealtimeWeather, WithLocation};
use sqlx::prelude::FromRow;
use utility::id::Id;
use weather::database::Result;

use super::{location::LocationRow, DatabaseRow};

/// The current weather of a location.
/// Table: `realtime_weather`
#[derive(Debug, Clone, FromRow)]
pub struct RealtimeWeatherRow {
    pub location_code: String,
    pub temperature: i32,
    pub humidity: i32,
    pub precipitation: i32,
    pub wind_speed: i32,
    pub status: String,
    pub last_updated: DateTime<Utc>,
}

impl DatabaseRow for RealtimeWeatherRow {
    type Model = RealtimeWeather;

    fn to_model(self) -> Result<Self::Model> {
        Ok(RealtimeWeather {
            location_code: Id::new(self.location_code),
            temperature: self.temperature,
            humidity: self.humidity,
            precipitation: self.precipitation,
            wind_speed: self.wind_speed,
            status: self.status,
            last_updated: self.last_updated,
        })
    }
}

/// `realtime_weather` joined with `locations`.
#[derive(Debug, Clone, FromRow)]
pub struct LocatedWeatherRow {
    #[sqlx(flatten)]
    pub location: LocationRow,
    pub temperature: i32,
    pub humidity: i32,
    pub precipitation: i32,
    pub wind_speed: i32,
    pub weather_status: String,
    pub last_updated: DateTime<Utc>,
}

impl DatabaseRow for LocatedWeatherRow {
    type Model = WithLocation<RealtimeWeather>;

    fn to_model(self) -> Result<Self::Model> {
        let location = self.location.to_model()?;
        let weather = RealtimeWeather {
            location_code: location.id(),
            temperature: self.temperature,
            humidity: self.humidity,
            precipitation: self.precipitation,
            wind_speed: self.wind_speed,
            status: self.weather_status,
            last_updated: self.last_updated,
        };
        Ok(WithLocation::new(location, weather))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joined_row_keeps_back_reference() {
        let row = LocatedWeatherRow {
            location: LocationRow {
                code: "NYC_USA".to_owned(),
                city_name: "New York City".to_owned(),
                region_name: "New York".to_owned(),
                country_code: "US".to_owned(),
                country_name: "United States of America".to_owned(),
                enabled: true,
                status: "active".to_owned(),
            },
            temperature: -1,
            humidity: 30,
            precipitation: 40,
            wind_speed: 15,
            weather_status: "Snowy".to_owned(),
            last_updated: Utc::now(),
        };

        let weather = row.to_model().unwrap();
        assert_eq!(weather.content.location_code.raw_ref::<str>(), "NYC_USA");
        assert_eq!(weather.content.status, "Snowy");
        assert_eq!(weather.location.city_name, "New York City");
    }
}
