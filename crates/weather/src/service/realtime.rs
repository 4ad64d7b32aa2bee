use chrono::Utc;
use log::{debug, info};
use model::{
    location::Location,
    realtime_weather::{RealtimeWeather, WeatherReading},
    WithLocation,
};
use utility::id::Id;

use crate::{
    database::{Database, DatabaseTransaction, LocationRepo, RealtimeWeatherRepo},
    geolocation::GeoLocation,
    RequestError, RequestResult,
};

use super::location_not_found;

#[derive(Debug, Clone)]
pub struct RealtimeWeatherService<D>
where
    D: Database,
{
    database: D,
}

impl<D> RealtimeWeatherService<D>
where
    D: Database,
{
    pub fn new(database: D) -> Self {
        Self { database }
    }

    /// Finds the weather of an approximately known location, matched by
    /// country code and city name.
    pub async fn get_by_location(
        &self,
        location: &GeoLocation,
    ) -> RequestResult<WithLocation<RealtimeWeather>> {
        debug!(
            "looking up weather for {} in {}",
            location.city_name, location.country_code
        );
        self.database
            .auto()
            .weather_by_country_and_city(&location.country_code, &location.city_name)
            .await?
            .ok_or_else(|| {
                RequestError::NotFound(
                    "No location found with the given country code and city name"
                        .to_owned(),
                )
            })
    }

    pub async fn get_by_location_code(
        &self,
        code: &Id<Location>,
    ) -> RequestResult<WithLocation<RealtimeWeather>> {
        let mut auto = self.database.auto();
        auto.location_by_code(code)
            .await?
            .ok_or_else(|| location_not_found(code))?;
        auto.weather_by_location_code(code).await?.ok_or_else(|| {
            RequestError::NotFound(format!(
                "No realtime weather found for the location code: {}",
                code
            ))
        })
    }

    /// Replaces the weather of a location, or creates its first one. The
    /// reading is stamped with the current time.
    pub async fn update(
        &self,
        code: &Id<Location>,
        reading: WeatherReading,
    ) -> RequestResult<WithLocation<RealtimeWeather>> {
        let mut tx = self.database.transaction().await?;
        let location = tx
            .location_by_code(code)
            .await?
            .ok_or_else(|| location_not_found(code))?;

        let weather = RealtimeWeather::new(location.id(), reading, Utc::now());
        let weather = tx.put_weather(weather).await?;
        tx.commit().await?;
        info!("updated realtime weather of {}", code);
        Ok(WithLocation::new(location, weather))
    }
}
