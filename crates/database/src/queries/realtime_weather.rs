use model::{location::Location, realtime_weather::RealtimeWeather, WithLocation};
use sqlx::{Executor, Postgres};
use utility::id::Id;
use weather::database::Result;

use crate::data_model::{
    realtime_weather::{LocatedWeatherRow, RealtimeWeatherRow},
    DatabaseRow,
};

use super::{active_location, convert_error, location_columns};

macro_rules! located_weather_query {
    ($condition:expr) => {
        concat!(
            "SELECT ",
            location_columns!(),
            ", w.temperature, w.humidity, w.precipitation, w.wind_speed,
            w.status AS weather_status, w.last_updated
            FROM realtime_weather w
            JOIN locations l ON l.code = w.location_code
            WHERE ",
            active_location!(),
            " AND ",
            $condition,
            " ORDER BY l.position ASC LIMIT 1;"
        )
    };
}

pub async fn get_by_country_and_city<'c, E>(
    executor: E,
    country_code: &str,
    city_name: &str,
) -> Result<Option<WithLocation<RealtimeWeather>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(located_weather_query!(
        "l.country_code = $1 AND l.city_name = $2"
    ))
    .bind(country_code)
    .bind(city_name)
    .fetch_optional(executor)
    .await
    .map_err(convert_error)?
    .map(|row: LocatedWeatherRow| row.to_model())
    .transpose()
}

pub async fn get_by_location_code<'c, E>(
    executor: E,
    code: &Id<Location>,
) -> Result<Option<WithLocation<RealtimeWeather>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(located_weather_query!("l.code = $1"))
        .bind(code.raw_ref::<str>())
        .fetch_optional(executor)
        .await
        .map_err(convert_error)?
        .map(|row: LocatedWeatherRow| row.to_model())
        .transpose()
}

pub async fn put<'c, E>(executor: E, weather: RealtimeWeather) -> Result<RealtimeWeather>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO realtime_weather(
            location_code,
            temperature,
            humidity,
            precipitation,
            wind_speed,
            status,
            last_updated
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (location_code)
        DO UPDATE SET
            temperature = EXCLUDED.temperature,
            humidity = EXCLUDED.humidity,
            precipitation = EXCLUDED.precipitation,
            wind_speed = EXCLUDED.wind_speed,
            status = EXCLUDED.status,
            last_updated = EXCLUDED.last_updated
        RETURNING
            location_code, temperature, humidity, precipitation, wind_speed,
            status, last_updated;
        ",
    )
    .bind(weather.location_code.into_raw())
    .bind(weather.temperature)
    .bind(weather.humidity)
    .bind(weather.precipitation)
    .bind(weather.wind_speed)
    .bind(weather.status)
    .bind(weather.last_updated)
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .and_then(|row: RealtimeWeatherRow| row.to_model())
}
