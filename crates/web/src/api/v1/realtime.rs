use axum::{
    extract::{OriginalUri, Path, State},
    http::StatusCode,
    routing::{get, on},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use model::{
    realtime_weather::{RealtimeWeather, RealtimeWeatherForm},
    WithLocation,
};
use serde::Serialize;
use utility::id::Id;
use weather::database::Database;

use crate::{
    common::{route_not_found, JsonBody, RouteErrorResponse, RouteResult, METHOD_FILTER_ALL},
    middleware::client_ip::{client_ip_middleware, ClientIp},
    WebState,
};

pub(crate) fn routes<D: Database>(state: WebState<D>) -> Router {
    Router::new()
        .route("/", get(get_by_client_location::<D>))
        .route(
            "/:code",
            get(get_by_location_code::<D>).put(update_by_location_code::<D>),
        )
        .layer(axum::middleware::from_fn(client_ip_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

/// The current weather, with the location flattened into a readable name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RealtimeWeatherDto {
    pub location: String,
    pub temperature: i32,
    pub humidity: i32,
    pub precipitation: i32,
    pub wind_speed: i32,
    pub status: String,
    pub last_updated: DateTime<Utc>,
}

impl From<WithLocation<RealtimeWeather>> for RealtimeWeatherDto {
    fn from(value: WithLocation<RealtimeWeather>) -> Self {
        Self {
            location: value.location.description(),
            temperature: value.content.temperature,
            humidity: value.content.humidity,
            precipitation: value.content.precipitation,
            wind_speed: value.content.wind_speed,
            status: value.content.status,
            last_updated: value.content.last_updated,
        }
    }
}

async fn get_by_client_location<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState {
        realtime,
        geolocation,
        ..
    }): State<WebState<D>>,
    Extension(client_ip): Extension<ClientIp>,
) -> RouteResult<Json<RealtimeWeatherDto>> {
    let ClientIp(Some(address)) = client_ip else {
        return Err(RouteErrorResponse::new(StatusCode::BAD_REQUEST)
            .with_uri(original_uri.path())
            .with_message("Could not determine the client ip address."));
    };

    let location = geolocation
        .locate(address)
        .map_err(|why| RouteErrorResponse::from(why).with_uri(original_uri.path()))?;

    realtime
        .get_by_location(&location)
        .await
        .map(|weather| Json(weather.into()))
        .map_err(|why| RouteErrorResponse::from(why).with_uri(original_uri.path()))
}

async fn get_by_location_code<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    Path(code): Path<String>,
    State(WebState { realtime, .. }): State<WebState<D>>,
) -> RouteResult<Json<RealtimeWeatherDto>> {
    realtime
        .get_by_location_code(&Id::new(code))
        .await
        .map(|weather| Json(weather.into()))
        .map_err(|why| RouteErrorResponse::from(why).with_uri(original_uri.path()))
}

async fn update_by_location_code<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    Path(code): Path<String>,
    State(WebState { realtime, .. }): State<WebState<D>>,
    JsonBody(form): JsonBody<RealtimeWeatherForm>,
) -> RouteResult<Json<RealtimeWeatherDto>> {
    let reading = form
        .into_reading()
        .map_err(|why| RouteErrorResponse::from(why).with_uri(original_uri.path()))?;

    realtime
        .update(&Id::new(code), reading)
        .await
        .map(|weather| Json(weather.into()))
        .map_err(|why| RouteErrorResponse::from(why).with_uri(original_uri.path()))
}

#[cfg(test)]
mod tests {
    use model::{
        location::{Location, LocationStatus},
        realtime_weather::WeatherReading,
    };

    use super::*;

    #[test]
    fn flattens_location_into_description() {
        let location = Location {
            code: "DELHI_IN".to_owned(),
            city_name: "New Delhi".to_owned(),
            region_name: "Delhi".to_owned(),
            country_code: "IN".to_owned(),
            country_name: "India".to_owned(),
            enabled: true,
            status: LocationStatus::Active,
        };
        let weather = RealtimeWeather::new(
            location.id(),
            WeatherReading {
                temperature: 35,
                humidity: 60,
                precipitation: 10,
                wind_speed: 5,
                status: "Sunny".to_owned(),
            },
            Utc::now(),
        );

        let dto = RealtimeWeatherDto::from(WithLocation::new(location, weather));
        assert_eq!(dto.location, "New Delhi, Delhi, India");

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["wind_speed"], 5);
        assert_eq!(json["status"], "Sunny");
        assert!(json.get("location_code").is_none());
    }
}
