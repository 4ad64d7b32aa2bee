use axum::{
    extract::{OriginalUri, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, on},
    Json, Router,
};
use model::location::{Location, LocationForm};
use utility::id::Id;
use weather::database::Database;

use crate::{
    common::{route_not_found, JsonBody, RouteErrorResponse, RouteResult, METHOD_FILTER_ALL},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/locations{}", format_args!($($arg)*))
    };
}

pub(crate) fn routes<D: Database>(state: WebState<D>) -> Router {
    Router::new()
        .route(
            "/",
            get(get_locations::<D>)
                .post(add_location::<D>)
                .put(update_location::<D>),
        )
        .route(
            "/:code",
            get(get_location::<D>).delete(delete_location::<D>),
        )
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn add_location<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { locations, .. }): State<WebState<D>>,
    JsonBody(form): JsonBody<LocationForm>,
) -> RouteResult<(StatusCode, [(header::HeaderName, String); 1], Json<Location>)> {
    let location = form
        .into_location()
        .map_err(|why| RouteErrorResponse::from(why).with_uri(original_uri.path()))?;

    locations
        .add(location)
        .await
        .map(|location| {
            (
                StatusCode::CREATED,
                [(header::LOCATION, resource!("/{}", location.code))],
                Json(location),
            )
        })
        .map_err(|why| RouteErrorResponse::from(why).with_uri(original_uri.path()))
}

async fn get_locations<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { locations, .. }): State<WebState<D>>,
) -> RouteResult<Response> {
    locations
        .list()
        .await
        .map(|locations| {
            if locations.is_empty() {
                StatusCode::NO_CONTENT.into_response()
            } else {
                Json(locations).into_response()
            }
        })
        .map_err(|why| RouteErrorResponse::from(why).with_uri(original_uri.path()))
}

async fn get_location<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    Path(code): Path<String>,
    State(WebState { locations, .. }): State<WebState<D>>,
) -> RouteResult<Json<Location>> {
    locations
        .get(&Id::new(code))
        .await
        .map(Json)
        .map_err(|why| RouteErrorResponse::from(why).with_uri(original_uri.path()))
}

async fn update_location<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { locations, .. }): State<WebState<D>>,
    JsonBody(form): JsonBody<LocationForm>,
) -> RouteResult<Json<Location>> {
    let location = form
        .into_location()
        .map_err(|why| RouteErrorResponse::from(why).with_uri(original_uri.path()))?;

    locations
        .update(location)
        .await
        .map(Json)
        .map_err(|why| RouteErrorResponse::from(why).with_uri(original_uri.path()))
}

async fn delete_location<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    Path(code): Path<String>,
    State(WebState { locations, .. }): State<WebState<D>>,
) -> RouteResult<StatusCode> {
    locations
        .delete(&Id::new(code))
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(|why| RouteErrorResponse::from(why).with_uri(original_uri.path()))
}
