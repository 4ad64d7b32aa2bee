pub use crate::common::RouteResult;

use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use config::WebConfig;
use log::info;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use weather::{
    database::Database,
    geolocation::Geolocation,
    service::{location::LocationService, realtime::RealtimeWeatherService},
};

pub mod api;
pub mod common;
pub mod config;
pub mod middleware;

#[derive(Clone)]
pub struct WebState<D>
where
    D: Database,
{
    pub locations: LocationService<D>,
    pub realtime: RealtimeWeatherService<D>,
    pub geolocation: Arc<dyn Geolocation>,
}

impl<D> WebState<D>
where
    D: Database,
{
    pub fn new(database: D, geolocation: Arc<dyn Geolocation>) -> Self {
        Self {
            locations: LocationService::new(database.clone()),
            realtime: RealtimeWeatherService::new(database),
            geolocation,
        }
    }
}

pub fn app<D: Database>(state: WebState<D>) -> Router {
    api::routes(state).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}

pub async fn start_web_server<D: Database>(
    config: &WebConfig,
    state: WebState<D>,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.bind_address).await?;
    info!("listening on {}", config.bind_address);
    axum::serve(
        listener,
        app(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
