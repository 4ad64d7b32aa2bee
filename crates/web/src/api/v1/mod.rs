use axum::{routing::on, Router};
use weather::database::Database;

use crate::{
    common::{route_not_found, METHOD_FILTER_ALL},
    WebState,
};

mod locations;
mod realtime;

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::resource!("/v1{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes<D: Database>(state: WebState<D>) -> Router {
    Router::new()
        .nest("/locations", locations::routes(state.clone()))
        .nest("/realtime", realtime::routes(state))
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}
