use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, OriginalUri, Request},
    http::StatusCode,
    response::IntoResponse,
    routing::MethodFilter,
    Json,
};
use chrono::{DateTime, Utc};
use log::{error, warn};
use model::validation::ValidationErrors;
use serde::{de::DeserializeOwned, Serialize};
use weather::{geolocation::GeolocationError, RequestError};

pub type RouteResult<O> = Result<O, RouteErrorResponse>;

/// A `MethodFilter` that matches all http methods.
pub(crate) const METHOD_FILTER_ALL: MethodFilter = MethodFilter::GET
    .or(MethodFilter::POST)
    .or(MethodFilter::PATCH)
    .or(MethodFilter::PUT)
    .or(MethodFilter::DELETE)
    .or(MethodFilter::HEAD)
    .or(MethodFilter::OPTIONS);

pub(crate) async fn route_not_found(
    OriginalUri(original_uri): OriginalUri,
    req: Request,
) -> impl IntoResponse {
    warn!("no route for {} {}", req.method(), original_uri.path());
    RouteErrorResponse::not_found(original_uri.path())
}

// - Request bodies -

/// Like `Json`, but a body which cannot be parsed is answered with a
/// `RouteErrorResponse`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RouteErrorResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let path = req
            .extensions()
            .get::<OriginalUri>()
            .map(|OriginalUri(uri)| uri.path().to_owned())
            .unwrap_or_else(|| req.uri().path().to_owned());

        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| Self(value))
            .map_err(|rejection: JsonRejection| {
                warn!("rejected request body for {}: {}", path, rejection);
                RouteErrorResponse::new(StatusCode::BAD_REQUEST)
                    .with_uri(path)
                    .with_message(rejection.body_text())
            })
    }
}

// - Commonly used responeses -

#[derive(Debug, Clone, Serialize)]
pub struct RouteErrorResponse {
    #[serde(skip)]
    pub status_code: StatusCode,

    pub timestamp: DateTime<Utc>,

    pub status: u16,

    pub path: String,

    pub errors: Vec<String>,
}

impl RouteErrorResponse {
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            timestamp: Utc::now(),
            status: status_code.as_u16(),
            path: String::new(),
            errors: Vec::new(),
        }
    }

    pub fn not_found(uri: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND)
            .with_uri(uri)
            .with_default_message()
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.path = uri.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.errors.push(message.into());
        self
    }

    pub fn with_messages<I>(mut self, messages: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.errors.extend(messages.into_iter().map(Into::into));
        self
    }

    pub fn with_default_message(self) -> Self {
        let message = self
            .status_code
            .canonical_reason()
            .unwrap_or("i dunno what happened here :/");
        self.with_message(message)
    }
}

impl From<RequestError> for RouteErrorResponse {
    fn from(value: RequestError) -> Self {
        match value {
            RequestError::NotFound(message) => {
                Self::new(StatusCode::NOT_FOUND).with_message(message)
            }
            RequestError::Conflict(message) => {
                Self::new(StatusCode::CONFLICT).with_message(message)
            }
            RequestError::Other(other) => {
                error!("request failed: {}", other);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR).with_default_message()
            }
        }
    }
}

impl From<ValidationErrors> for RouteErrorResponse {
    fn from(value: ValidationErrors) -> Self {
        warn!("{}", value);
        Self::new(StatusCode::BAD_REQUEST).with_messages(value.into_messages())
    }
}

impl From<GeolocationError> for RouteErrorResponse {
    fn from(value: GeolocationError) -> Self {
        warn!("{}", value);
        Self::new(StatusCode::BAD_REQUEST).with_message(value.to_string())
    }
}

impl IntoResponse for RouteErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (self.status_code, Json(self)).into_response()
    }
}
