use location::Location;
use serde::Serialize;

pub mod location;
pub mod realtime_weather;
pub mod validation;

/// A value together with the location it belongs to. Both stay independent
/// records, joined by the location code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithLocation<T> {
    pub location: Location,
    #[serde(flatten)]
    pub content: T,
}

impl<T> WithLocation<T> {
    pub fn new(location: Location, content: T) -> Self {
        Self { location, content }
    }
}
