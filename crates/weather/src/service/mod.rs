use model::location::Location;
use utility::id::Id;

use crate::RequestError;

pub mod location;
pub mod realtime;

pub(crate) fn location_not_found(code: &Id<Location>) -> RequestError {
    RequestError::NotFound(format!("No location found with the given code: {}", code))
}
