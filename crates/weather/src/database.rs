use std::{error, result};

use async_trait::async_trait;
use model::{location::Location, realtime_weather::RealtimeWeather, WithLocation};
use utility::id::Id;

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Other(Box<dyn error::Error + Send + Sync>),
}

pub type Result<T> = result::Result<T, DatabaseError>;

/// Storage of locations. Every method except
/// `location_by_code_including_trashed` only sees active locations.
#[async_trait]
pub trait LocationRepo {
    /// Inserts a new location. Fails with `DatabaseError::Conflict` if the code
    /// is already taken, by an active or by a trashed location.
    async fn insert_location(&mut self, location: Location) -> Result<Location>;

    /// All active locations in storage order.
    async fn untrashed_locations(&mut self) -> Result<Vec<Location>>;

    async fn location_by_code(&mut self, code: &Id<Location>) -> Result<Option<Location>>;

    async fn location_by_code_including_trashed(
        &mut self,
        code: &Id<Location>,
    ) -> Result<Option<Location>>;

    /// Overwrites the descriptive fields and the enabled flag of an active
    /// location. Code and status stay untouched.
    async fn update_location(&mut self, location: Location) -> Result<Location>;

    /// Marks an active location as trashed.
    async fn trash_location(&mut self, code: &Id<Location>) -> Result<()>;
}

#[async_trait]
pub trait RealtimeWeatherRepo {
    async fn weather_by_country_and_city(
        &mut self,
        country_code: &str,
        city_name: &str,
    ) -> Result<Option<WithLocation<RealtimeWeather>>>;

    async fn weather_by_location_code(
        &mut self,
        code: &Id<Location>,
    ) -> Result<Option<WithLocation<RealtimeWeather>>>;

    /// Creates the weather of a location or replaces the existing one.
    async fn put_weather(&mut self, weather: RealtimeWeather) -> Result<RealtimeWeather>;
}

pub trait DatabaseOperations: LocationRepo + RealtimeWeatherRepo + Send {}

impl<T> DatabaseOperations for T where T: LocationRepo + RealtimeWeatherRepo + Send {}

#[async_trait]
pub trait DatabaseTransaction: DatabaseOperations {
    async fn commit(self) -> Result<()>;
}

pub trait DatabaseAutocommit: DatabaseOperations {}

/// trait to implement a weather database.
/// multiple concurrent accesses should be possible by e.g. cloning the database object.
/// a transaction which is dropped without being committed is rolled back.
#[async_trait]
pub trait Database: Clone + Send + Sync + Sized + 'static {
    type Transaction: DatabaseTransaction + Send;
    type Autocommit: DatabaseAutocommit + Send;

    async fn transaction(&self) -> Result<Self::Transaction>;

    fn auto(&self) -> Self::Autocommit;
}
