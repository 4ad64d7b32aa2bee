use log::{debug, info};
use model::location::{Location, LocationStatus};
use utility::id::Id;

use crate::{
    database::{Database, DatabaseTransaction, LocationRepo},
    RequestResult,
};

use super::location_not_found;

#[derive(Debug, Clone)]
pub struct LocationService<D>
where
    D: Database,
{
    database: D,
}

impl<D> LocationService<D>
where
    D: Database,
{
    pub fn new(database: D) -> Self {
        Self { database }
    }

    /// Stores a new, active location. Fails with `RequestError::Conflict` if
    /// the code is taken, even by a trashed location.
    pub async fn add(&self, location: Location) -> RequestResult<Location> {
        let location = Location {
            status: LocationStatus::Active,
            ..location
        };
        let added = self.database.auto().insert_location(location).await?;
        info!("added location {}", added.code);
        Ok(added)
    }

    pub async fn list(&self) -> RequestResult<Vec<Location>> {
        Ok(self.database.auto().untrashed_locations().await?)
    }

    pub async fn get(&self, code: &Id<Location>) -> RequestResult<Location> {
        debug!("looking up location {}", code);
        self.database
            .auto()
            .location_by_code(code)
            .await?
            .ok_or_else(|| location_not_found(code))
    }

    /// Like `get`, but also finds trashed locations.
    pub async fn get_including_trashed(&self, code: &Id<Location>) -> RequestResult<Location> {
        self.database
            .auto()
            .location_by_code_including_trashed(code)
            .await?
            .ok_or_else(|| location_not_found(code))
    }

    /// Overwrites the names and the enabled flag of the active location with
    /// the same code.
    pub async fn update(&self, requested: Location) -> RequestResult<Location> {
        let code = requested.id();
        let mut tx = self.database.transaction().await?;
        let mut stored = tx
            .location_by_code(&code)
            .await?
            .ok_or_else(|| location_not_found(&code))?;

        stored.city_name = requested.city_name;
        stored.region_name = requested.region_name;
        stored.country_code = requested.country_code;
        stored.country_name = requested.country_name;
        stored.enabled = requested.enabled;

        let updated = tx.update_location(stored).await?;
        tx.commit().await?;
        info!("updated location {}", code);
        Ok(updated)
    }

    /// Moves the location to the trash. The row and its weather stay stored.
    pub async fn delete(&self, code: &Id<Location>) -> RequestResult<()> {
        let mut tx = self.database.transaction().await?;
        tx.location_by_code(code)
            .await?
            .ok_or_else(|| location_not_found(code))?;
        tx.trash_location(code).await?;
        tx.commit().await?;
        info!("trashed location {}", code);
        Ok(())
    }
}
