//! A database kept in process memory.
//!
//! Transactions lock the whole store until they are committed or dropped and
//! work on a copy, so an uncommitted transaction leaves no trace.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use indexmap::IndexMap;
use model::{
    location::{Location, LocationStatus},
    realtime_weather::RealtimeWeather,
    WithLocation,
};
use tokio::sync::{Mutex, OwnedMutexGuard};
use utility::id::Id;

use crate::database::{
    Database, DatabaseAutocommit, DatabaseError, DatabaseTransaction, LocationRepo,
    RealtimeWeatherRepo, Result,
};

#[derive(Debug, Clone, Default)]
struct Tables {
    /// keyed by code, in insertion order
    locations: IndexMap<String, Location>,
    /// keyed by location code
    weather: HashMap<String, RealtimeWeather>,
}

impl Tables {
    fn active_locations(&self) -> impl Iterator<Item = &Location> {
        self.locations
            .values()
            .filter(|location| location.status.is_active())
    }

    fn active_location(&self, code: &str) -> Option<&Location> {
        self.locations
            .get(code)
            .filter(|location| location.status.is_active())
    }

    fn active_location_mut(&mut self, code: &str) -> Option<&mut Location> {
        self.locations
            .get_mut(code)
            .filter(|location| location.status.is_active())
    }

    fn with_location(&self, location: &Location) -> Option<WithLocation<RealtimeWeather>> {
        self.weather
            .get(&location.code)
            .map(|weather| WithLocation::new(location.clone(), weather.clone()))
    }

    fn insert_location(&mut self, location: Location) -> Result<Location> {
        if self.locations.contains_key(&location.code) {
            return Err(DatabaseError::Conflict(format!(
                "A location with the code {} already exists.",
                location.code
            )));
        }
        let location = Location {
            status: LocationStatus::Active,
            ..location
        };
        self.locations
            .insert(location.code.clone(), location.clone());
        Ok(location)
    }

    fn untrashed_locations(&self) -> Vec<Location> {
        self.active_locations().cloned().collect()
    }

    fn location_by_code(&self, code: &Id<Location>) -> Option<Location> {
        self.active_location(code.raw_ref()).cloned()
    }

    fn location_by_code_including_trashed(&self, code: &Id<Location>) -> Option<Location> {
        self.locations.get(code.raw_ref::<str>()).cloned()
    }

    fn update_location(&mut self, location: Location) -> Result<Location> {
        let stored = self
            .active_location_mut(&location.code)
            .ok_or(DatabaseError::NotFound)?;
        stored.city_name = location.city_name;
        stored.region_name = location.region_name;
        stored.country_code = location.country_code;
        stored.country_name = location.country_name;
        stored.enabled = location.enabled;
        Ok(stored.clone())
    }

    fn trash_location(&mut self, code: &Id<Location>) -> Result<()> {
        let stored = self
            .active_location_mut(code.raw_ref())
            .ok_or(DatabaseError::NotFound)?;
        stored.status = LocationStatus::Trashed;
        Ok(())
    }

    fn weather_by_country_and_city(
        &self,
        country_code: &str,
        city_name: &str,
    ) -> Option<WithLocation<RealtimeWeather>> {
        self.active_locations()
            .filter(|location| {
                location.country_code == country_code && location.city_name == city_name
            })
            .find_map(|location| self.with_location(location))
    }

    fn weather_by_location_code(
        &self,
        code: &Id<Location>,
    ) -> Option<WithLocation<RealtimeWeather>> {
        self.active_location(code.raw_ref())
            .and_then(|location| self.with_location(location))
    }

    fn put_weather(&mut self, weather: RealtimeWeather) -> Result<RealtimeWeather> {
        // mirrors the foreign key of the relational schema
        if !self.locations.contains_key(weather.location_code.raw_ref::<str>()) {
            return Err(DatabaseError::NotFound);
        }
        self.weather
            .insert(weather.location_code.raw(), weather.clone());
        Ok(weather)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

pub struct MemoryAutocommit {
    tables: Arc<Mutex<Tables>>,
}

impl DatabaseAutocommit for MemoryAutocommit {}

pub struct MemoryTransaction {
    guard: OwnedMutexGuard<Tables>,
    working: Tables,
}

#[async_trait]
impl DatabaseTransaction for MemoryTransaction {
    async fn commit(mut self) -> Result<()> {
        *self.guard = self.working;
        Ok(())
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    type Transaction = MemoryTransaction;
    type Autocommit = MemoryAutocommit;

    async fn transaction(&self) -> Result<Self::Transaction> {
        let guard = self.tables.clone().lock_owned().await;
        let working = guard.clone();
        Ok(MemoryTransaction { guard, working })
    }

    fn auto(&self) -> Self::Autocommit {
        MemoryAutocommit {
            tables: self.tables.clone(),
        }
    }
}

#[async_trait]
impl LocationRepo for MemoryAutocommit {
    async fn insert_location(&mut self, location: Location) -> Result<Location> {
        self.tables.lock().await.insert_location(location)
    }

    async fn untrashed_locations(&mut self) -> Result<Vec<Location>> {
        Ok(self.tables.lock().await.untrashed_locations())
    }

    async fn location_by_code(&mut self, code: &Id<Location>) -> Result<Option<Location>> {
        Ok(self.tables.lock().await.location_by_code(code))
    }

    async fn location_by_code_including_trashed(
        &mut self,
        code: &Id<Location>,
    ) -> Result<Option<Location>> {
        Ok(self
            .tables
            .lock()
            .await
            .location_by_code_including_trashed(code))
    }

    async fn update_location(&mut self, location: Location) -> Result<Location> {
        self.tables.lock().await.update_location(location)
    }

    async fn trash_location(&mut self, code: &Id<Location>) -> Result<()> {
        self.tables.lock().await.trash_location(code)
    }
}

#[async_trait]
impl RealtimeWeatherRepo for MemoryAutocommit {
    async fn weather_by_country_and_city(
        &mut self,
        country_code: &str,
        city_name: &str,
    ) -> Result<Option<WithLocation<RealtimeWeather>>> {
        Ok(self
            .tables
            .lock()
            .await
            .weather_by_country_and_city(country_code, city_name))
    }

    async fn weather_by_location_code(
        &mut self,
        code: &Id<Location>,
    ) -> Result<Option<WithLocation<RealtimeWeather>>> {
        Ok(self.tables.lock().await.weather_by_location_code(code))
    }

    async fn put_weather(&mut self, weather: RealtimeWeather) -> Result<RealtimeWeather> {
        self.tables.lock().await.put_weather(weather)
    }
}

#[async_trait]
impl LocationRepo for MemoryTransaction {
    async fn insert_location(&mut self, location: Location) -> Result<Location> {
        self.working.insert_location(location)
    }

    async fn untrashed_locations(&mut self) -> Result<Vec<Location>> {
        Ok(self.working.untrashed_locations())
    }

    async fn location_by_code(&mut self, code: &Id<Location>) -> Result<Option<Location>> {
        Ok(self.working.location_by_code(code))
    }

    async fn location_by_code_including_trashed(
        &mut self,
        code: &Id<Location>,
    ) -> Result<Option<Location>> {
        Ok(self.working.location_by_code_including_trashed(code))
    }

    async fn update_location(&mut self, location: Location) -> Result<Location> {
        self.working.update_location(location)
    }

    async fn trash_location(&mut self, code: &Id<Location>) -> Result<()> {
        self.working.trash_location(code)
    }
}

#[async_trait]
impl RealtimeWeatherRepo for MemoryTransaction {
    async fn weather_by_country_and_city(
        &mut self,
        country_code: &str,
        city_name: &str,
    ) -> Result<Option<WithLocation<RealtimeWeather>>> {
        Ok(self
            .working
            .weather_by_country_and_city(country_code, city_name))
    }

    async fn weather_by_location_code(
        &mut self,
        code: &Id<Location>,
    ) -> Result<Option<WithLocation<RealtimeWeather>>> {
        Ok(self.working.weather_by_location_code(code))
    }

    async fn put_weather(&mut self, weather: RealtimeWeather) -> Result<RealtimeWeather> {
        self.working.put_weather(weather)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use model::realtime_weather::WeatherReading;

    use super::*;

    fn location(code: &str, city_name: &str) -> Location {
        Location {
            code: code.to_owned(),
            city_name: city_name.to_owned(),
            region_name: "Region".to_owned(),
            country_code: "US".to_owned(),
            country_name: "United States".to_owned(),
            enabled: true,
            status: LocationStatus::Active,
        }
    }

    fn weather(code: &str) -> RealtimeWeather {
        RealtimeWeather::new(
            Id::from(code),
            WeatherReading {
                temperature: -1,
                humidity: 30,
                precipitation: 40,
                wind_speed: 15,
                status: "Snowy".to_owned(),
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn keeps_insertion_order() {
        let database = MemoryDatabase::new();
        let mut auto = database.auto();
        for code in ["NYC_USA", "LACA_USA", "CHI_USA"] {
            auto.insert_location(location(code, code)).await.unwrap();
        }
        let codes = auto
            .untrashed_locations()
            .await
            .unwrap()
            .into_iter()
            .map(|location| location.code)
            .collect::<Vec<_>>();
        assert_eq!(codes, ["NYC_USA", "LACA_USA", "CHI_USA"]);
    }

    #[tokio::test]
    async fn dropped_transaction_is_rolled_back() {
        let database = MemoryDatabase::new();
        {
            let mut tx = database.transaction().await.unwrap();
            tx.insert_location(location("NYC_USA", "New York City"))
                .await
                .unwrap();
        }
        let found = database
            .auto()
            .location_by_code(&Id::from("NYC_USA"))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn committed_transaction_is_visible() {
        let database = MemoryDatabase::new();
        let mut tx = database.transaction().await.unwrap();
        tx.insert_location(location("NYC_USA", "New York City"))
            .await
            .unwrap();
        tx.put_weather(weather("NYC_USA")).await.unwrap();
        tx.commit().await.unwrap();

        let found = database
            .auto()
            .weather_by_location_code(&Id::from("NYC_USA"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.location.city_name, "New York City");
        assert_eq!(found.content.status, "Snowy");
    }

    #[tokio::test]
    async fn weather_requires_existing_location() {
        let database = MemoryDatabase::new();
        let result = database.auto().put_weather(weather("NOWHERE")).await;
        assert!(matches!(result, Err(DatabaseError::NotFound)));
    }

    #[tokio::test]
    async fn trashed_weather_is_hidden() {
        let database = MemoryDatabase::new();
        let mut auto = database.auto();
        auto.insert_location(location("NYC_USA", "New York City"))
            .await
            .unwrap();
        auto.put_weather(weather("NYC_USA")).await.unwrap();
        auto.trash_location(&Id::from("NYC_USA")).await.unwrap();

        assert!(auto
            .weather_by_country_and_city("US", "New York City")
            .await
            .unwrap()
            .is_none());
        assert!(auto
            .weather_by_location_code(&Id::from("NYC_USA"))
            .await
            .unwrap()
            .is_none());

        // the weather row itself is kept
        assert!(database.tables.lock().await.weather.contains_key("NYC_USA"));
    }
}
