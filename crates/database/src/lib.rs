use std::{env, error::Error};

use async_trait::async_trait;
use log::info;
use model::{location::Location, realtime_weather::RealtimeWeather, WithLocation};
use queries::convert_error;
use sqlx::Transaction;
use utility::id::Id;
use weather::database::{
    Database, DatabaseAutocommit, DatabaseTransaction, LocationRepo, RealtimeWeatherRepo, Result,
};

pub mod data_model;
pub mod queries;

pub struct DatabaseConnectionInfo {
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: u16,
    pub database: String,
}

impl DatabaseConnectionInfo {
    pub fn from_env() -> Option<Self> {
        let username = env::var("DATABASE_USER").ok()?;
        let password = env::var("DATABASE_PASSWORD").ok()?;
        let hostname = env::var("DATABASE_HOST").ok()?;
        let port: u16 = env::var("DATABASE_PORT").ok()?.parse().ok()?;
        let database = env::var("DATABASE_NAME").ok()?;
        Some(Self {
            username,
            password,
            hostname,
            port,
            database,
        })
    }

    pub(self) fn postgres_url(self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.hostname, self.port, self.database
        )
    }
}

#[derive(Clone)]
pub struct PgDatabase {
    connection: sqlx::PgPool,
}

pub struct PgDatabaseTransaction<'a> {
    tx: Transaction<'a, sqlx::Postgres>,
}

#[async_trait]
impl<'a> DatabaseTransaction for PgDatabaseTransaction<'a> {
    async fn commit(self) -> Result<()> {
        self.tx.commit().await.map_err(convert_error)
    }
}

pub struct PgDatabaseAutocommit {
    pool: sqlx::PgPool,
}

impl DatabaseAutocommit for PgDatabaseAutocommit {}

impl PgDatabase {
    pub async fn connect(
        database_connection_info: DatabaseConnectionInfo,
    ) -> std::result::Result<Self, Box<dyn Error>> {
        let hostname = database_connection_info.hostname.clone();
        let url = database_connection_info.postgres_url();
        let pool = sqlx::postgres::PgPool::connect(&url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("connected to database at {} and applied migrations", hostname);

        Ok(Self { connection: pool })
    }
}

#[async_trait]
impl Database for PgDatabase {
    type Transaction = PgDatabaseTransaction<'static>;
    type Autocommit = PgDatabaseAutocommit;

    fn auto(&self) -> Self::Autocommit {
        PgDatabaseAutocommit {
            pool: self.connection.clone(),
        }
    }

    async fn transaction(&self) -> Result<Self::Transaction> {
        let tx: Transaction<'_, sqlx::Postgres> =
            self.connection.begin().await.map_err(convert_error)?;

        Ok(PgDatabaseTransaction { tx })
    }
}

#[async_trait]
impl LocationRepo for PgDatabaseAutocommit {
    async fn insert_location(&mut self, location: Location) -> Result<Location> {
        queries::location::insert(&self.pool, location).await
    }

    async fn untrashed_locations(&mut self) -> Result<Vec<Location>> {
        queries::location::get_untrashed(&self.pool).await
    }

    async fn location_by_code(&mut self, code: &Id<Location>) -> Result<Option<Location>> {
        queries::location::get_by_code(&self.pool, code).await
    }

    async fn location_by_code_including_trashed(
        &mut self,
        code: &Id<Location>,
    ) -> Result<Option<Location>> {
        queries::location::get_by_code_including_trashed(&self.pool, code).await
    }

    async fn update_location(&mut self, location: Location) -> Result<Location> {
        queries::location::update(&self.pool, location).await
    }

    async fn trash_location(&mut self, code: &Id<Location>) -> Result<()> {
        queries::location::trash(&self.pool, code).await
    }
}

#[async_trait]
impl RealtimeWeatherRepo for PgDatabaseAutocommit {
    async fn weather_by_country_and_city(
        &mut self,
        country_code: &str,
        city_name: &str,
    ) -> Result<Option<WithLocation<RealtimeWeather>>> {
        queries::realtime_weather::get_by_country_and_city(&self.pool, country_code, city_name)
            .await
    }

    async fn weather_by_location_code(
        &mut self,
        code: &Id<Location>,
    ) -> Result<Option<WithLocation<RealtimeWeather>>> {
        queries::realtime_weather::get_by_location_code(&self.pool, code).await
    }

    async fn put_weather(&mut self, weather: RealtimeWeather) -> Result<RealtimeWeather> {
        queries::realtime_weather::put(&self.pool, weather).await
    }
}

#[async_trait]
impl<'a> LocationRepo for PgDatabaseTransaction<'a> {
    async fn insert_location(&mut self, location: Location) -> Result<Location> {
        queries::location::insert(&mut *self.tx, location).await
    }

    async fn untrashed_locations(&mut self) -> Result<Vec<Location>> {
        queries::location::get_untrashed(&mut *self.tx).await
    }

    async fn location_by_code(&mut self, code: &Id<Location>) -> Result<Option<Location>> {
        queries::location::get_by_code(&mut *self.tx, code).await
    }

    async fn location_by_code_including_trashed(
        &mut self,
        code: &Id<Location>,
    ) -> Result<Option<Location>> {
        queries::location::get_by_code_including_trashed(&mut *self.tx, code).await
    }

    async fn update_location(&mut self, location: Location) -> Result<Location> {
        queries::location::update(&mut *self.tx, location).await
    }

    async fn trash_location(&mut self, code: &Id<Location>) -> Result<()> {
        queries::location::trash(&mut *self.tx, code).await
    }
}

#[async_trait]
impl<'a> RealtimeWeatherRepo for PgDatabaseTransaction<'a> {
    async fn weather_by_country_and_city(
        &mut self,
        country_code: &str,
        city_name: &str,
    ) -> Result<Option<WithLocation<RealtimeWeather>>> {
        queries::realtime_weather::get_by_country_and_city(
            &mut *self.tx,
            country_code,
            city_name,
        )
        .await
    }

    async fn weather_by_location_code(
        &mut self,
        code: &Id<Location>,
    ) -> Result<Option<WithLocation<RealtimeWeather>>> {
        queries::realtime_weather::get_by_location_code(&mut *self.tx, code).await
    }

    async fn put_weather(&mut self, weather: RealtimeWeather) -> Result<RealtimeWeather> {
        queries::realtime_weather::put(&mut *self.tx, weather).await
    }
}
