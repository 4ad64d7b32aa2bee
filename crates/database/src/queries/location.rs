use model::location::{Location, LocationStatus};
use sqlx::{Executor, Postgres};
use utility::{id::Id, let_also::LetAlso};
use weather::database::{DatabaseError, Result};

use crate::data_model::{location::LocationRow, to_models, DatabaseRow};

use super::{active_location, convert_error, location_columns};

pub async fn insert<'c, E>(executor: E, location: Location) -> Result<Location>
where
    E: Executor<'c, Database = Postgres>,
{
    let row = LocationRow::from_model(Location {
        status: LocationStatus::Active,
        ..location
    });
    let code = row.code.clone();
    sqlx::query_as(concat!(
        "
        INSERT INTO locations AS l (
            code,
            city_name,
            region_name,
            country_code,
            country_name,
            enabled,
            status
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING ",
        location_columns!(),
        ";"
    ))
    .bind(row.code)
    .bind(row.city_name)
    .bind(row.region_name)
    .bind(row.country_code)
    .bind(row.country_name)
    .bind(row.enabled)
    .bind(row.status)
    .fetch_one(executor)
    .await
    .map_err(|why| match convert_error(why) {
        DatabaseError::Conflict(_) => DatabaseError::Conflict(format!(
            "A location with the code {} already exists.",
            code
        )),
        other => other,
    })
    .and_then(|row: LocationRow| row.to_model())
}

pub async fn get_untrashed<'c, E>(executor: E) -> Result<Vec<Location>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(concat!(
        "SELECT ",
        location_columns!(),
        " FROM locations l WHERE ",
        active_location!(),
        " ORDER BY l.position ASC;"
    ))
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|rows: Vec<LocationRow>| to_models(rows))
}

pub async fn get_by_code<'c, E>(executor: E, code: &Id<Location>) -> Result<Option<Location>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(concat!(
        "SELECT ",
        location_columns!(),
        " FROM locations l WHERE ",
        active_location!(),
        " AND l.code = $1;"
    ))
    .bind(code.raw_ref::<str>())
    .fetch_optional(executor)
    .await
    .map_err(convert_error)?
    .map(|row: LocationRow| row.to_model())
    .transpose()
}

pub async fn get_by_code_including_trashed<'c, E>(
    executor: E,
    code: &Id<Location>,
) -> Result<Option<Location>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(concat!(
        "SELECT ",
        location_columns!(),
        " FROM locations l WHERE l.code = $1;"
    ))
    .bind(code.raw_ref::<str>())
    .fetch_optional(executor)
    .await
    .map_err(convert_error)?
    .map(|row: LocationRow| row.to_model())
    .transpose()
}

pub async fn update<'c, E>(executor: E, location: Location) -> Result<Location>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(concat!(
        "
        UPDATE locations AS l
        SET city_name = $1,
            region_name = $2,
            country_code = $3,
            country_name = $4,
            enabled = $5
        WHERE ",
        active_location!(),
        " AND l.code = $6
        RETURNING ",
        location_columns!(),
        ";"
    ))
    .bind(location.city_name)
    .bind(location.region_name)
    .bind(location.country_code)
    .bind(location.country_name)
    .bind(location.enabled)
    .bind(location.code)
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .and_then(|row: LocationRow| row.to_model())
}

pub async fn trash<'c, E>(executor: E, code: &Id<Location>) -> Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    let result = sqlx::query(concat!(
        "UPDATE locations AS l SET status = $1 WHERE ",
        active_location!(),
        " AND l.code = $2;"
    ))
    .bind(LocationStatus::Trashed.as_str())
    .bind(code.raw_ref::<str>())
    .execute(executor)
    .await
    .map_err(convert_error)?;

    if result.rows_affected() == 0 {
        Err(DatabaseError::NotFound)
    } else {
        Ok(())
    }
}
