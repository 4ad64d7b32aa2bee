use model::location::{Location, LocationStatus};
use sqlx::prelude::FromRow;
use weather::database::{DatabaseError, Result};

use super::DatabaseRow;

/// A location. E.g., a city weather is reported for.
/// Table: locations
#[derive(Debug, Clone, FromRow)]
pub struct LocationRow {
    pub code: String,
    pub city_name: String,
    pub region_name: String,
    pub country_code: String,
    pub country_name: String,
    pub enabled: bool,
    pub status: String,
}

impl LocationRow {
    pub fn from_model(location: Location) -> Self {
        Self {
            code: location.code,
            city_name: location.city_name,
            region_name: location.region_name,
            country_code: location.country_code,
            country_name: location.country_name,
            enabled: location.enabled,
            status: location.status.as_str().to_owned(),
        }
    }
}

impl DatabaseRow for LocationRow {
    type Model = Location;

    fn to_model(self) -> Result<Self::Model> {
        let status: LocationStatus = self
            .status
            .parse()
            .map_err(|why| DatabaseError::Other(Box::new(why)))?;
        Ok(Location {
            code: self.code,
            city_name: self.city_name,
            region_name: self.region_name,
            country_code: self.country_code,
            country_name: self.country_name,
            enabled: self.enabled,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> LocationRow {
        LocationRow {
            code: "DELHI_IN".to_owned(),
            city_name: "New Delhi".to_owned(),
            region_name: "Delhi".to_owned(),
            country_code: "IN".to_owned(),
            country_name: "India".to_owned(),
            enabled: true,
            status: status.to_owned(),
        }
    }

    #[test]
    fn converts_to_model_and_back() {
        let location = row("trashed").to_model().unwrap();
        assert_eq!(location.status, LocationStatus::Trashed);
        assert_eq!(location.city_name, "New Delhi");

        let back = LocationRow::from_model(location);
        assert_eq!(back.status, "trashed");
        assert_eq!(back.code, "DELHI_IN");
    }

    #[test]
    fn unknown_status_is_an_error() {
        assert!(matches!(
            row("deleted").to_model(),
            Err(DatabaseError::Other(_))
        ));
    }
}
