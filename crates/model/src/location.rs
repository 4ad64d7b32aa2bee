use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};
use validator::Validate;

use crate::validation::{ValidateOrdered, ValidationErrors};

/// Whether a location is visible. Trashed locations stay in storage but are
/// excluded from every listing and lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationStatus {
    #[default]
    Active,
    Trashed,
}

impl LocationStatus {
    pub fn is_active(self) -> bool {
        self == Self::Active
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Trashed => "trashed",
        }
    }
}

impl fmt::Display for LocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown location status `{0}`")]
pub struct UnknownLocationStatus(pub String);

impl FromStr for LocationStatus {
    type Err = UnknownLocationStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "trashed" => Ok(Self::Trashed),
            other => Err(UnknownLocationStatus(other.to_owned())),
        }
    }
}

/// A named place weather is reported for, e.g. `NYC_USA` for New York.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub code: String,
    pub city_name: String,
    pub region_name: String,
    pub country_code: String,
    pub country_name: String,
    pub enabled: bool,
    #[serde(skip)]
    pub status: LocationStatus,
}

impl HasId for Location {
    type IdType = String;
}

impl Location {
    pub fn id(&self) -> Id<Location> {
        Id::new(self.code.clone())
    }

    /// Human readable name, e.g. `New York City, New York, United States`.
    pub fn description(&self) -> String {
        format!(
            "{}, {}, {}",
            self.city_name, self.region_name, self.country_name
        )
    }
}

/// A location as submitted by a client. Every field is optional so missing
/// fields are reported by validation instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LocationForm {
    #[validate(
        required(message = "Location code cannot be null"),
        length(min = 3, max = 12, message = "Location code must have 3-12 characters")
    )]
    pub code: Option<String>,
    #[validate(
        required(message = "City name cannot be null"),
        length(min = 3, max = 128, message = "City name must have 3-128 characters")
    )]
    pub city_name: Option<String>,
    #[validate(
        required(message = "Region name cannot be null"),
        length(min = 3, max = 128, message = "Region name must have 3-128 characters")
    )]
    pub region_name: Option<String>,
    #[validate(
        required(message = "Country code cannot be null"),
        length(equal = 2, message = "Country code must have 2 characters")
    )]
    pub country_code: Option<String>,
    #[validate(
        required(message = "Country name cannot be null"),
        length(min = 3, max = 64, message = "Country name must have 3-64 characters")
    )]
    pub country_name: Option<String>,
    pub enabled: Option<bool>,
}

impl ValidateOrdered for LocationForm {
    const FIELDS: &'static [&'static str] = &[
        "code",
        "city_name",
        "region_name",
        "country_code",
        "country_name",
    ];
}

impl LocationForm {
    /// Validates the form and turns it into an active location.
    pub fn into_location(self) -> Result<Location, ValidationErrors> {
        self.validate_ordered()?;
        Ok(Location {
            code: self.code.unwrap_or_default(),
            city_name: self.city_name.unwrap_or_default(),
            region_name: self.region_name.unwrap_or_default(),
            country_code: self.country_code.unwrap_or_default(),
            country_name: self.country_name.unwrap_or_default(),
            enabled: self.enabled.unwrap_or(false),
            status: LocationStatus::Active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jakarta() -> LocationForm {
        LocationForm {
            code: Some("JKT".to_owned()),
            city_name: Some("Jakarta".to_owned()),
            region_name: Some("Jakarta".to_owned()),
            country_code: Some("ID".to_owned()),
            country_name: Some("Indonesia".to_owned()),
            enabled: Some(true),
        }
    }

    #[test]
    fn valid_form_becomes_active_location() {
        let location = jakarta().into_location().unwrap();
        assert_eq!(location.code, "JKT");
        assert_eq!(location.city_name, "Jakarta");
        assert!(location.enabled);
        assert_eq!(location.status, LocationStatus::Active);
        assert_eq!(location.description(), "Jakarta, Jakarta, Indonesia");
    }

    #[test]
    fn missing_code_is_reported_first() {
        let form = LocationForm {
            code: None,
            ..jakarta()
        };
        let errors = form.validate_ordered().unwrap_err();
        assert_eq!(errors.messages(), ["Location code cannot be null"]);
    }

    #[test]
    fn empty_code_violates_length() {
        let form = LocationForm {
            code: Some(String::new()),
            ..jakarta()
        };
        let errors = form.validate_ordered().unwrap_err();
        assert_eq!(errors.messages(), ["Location code must have 3-12 characters"]);
    }

    #[test]
    fn empty_form_reports_every_field() {
        let errors = LocationForm::default().validate_ordered().unwrap_err();
        assert_eq!(
            errors.messages(),
            [
                "Location code cannot be null",
                "City name cannot be null",
                "Region name cannot be null",
                "Country code cannot be null",
                "Country name cannot be null",
            ]
        );
    }

    #[test]
    fn lengths_count_characters() {
        // twelve characters, twenty four bytes
        let form = LocationForm {
            code: Some("ÄÖÜÄÖÜÄÖÜÄÖÜ".to_owned()),
            country_code: Some("ÅÅ".to_owned()),
            ..jakarta()
        };
        assert!(form.validate_ordered().is_ok());

        let form = LocationForm {
            code: Some("ABCDEFGHIJKLM".to_owned()),
            country_code: Some("IDN".to_owned()),
            ..jakarta()
        };
        assert_eq!(
            form.validate_ordered().unwrap_err().messages(),
            [
                "Location code must have 3-12 characters",
                "Country code must have 2 characters",
            ]
        );
    }

    #[test]
    fn missing_enabled_defaults_to_disabled() {
        let form = LocationForm {
            enabled: None,
            ..jakarta()
        };
        assert!(!form.into_location().unwrap().enabled);
    }

    #[test]
    fn status_is_not_part_of_json() {
        let location = jakarta().into_location().unwrap();
        let json = serde_json::to_value(&location).unwrap();
        assert_eq!(json["city_name"], "Jakarta");
        assert!(json.get("status").is_none());
    }

    #[test]
    fn status_parses_its_own_representation() {
        for status in [LocationStatus::Active, LocationStatus::Trashed] {
            assert_eq!(status.as_str().parse::<LocationStatus>(), Ok(status));
        }
        assert!("deleted".parse::<LocationStatus>().is_err());
    }
}
