//! Resolves the approximate location of a client from its ip address.
//!
//! The lookup table is read from an IP2Location LITE DB3 csv file. Each row
//! covers an inclusive range of IPv4 addresses given as 32 bit numbers:
//!
//! ```text
//! "16777216","16777471","US","United States of America","California","Los Angeles"
//! ```

use std::{io::Read, net::IpAddr, path::Path};

use log::debug;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoLocation {
    pub country_code: String,
    pub country_name: String,
    pub region_name: String,
    pub city_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GeolocationError {
    #[error("Could not resolve a location for the address {0}.")]
    Unresolved(IpAddr),
    #[error("Could not load the geolocation database: {0}")]
    Load(#[from] csv::Error),
}

pub trait Geolocation: Send + Sync {
    fn locate(&self, address: IpAddr) -> Result<GeoLocation, GeolocationError>;
}

#[derive(Debug, Clone, Deserialize)]
struct Ip2LocationRow {
    ip_from: u32,
    ip_to: u32,
    country_code: String,
    country_name: String,
    region_name: String,
    city_name: String,
}

/// Country code of rows which cover reserved or private address ranges.
const UNKNOWN_COUNTRY: &str = "-";

#[derive(Debug, Clone, Default)]
pub struct Ip2LocationTable {
    /// sorted by `ip_from`, non overlapping
    rows: Vec<Ip2LocationRow>,
}

impl Ip2LocationTable {
    /// A table without any rows. Every lookup fails.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, GeolocationError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(reader);
        let mut rows = Vec::new();
        for row in csv_reader.deserialize() {
            let row: Ip2LocationRow = row?;
            rows.push(row);
        }
        rows.sort_by_key(|row| row.ip_from);
        debug!("loaded {} geolocation ranges", rows.len());
        Ok(Self { rows })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, GeolocationError> {
        let file = std::fs::File::open(path).map_err(csv::Error::from)?;
        Self::from_reader(file)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn find(&self, address: u32) -> Option<&Ip2LocationRow> {
        let index = self.rows.partition_point(|row| row.ip_from <= address);
        index
            .checked_sub(1)
            .map(|index| &self.rows[index])
            .filter(|row| address <= row.ip_to)
    }
}

impl Geolocation for Ip2LocationTable {
    fn locate(&self, address: IpAddr) -> Result<GeoLocation, GeolocationError> {
        let IpAddr::V4(v4) = address else {
            return Err(GeolocationError::Unresolved(address));
        };
        self.find(u32::from(v4))
            .filter(|row| row.country_code != UNKNOWN_COUNTRY)
            .map(|row| GeoLocation {
                country_code: row.country_code.clone(),
                country_name: row.country_name.clone(),
                region_name: row.region_name.clone(),
                city_name: row.city_name.clone(),
            })
            .ok_or(GeolocationError::Unresolved(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
\"0\",\"16777215\",\"-\",\"-\",\"-\",\"-\"
\"1729546240\",\"1729546495\",\"IN\",\"India\",\"Delhi\",\"New Delhi\"
\"16777216\",\"16777471\",\"US\",\"United States of America\",\"California\",\"Los Angeles\"
";

    fn table() -> Ip2LocationTable {
        Ip2LocationTable::from_reader(TABLE.as_bytes()).unwrap()
    }

    #[test]
    fn resolves_address_inside_range() {
        let address: IpAddr = "103.22.200.5".parse().unwrap();
        let location = table().locate(address).unwrap();
        assert_eq!(location.country_code, "IN");
        assert_eq!(location.city_name, "New Delhi");
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let table = table();
        let first: IpAddr = "1.0.0.0".parse().unwrap();
        let last: IpAddr = "1.0.0.255".parse().unwrap();
        assert_eq!(table.locate(first).unwrap().city_name, "Los Angeles");
        assert_eq!(table.locate(last).unwrap().city_name, "Los Angeles");
    }

    #[test]
    fn reserved_and_uncovered_addresses_are_unresolved() {
        let table = table();
        for address in ["0.0.0.1", "1.0.1.0", "255.255.255.255", "::1"] {
            let address: IpAddr = address.parse().unwrap();
            assert!(matches!(
                table.locate(address),
                Err(GeolocationError::Unresolved(_))
            ));
        }
    }

    #[test]
    fn empty_table_resolves_nothing() {
        let table = Ip2LocationTable::empty();
        assert!(table.is_empty());
        assert!(table.locate("8.8.8.8".parse().unwrap()).is_err());
    }

    #[test]
    fn malformed_rows_fail_to_load() {
        let result = Ip2LocationTable::from_reader("\"abc\",\"1\",\"US\"\n".as_bytes());
        assert!(matches!(result, Err(GeolocationError::Load(_))));
    }
}
