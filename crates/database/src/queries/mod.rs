use weather::database::DatabaseError;

pub mod location;
pub mod realtime_weather;

/// The one place which decides whether a row of `locations l` is visible.
/// Every query on active locations splices this into its `WHERE` clause.
macro_rules! active_location {
    () => {
        "l.status = 'active'"
    };
}
pub(crate) use active_location;

/// Columns of `locations l`, in the order of `LocationRow`.
macro_rules! location_columns {
    () => {
        "l.code, l.city_name, l.region_name, l.country_code, l.country_name, l.enabled, l.status"
    };
}
pub(crate) use location_columns;

pub(crate) fn convert_error(why: sqlx::Error) -> DatabaseError {
    match why {
        sqlx::Error::RowNotFound => DatabaseError::NotFound,
        sqlx::Error::Database(ref database_error) if database_error.is_unique_violation() => {
            DatabaseError::Conflict(database_error.message().to_owned())
        }
        sqlx::Error::Database(ref database_error)
            if database_error.is_foreign_key_violation() =>
        {
            DatabaseError::NotFound
        }
        _ => DatabaseError::Other(Box::new(why)),
    }
}

#[cfg(test)]
mod tests {
    use std::{borrow::Cow, error::Error as StdError, fmt};

    use sqlx::error::ErrorKind;

    use super::*;

    const MESSAGE: &str = "duplicate key value violates unique constraint \"locations_pkey\"";

    #[derive(Debug)]
    struct ConstraintError {
        kind: ErrorKind,
    }

    impl fmt::Display for ConstraintError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(MESSAGE)
        }
    }

    impl StdError for ConstraintError {}

    impl sqlx::error::DatabaseError for ConstraintError {
        fn message(&self) -> &str {
            MESSAGE
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            None
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            match self.kind {
                ErrorKind::UniqueViolation => ErrorKind::UniqueViolation,
                ErrorKind::ForeignKeyViolation => ErrorKind::ForeignKeyViolation,
                _ => ErrorKind::Other,
            }
        }
    }

    fn database_error(kind: ErrorKind) -> sqlx::Error {
        sqlx::Error::Database(Box::new(ConstraintError { kind }))
    }

    #[test]
    fn unique_violation_is_conflict() {
        let converted = convert_error(database_error(ErrorKind::UniqueViolation));
        assert!(matches!(
            converted,
            DatabaseError::Conflict(message) if message.contains("locations_pkey")
        ));
    }

    #[test]
    fn foreign_key_violation_is_not_found() {
        let converted = convert_error(database_error(ErrorKind::ForeignKeyViolation));
        assert!(matches!(converted, DatabaseError::NotFound));
    }

    #[test]
    fn missing_row_is_not_found() {
        assert!(matches!(
            convert_error(sqlx::Error::RowNotFound),
            DatabaseError::NotFound
        ));
    }

    #[test]
    fn other_failures_stay_other() {
        assert!(matches!(
            convert_error(database_error(ErrorKind::Other)),
            DatabaseError::Other(_)
        ));
        assert!(matches!(
            convert_error(sqlx::Error::PoolTimedOut),
            DatabaseError::Other(_)
        ));
    }
}
