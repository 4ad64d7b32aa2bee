use std::error::Error;

use database::DatabaseError;

pub mod database;
pub mod geolocation;
pub mod memory;
pub mod service;

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Other(Box<dyn Error + Send + Sync>),
}

impl From<DatabaseError> for RequestError {
    fn from(value: DatabaseError) -> Self {
        match value {
            DatabaseError::NotFound => {
                Self::NotFound("The requested item does not exist.".to_owned())
            }
            DatabaseError::Conflict(message) => Self::Conflict(message),
            DatabaseError::Other(why) => Self::Other(why),
        }
    }
}

pub type RequestResult<O> = Result<O, RequestError>;
