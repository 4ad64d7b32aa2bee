use weather::database::Result;

pub mod location;
pub mod realtime_weather;

pub trait DatabaseRow: Sized {
    type Model;

    fn to_model(self) -> Result<Self::Model>;
}

pub fn to_models<R: DatabaseRow>(rows: Vec<R>) -> Result<Vec<R::Model>> {
    rows.into_iter().map(DatabaseRow::to_model).collect()
}
