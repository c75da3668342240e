use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] stationpool_core::Error),

    #[error(transparent)]
    Model(#[from] stationpool_model::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
