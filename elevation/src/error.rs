use thiserror::Error;

#[derive(Error, Debug)]
pub enum ElevationError {
    #[error("the {0} backend requires an API key")]
    MissingApiKey(&'static str),

    #[error("{0}")]
    Client(#[from] reqwest::Error),
}
