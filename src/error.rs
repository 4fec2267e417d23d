use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilmPulseError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("upstream signal source unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("internal compute error: {0}")]
    InternalCompute(String),

    #[error("film has never been analyzed: {0}")]
    NotFound(String),

    #[error("invalid film id: {0}")]
    InvalidFilmId(String),

    #[error("corrupt score record for {0}: {1}")]
    CorruptRecord(String, String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FilmPulseError>;
