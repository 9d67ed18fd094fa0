use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Analysis error: {0}")]
    AnalysisError(String),

    #[error("Config error: {0}")]
    ConfigError(#[from] toml::de::Error),

    #[error("Unknown nodes: {}", names.join(", "))]
    UnknownNodes { names: Vec<String> },

    #[error("Thread pool error: {0}")]
    ThreadPoolError(#[from] rayon::ThreadPoolBuildError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
