use thiserror::Error;
use tile_core::GenerationError;
use tile_rules::LoadError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog Error: {0}")]
    Catalog(#[from] LoadError),

    #[error("Generation Error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Visualization Error: {0}")]
    Visualization(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
