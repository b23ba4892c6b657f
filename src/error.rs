use thiserror::Error;

#[derive(Debug, Error)]
pub enum StencilError {
    #[error("Configuration error: global size {global_n} is not divisible by {size} ranks")]
    Configuration { global_n: usize, size: usize },

    #[error("Allocation error: {0}")]
    Allocation(#[from] std::collections::TryReserveError),

    #[error("Transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, StencilError>;
