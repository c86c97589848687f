use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Page index {index} out of range (carousel has {total} pages)")]
    PageOutOfRange { index: usize, total: usize },

    #[error("Carousel has no pages")]
    EmptyCarousel,

    #[error("Invalid surface size: {width}x{height}")]
    InvalidSurface { width: f64, height: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
