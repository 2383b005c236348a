use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlidemarkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to fetch annotations: {0}")]
    Fetch(String),

    #[error("Failed to decode raster: {0}")]
    Decode(String),

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Invalid GeoJSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Annotation payload contains no usable polygon vertices")]
    EmptyPointCloud,

    #[error("Invalid transform: scale terms must be finite and non-zero (a={a}, d={d})")]
    InvalidTransform { a: f64, d: f64 },

    #[error("Invalid solver config: {0}")]
    InvalidSolverConfig(String),

    #[error("A polygon needs at least 3 points (draft has {count})")]
    InsufficientPoints { count: usize },

    #[error("No polygon selected")]
    NothingSelected,

    #[error("Polygon {0} does not exist")]
    UnknownPolygon(u64),

    #[error("Raster not loaded")]
    NotLoaded,

    #[error("Save location unavailable: {0}")]
    PersistUnavailable(String),
}

pub type Result<T> = std::result::Result<T, SlidemarkError>;
