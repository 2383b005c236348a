pub mod config;
pub mod source;
pub mod tissue;

pub use config::{BackgroundTier, ClassificationRule, TissueConfig};
pub use source::{PixelSource, RgbaBuffer};
pub use tissue::{classify_pixel, detect_tissue, PixelClass, TissueRegion};
