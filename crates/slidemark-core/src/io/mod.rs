pub mod fetch;
pub mod geojson;
pub mod raster;

pub use fetch::load_annotations;
pub use geojson::{CollectionStats, Feature, FeatureCollection, Geometry};
pub use raster::{decode_raster, fit_within, load_raster, save_png};
