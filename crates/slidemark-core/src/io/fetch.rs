//! Annotation payload retrieval from a local path or an HTTP(S) URL.

use std::path::Path;

use tracing::info;

use crate::error::{Result, SlidemarkError};

use super::geojson::FeatureCollection;

pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Read raw payload bytes. Non-success HTTP statuses are errors.
pub fn fetch_bytes(location: &str) -> Result<Vec<u8>> {
    if is_remote(location) {
        let response =
            reqwest::blocking::get(location).map_err(|e| SlidemarkError::Fetch(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SlidemarkError::Fetch(format!("{location}: HTTP {status}")));
        }
        let bytes = response
            .bytes()
            .map_err(|e| SlidemarkError::Fetch(e.to_string()))?;
        Ok(bytes.to_vec())
    } else {
        Ok(std::fs::read(Path::new(location))?)
    }
}

/// Fetch and parse a GeoJSON feature collection.
pub fn load_annotations(location: &str) -> Result<FeatureCollection> {
    let bytes = fetch_bytes(location)?;
    let collection = FeatureCollection::from_slice(&bytes)?;
    info!(
        location,
        features = collection.features.len(),
        "Annotations loaded"
    );
    Ok(collection)
}
