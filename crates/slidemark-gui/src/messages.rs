use std::path::PathBuf;

use slidemark_core::config::SampleEntry;
use slidemark_core::detection::RgbaBuffer;
use slidemark_core::editor::PersistOutcome;
use slidemark_core::error::Result;
use slidemark_core::geometry::SourceExtent;
use slidemark_core::io::FeatureCollection;

/// Commands sent from UI thread to worker thread.
pub enum WorkerCommand {
    /// Decode a raster from disk.
    LoadRaster { path: PathBuf },

    /// Read or fetch an annotation payload (path or http(s) URL).
    LoadAnnotations {
        location: String,
        extent: Option<SourceExtent>,
    },

    /// Raster and annotations of one catalog entry.
    LoadSample { entry: SampleEntry },

    /// Write an exported payload, preferring the granted folder.
    PersistExport {
        granted: Option<PathBuf>,
        file_name: String,
        bytes: Vec<u8>,
    },
}

/// Results sent from worker thread back to UI thread.
pub enum WorkerResult {
    /// A command was picked up; every one ends with exactly one result below.
    Started {
        label: String,
    },
    RasterLoaded {
        label: String,
        result: Result<RgbaBuffer>,
    },
    AnnotationsLoaded {
        location: String,
        result: Result<FeatureCollection>,
        extent: Option<SourceExtent>,
    },
    ExportPersisted {
        result: Result<PersistOutcome>,
    },
    Log {
        message: String,
    },
}
