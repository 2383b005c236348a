pub mod export;
pub mod persist;
pub mod state;

pub use export::{export_file_name, export_polygons, round_coordinate, ExportConfig, ExportMetadata};
pub use persist::{persist_export, PersistOutcome};
pub use state::{
    AnnotationEditor, DrawState, EditorCommand, EditorEvent, EditorMode, PolygonId, UserPolygon,
    VertexHandle,
};
