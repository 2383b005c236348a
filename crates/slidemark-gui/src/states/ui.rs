use std::path::PathBuf;

use slidemark_core::geometry::SourceExtent;

/// Overall UI state.
#[derive(Default)]
pub struct UIState {
    pub raster_label: Option<String>,
    pub annotation_location: String,

    /// Declared annotation extent as typed; empty fields mean "register".
    pub source_width: String,
    pub source_height: String,

    pub export_title: String,
    pub last_export: Option<PathBuf>,

    /// Outstanding worker requests.
    pub pending: usize,

    /// Log messages.
    pub log_messages: Vec<String>,
}

impl UIState {
    pub fn is_busy(&self) -> bool {
        self.pending > 0
    }

    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
    }

    pub fn finish_request(&mut self) {
        self.pending = self.pending.saturating_sub(1);
    }

    /// Both fields must parse to positive numbers.
    pub fn source_extent(&self) -> Option<SourceExtent> {
        let width = self.source_width.trim().parse::<f64>().ok()?;
        let height = self.source_height.trim().parse::<f64>().ok()?;
        (width > 0.0 && height > 0.0).then_some(SourceExtent { width, height })
    }
}
