/// Viewport display state. Zoom and pan live in the session.
#[derive(Default)]
pub struct ViewportState {
    /// Raster texture, possibly downscaled to fit the backend limit.
    pub texture: Option<egui::TextureHandle>,
    /// Last size reported to the session, so resizes are sent once.
    pub reported_size: Option<egui::Vec2>,
    /// Mouse button held inside the viewport.
    pub mouse_down: bool,
    /// Touches currently on the surface. While any are active the synthesized
    /// mouse events are ignored.
    pub touches: usize,
}
