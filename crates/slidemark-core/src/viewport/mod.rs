pub mod config;
pub mod controller;
pub mod gesture;

pub use config::ViewportConfig;
pub use controller::{ViewportController, ViewportSnapshot};
pub use gesture::{GestureUpdate, PointerId, PointerTracker};
