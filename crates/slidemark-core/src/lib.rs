pub mod align;
pub mod config;
pub mod consts;
pub mod detection;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod io;
pub mod overlay;
pub mod session;
pub mod viewport;
