// raster/mod.rs
//
// CPU-side pixel buffer used by the transition engine.

pub mod pixmap;

pub use pixmap::{Pixmap, Rgba8};
