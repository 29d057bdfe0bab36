// components/mod.rs
//
// Data-only building blocks attached to or stored in the scene.

pub mod object;

pub use object::Object;
